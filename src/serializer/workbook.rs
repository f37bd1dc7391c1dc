//! Spreadsheet, BI model and visualization workbook scaffolds
//!
//! None of these targets are written in their binary container formats.
//! Spreadsheets use the SpreadsheetML 2003 XML dialect, BI workbooks a
//! tabular model definition and viz workbooks a Tableau `.twb` document.

use super::record::to_json_text;
use super::xml::{finish, new_writer, write_error};
use super::Serializer;
use crate::conversion::ConversionOptions;
use crate::error::SerializeResult;
use crate::model::shape::to_table;
use crate::model::{Intermediate, Table};
use crate::registry::FormatId;
use once_cell::sync::Lazy;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use regex::Regex;
use serde_json::{json, Value};

/// Excel limits worksheet names to 31 characters
pub const MAX_SHEET_NAME: usize = 31;

const SPREADSHEET_NS: &str = "urn:schemas-microsoft-com:office:spreadsheet";
const DEFAULT_MODEL_TABLE: &str = "Data";

static RE_M_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex"));

/// Inferred column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Double,
    String,
}

impl ColumnType {
    /// Infer from the non-empty cells of a column
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a str>) -> Self {
        let mut inferred: Option<ColumnType> = None;
        for cell in cells.into_iter().filter(|c| !c.is_empty()) {
            let kind = if cell.parse::<i64>().is_ok() {
                ColumnType::Int64
            } else if is_number(cell) {
                ColumnType::Double
            } else {
                return ColumnType::String;
            };
            inferred = Some(match (inferred, kind) {
                (Some(ColumnType::Double), _) | (_, ColumnType::Double) => ColumnType::Double,
                _ => ColumnType::Int64,
            });
        }
        inferred.unwrap_or(ColumnType::String)
    }

    /// Tabular model data type
    pub fn model_name(&self) -> &'static str {
        match self {
            ColumnType::Int64 => "int64",
            ColumnType::Double => "double",
            ColumnType::String => "string",
        }
    }

    fn from_model_name(name: &str) -> Self {
        match name {
            "int64" => ColumnType::Int64,
            "double" | "decimal" => ColumnType::Double,
            _ => ColumnType::String,
        }
    }

    /// Power Query type used in `#table` type declarations
    fn m_type(&self) -> &'static str {
        match self {
            ColumnType::Int64 => "Int64.Type",
            ColumnType::Double => "number",
            ColumnType::String => "text",
        }
    }

    /// Tableau (datatype, role, type) triple
    fn tableau(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            ColumnType::Int64 => ("integer", "measure", "quantitative"),
            ColumnType::Double => ("real", "measure", "quantitative"),
            ColumnType::String => ("string", "dimension", "nominal"),
        }
    }

    fn from_tableau(datatype: &str) -> Self {
        match datatype {
            "integer" => ColumnType::Int64,
            "real" => ColumnType::Double,
            _ => ColumnType::String,
        }
    }
}

/// Finite decimal number, as a spreadsheet would store it
pub fn is_number(cell: &str) -> bool {
    !cell.is_empty()
        && cell.trim() == cell
        && !cell.contains(|c: char| c.is_alphabetic() && c != 'e' && c != 'E')
        && cell.parse::<f64>().is_ok_and(f64::is_finite)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: ColumnType,
}

/// Columns with inferred types plus the rows they describe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookSchema {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<String>>,
}

impl WorkbookSchema {
    pub fn from_table(table: &Table) -> Self {
        let rows: Vec<Vec<String>> = table
            .padded_rows()
            .map(|cells| cells.into_iter().map(str::to_string).collect())
            .collect();
        let columns = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| ColumnSpec {
                name: name.clone(),
                data_type: ColumnType::infer(rows.iter().map(|row| row[i].as_str())),
            })
            .collect();
        Self { columns, rows }
    }

    /// Schema of any intermediate value
    ///
    /// A BI model contributes the columns of its first table, a Tableau
    /// workbook its datasource columns. Anything else goes through the table
    /// view.
    pub fn from_intermediate(value: &Intermediate) -> SerializeResult<Self> {
        if let Intermediate::Text(doc) = value {
            let columns = match doc.format {
                FormatId::BiWorkbook => model_columns(&doc.content),
                FormatId::VizWorkbook => tableau_columns(&doc.content),
                _ => None,
            };
            if let Some(columns) = columns {
                return Ok(Self {
                    columns,
                    rows: Vec::new(),
                });
            }
        }
        Ok(Self::from_table(&*to_table(value)?))
    }
}

fn model_columns(content: &str) -> Option<Vec<ColumnSpec>> {
    let model: Value = serde_json::from_str(content).ok()?;
    let columns: Vec<ColumnSpec> = model["model"]["tables"][0]["columns"]
        .as_array()?
        .iter()
        .filter_map(|column| {
            Some(ColumnSpec {
                name: column["name"].as_str()?.to_string(),
                data_type: ColumnType::from_model_name(column["dataType"].as_str().unwrap_or("string")),
            })
        })
        .collect();
    (!columns.is_empty()).then_some(columns)
}

/// Datasource columns of a Tableau workbook
///
/// Reading stops at the first malformed tag; columns seen before it are kept.
fn tableau_columns(content: &str) -> Option<Vec<ColumnSpec>> {
    let mut reader = Reader::from_str(content);
    let mut columns = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) | Ok(Event::Empty(tag)) if tag.name().as_ref() == b"column" => {
                if let Some(column) = tableau_column(&tag) {
                    columns.push(column);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    (!columns.is_empty()).then_some(columns)
}

fn tableau_column(tag: &BytesStart<'_>) -> Option<ColumnSpec> {
    let mut name = None;
    let mut datatype = String::from("string");
    for attribute in tag.attributes().flatten() {
        let Ok(value) = attribute.unescape_value() else {
            continue;
        };
        match attribute.key.as_ref() {
            b"name" => name = Some(value.trim_start_matches('[').trim_end_matches(']').to_string()),
            b"datatype" => datatype = value.into_owned(),
            _ => {}
        }
    }
    name.map(|name| ColumnSpec {
        name,
        data_type: ColumnType::from_tableau(&datatype),
    })
}

/// Worksheet name with characters Excel rejects replaced, at most 31 chars
pub fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\') { '_' } else { c })
        .take(MAX_SHEET_NAME)
        .collect();
    if cleaned.trim().is_empty() {
        crate::conversion::config::DEFAULT_SHEET_NAME.to_string()
    } else {
        cleaned
    }
}

fn start<W: std::io::Write>(writer: &mut Writer<W>, element: BytesStart<'_>) -> SerializeResult<()> {
    writer.write_event(Event::Start(element)).map_err(write_error)
}

fn end<W: std::io::Write>(writer: &mut Writer<W>, name: &str) -> SerializeResult<()> {
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(write_error)
}

fn empty<W: std::io::Write>(writer: &mut Writer<W>, element: BytesStart<'_>) -> SerializeResult<()> {
    writer.write_event(Event::Empty(element)).map_err(write_error)
}

/// SpreadsheetML 2003 workbook with a single worksheet
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetSerializer;

impl SpreadsheetSerializer {
    fn write_row<W: std::io::Write>(
        writer: &mut Writer<W>,
        cells: &[&str],
    ) -> SerializeResult<()> {
        start(writer, BytesStart::new("Row"))?;
        for cell in cells {
            start(writer, BytesStart::new("Cell"))?;
            let kind = if is_number(cell) { "Number" } else { "String" };
            start(writer, BytesStart::new("Data").with_attributes([("ss:Type", kind)]))?;
            writer
                .write_event(Event::Text(BytesText::new(cell)))
                .map_err(write_error)?;
            end(writer, "Data")?;
            end(writer, "Cell")?;
        }
        end(writer, "Row")
    }
}

impl Serializer for SpreadsheetSerializer {
    fn serialize(&self, value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String> {
        let table = to_table(value)?;
        let mut writer = new_writer(options)?;

        start(
            &mut writer,
            BytesStart::new("Workbook").with_attributes([
                ("xmlns", SPREADSHEET_NS),
                ("xmlns:o", "urn:schemas-microsoft-com:office:office"),
                ("xmlns:x", "urn:schemas-microsoft-com:office:excel"),
                ("xmlns:ss", SPREADSHEET_NS),
            ]),
        )?;
        let name = sheet_name(options.sheet_name());
        start(
            &mut writer,
            BytesStart::new("Worksheet").with_attributes([("ss:Name", name.as_str())]),
        )?;
        start(&mut writer, BytesStart::new("Table"))?;

        let header: Vec<&str> = table.columns.iter().map(String::as_str).collect();
        Self::write_row(&mut writer, &header)?;
        for cells in table.padded_rows() {
            Self::write_row(&mut writer, &cells)?;
        }

        end(&mut writer, "Table")?;
        end(&mut writer, "Worksheet")?;
        end(&mut writer, "Workbook")?;
        finish(writer)
    }

    fn name(&self) -> &'static str {
        "spreadsheet"
    }
}

fn m_identifier(name: &str) -> String {
    if RE_M_IDENTIFIER.is_match(name) {
        name.to_string()
    } else {
        format!("#\"{}\"", name.replace('"', "\"\""))
    }
}

fn m_value(cell: &str, data_type: ColumnType) -> String {
    match data_type {
        ColumnType::Int64 | ColumnType::Double if cell.is_empty() => "null".to_string(),
        ColumnType::Int64 | ColumnType::Double => cell.to_string(),
        ColumnType::String => format!("\"{}\"", cell.replace('"', "\"\"")),
    }
}

/// Power Query expression building the table inline, one line per entry
fn partition_expression(schema: &WorkbookSchema) -> Vec<String> {
    let types = schema
        .columns
        .iter()
        .map(|c| format!("{} = {}", m_identifier(&c.name), c.data_type.m_type()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        "let".to_string(),
        "    Source = #table(".to_string(),
        format!("        type table [{}],", types),
        "        {".to_string(),
    ];
    let last = schema.rows.len().saturating_sub(1);
    for (index, row) in schema.rows.iter().enumerate() {
        let values = row
            .iter()
            .zip(&schema.columns)
            .map(|(cell, column)| m_value(cell, column.data_type))
            .collect::<Vec<_>>()
            .join(", ");
        let separator = if index == last { "" } else { "," };
        lines.push(format!("            {{{}}}{}", values, separator));
    }
    lines.extend([
        "        }".to_string(),
        "    )".to_string(),
        "in".to_string(),
        "    Source".to_string(),
    ]);
    lines
}

/// Tabular model definition for a BI workbook
#[derive(Debug, Clone, Copy, Default)]
pub struct BiModelSerializer;

impl BiModelSerializer {
    pub fn model(&self, schema: &WorkbookSchema, options: &ConversionOptions) -> Value {
        let table = options.name.as_deref().unwrap_or(DEFAULT_MODEL_TABLE);
        let columns: Vec<Value> = schema
            .columns
            .iter()
            .map(|column| {
                json!({
                    "name": column.name,
                    "dataType": column.data_type.model_name(),
                    "sourceColumn": column.name
                })
            })
            .collect();

        json!({
            "name": "SemanticModel",
            "compatibilityLevel": 1550,
            "model": {
                "culture": "en-US",
                "tables": [{
                    "name": table,
                    "columns": columns,
                    "partitions": [{
                        "name": format!("{}-partition", table),
                        "mode": "import",
                        "source": {
                            "type": "m",
                            "expression": partition_expression(schema)
                        }
                    }]
                }]
            }
        })
    }
}

impl Serializer for BiModelSerializer {
    fn serialize(&self, value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String> {
        let schema = WorkbookSchema::from_intermediate(value)?;
        to_json_text(&self.model(&schema, options), options)
    }

    fn name(&self) -> &'static str {
        "bi model"
    }
}

/// Tableau workbook with one datasource describing the columns
#[derive(Debug, Clone, Copy, Default)]
pub struct VizWorkbookSerializer;

impl Serializer for VizWorkbookSerializer {
    fn serialize(&self, value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String> {
        let schema = WorkbookSchema::from_intermediate(value)?;
        let caption = options.name.as_deref().unwrap_or(DEFAULT_MODEL_TABLE);
        let slug: String = caption
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        let source_name = format!("federated.{}", slug);
        let filename = format!("{}.csv", caption);

        let mut writer = new_writer(options)?;
        start(
            &mut writer,
            BytesStart::new("workbook").with_attributes([
                ("source-build", "2023.1.0"),
                ("version", "18.1"),
                ("xmlns:user", "http://www.tableausoftware.com/xml/user"),
            ]),
        )?;
        start(&mut writer, BytesStart::new("datasources"))?;
        start(
            &mut writer,
            BytesStart::new("datasource").with_attributes([
                ("caption", caption),
                ("inline", "true"),
                ("name", source_name.as_str()),
                ("version", "18.1"),
            ]),
        )?;
        empty(
            &mut writer,
            BytesStart::new("connection").with_attributes([
                ("class", "textscan"),
                ("directory", "."),
                ("filename", filename.as_str()),
                ("separator", ","),
            ]),
        )?;
        for column in &schema.columns {
            let (datatype, role, kind) = column.data_type.tableau();
            let name = format!("[{}]", column.name);
            empty(
                &mut writer,
                BytesStart::new("column").with_attributes([
                    ("caption", column.name.as_str()),
                    ("datatype", datatype),
                    ("name", name.as_str()),
                    ("role", role),
                    ("type", kind),
                ]),
            )?;
        }
        end(&mut writer, "datasource")?;
        end(&mut writer, "datasources")?;

        start(&mut writer, BytesStart::new("worksheets"))?;
        start(
            &mut writer,
            BytesStart::new("worksheet").with_attributes([("name", "Sheet 1")]),
        )?;
        start(&mut writer, BytesStart::new("table"))?;
        start(&mut writer, BytesStart::new("view"))?;
        start(&mut writer, BytesStart::new("datasources"))?;
        empty(
            &mut writer,
            BytesStart::new("datasource")
                .with_attributes([("caption", caption), ("name", source_name.as_str())]),
        )?;
        end(&mut writer, "datasources")?;
        end(&mut writer, "view")?;
        end(&mut writer, "table")?;
        end(&mut writer, "worksheet")?;
        end(&mut writer, "worksheets")?;
        end(&mut writer, "workbook")?;
        finish(writer)
    }

    fn name(&self) -> &'static str {
        "viz workbook"
    }
}
