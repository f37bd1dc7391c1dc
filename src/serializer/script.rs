//! Python and SQL scaffold generation
//!
//! These targets do not translate program logic. They emit a runnable
//! starting point that embeds the source content and the boilerplate to
//! load and inspect it.

use super::delimited::DelimitedSerializer;
use super::notebook::{cells_of, CellKind};
use super::quotes::{comment_block, python_triple_quoted, sql_identifier, sql_literal};
use super::record::to_json_text;
use super::Serializer;
use crate::conversion::config::DEFAULT_TABLE_NAME;
use crate::conversion::ConversionOptions;
use crate::error::{SerializeError, SerializeResult};
use crate::model::shape::to_table;
use crate::model::{Intermediate, Table, TextDocument};
use crate::registry::FormatId;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_PY_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)"""(.*?)"""|'''(.*?)'''|"((?:[^"\\\n]|\\.)*)"|'((?:[^'\\\n]|\\.)*)'"#)
        .expect("Invalid regex")
});
static RE_SQL_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^\s*(SELECT|INSERT|UPDATE|DELETE|CREATE|WITH|DROP|ALTER)\b")
        .expect("Invalid regex")
});

fn pandas_csv_script(csv: &str) -> String {
    format!(
        r#"import pandas as pd
import io

# CSV data
csv_data = """{}"""

# Read CSV into DataFrame
df = pd.read_csv(io.StringIO(csv_data))

# Display basic information
print("Data shape:", df.shape)
print("\nColumn names:", df.columns.tolist())
print("\nFirst 5 rows:")
print(df.head())

# Basic statistics
print("\nBasic statistics:")
print(df.describe())

# Example data manipulation
# df_filtered = df[df['column_name'] > threshold]
# df_grouped = df.groupby('column_name').agg({{'another_column': 'mean'}})
"#,
        python_triple_quoted(csv)
    )
}

fn json_script(json: &str) -> String {
    format!(
        r#"import json
import pandas as pd

# JSON data
json_data = json.loads("""{}""")

# Convert to DataFrame if it's a list of objects
if isinstance(json_data, list):
    df = pd.DataFrame(json_data)
    print("Data shape:", df.shape)
    print("\nDataFrame:")
    print(df.head())
else:
    print("JSON data:")
    print(json.dumps(json_data, indent=2))

# Example operations
# df.to_csv('output.csv', index=False)
# filtered_data = [item for item in json_data if item.get('condition')]
"#,
        python_triple_quoted(json)
    )
}

fn sqlite_script(sql: &str) -> String {
    format!(
        r#"import sqlite3
import pandas as pd

# SQL commands
sql_commands = """
{}
"""

# Example database connection (SQLite)
# conn = sqlite3.connect('database.db')

# Example: Execute SQL and read into DataFrame
# df = pd.read_sql_query("SELECT * FROM table_name", conn)

# Alternative: Execute SQL commands
# cursor = conn.cursor()
# cursor.executescript(sql_commands)
# conn.commit()

print("SQL commands ready for execution:")
print(sql_commands)

# Example pandas SQL operations
# df.to_sql('table_name', conn, if_exists='replace', index=False)
"#,
        python_triple_quoted(sql.trim_matches('\n'))
    )
}

fn r_script(source: &str) -> String {
    format!(
        r#"# R source converted to a Python scaffold
# Port the logic with pandas, or run it unchanged through rpy2

r_code = """{}"""

# import rpy2.robjects as robjects
# robjects.r(r_code)

print("R code ready for execution:")
print(r_code)
"#,
        python_triple_quoted(source)
    )
}

fn text_script(text: &str) -> String {
    format!(
        r#"# Text content
text_content = """{}"""

lines = text_content.splitlines()
words = text_content.split()

print("Line count:", len(lines))
print("Word count:", len(words))
print("\nFirst lines:")
for line in lines[:5]:
    print(line)
"#,
        python_triple_quoted(text)
    )
}

/// Loader boilerplate for formats that are read from their own file
fn loader_script(format: FormatId, content: &str) -> String {
    let (title, loader) = match format {
        FormatId::Spreadsheet => (
            "Excel workbook",
            "df = pd.read_excel('data.xlsx', sheet_name=0)",
        ),
        FormatId::ColumnarStorage => ("Parquet file", "df = pd.read_parquet('data.parquet')"),
        FormatId::BiWorkbook => (
            "Power BI workbook",
            "# Export the model tables from Power BI Desktop first\ndf = pd.read_csv('exported_table.csv')",
        ),
        _ => (
            "Tableau workbook",
            "# Export the data source from Tableau (Data > Export Data) first\ndf = pd.read_csv('extract.csv')",
        ),
    };

    let mut script = format!(
        "import pandas as pd\n\n# {title}\n{loader}\n\nprint(\"Data shape:\", df.shape)\nprint(\"\\nColumns:\", df.columns.tolist())\nprint(df.head())\n"
    );
    let original = comment_block(content.trim_end(), "# ");
    if !original.is_empty() {
        script.push_str("\n# Original content:\n");
        script.push_str(&original);
        script.push('\n');
    }
    script
}

/// Code cells verbatim, markdown and raw cells as comments
fn notebook_script(doc: &TextDocument) -> SerializeResult<String> {
    let blocks: Vec<String> = cells_of(doc)?
        .into_iter()
        .map(|cell| match cell.kind {
            CellKind::Code => cell.source.trim_end().to_string(),
            CellKind::Markdown | CellKind::Raw => comment_block(cell.source.trim_end(), "# "),
        })
        .filter(|block| !block.is_empty())
        .collect();
    Ok(format!("{}\n", blocks.join("\n\n")))
}

/// Python scaffold output
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonSerializer;

impl Serializer for PythonSerializer {
    fn serialize(&self, value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String> {
        match value {
            Intermediate::Tabular(table) => {
                Ok(pandas_csv_script(&DelimitedSerializer::new(',').render_table(table)?))
            }
            Intermediate::Structured(tree) => {
                let json = to_json_text(tree, &options.clone().with_pretty(true))?;
                Ok(json_script(&json))
            }
            Intermediate::Text(doc) => match doc.format {
                FormatId::ScriptSql => Ok(sqlite_script(&doc.content)),
                FormatId::NotebookJupyter | FormatId::NotebookGeneric => notebook_script(doc),
                FormatId::ScriptR => Ok(r_script(&doc.content)),
                FormatId::Spreadsheet
                | FormatId::ColumnarStorage
                | FormatId::BiWorkbook
                | FormatId::VizWorkbook => Ok(loader_script(doc.format, &doc.content)),
                _ => Ok(text_script(&doc.content)),
            },
        }
    }

    /// Tables embed the delimited text exactly as it was read
    fn serialize_source(
        &self,
        value: &Intermediate,
        source: &str,
        options: &ConversionOptions,
    ) -> SerializeResult<String> {
        match value {
            Intermediate::Tabular(_) => Ok(pandas_csv_script(source.trim_end_matches(['\r', '\n']))),
            _ => self.serialize(value, options),
        }
    }

    fn name(&self) -> &'static str {
        "python scaffold"
    }
}

/// `CREATE TABLE` plus one `INSERT` per row, every column `VARCHAR(255)`
pub fn insert_script(table: &Table, options: &ConversionOptions) -> SerializeResult<String> {
    if table.columns.is_empty() {
        return Err(SerializeError::shape_mismatch("table with at least one column", "no columns"));
    }

    let name = sql_identifier(options.table_name(), DEFAULT_TABLE_NAME);
    let columns: Vec<String> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| sql_identifier(column, &format!("column_{}", i + 1)))
        .collect();

    let mut sql = format!("-- Generated SQL INSERT statements\n-- Table: {}\n\n", name);
    sql.push_str(&format!("CREATE TABLE {} (\n", name));
    sql.push_str(
        &columns
            .iter()
            .map(|column| format!("  {} VARCHAR(255)", column))
            .collect::<Vec<_>>()
            .join(",\n"),
    );
    sql.push_str("\n);\n\n");

    let column_list = columns.join(", ");
    for cells in table.padded_rows() {
        let values: Vec<String> = cells.into_iter().map(sql_literal).collect();
        sql.push_str(&format!(
            "INSERT INTO {} ({}) VALUES ({});\n",
            name,
            column_list,
            values.join(", ")
        ));
    }

    Ok(sql)
}

/// SQL statements embedded as string literals in Python source
pub fn embedded_sql(source: &str) -> Vec<String> {
    RE_PY_STRING
        .captures_iter(source)
        .filter_map(|caps| (1..=4).find_map(|i| caps.get(i)))
        .map(|m| m.as_str().trim())
        .filter(|literal| RE_SQL_STATEMENT.is_match(literal))
        .map(|literal| format!("{};", literal.trim_end_matches(';').trim_end()))
        .collect()
}

fn python_sql(doc: &TextDocument) -> String {
    let statements = embedded_sql(&doc.content);
    if statements.is_empty() {
        return format!(
            "-- No SQL statements were found in the Python source\n-- Python source for reference:\n{}\n",
            comment_block(doc.content.trim_end(), "-- ")
        );
    }
    format!(
        "-- SQL statements extracted from Python source\n\n{}\n",
        statements.join("\n\n")
    )
}

/// SQL scaffold output
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlSerializer;

impl Serializer for SqlSerializer {
    fn serialize(&self, value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String> {
        if let Intermediate::Text(doc) = value {
            if doc.format == FormatId::ScriptPython {
                return Ok(python_sql(doc));
            }
        }
        let table = to_table(value)?;
        insert_script(&table, options)
    }

    fn name(&self) -> &'static str {
        "sql scaffold"
    }
}
