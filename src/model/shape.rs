//! Adapters between intermediate shapes
//!
//! Serializers that need a table or a tree call into here instead of matching
//! on every intermediate variant themselves.

use super::{Intermediate, Table, TextDocument};
use crate::error::{SerializeError, SerializeResult};
use crate::parser::sql::extract_insert_rows;
use crate::registry::FormatId;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Column names of the line envelope used for opaque text sources
pub const ENVELOPE_COLUMNS: [&str; 2] = ["line", "content"];

/// Tabular to record: one key map per row, keys in column order
///
/// Values stay strings. A duplicated column name keeps its first position and
/// the last cell written under it.
pub fn records_from_table(table: &Table) -> Value {
    let records = table
        .padded_rows()
        .map(|cells| {
            let mut record = Map::new();
            for (column, cell) in table.columns.iter().zip(cells) {
                record.insert(column.clone(), Value::String(cell.to_string()));
            }
            Value::Object(record)
        })
        .collect();
    Value::Array(records)
}

/// Record to tabular: project a non-empty list of key maps onto the key set
/// of its first element
///
/// Keys missing from a later element render empty; keys the first element
/// does not have are dropped.
pub fn table_from_records(value: &Value) -> SerializeResult<Table> {
    let items = match value {
        Value::Array(items) if !items.is_empty() => items,
        other => {
            return Err(SerializeError::shape_mismatch(
                "non-empty list of key maps",
                describe_value(other),
            ))
        }
    };

    let first = items[0].as_object().ok_or_else(|| {
        SerializeError::shape_mismatch("non-empty list of key maps", describe_value(value))
    })?;
    let columns: Vec<String> = first.keys().cloned().collect();

    let mut table = Table::new(columns);
    for item in items {
        let record = item.as_object().ok_or_else(|| {
            SerializeError::shape_mismatch("list of key maps", describe_value(value))
        })?;
        let row = table
            .columns
            .iter()
            .map(|column| record.get(column).map(cell_text).unwrap_or_default())
            .collect();
        table.push_row(row);
    }

    Ok(table)
}

/// Textual form of a scalar (or nested) value inside a table cell
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        nested => serde_json::to_string(nested).unwrap_or_default(),
    }
}

/// Best-effort table for a text-carrying source
///
/// SQL contributes the rows of its INSERT statements. Anything else becomes
/// a line envelope with one row per source line.
pub fn table_from_text(doc: &TextDocument) -> SerializeResult<Table> {
    if doc.format == FormatId::ScriptSql {
        let expected = "SQL with INSERT ... VALUES statements";
        return match extract_insert_rows(&doc.content) {
            Ok(Some(table)) => Ok(table),
            Ok(None) => Err(SerializeError::shape_mismatch(expected, "no INSERT rows")),
            Err(e) => Err(SerializeError::shape_mismatch(expected, format!("unparseable SQL: {}", e))),
        };
    }

    let mut table = Table::new(ENVELOPE_COLUMNS.iter().map(|c| c.to_string()).collect());
    for (index, line) in doc.content.lines().enumerate() {
        table.push_row(vec![(index + 1).to_string(), line.to_string()]);
    }
    Ok(table)
}

/// View any intermediate value as a table
pub fn to_table(value: &Intermediate) -> SerializeResult<Cow<'_, Table>> {
    match value {
        Intermediate::Tabular(table) => Ok(Cow::Borrowed(table)),
        Intermediate::Structured(tree) => table_from_records(tree).map(Cow::Owned),
        Intermediate::Text(doc) => table_from_text(doc).map(Cow::Owned),
    }
}

/// View any intermediate value as a structured tree
pub fn to_structured(value: &Intermediate) -> SerializeResult<Cow<'_, Value>> {
    match value {
        Intermediate::Structured(tree) => Ok(Cow::Borrowed(tree)),
        Intermediate::Tabular(table) => Ok(Cow::Owned(records_from_table(table))),
        Intermediate::Text(doc) => table_from_text(doc).map(|t| Cow::Owned(records_from_table(&t))),
    }
}

/// Whether a tree is a non-empty list whose elements are all key maps
pub fn is_record_list(value: &Value) -> bool {
    matches!(value, Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object))
}

/// Short description of a value's top-level shape
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Object(_) => "key map".to_string(),
        Value::Array(items) if items.is_empty() => "empty list".to_string(),
        Value::Array(items) => match items.iter().find(|item| !item.is_object()) {
            Some(item) => format!("list containing {}", describe_value(item)),
            None => "list of key maps".to_string(),
        },
    }
}
