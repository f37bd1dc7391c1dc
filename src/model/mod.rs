//! Intermediate values exchanged between parsers and serializers

pub mod shape;

use crate::registry::FormatId;
use serde_json::Value;

/// Column names plus positional rows of string cells
///
/// Rows keep exactly the cells found in the source. A row shorter than the
/// header is not padded here; readers resolve missing cells to `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (`row`, `column`), empty when the row is short
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map_or("", String::as_str)
    }

    /// Iterate rows projected onto the header width
    pub fn padded_rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        let width = self.width();
        self.rows.iter().map(move |cells| {
            (0..width)
                .map(|i| cells.get(i).map_or("", String::as_str))
                .collect()
        })
    }
}

/// Raw text tagged with the format it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    pub format: FormatId,
    pub content: String,
}

impl TextDocument {
    pub fn new(format: FormatId, content: impl Into<String>) -> Self {
        Self {
            format,
            content: content.into(),
        }
    }
}

/// Canonical value a parser produces and a serializer consumes
#[derive(Debug, Clone, PartialEq)]
pub enum Intermediate {
    Tabular(Table),
    /// Untyped tree; key maps keep insertion order
    Structured(Value),
    Text(TextDocument),
}

impl Intermediate {
    /// Short name of the variant, used in shape diagnostics
    pub fn shape_name(&self) -> &'static str {
        match self {
            Intermediate::Tabular(_) => "table",
            Intermediate::Structured(_) => "structured value",
            Intermediate::Text(_) => "text document",
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Intermediate::Tabular(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Intermediate::Structured(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextDocument> {
        match self {
            Intermediate::Text(doc) => Some(doc),
            _ => None,
        }
    }
}
