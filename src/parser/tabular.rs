//! Delimited text parser (comma and tab separated)

use super::Parser;
use crate::error::{ParseError, ParseResult, Position};
use crate::model::{Intermediate, Table};

/// Reads delimited text through the `csv` crate
///
/// Quoted fields may contain the delimiter. Fields are trimmed and lose one
/// remaining pair of enclosing double quotes. Rows are not width-checked.
#[derive(Debug, Clone, Copy)]
pub struct TabularParser {
    delimiter: char,
}

impl TabularParser {
    pub const fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parse delimited text into a table
    pub fn parse_table(&self, text: &str) -> ParseResult<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter as u8)
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut table: Option<Table> = None;
        for result in reader.records() {
            let record = result.map_err(|e| {
                let line = e.position().map(|p| p.line() as usize).unwrap_or(1);
                ParseError::malformed(self.name(), Position::new(line, 1), e.to_string())
            })?;

            // A whitespace-only line reads as one empty field
            if record.len() == 1 && record[0].is_empty() {
                continue;
            }

            let fields: Vec<String> = record.iter().map(clean_field).collect();
            match table.as_mut() {
                Some(table) => table.push_row(fields),
                None => table = Some(Table::new(fields)),
            }
        }

        table.ok_or(ParseError::EmptyInput)
    }
}

impl Parser for TabularParser {
    fn parse(&self, text: &str) -> ParseResult<Intermediate> {
        self.parse_table(text).map(Intermediate::Tabular)
    }

    fn name(&self) -> &'static str {
        match self.delimiter {
            '\t' => "tab-delimited",
            _ => "comma-delimited",
        }
    }
}

/// Strip one pair of enclosing quotes the reader left in place
///
/// The reader only unquotes a field whose quote is its first byte, so
/// `  "id" ` arrives here as `"id"` after trimming.
fn clean_field(field: &str) -> String {
    field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(field)
        .to_string()
}
