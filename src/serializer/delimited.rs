//! Comma- and tab-delimited output

use super::Serializer;
use crate::conversion::ConversionOptions;
use crate::error::{SerializeError, SerializeResult};
use crate::model::shape::to_table;
use crate::model::{Intermediate, Table};

/// Header line plus one line per row, no trailing newline
///
/// Fields are quoted only when they contain the delimiter, a quote or a
/// line break.
#[derive(Debug, Clone, Copy)]
pub struct DelimitedSerializer {
    delimiter: char,
}

impl DelimitedSerializer {
    pub const fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Render a table; short rows pad with empty cells, long rows truncate
    pub fn render_table(&self, table: &Table) -> SerializeResult<String> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter as u8)
            .quote_style(csv::QuoteStyle::Necessary)
            .flexible(true)
            .from_writer(Vec::new());

        wtr.write_record(&table.columns)
            .map_err(|e| SerializeError::render(format!("Failed to write header: {}", e)))?;
        for (index, cells) in table.padded_rows().enumerate() {
            wtr.write_record(cells)
                .map_err(|e| SerializeError::render(format!("Failed to write row {}: {}", index + 1, e)))?;
        }

        let bytes = wtr
            .into_inner()
            .map_err(|e| SerializeError::render(format!("Failed to flush writer: {}", e)))?;
        let mut output = String::from_utf8(bytes).map_err(|e| SerializeError::render(e.to_string()))?;
        if output.ends_with('\n') {
            output.pop();
        }
        Ok(output)
    }
}

impl Serializer for DelimitedSerializer {
    fn serialize(&self, value: &Intermediate, _options: &ConversionOptions) -> SerializeResult<String> {
        self.render_table(&*to_table(value)?)
    }

    fn name(&self) -> &'static str {
        match self.delimiter {
            '\t' => "tab-delimited",
            _ => "comma-delimited",
        }
    }
}
