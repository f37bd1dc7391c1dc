//! Text-carrying parser for formats without a structural model
//!
//! Script, prose, notebook and binary-family conversions are scaffold
//! generators, so their input only needs to be carried along verbatim.

use super::Parser;
use crate::error::ParseResult;
use crate::model::{Intermediate, TextDocument};
use crate::registry::FormatId;

/// Tags raw text with its source format
#[derive(Debug, Clone, Copy)]
pub struct TextParser {
    format: FormatId,
}

macro_rules! text_parsers {
    ($($name:ident => $format:ident),* $(,)?) => {
        $(pub(super) static $name: TextParser = TextParser::new(FormatId::$format);)*
    };
}

text_parsers! {
    MARKDOWN => MarkupMarkdown,
    HTML => MarkupHtml,
    SQL => ScriptSql,
    PYTHON => ScriptPython,
    R => ScriptR,
    JUPYTER => NotebookJupyter,
    NOTEBOOK => NotebookGeneric,
    TEXT => DocumentText,
    PDF => DocumentPdf,
    SPREADSHEET => Spreadsheet,
    COLUMNAR => ColumnarStorage,
    BI => BiWorkbook,
    VIZ => VizWorkbook,
}

impl TextParser {
    pub const fn new(format: FormatId) -> Self {
        Self { format }
    }

    pub fn format(&self) -> FormatId {
        self.format
    }
}

impl Parser for TextParser {
    fn parse(&self, text: &str) -> ParseResult<Intermediate> {
        Ok(Intermediate::Text(TextDocument::new(self.format, text)))
    }

    fn name(&self) -> &'static str {
        "text"
    }
}
