//! Parsers turning raw text into intermediate values

pub mod directory;
pub mod filter;
pub mod record;
pub mod sql;
pub mod tabular;
pub mod text;
pub mod xml;

use crate::error::ParseResult;
use crate::model::Intermediate;
use crate::registry::FormatId;
use std::io::Read;
use std::path::PathBuf;

pub use record::{JsonParser, YamlParser};
pub use tabular::TabularParser;
pub use text::TextParser;
pub use xml::XmlParser;

/// Capability shared by every source format family
pub trait Parser: Send + Sync {
    /// Parse `text` into an intermediate value
    fn parse(&self, text: &str) -> ParseResult<Intermediate>;

    /// Human-readable parser name, used in route descriptions
    fn name(&self) -> &'static str;
}

static CSV: TabularParser = TabularParser::new(',');
static TSV: TabularParser = TabularParser::new('\t');
static JSON: JsonParser = JsonParser;
static YAML: YamlParser = YamlParser;
static XML: XmlParser = XmlParser;

/// Parser for a source format
///
/// Every format has one: formats without a structural model are carried as
/// tagged text.
pub fn parser_for(format: FormatId) -> &'static dyn Parser {
    match format {
        FormatId::TabularCsv => &CSV,
        FormatId::TabularTsv => &TSV,
        FormatId::RecordJson => &JSON,
        FormatId::RecordYaml => &YAML,
        FormatId::MarkupXml => &XML,
        FormatId::MarkupMarkdown => &text::MARKDOWN,
        FormatId::MarkupHtml => &text::HTML,
        FormatId::ScriptSql => &text::SQL,
        FormatId::ScriptPython => &text::PYTHON,
        FormatId::ScriptR => &text::R,
        FormatId::NotebookJupyter => &text::JUPYTER,
        FormatId::NotebookGeneric => &text::NOTEBOOK,
        FormatId::DocumentText => &text::TEXT,
        FormatId::DocumentPdf => &text::PDF,
        FormatId::Spreadsheet => &text::SPREADSHEET,
        FormatId::ColumnarStorage => &text::COLUMNAR,
        FormatId::BiWorkbook => &text::BI,
        FormatId::VizWorkbook => &text::VIZ,
    }
}

/// Where the raw text of a conversion comes from
#[derive(Debug, Clone)]
pub enum InputSource {
    String(String),
    File(PathBuf),
    Stdin,
}

impl InputSource {
    /// Get a human-readable description of the source
    pub fn description(&self) -> String {
        match self {
            InputSource::String(_) => "string input".to_string(),
            InputSource::File(path) => format!("file: {}", path.display()),
            InputSource::Stdin => "standard input".to_string(),
        }
    }

    /// Size in bytes, when known without reading
    pub fn estimated_size(&self) -> Option<u64> {
        match self {
            InputSource::String(s) => Some(s.len() as u64),
            InputSource::File(path) => std::fs::metadata(path).ok().map(|m| m.len()),
            InputSource::Stdin => None,
        }
    }

    /// Read content as UTF-8 text
    pub fn read_content(&self) -> Result<String, std::io::Error> {
        match self {
            InputSource::String(content) => Ok(content.clone()),
            InputSource::File(path) => std::fs::read_to_string(path),
            InputSource::Stdin => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                Ok(buffer)
            }
        }
    }

    /// Format implied by the file name, if any
    pub fn detected_format(&self) -> Option<FormatId> {
        match self {
            InputSource::File(path) => crate::registry::detect(path),
            _ => None,
        }
    }
}
