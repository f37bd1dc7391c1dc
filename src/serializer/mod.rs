//! Serializers rendering intermediate values into target formats

pub mod delimited;
pub mod document;
pub mod markup;
pub mod notebook;
pub mod pdf;
pub mod quotes;
pub mod record;
pub mod script;
pub mod workbook;
pub mod xml;

use crate::conversion::ConversionOptions;
use crate::error::SerializeResult;
use crate::model::Intermediate;
use crate::registry::FormatId;

pub use delimited::DelimitedSerializer;
pub use document::{HtmlSerializer, MarkdownSerializer, PlainTextSerializer};
pub use notebook::NotebookSerializer;
pub use pdf::PdfSerializer;
pub use record::{JsonSerializer, YamlSerializer};
pub use script::{PythonSerializer, SqlSerializer};
pub use workbook::{BiModelSerializer, SpreadsheetSerializer, VizWorkbookSerializer};
pub use xml::XmlSerializer;

/// Capability shared by every target format family
pub trait Serializer: Send + Sync {
    /// Whether this serializer can render the given intermediate variant
    fn accepts(&self, _value: &Intermediate) -> bool {
        true
    }

    /// Render `value` as target text
    fn serialize(&self, value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String>;

    /// Render `value` with the raw text it was parsed from
    ///
    /// Targets that embed their input override this to keep the source
    /// bytes instead of a re-rendering of the parsed value.
    fn serialize_source(
        &self,
        value: &Intermediate,
        _source: &str,
        options: &ConversionOptions,
    ) -> SerializeResult<String> {
        self.serialize(value, options)
    }

    /// Human-readable serializer name, used in route descriptions
    fn name(&self) -> &'static str;
}

static CSV: DelimitedSerializer = DelimitedSerializer::new(',');
static TSV: DelimitedSerializer = DelimitedSerializer::new('\t');
static JSON: JsonSerializer = JsonSerializer;
static YAML: YamlSerializer = YamlSerializer;
static XML: XmlSerializer = XmlSerializer;
static MARKDOWN: MarkdownSerializer = MarkdownSerializer;
static HTML: HtmlSerializer = HtmlSerializer;
static TEXT: PlainTextSerializer = PlainTextSerializer;
static PDF: PdfSerializer = PdfSerializer;
static PYTHON: PythonSerializer = PythonSerializer;
static SQL: SqlSerializer = SqlSerializer;
static NOTEBOOK: NotebookSerializer = NotebookSerializer;
static SPREADSHEET: SpreadsheetSerializer = SpreadsheetSerializer;
static BI_MODEL: BiModelSerializer = BiModelSerializer;
static VIZ_WORKBOOK: VizWorkbookSerializer = VizWorkbookSerializer;

/// Serializer for a target format, or `None` when nothing renders it
///
/// R scripts and columnar storage are source-only formats.
pub fn serializer_for(format: FormatId) -> Option<&'static dyn Serializer> {
    let serializer: &'static dyn Serializer = match format {
        FormatId::TabularCsv => &CSV,
        FormatId::TabularTsv => &TSV,
        FormatId::RecordJson => &JSON,
        FormatId::RecordYaml => &YAML,
        FormatId::MarkupXml => &XML,
        FormatId::MarkupMarkdown => &MARKDOWN,
        FormatId::MarkupHtml => &HTML,
        FormatId::DocumentText => &TEXT,
        FormatId::DocumentPdf => &PDF,
        FormatId::ScriptPython => &PYTHON,
        FormatId::ScriptSql => &SQL,
        FormatId::NotebookJupyter | FormatId::NotebookGeneric => &NOTEBOOK,
        FormatId::Spreadsheet => &SPREADSHEET,
        FormatId::BiWorkbook => &BI_MODEL,
        FormatId::VizWorkbook => &VIZ_WORKBOOK,
        FormatId::ScriptR | FormatId::ColumnarStorage => return None,
    };
    Some(serializer)
}
