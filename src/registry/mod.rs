//! Static catalog of supported formats
//!
//! The catalog and the conversion graph are fixed configuration data built
//! into the binary. Nothing here is mutable after start-up, so every lookup is
//! a plain read from `'static` storage and safe to share across threads.

pub mod capability;
pub mod edges;

use crate::error::{ConversionError, ConversionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use capability::{CapabilityIndex, ConversionOption};
pub use edges::{is_declared, reachable_targets};

/// Closed set of format identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatId {
    TabularCsv,
    TabularTsv,
    RecordJson,
    RecordYaml,
    MarkupXml,
    MarkupMarkdown,
    MarkupHtml,
    ScriptSql,
    ScriptPython,
    ScriptR,
    NotebookJupyter,
    NotebookGeneric,
    DocumentText,
    DocumentPdf,
    Spreadsheet,
    ColumnarStorage,
    BiWorkbook,
    VizWorkbook,
}

impl FormatId {
    /// Every identifier, in registry order
    pub const ALL: [FormatId; 18] = [
        FormatId::TabularCsv,
        FormatId::RecordJson,
        FormatId::ScriptSql,
        FormatId::ScriptPython,
        FormatId::Spreadsheet,
        FormatId::ColumnarStorage,
        FormatId::RecordYaml,
        FormatId::MarkupXml,
        FormatId::TabularTsv,
        FormatId::NotebookJupyter,
        FormatId::ScriptR,
        FormatId::MarkupMarkdown,
        FormatId::DocumentText,
        FormatId::MarkupHtml,
        FormatId::DocumentPdf,
        FormatId::BiWorkbook,
        FormatId::VizWorkbook,
        FormatId::NotebookGeneric,
    ];

    /// Canonical identifier, e.g. `tabular-csv`
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatId::TabularCsv => "tabular-csv",
            FormatId::TabularTsv => "tabular-tsv",
            FormatId::RecordJson => "record-json",
            FormatId::RecordYaml => "record-yaml",
            FormatId::MarkupXml => "markup-xml",
            FormatId::MarkupMarkdown => "markup-markdown",
            FormatId::MarkupHtml => "markup-html",
            FormatId::ScriptSql => "script-sql",
            FormatId::ScriptPython => "script-python",
            FormatId::ScriptR => "script-r",
            FormatId::NotebookJupyter => "notebook-jupyter",
            FormatId::NotebookGeneric => "notebook-generic",
            FormatId::DocumentText => "document-text",
            FormatId::DocumentPdf => "document-pdf",
            FormatId::Spreadsheet => "spreadsheet",
            FormatId::ColumnarStorage => "columnar-storage",
            FormatId::BiWorkbook => "bi-workbook",
            FormatId::VizWorkbook => "viz-workbook",
        }
    }

    /// Short name used on the command line, e.g. `csv`
    pub fn short_name(&self) -> &'static str {
        match self {
            FormatId::TabularCsv => "csv",
            FormatId::TabularTsv => "tsv",
            FormatId::RecordJson => "json",
            FormatId::RecordYaml => "yaml",
            FormatId::MarkupXml => "xml",
            FormatId::MarkupMarkdown => "markdown",
            FormatId::MarkupHtml => "html",
            FormatId::ScriptSql => "sql",
            FormatId::ScriptPython => "python",
            FormatId::ScriptR => "r",
            FormatId::NotebookJupyter => "jupyter",
            FormatId::NotebookGeneric => "notebook",
            FormatId::DocumentText => "txt",
            FormatId::DocumentPdf => "pdf",
            FormatId::Spreadsheet => "excel",
            FormatId::ColumnarStorage => "parquet",
            FormatId::BiWorkbook => "pbix",
            FormatId::VizWorkbook => "tbwx",
        }
    }

    /// Registry entry for this identifier
    pub fn descriptor(&self) -> &'static FormatDescriptor {
        // The catalog is built from FormatId::ALL, so every identifier has an entry
        &CATALOG[self.registry_index()]
    }

    fn registry_index(&self) -> usize {
        match self {
            FormatId::TabularCsv => 0,
            FormatId::RecordJson => 1,
            FormatId::ScriptSql => 2,
            FormatId::ScriptPython => 3,
            FormatId::Spreadsheet => 4,
            FormatId::ColumnarStorage => 5,
            FormatId::RecordYaml => 6,
            FormatId::MarkupXml => 7,
            FormatId::TabularTsv => 8,
            FormatId::NotebookJupyter => 9,
            FormatId::ScriptR => 10,
            FormatId::MarkupMarkdown => 11,
            FormatId::DocumentText => 12,
            FormatId::MarkupHtml => 13,
            FormatId::DocumentPdf => 14,
            FormatId::BiWorkbook => 15,
            FormatId::VizWorkbook => 16,
            FormatId::NotebookGeneric => 17,
        }
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let alias = match wanted.as_str() {
            "yml" => Some(FormatId::RecordYaml),
            "md" => Some(FormatId::MarkupMarkdown),
            "py" => Some(FormatId::ScriptPython),
            "ipynb" => Some(FormatId::NotebookJupyter),
            "text" => Some(FormatId::DocumentText),
            "xlsx" | "xls" | "spreadsheet" => Some(FormatId::Spreadsheet),
            "twbx" | "twb" | "tableau" => Some(FormatId::VizWorkbook),
            "powerbi" => Some(FormatId::BiWorkbook),
            _ => None,
        };

        alias
            .or_else(|| {
                FormatId::ALL
                    .into_iter()
                    .find(|id| id.as_str() == wanted || id.short_name() == wanted)
            })
            .ok_or_else(|| ConversionError::unknown_format(s))
    }
}

/// Structural family of a format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tabular,
    Code,
    Markup,
    Document,
    Visualization,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tabular => "tabular",
            Category::Code => "code",
            Category::Markup => "markup",
            Category::Document => "document",
            Category::Visualization => "visualization",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one registered format
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatDescriptor {
    pub id: FormatId,
    pub name: &'static str,
    /// Extensions with leading dot; the first one is the default
    pub extensions: &'static [&'static str],
    pub description: &'static str,
    pub category: Category,
}

impl FormatDescriptor {
    /// Default extension without the leading dot, e.g. `csv`
    pub fn default_extension(&self) -> &'static str {
        self.extensions[0].trim_start_matches('.')
    }

    /// Case-insensitive check against every declared extension
    pub fn matches_extension(&self, extension: &str) -> bool {
        let wanted = extension.trim_start_matches('.');
        self.extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(wanted))
    }
}

/// The process-wide catalog, in registry order
pub static CATALOG: [FormatDescriptor; 18] = [
    FormatDescriptor {
        id: FormatId::TabularCsv,
        name: "CSV",
        extensions: &[".csv"],
        description: "Comma-separated values file",
        category: Category::Tabular,
    },
    FormatDescriptor {
        id: FormatId::RecordJson,
        name: "JSON",
        extensions: &[".json"],
        description: "JavaScript Object Notation",
        category: Category::Tabular,
    },
    FormatDescriptor {
        id: FormatId::ScriptSql,
        name: "SQL",
        extensions: &[".sql"],
        description: "Structured Query Language",
        category: Category::Code,
    },
    FormatDescriptor {
        id: FormatId::ScriptPython,
        name: "Python",
        extensions: &[".py"],
        description: "Python script file",
        category: Category::Code,
    },
    FormatDescriptor {
        id: FormatId::Spreadsheet,
        name: "Excel",
        extensions: &[".xlsx", ".xls"],
        description: "Microsoft Excel spreadsheet",
        category: Category::Tabular,
    },
    FormatDescriptor {
        id: FormatId::ColumnarStorage,
        name: "Parquet",
        extensions: &[".parquet"],
        description: "Apache Parquet columnar storage",
        category: Category::Tabular,
    },
    FormatDescriptor {
        id: FormatId::RecordYaml,
        name: "YAML",
        extensions: &[".yaml", ".yml"],
        description: "YAML Ain't Markup Language",
        category: Category::Markup,
    },
    FormatDescriptor {
        id: FormatId::MarkupXml,
        name: "XML",
        extensions: &[".xml"],
        description: "eXtensible Markup Language",
        category: Category::Markup,
    },
    FormatDescriptor {
        id: FormatId::TabularTsv,
        name: "TSV",
        extensions: &[".tsv"],
        description: "Tab-separated values file",
        category: Category::Tabular,
    },
    FormatDescriptor {
        id: FormatId::NotebookJupyter,
        name: "Jupyter Notebook",
        extensions: &[".ipynb"],
        description: "Jupyter notebook file",
        category: Category::Code,
    },
    FormatDescriptor {
        id: FormatId::ScriptR,
        name: "R Script",
        extensions: &[".R"],
        description: "R programming language script",
        category: Category::Code,
    },
    FormatDescriptor {
        id: FormatId::MarkupMarkdown,
        name: "Markdown",
        extensions: &[".md", ".markdown"],
        description: "Markdown markup language",
        category: Category::Markup,
    },
    FormatDescriptor {
        id: FormatId::DocumentText,
        name: "Text",
        extensions: &[".txt"],
        description: "Plain text file",
        category: Category::Document,
    },
    FormatDescriptor {
        id: FormatId::MarkupHtml,
        name: "HTML",
        extensions: &[".html", ".htm"],
        description: "HyperText Markup Language",
        category: Category::Markup,
    },
    FormatDescriptor {
        id: FormatId::DocumentPdf,
        name: "PDF",
        extensions: &[".pdf"],
        description: "Portable Document Format",
        category: Category::Document,
    },
    FormatDescriptor {
        id: FormatId::BiWorkbook,
        name: "Power BI",
        extensions: &[".pbix"],
        description: "Microsoft Power BI file",
        category: Category::Visualization,
    },
    FormatDescriptor {
        id: FormatId::VizWorkbook,
        name: "Tableau Workbook",
        extensions: &[".twbx", ".twb"],
        description: "Tableau workbook file",
        category: Category::Visualization,
    },
    FormatDescriptor {
        id: FormatId::NotebookGeneric,
        name: "Generic Notebook",
        extensions: &[".nb", ".notebook"],
        description: "Generic notebook format",
        category: Category::Code,
    },
];

/// Look up the descriptor of a format
pub fn describe(id: FormatId) -> ConversionResult<&'static FormatDescriptor> {
    CATALOG
        .iter()
        .find(|descriptor| descriptor.id == id)
        .ok_or_else(|| ConversionError::unknown_format(id.as_str()))
}

/// Look up a descriptor by canonical identifier or short name
pub fn describe_name(name: &str) -> ConversionResult<&'static FormatDescriptor> {
    describe(name.parse()?)
}

/// Detect the format of a file from its extension, case-insensitively
///
/// Only the final extension counts; a name without one detects nothing.
pub fn detect(filename: impl AsRef<Path>) -> Option<FormatId> {
    let extension = filename.as_ref().extension()?.to_str()?;
    CATALOG
        .iter()
        .find(|descriptor| descriptor.matches_extension(extension))
        .map(|descriptor| descriptor.id)
}
