//! Declared conversion graph
//!
//! This table is the only authority on whether a pair is convertible. The
//! graph is neither symmetric nor transitive.

use super::FormatId;
use super::FormatId::*;

/// Targets reachable from `source`, in declaration order
pub fn reachable_targets(source: FormatId) -> &'static [FormatId] {
    match source {
        TabularCsv => &[
            RecordJson,
            Spreadsheet,
            ScriptSql,
            ScriptPython,
            TabularTsv,
            RecordYaml,
            MarkupXml,
            MarkupMarkdown,
            BiWorkbook,
        ],
        RecordJson => &[
            TabularCsv,
            Spreadsheet,
            ScriptPython,
            RecordYaml,
            MarkupXml,
            ScriptSql,
            MarkupMarkdown,
            BiWorkbook,
        ],
        ScriptSql => &[
            ScriptPython,
            TabularCsv,
            RecordJson,
            MarkupMarkdown,
            DocumentText,
        ],
        ScriptPython => &[
            NotebookJupyter,
            ScriptSql,
            MarkupMarkdown,
            DocumentText,
            NotebookGeneric,
        ],
        Spreadsheet => &[
            TabularCsv,
            RecordJson,
            ScriptPython,
            TabularTsv,
            RecordYaml,
            BiWorkbook,
        ],
        ColumnarStorage => &[
            TabularCsv,
            RecordJson,
            ScriptPython,
            Spreadsheet,
            BiWorkbook,
        ],
        RecordYaml => &[RecordJson, MarkupXml, ScriptPython, MarkupMarkdown],
        MarkupXml => &[
            RecordJson,
            RecordYaml,
            TabularCsv,
            ScriptPython,
            MarkupMarkdown,
        ],
        TabularTsv => &[
            TabularCsv,
            RecordJson,
            Spreadsheet,
            ScriptPython,
            RecordYaml,
        ],
        NotebookJupyter => &[ScriptPython, MarkupMarkdown, MarkupHtml, NotebookGeneric],
        ScriptR => &[ScriptPython, TabularCsv, MarkupMarkdown, DocumentText],
        MarkupMarkdown => &[MarkupHtml, DocumentText, DocumentPdf],
        DocumentText => &[MarkupMarkdown, ScriptPython, ScriptSql, RecordYaml],
        MarkupHtml => &[MarkupMarkdown, DocumentText, DocumentPdf],
        DocumentPdf => &[DocumentText, MarkupMarkdown],
        BiWorkbook => &[
            ScriptPython,
            TabularCsv,
            RecordJson,
            Spreadsheet,
            VizWorkbook,
        ],
        VizWorkbook => &[
            ScriptPython,
            TabularCsv,
            RecordJson,
            Spreadsheet,
            BiWorkbook,
        ],
        NotebookGeneric => &[ScriptPython, NotebookJupyter, MarkupMarkdown],
    }
}

/// Whether `source -> target` is a declared edge
pub fn is_declared(source: FormatId, target: FormatId) -> bool {
    reachable_targets(source).contains(&target)
}
