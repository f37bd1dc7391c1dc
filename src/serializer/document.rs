//! Markdown, HTML and plain text output

use super::delimited::DelimitedSerializer;
use super::markup::{
    escape_html, html_plain_text, html_to_markdown, markdown_cell, markdown_plain_text,
    render_markdown,
};
use super::notebook::{cells_of, CellKind};
use super::pdf::extract_text;
use super::record::to_json_text;
use super::Serializer;
use crate::conversion::ConversionOptions;
use crate::error::SerializeResult;
use crate::model::shape::{cell_text, is_record_list, table_from_records};
use crate::model::{Intermediate, Table, TextDocument};
use crate::registry::FormatId;
use serde_json::Value;

const DEFAULT_TITLE: &str = "Converted document";

/// GFM pipe table
pub fn markdown_table(table: &Table) -> String {
    if table.columns.is_empty() {
        return String::new();
    }

    let row = |cells: Vec<String>| format!("| {} |", cells.join(" | "));
    let mut lines = vec![
        row(table.columns.iter().map(|c| markdown_cell(c)).collect()),
        row(table.columns.iter().map(|_| "---".to_string()).collect()),
    ];
    for cells in table.padded_rows() {
        lines.push(row(cells.into_iter().map(markdown_cell).collect()));
    }
    lines.join("\n")
}

/// Fenced code block; the fence grows when the content holds one
fn fenced(language: &str, content: &str) -> String {
    let fence = if content.contains("```") { "````" } else { "```" };
    format!("{fence}{language}\n{}\n{fence}", content.trim_end_matches(['\n', '\r']))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => cell_text(other),
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(map) if !map.is_empty())
        || matches!(value, Value::Array(items) if !items.is_empty())
}

/// Nested bullet list; depth follows the tree, not the source layout
fn bullet_list(value: &Value, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if is_container(child) {
                    lines.push(format!("{indent}- **{key}**:"));
                    bullet_list(child, depth + 1, lines);
                } else if child.is_object() || child.is_array() {
                    lines.push(format!("{indent}- **{key}**: (empty)"));
                } else {
                    lines.push(format!("{indent}- **{key}**: {}", scalar_text(child)));
                }
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if is_container(item) {
                    lines.push(format!("{indent}- Item {}", index + 1));
                    bullet_list(item, depth + 1, lines);
                } else {
                    lines.push(format!("{indent}- {}", scalar_text(item)));
                }
            }
        }
        scalar => lines.push(format!("{indent}{}", scalar_text(scalar))),
    }
}

fn structured_markdown(value: &Value) -> SerializeResult<String> {
    if is_record_list(value) {
        return Ok(markdown_table(&table_from_records(value)?));
    }
    let mut lines = Vec::new();
    bullet_list(value, 0, &mut lines);
    Ok(lines.join("\n"))
}

fn text_markdown(doc: &TextDocument) -> SerializeResult<String> {
    let markdown = match doc.format {
        FormatId::ScriptPython => fenced("python", &doc.content),
        FormatId::ScriptSql => fenced("sql", &doc.content),
        FormatId::ScriptR => fenced("r", &doc.content),
        FormatId::NotebookJupyter | FormatId::NotebookGeneric => cells_of(doc)?
            .iter()
            .map(|cell| match cell.kind {
                CellKind::Markdown => cell.source.trim_end().to_string(),
                CellKind::Code => fenced("python", &cell.source),
                CellKind::Raw => fenced("", &cell.source),
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
        FormatId::MarkupHtml => html_to_markdown(&doc.content),
        FormatId::DocumentPdf => extract_text(&doc.content).unwrap_or_else(|| doc.content.clone()),
        FormatId::DocumentText | FormatId::MarkupMarkdown => doc.content.clone(),
        _ => fenced("", &doc.content),
    };
    Ok(markdown)
}

/// Markdown rendering of any intermediate value
pub fn to_markdown(value: &Intermediate) -> SerializeResult<String> {
    match value {
        Intermediate::Tabular(table) => Ok(markdown_table(table)),
        Intermediate::Structured(tree) => structured_markdown(tree),
        Intermediate::Text(doc) => text_markdown(doc),
    }
}

/// Markdown output
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownSerializer;

impl Serializer for MarkdownSerializer {
    fn serialize(&self, value: &Intermediate, _options: &ConversionOptions) -> SerializeResult<String> {
        to_markdown(value)
    }

    fn name(&self) -> &'static str {
        "markdown"
    }
}

/// HTML output: a complete document
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSerializer;

impl HtmlSerializer {
    fn body(&self, value: &Intermediate) -> SerializeResult<String> {
        let doc = match value {
            Intermediate::Text(doc) => doc,
            other => return to_markdown(other).map(|markdown| render_markdown(&markdown)),
        };

        let body = match doc.format {
            FormatId::MarkupMarkdown => render_markdown(&doc.content),
            FormatId::NotebookJupyter | FormatId::NotebookGeneric => cells_of(doc)?
                .iter()
                .map(|cell| match cell.kind {
                    CellKind::Markdown => render_markdown(&cell.source),
                    CellKind::Code => format!(
                        "<pre><code class=\"language-python\">{}</code></pre>\n",
                        escape_html(&cell.source)
                    ),
                    CellKind::Raw => format!("<pre>{}</pre>\n", escape_html(&cell.source)),
                })
                .collect(),
            _ => format!("<pre>{}</pre>\n", escape_html(&doc.content)),
        };
        Ok(body)
    }
}

impl Serializer for HtmlSerializer {
    fn serialize(&self, value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String> {
        let title = escape_html(options.name.as_deref().unwrap_or(DEFAULT_TITLE));
        let body = self.body(value)?;
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
            body
        ))
    }

    fn name(&self) -> &'static str {
        "html"
    }
}

/// Plain text of any intermediate value
pub fn plain_text(value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String> {
    let doc = match value {
        Intermediate::Tabular(table) => return DelimitedSerializer::new('\t').render_table(table),
        Intermediate::Structured(tree) => return to_json_text(tree, options),
        Intermediate::Text(doc) => doc,
    };

    let text = match doc.format {
        FormatId::MarkupMarkdown => markdown_plain_text(&doc.content),
        FormatId::MarkupHtml => html_plain_text(&doc.content),
        FormatId::NotebookJupyter | FormatId::NotebookGeneric => cells_of(doc)?
            .into_iter()
            .map(|cell| cell.source)
            .collect::<Vec<_>>()
            .join("\n\n"),
        FormatId::DocumentPdf => extract_text(&doc.content).unwrap_or_else(|| doc.content.clone()),
        _ => doc.content.clone(),
    };
    Ok(text)
}

/// Plain text output
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSerializer;

impl Serializer for PlainTextSerializer {
    fn serialize(&self, value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String> {
        plain_text(value, options)
    }

    fn name(&self) -> &'static str {
        "plain text"
    }
}
