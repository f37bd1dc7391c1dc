//! Notebook cells and nbformat output
//!
//! Scripts are split into code cells on blank-line boundaries. Notebook
//! sources are read back from nbformat JSON so they can be re-emitted or
//! rendered by the document serializers.

use super::record::to_json_text;
use super::Serializer;
use crate::conversion::ConversionOptions;
use crate::error::{SerializeError, SerializeResult};
use crate::model::{Intermediate, TextDocument};
use crate::registry::FormatId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};

static RE_CELL_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("Invalid regex"));

pub const NBFORMAT: u32 = 4;
pub const NBFORMAT_MINOR: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Code,
    Markdown,
    Raw,
}

impl CellKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Code => "code",
            CellKind::Markdown => "markdown",
            CellKind::Raw => "raw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    pub source: String,
}

impl Cell {
    pub fn code(source: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Code,
            source: source.into(),
        }
    }

    pub fn markdown(source: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Markdown,
            source: source.into(),
        }
    }

    fn to_json(&self) -> Value {
        let source: Vec<&str> = self.source.split_inclusive('\n').collect();
        match self.kind {
            CellKind::Code => json!({
                "cell_type": "code",
                "execution_count": null,
                "metadata": {},
                "outputs": [],
                "source": source
            }),
            kind => json!({
                "cell_type": kind.as_str(),
                "metadata": {},
                "source": source
            }),
        }
    }
}

#[derive(Deserialize)]
struct RawNotebook {
    cells: Vec<RawCell>,
}

#[derive(Deserialize)]
struct RawCell {
    cell_type: String,
    #[serde(default)]
    source: RawSource,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for RawSource {
    fn default() -> Self {
        RawSource::Lines(Vec::new())
    }
}

impl RawSource {
    fn into_text(self) -> String {
        match self {
            RawSource::Text(text) => text,
            RawSource::Lines(lines) => lines.concat(),
        }
    }
}

/// Split a script into code cells on runs of two or more newlines
///
/// Empty segments are dropped; line order inside a segment is kept.
pub fn split_script(source: &str) -> Vec<Cell> {
    let normalized = source.replace("\r\n", "\n");
    RE_CELL_BREAK
        .split(&normalized)
        .map(|segment| segment.trim_matches('\n'))
        .filter(|segment| !segment.trim().is_empty())
        .map(Cell::code)
        .collect()
}

/// Read the cells of an nbformat JSON document
pub fn read_notebook(text: &str) -> SerializeResult<Vec<Cell>> {
    let notebook: RawNotebook = serde_json::from_str(text)
        .map_err(|e| SerializeError::shape_mismatch("nbformat notebook JSON", e.to_string()))?;

    Ok(notebook
        .cells
        .into_iter()
        .map(|cell| Cell {
            kind: match cell.cell_type.as_str() {
                "code" => CellKind::Code,
                "markdown" => CellKind::Markdown,
                _ => CellKind::Raw,
            },
            source: cell.source.into_text(),
        })
        .collect())
}

/// Cells of a text-carrying source
///
/// Jupyter input must be nbformat JSON; a generic notebook that is not is
/// split like a script.
pub fn cells_of(doc: &TextDocument) -> SerializeResult<Vec<Cell>> {
    match doc.format {
        FormatId::NotebookJupyter => read_notebook(&doc.content),
        FormatId::NotebookGeneric => {
            Ok(read_notebook(&doc.content).unwrap_or_else(|_| split_script(&doc.content)))
        }
        _ => Ok(split_script(&doc.content)),
    }
}

/// nbformat 4.4 document with a fixed Python 3 kernel
pub fn notebook_document(cells: &[Cell]) -> Value {
    json!({
        "cells": cells.iter().map(Cell::to_json).collect::<Vec<_>>(),
        "metadata": {
            "kernelspec": {
                "display_name": "Python 3",
                "language": "python",
                "name": "python3"
            },
            "language_info": {
                "name": "python",
                "version": "3.8.0"
            }
        },
        "nbformat": NBFORMAT,
        "nbformat_minor": NBFORMAT_MINOR
    })
}

/// Notebook output for scripts and notebooks
#[derive(Debug, Clone, Copy, Default)]
pub struct NotebookSerializer;

impl Serializer for NotebookSerializer {
    fn accepts(&self, value: &Intermediate) -> bool {
        matches!(value, Intermediate::Text(_))
    }

    fn serialize(&self, value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String> {
        let doc = value.as_text().ok_or_else(|| {
            SerializeError::shape_mismatch("script or notebook text", value.shape_name())
        })?;
        let cells = cells_of(doc)?;
        to_json_text(&notebook_document(&cells), options)
    }

    fn name(&self) -> &'static str {
        "notebook"
    }
}
