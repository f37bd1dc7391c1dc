//! Registry, capability index and dispatcher coverage over the whole graph

use formatconv::conversion::{ConversionEngine, ConversionRequest};
use formatconv::error::{ConversionError, ErrorKind, UnsupportedReason};
use formatconv::registry::{self, describe_name, is_declared, CapabilityIndex, Category, CATALOG};
use formatconv::serializer::pdf::render_pdf;
use formatconv::{describe, detect, reachable_targets, FormatId};
use std::collections::HashSet;

const JUPYTER_SAMPLE: &str = r##"{
  "cells": [
    {"cell_type": "markdown", "metadata": {}, "source": ["# Analysis"]},
    {"cell_type": "code", "metadata": {}, "execution_count": null, "outputs": [], "source": ["x = 1\n", "print(x)"]}
  ],
  "metadata": {},
  "nbformat": 4,
  "nbformat_minor": 4
}"##;

/// Representative input for every source format
fn sample(format: FormatId) -> String {
    match format {
        FormatId::TabularCsv => "name,age\nAlice,30\nBob,25".to_string(),
        FormatId::TabularTsv => "name\tage\nAlice\t30".to_string(),
        FormatId::RecordJson => r#"[{"name": "Alice", "age": 30}, {"name": "Bob", "age": 25}]"#.to_string(),
        FormatId::RecordYaml => "- name: Alice\n  age: 30\n- name: Bob\n  age: 25\n".to_string(),
        FormatId::MarkupXml => {
            "<people><person><name>Alice</name></person><person><name>Bob</name></person></people>".to_string()
        }
        FormatId::MarkupMarkdown => "# Title\n\nSome *text*.\n\n| a | b |\n|---|---|\n| 1 | 2 |\n".to_string(),
        FormatId::MarkupHtml => "<html><body><h1>Title</h1><p>Hello &amp; welcome</p></body></html>".to_string(),
        FormatId::ScriptSql => {
            "CREATE TABLE people (name TEXT, age INT);\nINSERT INTO people (name, age) VALUES ('Alice', 30), ('Bob', 25);".to_string()
        }
        FormatId::ScriptPython => "import pandas as pd\n\ndf = pd.read_sql(\"SELECT * FROM people\", conn)\nprint(df)".to_string(),
        FormatId::ScriptR => "x <- c(1, 2, 3)\nprint(mean(x))".to_string(),
        FormatId::NotebookJupyter => JUPYTER_SAMPLE.to_string(),
        FormatId::NotebookGeneric => "x = 1\n\nprint(x)".to_string(),
        FormatId::DocumentText => "Quarterly report\nAll figures in EUR".to_string(),
        FormatId::DocumentPdf => render_pdf("Quarterly report\nAll figures in EUR"),
        FormatId::Spreadsheet => "name,age\nAlice,30".to_string(),
        FormatId::ColumnarStorage => "PAR1 name age".to_string(),
        FormatId::BiWorkbook => "Power BI export".to_string(),
        FormatId::VizWorkbook => "<workbook><datasources/></workbook>".to_string(),
    }
}

#[test]
fn test_every_format_is_described_once() {
    let mut seen = HashSet::new();
    for format in FormatId::ALL {
        let descriptor = describe(format).unwrap();
        assert_eq!(descriptor.id, format);
        assert!(!descriptor.extensions.is_empty(), "{format} has no extensions");
        assert!(seen.insert(format));
    }
    assert_eq!(CATALOG.len(), FormatId::ALL.len());
}

#[test]
fn test_extension_sets_are_disjoint() {
    let mut owners: Vec<(String, FormatId)> = Vec::new();
    for descriptor in CATALOG.iter() {
        for extension in descriptor.extensions {
            let lower = extension.to_lowercase();
            assert!(
                !owners.iter().any(|(ext, _)| *ext == lower),
                "extension {extension} registered twice"
            );
            owners.push((lower, descriptor.id));
        }
    }

    for (extension, owner) in owners {
        assert_eq!(detect(format!("file{extension}")), Some(owner));
        assert_eq!(detect(format!("FILE{}", extension.to_uppercase())), Some(owner));
    }
}

#[test]
fn test_default_extensions() {
    assert_eq!(FormatId::Spreadsheet.descriptor().default_extension(), "xlsx");
    assert_eq!(FormatId::ScriptR.descriptor().default_extension(), "R");
    assert_eq!(FormatId::RecordYaml.descriptor().default_extension(), "yaml");
    assert_eq!(FormatId::VizWorkbook.descriptor().category, Category::Visualization);
    assert_eq!(FormatId::RecordJson.descriptor().category, Category::Tabular);
    assert_eq!(FormatId::RecordYaml.descriptor().category, Category::Markup);
}

#[test]
fn test_describe_by_name() {
    assert_eq!(describe_name("csv").unwrap().id, FormatId::TabularCsv);
    assert_eq!(describe_name("notebook-jupyter").unwrap().id, FormatId::NotebookJupyter);
    assert!(matches!(
        describe_name("docx"),
        Err(ConversionError::UnknownFormat(name)) if name == "docx"
    ));
}

#[test]
fn test_adjacency_declarations() {
    assert_eq!(
        reachable_targets(FormatId::TabularCsv),
        &[
            FormatId::RecordJson,
            FormatId::Spreadsheet,
            FormatId::ScriptSql,
            FormatId::ScriptPython,
            FormatId::TabularTsv,
            FormatId::RecordYaml,
            FormatId::MarkupXml,
            FormatId::MarkupMarkdown,
            FormatId::BiWorkbook,
        ]
    );
    assert_eq!(
        reachable_targets(FormatId::DocumentPdf),
        &[FormatId::DocumentText, FormatId::MarkupMarkdown]
    );
    assert!(is_declared(FormatId::TabularCsv, FormatId::ScriptPython));
    assert!(!is_declared(FormatId::ScriptPython, FormatId::TabularCsv));

    for source in FormatId::ALL {
        let targets = reachable_targets(source);
        let unique: HashSet<_> = targets.iter().collect();
        assert_eq!(unique.len(), targets.len(), "{source} declares a target twice");
        assert!(!targets.contains(&source), "{source} declares itself");
    }
}

#[test]
fn test_capability_index_matches_registry() {
    let index = CapabilityIndex::new();
    for source in FormatId::ALL {
        assert_eq!(index.list_reachable(source), registry::reachable_targets(source));
        let options = index.options(source);
        assert_eq!(options.len(), reachable_targets(source).len());
        for (option, target) in options.iter().zip(reachable_targets(source)) {
            assert_eq!(option.from, source);
            assert_eq!(option.to, *target);
            assert!(index.is_reachable(source, *target));
            assert!(index.sources_for(*target).contains(&source));
        }
    }

    let csv_json = &index.options(FormatId::TabularCsv)[0];
    assert_eq!(csv_json.label, "CSV → JSON");
}

#[test]
fn test_pdf_to_json_has_no_path() {
    let request = ConversionRequest::new("%PDF-1.4", FormatId::DocumentPdf, FormatId::RecordJson);
    let error = ConversionEngine::new().convert(&request).unwrap_err();
    assert!(matches!(
        error,
        ConversionError::ConversionUnsupported {
            from: FormatId::DocumentPdf,
            to: FormatId::RecordJson,
            reason: UnsupportedReason::NoPath,
        }
    ));
}

#[test]
fn test_undeclared_pairs_always_fail_with_no_path() {
    let engine = ConversionEngine::new();
    for source in FormatId::ALL {
        for target in FormatId::ALL {
            if reachable_targets(source).contains(&target) {
                continue;
            }
            for input in [sample(source), String::new()] {
                let request = ConversionRequest::new(input, source, target);
                let error = engine.convert(&request).unwrap_err();
                assert_eq!(error.kind(), ErrorKind::NoPath, "{source} -> {target}");
            }
        }
    }
}

#[test]
fn test_every_declared_edge_converts() {
    let engine = ConversionEngine::new();
    for source in FormatId::ALL {
        for target in reachable_targets(source) {
            let route = engine.plan(source, *target).unwrap();
            let request = ConversionRequest::new(sample(source), source, *target);
            let converted = engine
                .convert(&request)
                .unwrap_or_else(|e| panic!("{source} -> {target} via {}: {e}", route.describe()));
            assert!(!converted.is_empty(), "{source} -> {target} produced no output");
            assert_eq!(converted.metadata.route, route.describe());
        }
    }
}

#[test]
fn test_engine_is_shareable_across_threads() {
    let engine = ConversionEngine::new();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let input = format!("n\n{i}");
                let request = ConversionRequest::new(input, FormatId::TabularCsv, FormatId::RecordJson);
                engine.convert(&request).map(|c| c.content)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let output = handle.join().unwrap().unwrap();
        assert!(output.contains(&format!("\"{i}\"")));
    }
}
