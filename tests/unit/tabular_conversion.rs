use assert_matches::assert_matches;
use formatconv::conversion::{convert, ConversionEngine, ConversionRequest};
use formatconv::error::{ConversionError, ErrorKind, FailureCause, ParseError};
use formatconv::{convert_text, FormatId};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[test]
fn test_csv_to_json_keeps_strings_and_order() {
    let output = convert_text("name,age\nAlice,30\nBob,25", FormatId::TabularCsv, FormatId::RecordJson).unwrap();
    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        value,
        json!([
            {"name": "Alice", "age": "30"},
            {"name": "Bob", "age": "25"}
        ])
    );

    let first = value[0].as_object().unwrap();
    assert_eq!(first.keys().collect::<Vec<_>>(), vec!["name", "age"]);
}

#[test]
fn test_csv_to_tsv_is_a_delimiter_swap() {
    let request = ConversionRequest::new("a,b\n1,2", FormatId::TabularCsv, FormatId::TabularTsv);
    let converted = convert(&request).unwrap();
    assert_eq!(converted.content, "a\tb\n1\t2");
    assert!(converted.metadata.route.starts_with("delimiter swap"));
}

#[test]
fn test_delimiter_swap_round_trip() {
    let original = "id,name,city\n1,Alice,Paris\n2,Bob,Rome\n";
    let tsv = convert_text(original, FormatId::TabularCsv, FormatId::TabularTsv).unwrap();
    let back = convert_text(&tsv, FormatId::TabularTsv, FormatId::TabularCsv).unwrap();
    assert_eq!(back, original);
}

#[test]
fn test_delimiter_swap_does_not_respect_quotes() {
    let tsv = convert_text("\"Paris, France\",1", FormatId::TabularCsv, FormatId::TabularTsv).unwrap();
    assert_eq!(tsv, "\"Paris\t France\"\t1");
}

#[test]
fn test_csv_json_csv_round_trip() {
    let original = "id,name,score\n1,Alice,9.5\n2,Bob,7\n3,Carol,";
    let json = convert_text(original, FormatId::TabularCsv, FormatId::RecordJson).unwrap();
    let back = convert_text(&json, FormatId::RecordJson, FormatId::TabularCsv).unwrap();
    assert_eq!(back, original);
}

#[test]
fn test_short_rows_pad_on_output() {
    let output = convert_text("a,b,c\n1\n4,5,6", FormatId::TabularCsv, FormatId::RecordJson).unwrap();
    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value[0], json!({"a": "1", "b": "", "c": ""}));
    assert_eq!(value[1], json!({"a": "4", "b": "5", "c": "6"}));
}

#[test]
fn test_fields_are_trimmed_and_unquoted() {
    let output = convert_text(
        " \"name\" , city \n\"Alice\",  Paris",
        FormatId::TabularCsv,
        FormatId::RecordJson,
    )
    .unwrap();
    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value, json!([{"name": "Alice", "city": "Paris"}]));
}

#[test]
fn test_empty_input_is_empty_input_error() {
    for source in [FormatId::TabularCsv, FormatId::TabularTsv] {
        for text in ["", "\n\n", "   "] {
            let request = ConversionRequest::new(text, source, FormatId::RecordJson);
            let error = ConversionEngine::new().convert(&request).unwrap_err();
            assert_matches!(
                error,
                ConversionError::ConversionFailed {
                    cause: FailureCause::Parse(ParseError::EmptyInput)
                }
            );
        }
    }
}

#[test]
fn test_tsv_to_yaml() {
    let output = convert_text("name\tage\nAlice\t30", FormatId::TabularTsv, FormatId::RecordYaml).unwrap();
    assert_eq!(output, "- name: Alice\n  age: '30'\n");
}

#[test]
fn test_csv_to_xml() {
    let output = convert_text("name,age\nAlice,30", FormatId::TabularCsv, FormatId::MarkupXml).unwrap();
    assert_eq!(
        output,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <item>\n    <name>Alice</name>\n    <age>30</age>\n  </item>\n</root>"
    );
}

#[test]
fn test_csv_to_markdown_table() {
    let output = convert_text("name,note\nAlice,a|b", FormatId::TabularCsv, FormatId::MarkupMarkdown).unwrap();
    assert_eq!(output, "| name | note |\n| --- | --- |\n| Alice | a\\|b |");
}

#[test]
fn test_csv_to_spreadsheet() {
    let output = convert_text("item,qty\nwidget,4", FormatId::TabularCsv, FormatId::Spreadsheet).unwrap();
    assert!(output.contains("<Worksheet ss:Name=\"Sheet1\">"));
    assert!(output.contains("<Data ss:Type=\"Number\">4</Data>"));
    assert!(output.contains("<Data ss:Type=\"String\">widget</Data>"));
}

#[test]
fn test_tsv_to_csv_quotes_nothing() {
    let output = convert_text("a\tb\n1\t2", FormatId::TabularTsv, FormatId::TabularCsv).unwrap();
    assert_eq!(output, "a,b\n1,2");
}

#[test]
fn test_failure_kind_is_reported() {
    let error = convert_text("", FormatId::TabularCsv, FormatId::MarkupXml).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::EmptyInput);
    assert!(error.user_message().starts_with("ParseError(EmptyInput)"));
}

#[test]
fn test_tsv_leading_empty_header_keeps_columns_aligned() {
    let output = convert_text("\tb\nx\ty", FormatId::TabularTsv, FormatId::RecordJson).unwrap();
    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value, json!([{"": "x", "b": "y"}]));
}

#[test]
fn test_row_of_empty_fields_is_a_record() {
    let output = convert_text("a\tb\n\t\n1\t2", FormatId::TabularTsv, FormatId::RecordJson).unwrap();
    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        value,
        json!([
            {"a": "", "b": ""},
            {"a": "1", "b": "2"}
        ])
    );
}

#[test]
fn test_quoted_delimiter_survives_csv_to_json_to_csv() {
    let original = "name,city\n\"Smith, J\",Paris";
    let json = convert_text(original, FormatId::TabularCsv, FormatId::RecordJson).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value, json!([{"name": "Smith, J", "city": "Paris"}]));

    let back = convert_text(&json, FormatId::RecordJson, FormatId::TabularCsv).unwrap();
    assert_eq!(back, original);
}
