use formatconv::conversion::ConversionOptions;
use formatconv::error::ErrorKind;
use formatconv::{convert_text, convert_text_with_options, FormatId};
use pretty_assertions::assert_eq;
use serde_json::Value;

const PEOPLE_CSV: &str = "name,age\nAlice,30\nBob,25";

#[test]
fn test_csv_to_sql_inserts() {
    let options = ConversionOptions::default().with_name("people");
    let sql = convert_text_with_options(PEOPLE_CSV, FormatId::TabularCsv, FormatId::ScriptSql, &options).unwrap();
    assert_eq!(
        sql,
        "-- Generated SQL INSERT statements\n\
         -- Table: people\n\
         \n\
         CREATE TABLE people (\n  name VARCHAR(255),\n  age VARCHAR(255)\n);\n\
         \n\
         INSERT INTO people (name, age) VALUES ('Alice', '30');\n\
         INSERT INTO people (name, age) VALUES ('Bob', '25');\n"
    );
}

#[test]
fn test_default_table_name() {
    let sql = convert_text(r#"[{"id": 1}]"#, FormatId::RecordJson, FormatId::ScriptSql).unwrap();
    assert!(sql.contains("CREATE TABLE data_table (\n  id VARCHAR(255)\n);"));
    assert!(sql.contains("INSERT INTO data_table (id) VALUES ('1');"));
}

#[test]
fn test_sql_back_to_rows() {
    let options = ConversionOptions::default().with_name("people");
    let sql = convert_text_with_options(PEOPLE_CSV, FormatId::TabularCsv, FormatId::ScriptSql, &options).unwrap();
    let csv = convert_text(&sql, FormatId::ScriptSql, FormatId::TabularCsv).unwrap();
    assert_eq!(csv, PEOPLE_CSV);
}

#[test]
fn test_sql_literal_holding_an_insert_is_one_row() {
    let sql = "INSERT INTO t (a) VALUES ('INSERT INTO t (a) VALUES (2)');";
    let csv = convert_text(sql, FormatId::ScriptSql, FormatId::TabularCsv).unwrap();
    assert_eq!(csv, "a\nINSERT INTO t (a) VALUES (2)");
}

#[test]
fn test_sql_without_inserts_has_no_table() {
    let error = convert_text("SELECT * FROM people;", FormatId::ScriptSql, FormatId::RecordJson).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::SerializeShapeMismatch);
}

#[test]
fn test_csv_to_pandas_scaffold() {
    let script = convert_text(PEOPLE_CSV, FormatId::TabularCsv, FormatId::ScriptPython).unwrap();
    assert!(script.starts_with("import pandas as pd\nimport io\n"));
    assert!(script.contains("csv_data = \"\"\"name,age\nAlice,30\nBob,25\"\"\""));
    assert!(script.contains("df = pd.read_csv(io.StringIO(csv_data))"));
    assert!(script.contains("agg({'another_column': 'mean'})"));
}

#[test]
fn test_pandas_scaffold_keeps_quoted_fields() {
    let source = "name,city\n\"Smith, J\",Paris";
    let script = convert_text(source, FormatId::TabularCsv, FormatId::ScriptPython).unwrap();
    assert!(script.contains("csv_data = \"\"\"name,city\n\"Smith, J\",Paris\"\"\""));
}

#[test]
fn test_pandas_scaffold_escapes_triple_quotes() {
    let source = "note\nsee \"\"\"docs\"\"\" here";
    let script = convert_text(source, FormatId::TabularCsv, FormatId::ScriptPython).unwrap();
    assert!(script.contains(r#"csv_data = """note
see \"\"\"docs\"\"\" here""""#));
}

#[test]
fn test_json_to_python_scaffold() {
    let script = convert_text(r#"{"path": "C:\\data"}"#, FormatId::RecordJson, FormatId::ScriptPython).unwrap();
    assert!(script.contains("json_data = json.loads(\"\"\"{\n  \"path\": \"C:\\\\\\\\data\"\n}\"\"\")"));
    assert!(script.contains("if isinstance(json_data, list):"));
}

#[test]
fn test_sql_to_python_scaffold() {
    let script = convert_text("SELECT 1;\n", FormatId::ScriptSql, FormatId::ScriptPython).unwrap();
    assert!(script.starts_with("import sqlite3\nimport pandas as pd\n"));
    assert!(script.contains("sql_commands = \"\"\"\nSELECT 1;\n\"\"\""));
}

#[test]
fn test_python_to_jupyter_cells() {
    let source = "import pandas as pd\n\n\ndf = pd.DataFrame()\nprint(df)\n";
    let notebook = convert_text(source, FormatId::ScriptPython, FormatId::NotebookJupyter).unwrap();
    let value: Value = serde_json::from_str(&notebook).unwrap();

    assert_eq!(value["nbformat"], 4);
    assert_eq!(value["nbformat_minor"], 4);
    assert_eq!(value["metadata"]["kernelspec"]["name"], "python3");
    let cells = value["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0]["cell_type"], "code");
    assert_eq!(cells[0]["source"], serde_json::json!(["import pandas as pd"]));
    assert_eq!(
        cells[1]["source"],
        serde_json::json!(["df = pd.DataFrame()\n", "print(df)"])
    );
    assert!(cells[1]["outputs"].as_array().unwrap().is_empty());
}

#[test]
fn test_generic_notebook_to_jupyter_and_back() {
    let notebook = convert_text("x = 1\n\ny = 2", FormatId::NotebookGeneric, FormatId::NotebookJupyter).unwrap();
    let script = convert_text(&notebook, FormatId::NotebookJupyter, FormatId::ScriptPython).unwrap();
    assert_eq!(script, "x = 1\n\ny = 2\n");
}

#[test]
fn test_jupyter_markdown_cells_become_comments() {
    let notebook = r##"{
        "cells": [
            {"cell_type": "markdown", "metadata": {}, "source": ["# Load\n", "Read the data"]},
            {"cell_type": "code", "metadata": {}, "source": "df = load()", "outputs": [], "execution_count": 1}
        ],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 4
    }"##;
    let script = convert_text(notebook, FormatId::NotebookJupyter, FormatId::ScriptPython).unwrap();
    assert_eq!(script, "# # Load\n# Read the data\n\ndf = load()\n");
}

#[test]
fn test_invalid_jupyter_input() {
    let error = convert_text("print(1)", FormatId::NotebookJupyter, FormatId::ScriptPython).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::SerializeShapeMismatch);
}

#[test]
fn test_python_to_sql_extracts_literals() {
    let source = r#"
import sqlite3
conn = sqlite3.connect("app.db")
rows = conn.execute("SELECT id, name FROM users WHERE active = 1").fetchall()
conn.execute('''
    UPDATE users SET seen = 1;
''')
"#;
    let sql = convert_text(source, FormatId::ScriptPython, FormatId::ScriptSql).unwrap();
    assert_eq!(
        sql,
        "-- SQL statements extracted from Python source\n\n\
         SELECT id, name FROM users WHERE active = 1;\n\n\
         UPDATE users SET seen = 1;\n"
    );

    let none = convert_text("print('hello')", FormatId::ScriptPython, FormatId::ScriptSql).unwrap();
    assert!(none.starts_with("-- No SQL statements were found"));
    assert!(none.contains("-- print('hello')"));
}

#[test]
fn test_r_to_python_holder() {
    let script = convert_text("x <- c(1, 2)\nmean(x)", FormatId::ScriptR, FormatId::ScriptPython).unwrap();
    assert!(script.contains("r_code = \"\"\"x <- c(1, 2)\nmean(x)\"\"\""));
}

#[test]
fn test_loader_scaffolds() {
    let excel = convert_text("binary-ish", FormatId::Spreadsheet, FormatId::ScriptPython).unwrap();
    assert!(excel.contains("pd.read_excel('data.xlsx', sheet_name=0)"));
    assert!(excel.ends_with("# Original content:\n# binary-ish\n"));

    let parquet = convert_text("PAR1", FormatId::ColumnarStorage, FormatId::ScriptPython).unwrap();
    assert!(parquet.contains("pd.read_parquet('data.parquet')"));
}

#[test]
fn test_text_sources_use_line_envelope() {
    let sql = convert_text("first\nsecond", FormatId::DocumentText, FormatId::ScriptSql).unwrap();
    assert!(sql.contains("INSERT INTO data_table (line, content) VALUES ('1', 'first');"));
    assert!(sql.contains("INSERT INTO data_table (line, content) VALUES ('2', 'second');"));

    let csv = convert_text("x <- 1", FormatId::ScriptR, FormatId::TabularCsv).unwrap();
    assert_eq!(csv, "line,content\n1,x <- 1");
}

#[test]
fn test_csv_to_bi_model_and_viz_workbook() {
    let options = ConversionOptions::default().with_name("People");
    let model = convert_text_with_options(PEOPLE_CSV, FormatId::TabularCsv, FormatId::BiWorkbook, &options).unwrap();
    let value: Value = serde_json::from_str(&model).unwrap();
    let table = &value["model"]["tables"][0];
    assert_eq!(table["name"], "People");
    assert_eq!(table["columns"][0]["dataType"], "string");
    assert_eq!(table["columns"][1]["dataType"], "int64");
    assert_eq!(table["partitions"][0]["mode"], "import");

    let workbook = convert_text(&model, FormatId::BiWorkbook, FormatId::VizWorkbook).unwrap();
    assert!(workbook.contains("<column caption=\"name\" datatype=\"string\" name=\"[name]\" role=\"dimension\" type=\"nominal\"/>"));
    assert!(workbook.contains("<column caption=\"age\" datatype=\"integer\" name=\"[age]\" role=\"measure\" type=\"quantitative\"/>"));

    let back = convert_text(&workbook, FormatId::VizWorkbook, FormatId::BiWorkbook).unwrap();
    let value: Value = serde_json::from_str(&back).unwrap();
    assert_eq!(value["model"]["tables"][0]["columns"][1]["name"], "age");
}
