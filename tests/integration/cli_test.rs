//! End-to-end tests driving the formatconv binary

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::{tempdir, TempDir};

fn run_formatconv(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_formatconv"))
        .args(args)
        .output()
        .expect("Failed to execute formatconv")
}

fn run_formatconv_with_stdin(args: &[&str], stdin_data: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_formatconv"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn formatconv");

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(stdin_data.as_bytes())
            .expect("Failed to write to stdin");
    }

    child.wait_with_output().expect("Failed to wait on child")
}

fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

mod single_file {
    use super::*;

    #[test]
    fn test_csv_file_to_stdout() {
        let dir = tempdir().unwrap();
        let input = create_test_file(&dir, "people.csv", "name,age\nAlice,30\n");

        let output = run_formatconv(&[path_str(&input), "--to", "json"]);
        assert!(output.status.success(), "stderr: {}", stderr_of(&output));

        let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
        assert_eq!(value, serde_json::json!([{"name": "Alice", "age": "30"}]));
    }

    #[test]
    fn test_output_file_is_written() {
        let dir = tempdir().unwrap();
        let input = create_test_file(&dir, "data.csv", "a,b\n1,2");
        let target = dir.path().join("nested/out/data.tsv");

        let output = run_formatconv(&[path_str(&input), "-t", "tsv", "-o", path_str(&target)]);
        assert!(output.status.success(), "stderr: {}", stderr_of(&output));
        assert!(stdout_of(&output).is_empty());
        assert_eq!(fs::read_to_string(&target).unwrap(), "a\tb\n1\t2");
    }

    #[test]
    fn test_options_reach_the_serializer() {
        let dir = tempdir().unwrap();
        let input = create_test_file(&dir, "people.csv", "name\nAlice");

        let output = run_formatconv(&[
            path_str(&input),
            "--to",
            "xml",
            "--plain",
            "--root-element",
            "people",
            "--item-element",
            "person",
        ]);
        assert!(output.status.success(), "stderr: {}", stderr_of(&output));
        assert_eq!(
            stdout_of(&output),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><people><person><name>Alice</name></person></people>\n"
        );
    }

    #[test]
    fn test_from_overrides_detection() {
        let dir = tempdir().unwrap();
        let input = create_test_file(&dir, "export.dat", "k: v\n");

        let output = run_formatconv(&[path_str(&input), "--from", "yaml", "--to", "json", "--plain"]);
        assert!(output.status.success(), "stderr: {}", stderr_of(&output));
        assert_eq!(stdout_of(&output), "{\"k\":\"v\"}\n");
    }

    #[test]
    fn test_undetectable_file_fails() {
        let dir = tempdir().unwrap();
        let input = create_test_file(&dir, "export.dat", "k: v\n");

        let output = run_formatconv(&[path_str(&input), "--to", "json"]);
        assert!(!output.status.success());
        assert!(stderr_of(&output).contains("Cannot detect the format"));
    }

    #[test]
    fn test_undeclared_pair_reports_no_path() {
        let dir = tempdir().unwrap();
        let input = create_test_file(&dir, "report.pdf", "%PDF-1.4");

        let output = run_formatconv(&[path_str(&input), "--to", "json"]);
        assert!(!output.status.success());
        let stderr = stderr_of(&output);
        assert!(stderr.contains("ConversionUnsupported(NoPath)"), "stderr: {stderr}");
        assert!(stderr.contains("formatconv targets pdf"));
        assert!(stdout_of(&output).is_empty());
    }

    #[test]
    fn test_parse_failure_reports_kind() {
        let dir = tempdir().unwrap();
        let input = create_test_file(&dir, "broken.json", "{\"a\": ");

        let output = run_formatconv(&[path_str(&input), "--to", "yaml"]);
        assert!(!output.status.success());
        assert!(stderr_of(&output).contains("ParseError(MalformedRecord)"));
    }

    #[test]
    fn test_unknown_target_format() {
        let dir = tempdir().unwrap();
        let input = create_test_file(&dir, "data.csv", "a\n1");

        let output = run_formatconv(&[path_str(&input), "--to", "docx"]);
        assert!(!output.status.success());
        assert!(stderr_of(&output).contains("UnknownFormat"));
    }

    #[test]
    fn test_max_input_size_is_enforced() {
        let dir = tempdir().unwrap();
        let input = create_test_file(&dir, "big.csv", &"value\n".repeat(100));

        let output = run_formatconv(&[path_str(&input), "--to", "json", "--max-input-size", "100B"]);
        assert!(!output.status.success());
        assert!(stderr_of(&output).contains("Input file too large"));
    }

    #[test]
    fn test_missing_input_path() {
        let output = run_formatconv(&["/nonexistent/input.csv", "--to", "json"]);
        assert!(!output.status.success());
        assert!(stderr_of(&output).contains("Input path does not exist"));
    }
}

mod standard_input {
    use super::*;

    #[test]
    fn test_stdin_conversion() {
        let output = run_formatconv_with_stdin(&["--stdin", "--from", "tsv", "--to", "csv"], "a\tb\n1\t2");
        assert!(output.status.success(), "stderr: {}", stderr_of(&output));
        assert_eq!(stdout_of(&output), "a,b\n1,2\n");
    }

    #[test]
    fn test_stdin_requires_from() {
        let output = run_formatconv_with_stdin(&["--stdin", "--to", "csv"], "a\tb");
        assert!(!output.status.success());
        assert!(stderr_of(&output).contains("--stdin requires --from"));
    }

    #[test]
    fn test_stats_go_to_stderr() {
        let output = run_formatconv_with_stdin(&["--stdin", "--from", "csv", "--to", "tsv", "--stats"], "a,b");
        assert!(output.status.success());
        assert_eq!(stdout_of(&output), "a\tb\n");
        let stderr = stderr_of(&output);
        assert!(stderr.contains("Conversion Statistics:"));
        assert!(stderr.contains("Route: delimiter swap"));
    }
}

mod directories {
    use super::*;

    fn populate(dir: &TempDir) {
        create_test_file(dir, "a.csv", "name\nAlice");
        create_test_file(dir, "notes.txt", "not convertible to xml");
        create_test_file(dir, "sub/b.json", "[{\"id\": 1}]");
    }

    #[test]
    fn test_recursive_directory_conversion() {
        let input = tempdir().unwrap();
        populate(&input);
        let out = tempdir().unwrap();

        let output = run_formatconv(&[
            path_str(input.path()),
            "--to",
            "xml",
            "--output",
            path_str(out.path()),
            "--recursive",
            "--quiet",
        ]);
        assert!(output.status.success(), "stderr: {}", stderr_of(&output));

        let a = fs::read_to_string(out.path().join("a.xml")).unwrap();
        assert!(a.contains("<name>Alice</name>"));
        let b = fs::read_to_string(out.path().join("sub/b.xml")).unwrap();
        assert!(b.contains("<id>1</id>"));
        assert!(!out.path().join("notes.xml").exists());
    }

    #[test]
    fn test_top_level_only_without_recursive() {
        let input = tempdir().unwrap();
        populate(&input);
        let out = tempdir().unwrap();

        let output = run_formatconv(&[
            path_str(input.path()),
            "--to",
            "xml",
            "--output",
            path_str(out.path()),
            "--quiet",
        ]);
        assert!(output.status.success(), "stderr: {}", stderr_of(&output));
        assert!(out.path().join("a.xml").exists());
        assert!(!out.path().join("sub/b.xml").exists());
    }

    #[test]
    fn test_directory_requires_output() {
        let input = tempdir().unwrap();
        populate(&input);

        let output = run_formatconv(&[path_str(input.path()), "--to", "xml"]);
        assert!(!output.status.success());
        assert!(stderr_of(&output).contains("Output directory required"));
    }

    #[test]
    fn test_failures_abort_unless_continuing() {
        let input = tempdir().unwrap();
        create_test_file(&input, "a.csv", "name\nAlice");
        create_test_file(&input, "bad.json", "{");
        create_test_file(&input, "c.csv", "name\nCarol");

        let out = tempdir().unwrap();
        let output = run_formatconv(&[
            path_str(input.path()),
            "--to",
            "yaml",
            "--output",
            path_str(out.path()),
            "--quiet",
        ]);
        assert!(!output.status.success());
        assert!(stderr_of(&output).contains("ParseError(MalformedRecord)"));
        assert!(out.path().join("a.yaml").exists());
        assert!(!out.path().join("c.yaml").exists());

        let out = tempdir().unwrap();
        let output = run_formatconv(&[
            path_str(input.path()),
            "--to",
            "yaml",
            "--output",
            path_str(out.path()),
            "--continue-on-error",
            "--stats",
        ]);
        assert!(output.status.success(), "stderr: {}", stderr_of(&output));
        assert!(out.path().join("a.yaml").exists());
        assert!(out.path().join("c.yaml").exists());
        assert!(!out.path().join("bad.yaml").exists());
        assert!(stderr_of(&output).contains("Converted 2 of 3 files"));
    }
}

mod registry_commands {
    use super::*;

    #[test]
    fn test_formats_lists_every_format() {
        let output = run_formatconv(&["formats"]);
        assert!(output.status.success());
        let stdout = stdout_of(&output);
        assert_eq!(stdout.lines().count(), 18);
        assert!(stdout.lines().next().unwrap().starts_with("tabular-csv"));
        assert!(stdout.contains(".ipynb"));
    }

    #[test]
    fn test_targets_lists_declared_edges() {
        let output = run_formatconv(&["targets", "pdf"]);
        assert!(output.status.success());
        let stdout = stdout_of(&output);
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("document-text"));
        assert!(lines[0].ends_with("PDF → Text"));
        assert!(lines[1].ends_with("PDF → Markdown"));
    }

    #[test]
    fn test_targets_of_unknown_format() {
        let output = run_formatconv(&["targets", "docx"]);
        assert!(!output.status.success());
        assert!(stderr_of(&output).contains("UnknownFormat"));
    }

    #[test]
    fn test_detect() {
        let output = run_formatconv(&["detect", "Report.MD"]);
        assert!(output.status.success());
        assert_eq!(stdout_of(&output), "markup-markdown\n");

        let output = run_formatconv(&["detect", "archive.zip"]);
        assert!(!output.status.success());
        assert!(stderr_of(&output).contains("No registered format matches"));
    }
}
