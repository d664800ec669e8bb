use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const HELLO_JSON: &str = r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"Hello"}]}]}"#;

fn richxml() -> Result<Command, Box<dyn std::error::Error>> {
    Ok(Command::cargo_bin("richxml")?)
}

#[test]
fn test_json_to_xml_from_stdin() -> TestResult {
    richxml()?
        .args(["--from", "json", "--to", "xml"])
        .write_stdin(HELLO_JSON)
        .assert()
        .success()
        .stdout(predicate::eq("<paragraph>Hello</paragraph>"));
    Ok(())
}

#[test]
fn test_xml_file_to_json_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("doc.xml");
    let output = dir.path().join("doc.json");
    fs::write(&input, "<doc>\n  <paragraph><bold>Hi</bold></paragraph>\n</doc>\n")?;

    richxml()?
        .arg(&input)
        .args(["--to", "json", "-o"])
        .arg(&output)
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(
        value["content"][0]["content"][0]["marks"][0]["type"],
        serde_json::json!("bold")
    );
    Ok(())
}

#[test]
fn test_check_reports_ok() -> TestResult {
    richxml()?
        .args(["--from", "xml", "--check"])
        .write_stdin("<paragraph>fine</paragraph>")
        .assert()
        .success()
        .stdout(predicate::eq("ok\n"));
    Ok(())
}

#[test]
fn test_check_reports_error() -> TestResult {
    richxml()?
        .args(["--from", "xml", "--check"])
        .write_stdin("<paragraph>broken</para>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("mismatched closing tag"));
    Ok(())
}

#[test]
fn test_custom_marks_and_indent() -> TestResult {
    richxml()?
        .args(["--from", "xml", "--to", "json", "--marks", "em,strong"])
        .write_stdin("<p><em>x</em></p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"marks\""));

    let nested = r#"{"type":"doc","content":[{"type":"blockquote","content":[{"type":"paragraph"}]}]}"#;
    richxml()?
        .args(["--from", "json", "--to", "xml", "--indent", "4"])
        .write_stdin(nested)
        .assert()
        .success()
        .stdout(predicate::eq("<blockquote>\n    <paragraph />\n</blockquote>"));
    Ok(())
}

#[test]
fn test_unknown_format_needs_from() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("doc.txt");
    fs::write(&input, "<paragraph />")?;

    richxml()?
        .arg(&input)
        .args(["--to", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not infer input format"));
    Ok(())
}

#[test]
fn test_to_is_required_without_check() -> TestResult {
    richxml()?
        .args(["--from", "json"])
        .write_stdin(HELLO_JSON)
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_check_honors_max_depth() -> TestResult {
    let deep = format!("{}{}", "<section>".repeat(300), "</section>".repeat(300));

    richxml()?
        .args(["--from", "xml", "--check"])
        .write_stdin(deep.clone())
        .assert()
        .failure()
        .stderr(predicate::str::contains("max depth exceeded"));

    richxml()?
        .args(["--from", "xml", "--check", "--max-depth", "1000"])
        .write_stdin(deep)
        .assert()
        .success()
        .stdout(predicate::eq("ok\n"));
    Ok(())
}
