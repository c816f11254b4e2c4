//! Integration tests for indexing JSONL files and the demo walkthrough.

use std::io::Write;

use fieldprobe::cli::commands::{load_index, synthesize_file};
use fieldprobe::cli::output::render_json;
use fieldprobe::demo::run_demo;
use fieldprobe::error::Result;
use fieldprobe::prelude::*;
use tempfile::NamedTempFile;

fn write_jsonl(lines: &[&str]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    file.flush()?;
    Ok(file)
}

#[test]
fn test_json_values_become_fields() -> Result<()> {
    let file = write_jsonl(&[
        r#"{"title": "Tagged", "tags": ["a", "b"], "year": 2021, "draft": null}"#,
        r#"{"title": "Plain", "draft": false}"#,
    ])?;

    let entries = synthesize_file(file.path(), &IndexConfig::default())?;
    // Arrays repeat the name; null values are skipped.
    assert_eq!(entries[0].field_names, "title tags tags year ");
    assert_eq!(entries[1].field_names, "title draft ");

    let (index, _) = load_index(file.path(), &IndexConfig::default())?;
    let searcher = IndexSearcher::new(index.reader()?);

    let query = ExistenceQuery::missing(FIELD_NAMES, "draft").parse(index.analyzer())?;
    let top_docs = searcher.search(query.as_ref(), 10)?;
    assert_eq!(top_docs.doc_ids(), vec![0]);

    let doc = searcher.doc(0)?;
    assert_eq!(doc.get_all("tags"), vec!["a", "b"]);
    assert_eq!(doc.get("year"), Some("2021"));

    Ok(())
}

#[test]
fn test_reserved_field_in_input_is_rejected() -> Result<()> {
    let file = write_jsonl(&[r#"{"title": "x", "field_names": "forged "}"#])?;
    let err = load_index(file.path(), &IndexConfig::default()).unwrap_err();
    assert!(matches!(err, FieldprobeError::Field(_)));
    Ok(())
}

#[test]
fn test_non_object_line_is_rejected() -> Result<()> {
    let file = write_jsonl(&[r#"{"title": "x"}"#, "", r#"["not", "an", "object"]"#])?;
    let err = load_index(file.path(), &IndexConfig::default()).unwrap_err();
    assert!(err.to_string().contains("line 3"));
    Ok(())
}

#[test]
fn test_demo_report_serializes() -> Result<()> {
    let mut transcript = Vec::new();
    let report = run_demo(&IndexConfig::default(), &mut transcript)?;

    let json: serde_json::Value = serde_json::from_str(&render_json(&report, false)?)?;
    assert_eq!(json["field_names"][0], "title source author ");
    assert_eq!(json["queries"][2]["description"], "+field_names:* -field_names:origin");
    assert_eq!(json["queries"][2]["hits"][0]["document"]["title"], "First Title");
    assert!(json["queries"][0].get("error").is_none());

    Ok(())
}
