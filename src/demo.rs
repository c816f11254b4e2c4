//! The two-document walkthrough of the three existence queries.

use std::io::Write;

use serde::Serialize;

use crate::document::document::Document;
use crate::error::Result;
use crate::index::config::IndexConfig;
use crate::index::ram::RamIndex;
use crate::meta::{ExistenceQuery, MetaFieldSynthesizer};
use crate::search::{IndexSearcher, QueryReport};

/// Document A has `source`, document B has `origin`; both have `author`.
pub fn build_demo_documents() -> Vec<Document> {
    vec![
        Document::builder()
            .add_text("title", "First Title")
            .add_text("source", "wiki")
            .add_text("author", "anonymous")
            .build(),
        Document::builder()
            .add_text("title", "Second Title")
            .add_text("origin", "paper")
            .add_text("author", "Spear")
            .build(),
    ]
}

/// The questions asked by the demo, in order.
pub fn demo_queries(meta_field: &str) -> Vec<ExistenceQuery> {
    vec![
        ExistenceQuery::native_exists("source"),
        ExistenceQuery::exists(meta_field, "author"),
        ExistenceQuery::missing(meta_field, "origin"),
    ]
}

/// Everything the demo printed, in machine-readable form.
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    /// Meta values in indexing order.
    pub field_names: Vec<String>,
    /// One report per query.
    pub queries: Vec<QueryReport>,
}

/// Index the demo documents and run the existence queries, writing the
/// console transcript to `out`.
pub fn run_demo<W: Write + ?Sized>(config: &IndexConfig, out: &mut W) -> Result<DemoReport> {
    let index = RamIndex::create(config.clone())?;
    let synthesizer = MetaFieldSynthesizer::new(config.meta_field.clone());

    let mut field_names = Vec::new();
    let mut writer = index.writer()?;
    for mut doc in build_demo_documents() {
        let value = synthesizer.attach(&mut doc)?;
        writeln!(out, "{}: {value}", synthesizer.field_name())?;
        field_names.push(value);
        writer.add_document(doc)?;
    }
    writer.close()?;

    let searcher = IndexSearcher::new(index.reader()?);
    let mut queries = Vec::new();
    for query in demo_queries(&config.meta_field) {
        let report = searcher.run_existence(&query, config.max_results)?;
        write_report(&report, out)?;
        queries.push(report);
    }
    index.close()?;

    Ok(DemoReport {
        field_names,
        queries,
    })
}

/// Print one query report the way the demo does.
pub fn write_report<W: Write + ?Sized>(report: &QueryReport, out: &mut W) -> Result<()> {
    writeln!(out, "{}", report.label)?;
    if let Some(error) = &report.error {
        writeln!(out, "Query '{}' failed: {error}", report.query_string)?;
        return Ok(());
    }

    writeln!(
        out,
        "Query: {}",
        report.description.as_deref().unwrap_or_default()
    )?;
    writeln!(out, "Found {} docs.", report.hits.len())?;
    for hit in &report.hits {
        writeln!(
            out,
            "{}. Title={} author={}",
            hit.rank,
            stored_text(&hit.document, "title"),
            stored_text(&hit.document, "author")
        )?;
    }
    Ok(())
}

/// First stored value of a field, or `null` when the document lacks it.
fn stored_text<'a>(document: &'a serde_json::Value, field: &str) -> &'a str {
    match document.get(field) {
        Some(serde_json::Value::String(text)) => text,
        Some(serde_json::Value::Array(values)) => {
            values.first().and_then(|v| v.as_str()).unwrap_or("null")
        }
        _ => "null",
    }
}
