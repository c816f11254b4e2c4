//! Integration tests for field existence and non-existence queries.

use fieldprobe::demo::build_demo_documents;
use fieldprobe::error::Result;
use fieldprobe::index::DocId;
use fieldprobe::prelude::*;
use fieldprobe::query::{BooleanQuery, Occur, WildcardQuery};

fn demo_index() -> Result<RamIndex> {
    let index = RamIndex::create(IndexConfig::default())?;
    let mut writer = index.writer()?;
    for mut doc in build_demo_documents() {
        attach_field_names(&mut doc)?;
        writer.add_document(doc)?;
    }
    writer.close()?;
    Ok(index)
}

fn run(index: &RamIndex, query: &ExistenceQuery) -> Result<(String, Vec<DocId>)> {
    let searcher = IndexSearcher::new(index.reader()?);
    let parsed = query.parse(index.analyzer())?;
    let top_docs = searcher.search(parsed.as_ref(), 10)?;
    Ok((parsed.description(), top_docs.doc_ids()))
}

fn parse_meta(index: &RamIndex, query_string: &str, leading: bool) -> Result<Box<dyn Query>> {
    QueryParser::new(index.analyzer())
        .with_default_field(FIELD_NAMES)
        .with_allow_leading_wildcard(leading)
        .parse(query_string)
}

#[test]
fn test_meta_values_of_demo_documents() -> Result<()> {
    let docs = build_demo_documents();
    assert_eq!(synthesize(&docs[0]), "title source author ");
    assert_eq!(synthesize(&docs[1]), "title origin author ");

    let index = demo_index()?;
    let reader = index.reader()?;
    assert_eq!(reader.document(0)?.get(FIELD_NAMES), Some("title source author "));
    assert_eq!(reader.document(1)?.get(FIELD_NAMES), Some("title origin author "));

    Ok(())
}

#[test]
fn test_native_existence() -> Result<()> {
    let index = demo_index()?;
    let (description, ids) = run(&index, &ExistenceQuery::native_exists("source"))?;

    assert_eq!(description, "source:*");
    assert_eq!(ids, vec![0]);

    Ok(())
}

#[test]
fn test_existence_via_meta_field() -> Result<()> {
    let index = demo_index()?;
    let (description, ids) = run(&index, &ExistenceQuery::exists(FIELD_NAMES, "author"))?;

    assert_eq!(description, "+field_names:author");
    assert_eq!(ids, vec![0, 1]);

    let (_, ids) = run(&index, &ExistenceQuery::exists(FIELD_NAMES, "origin"))?;
    assert_eq!(ids, vec![1]);

    let (_, ids) = run(&index, &ExistenceQuery::exists(FIELD_NAMES, "isbn"))?;
    assert!(ids.is_empty());

    Ok(())
}

#[test]
fn test_non_existence_via_meta_field() -> Result<()> {
    let index = demo_index()?;
    let (description, ids) = run(&index, &ExistenceQuery::missing(FIELD_NAMES, "origin"))?;

    assert_eq!(description, "+field_names:* -field_names:origin");
    assert_eq!(ids, vec![0]);

    let (_, ids) = run(&index, &ExistenceQuery::missing(FIELD_NAMES, "source"))?;
    assert_eq!(ids, vec![1]);

    let (_, ids) = run(&index, &ExistenceQuery::missing(FIELD_NAMES, "title"))?;
    assert!(ids.is_empty());

    let (_, ids) = run(&index, &ExistenceQuery::missing(FIELD_NAMES, "isbn"))?;
    assert_eq!(ids, vec![0, 1]);

    Ok(())
}

#[test]
fn test_purely_negative_query_matches_nothing() -> Result<()> {
    let index = demo_index()?;
    let searcher = IndexSearcher::new(index.reader()?);

    let query = parse_meta(&index, "-origin", false)?;
    assert_eq!(query.description(), "-field_names:origin");
    assert_eq!(searcher.search(query.as_ref(), 10)?.total_hits, 0);

    let query = parse_meta(&index, "NOT origin", false)?;
    assert_eq!(searcher.search(query.as_ref(), 10)?.total_hits, 0);

    Ok(())
}

#[test]
fn test_leading_wildcard_requires_opt_in() -> Result<()> {
    let index = demo_index()?;

    let err = parse_meta(&index, "* AND -origin", false).unwrap_err();
    assert!(err.is_query_error());

    let err = QueryParser::new(index.analyzer())
        .with_default_field("source")
        .parse("*")
        .unwrap_err();
    assert!(err.is_query_error());

    assert!(parse_meta(&index, "* AND -origin", true).is_ok());

    Ok(())
}

#[test]
fn test_equivalent_query_objects() -> Result<()> {
    let index = demo_index()?;
    let searcher = IndexSearcher::new(index.reader()?);

    // The same "origin is missing" question built by hand.
    let mut query = BooleanQuery::new();
    query.add(Occur::Must, Box::new(WildcardQuery::new(FIELD_NAMES, "*")?));
    query.add(Occur::MustNot, Box::new(fieldprobe::query::TermQuery::new(FIELD_NAMES, "origin")));

    let parsed = parse_meta(&index, "* AND -origin", true)?;
    assert_eq!(query.description(), parsed.description());
    assert_eq!(
        searcher.search(&query, 10)?.doc_ids(),
        searcher.search(parsed.as_ref(), 10)?.doc_ids()
    );

    Ok(())
}

#[test]
fn test_value_without_tokens_is_not_natively_present() -> Result<()> {
    let index = RamIndex::create(IndexConfig::default())?;
    let mut writer = index.writer()?;
    for value in ["wiki", "..."] {
        let mut doc = Document::builder()
            .add_text("title", "t")
            .add_text("source", value)
            .build();
        attach_field_names(&mut doc)?;
        writer.add_document(doc)?;
    }
    writer.close()?;

    let (_, native) = run(&index, &ExistenceQuery::native_exists("source"))?;
    let (_, meta) = run(&index, &ExistenceQuery::exists(FIELD_NAMES, "source"))?;

    // The meta field records the field even when its value analyzes to nothing.
    assert_eq!(native, vec![0]);
    assert_eq!(meta, vec![0, 1]);

    Ok(())
}

#[test]
fn test_punctuated_field_names_are_exact_meta_terms() -> Result<()> {
    let index = RamIndex::create(IndexConfig::default())?;
    let mut writer = index.writer()?;
    for mut doc in [
        Document::builder()
            .add_text("title", "Dashes")
            .add_text("--", "x")
            .add_text("e-mail", "a@example.org")
            .build(),
        Document::builder()
            .add_text("title", "Plain")
            .add_text("mail", "b@example.org")
            .build(),
    ] {
        attach_field_names(&mut doc)?;
        writer.add_document(doc)?;
    }
    writer.close()?;

    assert_eq!(run(&index, &ExistenceQuery::exists(FIELD_NAMES, "--"))?.1, vec![0]);
    assert_eq!(run(&index, &ExistenceQuery::missing(FIELD_NAMES, "--"))?.1, vec![1]);

    let (description, ids) = run(&index, &ExistenceQuery::exists(FIELD_NAMES, "e-mail"))?;
    assert_eq!(description, "+field_names:e-mail");
    assert_eq!(ids, vec![0]);
    assert_eq!(run(&index, &ExistenceQuery::missing(FIELD_NAMES, "e-mail"))?.1, vec![1]);

    // "mail" alone is a different field name from "e-mail".
    assert_eq!(run(&index, &ExistenceQuery::exists(FIELD_NAMES, "mail"))?.1, vec![1]);

    Ok(())
}
