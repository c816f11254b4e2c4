//! Integration tests for BooleanQuery with MUST_NOT support

use fieldprobe::error::Result;
use fieldprobe::prelude::*;
use fieldprobe::query::{BooleanQuery, MatchAllQuery, Occur, TermQuery};

fn searcher() -> Result<IndexSearcher> {
    let index = RamIndex::create(IndexConfig::default())?;
    let mut writer = index.writer()?;

    let documents = vec![
        Document::builder()
            .add_text("title", "Python Programming")
            .add_text("category", "programming")
            .add_text("tags", "python beginner")
            .build(),
        Document::builder()
            .add_text("title", "JavaScript Web Development")
            .add_text("category", "programming")
            .add_text("tags", "javascript web")
            .build(),
        Document::builder()
            .add_text("title", "Cooking with Python")
            .add_text("category", "cooking")
            .add_text("tags", "python recipes")
            .build(),
    ];
    for doc in documents {
        writer.add_document(doc)?;
    }
    writer.close()?;

    Ok(IndexSearcher::new(index.reader()?))
}

#[test]
fn test_boolean_query_must_not() -> Result<()> {
    let searcher = searcher()?;

    // Test 1: MUST_NOT alone matches nothing
    let mut query = BooleanQuery::new();
    query.add(Occur::MustNot, Box::new(TermQuery::new("tags", "javascript")));
    let results = searcher.search(&query, 10)?;
    assert_eq!(results.total_hits, 0, "Purely negative query should match nothing");

    // Test 2: MUST_NOT next to match-all
    query.add(Occur::Must, Box::new(MatchAllQuery::new()));
    let results = searcher.search(&query, 10)?;
    assert_eq!(results.total_hits, 2, "Should exclude JavaScript document");
    assert!(results.hits.iter().all(|hit| hit.doc_id != 1));

    // Test 3: MUST with MUST_NOT
    let mut query = BooleanQuery::new();
    query.add(Occur::Must, Box::new(TermQuery::new("category", "programming")));
    query.add(Occur::MustNot, Box::new(TermQuery::new("tags", "javascript")));
    let results = searcher.search(&query, 10)?;
    assert_eq!(results.total_hits, 1, "Should find only Python programming doc");
    assert_eq!(results.hits[0].doc_id, 0);

    // Test 4: Multiple MUST_NOT clauses
    let mut query = BooleanQuery::new();
    query.add(Occur::Must, Box::new(MatchAllQuery::new()));
    query.add(Occur::MustNot, Box::new(TermQuery::new("tags", "javascript")));
    query.add(Occur::MustNot, Box::new(TermQuery::new("category", "cooking")));
    let results = searcher.search(&query, 10)?;
    assert_eq!(results.total_hits, 1, "Should exclude both JavaScript and cooking docs");
    assert_eq!(results.hits[0].doc_id, 0);

    // Test 5: Multiple MUST clauses
    let mut query = BooleanQuery::new();
    query.add(Occur::Must, Box::new(TermQuery::new("tags", "python")));
    query.add(Occur::Must, Box::new(TermQuery::new("category", "programming")));
    let results = searcher.search(&query, 10)?;
    assert_eq!(results.total_hits, 1);
    assert_eq!(results.hits[0].doc_id, 0);

    Ok(())
}

#[test]
fn test_parsed_queries() -> Result<()> {
    let searcher = searcher()?;
    let parser = QueryParser::new(searcher.reader().analyzer()).with_default_field("title");

    let query = parser.parse("python AND NOT category:cooking")?;
    assert_eq!(query.description(), "+title:python -category:cooking");
    assert_eq!(searcher.search(query.as_ref(), 10)?.doc_ids(), vec![0]);

    let query = parser.parse("\"web development\" OR cooking")?;
    assert_eq!(searcher.search(query.as_ref(), 10)?.total_hits, 2);

    let query = parser.parse("\"development web\"")?;
    assert_eq!(searcher.search(query.as_ref(), 10)?.total_hits, 0);

    let query = parser.parse("tags:pyth*")?;
    assert_eq!(searcher.search(query.as_ref(), 10)?.doc_ids(), vec![0, 2]);

    let query = parser.parse("*:* -tags:python")?;
    assert_eq!(searcher.search(query.as_ref(), 10)?.doc_ids(), vec![1]);

    Ok(())
}

#[test]
fn test_parsed_minimum_should_match() -> Result<()> {
    let searcher = searcher()?;
    let parser = QueryParser::new(searcher.reader().analyzer()).with_default_field("tags");

    let query = parser.parse("(python beginner web)~2")?;
    assert_eq!(searcher.search(query.as_ref(), 10)?.doc_ids(), vec![0]);

    let query = parser.parse("(python beginner web)~1")?;
    assert_eq!(searcher.search(query.as_ref(), 10)?.total_hits, 3);

    let query = parser.parse("category:programming (python web recipes)~2")?;
    assert_eq!(searcher.search(query.as_ref(), 10)?.total_hits, 3);

    let query = parser.parse("+category:programming +(python web recipes)~2")?;
    assert_eq!(searcher.search(query.as_ref(), 10)?.total_hits, 0);

    Ok(())
}
