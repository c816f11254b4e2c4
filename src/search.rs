//! Searcher implementation for executing queries against an index.

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::document::document::Document;
use crate::error::{FieldprobeError, Result};
use crate::index::DocId;
use crate::index::reader::IndexReader;
use crate::meta::ExistenceQuery;
use crate::query::collector::{Collector, CountCollector, TopDocs, TopDocsCollector};
use crate::query::{Query, QueryParser};

/// A searcher that executes queries against an index reader.
#[derive(Clone)]
pub struct IndexSearcher {
    /// The index reader to search against.
    reader: IndexReader,
}

impl IndexSearcher {
    /// Create a new searcher with the given index reader.
    pub fn new(reader: IndexReader) -> Self {
        IndexSearcher { reader }
    }

    /// Get the index reader.
    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    /// Execute a search with a custom collector.
    pub fn search_with_collector<C: Collector>(
        &self,
        query: &dyn Query,
        mut collector: C,
    ) -> Result<C> {
        for (doc_id, score) in query.execute(&self.reader)? {
            collector.collect(doc_id, score);
        }
        Ok(collector)
    }

    /// Return the `max_results` best hits, by descending score and then
    /// ascending doc id.
    pub fn search(&self, query: &dyn Query, max_results: usize) -> Result<TopDocs> {
        if max_results == 0 {
            return Err(FieldprobeError::invalid_argument(
                "max_results must be greater than zero",
            ));
        }

        let top_docs = self
            .search_with_collector(query, TopDocsCollector::new(max_results))?
            .into_top_docs();
        debug!(
            "Query '{}' matched {} documents, returning {}",
            query.description(),
            top_docs.total_hits,
            top_docs.len()
        );
        Ok(top_docs)
    }

    /// Count matching documents without ranking them.
    pub fn count(&self, query: &dyn Query) -> Result<usize> {
        Ok(self
            .search_with_collector(query, CountCollector::new())?
            .total_hits())
    }

    /// Resolve a hit to its stored document.
    pub fn doc(&self, doc_id: DocId) -> Result<&Document> {
        self.reader.document(doc_id)
    }
}

/// One ranked hit with its stored fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitReport {
    /// 1-based rank.
    pub rank: usize,
    /// Document id within the index.
    pub doc_id: DocId,
    /// Relevance score.
    pub score: f32,
    /// Stored fields as a JSON object.
    pub document: Value,
}

/// Outcome of running one query, kept even when the query failed to parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReport {
    /// What the query asks.
    pub label: String,
    /// The query string as given.
    pub query_string: String,
    /// The parsed query in string form; absent when parsing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The query error; absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of matching documents.
    pub total_hits: usize,
    /// Ranked hits, at most `max_results`.
    pub hits: Vec<HitReport>,
}

impl QueryReport {
    fn failed(label: String, query_string: String, error: &FieldprobeError) -> Self {
        QueryReport {
            label,
            query_string,
            description: None,
            error: Some(error.to_string()),
            total_hits: 0,
            hits: Vec::new(),
        }
    }

    /// Whether the query could not be parsed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl IndexSearcher {
    /// Parse and run a query string, capturing query errors in the report.
    ///
    /// Only query errors are captured; anything else is returned as an error.
    pub fn run_query_string(
        &self,
        label: &str,
        parser: &QueryParser,
        query_string: &str,
        max_results: usize,
    ) -> Result<QueryReport> {
        let query = match parser.parse(query_string) {
            Ok(query) => query,
            Err(e) if e.is_query_error() => {
                return Ok(QueryReport::failed(
                    label.to_string(),
                    query_string.to_string(),
                    &e,
                ));
            }
            Err(e) => return Err(e),
        };

        let top_docs = self.search(query.as_ref(), max_results)?;
        let hits = top_docs
            .hits
            .iter()
            .enumerate()
            .map(|(i, hit)| {
                Ok(HitReport {
                    rank: i + 1,
                    doc_id: hit.doc_id,
                    score: hit.score,
                    document: self.doc(hit.doc_id)?.to_json(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(QueryReport {
            label: label.to_string(),
            query_string: query_string.to_string(),
            description: Some(query.description()),
            error: None,
            total_hits: top_docs.total_hits,
            hits,
        })
    }

    /// Run an existence question with a parser configured for it.
    pub fn run_existence(&self, query: &ExistenceQuery, max_results: usize) -> Result<QueryReport> {
        let parser = query.parser(self.reader.analyzer());
        self.run_query_string(&query.label(), &parser, &query.query_string, max_results)
    }
}
