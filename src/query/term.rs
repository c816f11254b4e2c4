//! Term query: documents containing one exact (already analyzed) term.

use std::any::Any;

use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::query::scorer::BM25Scorer;
use crate::query::{DocScores, Query, with_boost_suffix};

/// A query that matches documents containing a specific term in a field.
#[derive(Debug, Clone)]
pub struct TermQuery {
    field: String,
    term: String,
    boost: f32,
}

impl TermQuery {
    /// Create a new term query. The term is matched as given, without analysis.
    pub fn new<F: Into<String>, T: Into<String>>(field: F, term: T) -> Self {
        TermQuery {
            field: field.into(),
            term: term.into(),
            boost: 1.0,
        }
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the term.
    pub fn term(&self) -> &str {
        &self.term
    }
}

impl Query for TermQuery {
    fn execute(&self, reader: &IndexReader) -> Result<DocScores> {
        let postings = reader.postings(&self.field, &self.term);
        let scorer = BM25Scorer::new(
            postings.len() as u64,
            u64::from(reader.max_doc()),
            reader.avg_field_length(&self.field),
            self.boost,
        );

        Ok(postings
            .iter()
            .map(|posting| {
                let length = reader.field_length(&self.field, posting.doc_id) as f32;
                (
                    posting.doc_id,
                    scorer.score(posting.term_freq() as f32, length),
                )
            })
            .collect())
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        with_boost_suffix(format!("{}:{}", self.field, self.term), self.boost)
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }
}
