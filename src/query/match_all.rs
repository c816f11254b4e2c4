//! Query matching every document.

use std::any::Any;

use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::query::{DocScores, Query, with_boost_suffix};

/// Matches all documents with a constant score equal to the boost.
#[derive(Debug, Clone)]
pub struct MatchAllQuery {
    boost: f32,
}

impl MatchAllQuery {
    /// Create a new match-all query.
    pub fn new() -> Self {
        MatchAllQuery { boost: 1.0 }
    }
}

impl Default for MatchAllQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl Query for MatchAllQuery {
    fn execute(&self, reader: &IndexReader) -> Result<DocScores> {
        Ok((0..reader.max_doc()).map(|doc_id| (doc_id, self.boost)).collect())
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        with_boost_suffix("*:*".to_string(), self.boost)
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
