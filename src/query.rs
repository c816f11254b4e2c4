//! Query system for searching documents.
//!
//! Every query evaluates to [`DocScores`]: the matching documents, ordered by
//! id, with their scores. Boolean queries combine the scores of their clauses.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::error::Result;
use crate::index::DocId;
use crate::index::reader::IndexReader;

pub mod boolean;
pub mod collector;
pub mod match_all;
pub mod parser;
pub mod phrase;
pub mod scorer;
pub mod term;
pub mod wildcard;

pub use boolean::{BooleanClause, BooleanQuery, Occur};
pub use match_all::MatchAllQuery;
pub use parser::QueryParser;
pub use phrase::PhraseQuery;
pub use term::TermQuery;
pub use wildcard::WildcardQuery;

/// Matching documents and their scores, ordered by doc id.
pub type DocScores = BTreeMap<DocId, f32>;

/// Trait for search queries.
pub trait Query: Send + Sync + Debug {
    /// Evaluate the query against a reader.
    fn execute(&self, reader: &IndexReader) -> Result<DocScores>;

    /// Get the boost factor for this query.
    fn boost(&self) -> f32;

    /// Set the boost factor for this query.
    fn set_boost(&mut self, boost: f32);

    /// The query in query-string form, fields always spelled out.
    fn description(&self) -> String;

    /// Clone this query.
    fn clone_box(&self) -> Box<dyn Query>;

    /// Get this query as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Get the field name this query searches in, if applicable.
    fn field(&self) -> Option<&str> {
        None
    }
}

impl Clone for Box<dyn Query> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Append `^boost` to a description when the boost is not 1.
pub(crate) fn with_boost_suffix(description: String, boost: f32) -> String {
    if boost == 1.0 {
        description
    } else {
        format!("{description}^{boost:?}")
    }
}
