//! Read-only view of a committed index state.

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::document::document::Document;
use crate::error::{FieldprobeError, Result};
use crate::index::DocId;
use crate::index::segment::{FieldIndex, Posting, Segment};

/// A snapshot of the index as of one commit.
///
/// Cheap to clone; later commits never change what a reader sees.
#[derive(Clone)]
pub struct IndexReader {
    segment: Arc<Segment>,
    analyzer: Arc<dyn Analyzer>,
    generation: u64,
}

impl IndexReader {
    pub(crate) fn new(segment: Arc<Segment>, analyzer: Arc<dyn Analyzer>, generation: u64) -> Self {
        IndexReader {
            segment,
            analyzer,
            generation,
        }
    }

    /// Number of documents, which is also one past the highest doc id.
    pub fn max_doc(&self) -> u32 {
        self.segment.max_doc()
    }

    /// The commit generation this reader was opened on.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The analyzer the index was built with.
    pub fn analyzer(&self) -> Arc<dyn Analyzer> {
        Arc::clone(&self.analyzer)
    }

    /// The stored document for an id.
    pub fn document(&self, doc_id: DocId) -> Result<&Document> {
        self.segment
            .document(doc_id)
            .ok_or_else(|| FieldprobeError::index(format!("No document with id {doc_id}")))
    }

    /// Inverted data of a field, if any document indexed it.
    pub fn field(&self, field: &str) -> Option<&FieldIndex> {
        self.segment.field(field)
    }

    /// Postings of a term in a field, empty when absent.
    pub fn postings(&self, field: &str, term: &str) -> &[Posting] {
        self.segment
            .field(field)
            .map(|f| f.postings(term))
            .unwrap_or(&[])
    }

    /// Number of documents containing a term in a field.
    pub fn doc_freq(&self, field: &str, term: &str) -> u64 {
        self.postings(field, term).len() as u64
    }

    /// Number of documents with at least one token in a field.
    pub fn doc_count(&self, field: &str) -> u64 {
        self.segment
            .field(field)
            .map(|f| f.doc_count() as u64)
            .unwrap_or(0)
    }

    /// Token count of a field in a document.
    pub fn field_length(&self, field: &str, doc_id: DocId) -> u32 {
        self.segment
            .field(field)
            .map(|f| f.field_length(doc_id))
            .unwrap_or(0)
    }

    /// Mean token count of a field over documents that have it.
    pub fn avg_field_length(&self, field: &str) -> f64 {
        self.segment
            .field(field)
            .map(FieldIndex::avg_field_length)
            .unwrap_or(0.0)
    }

    /// Names of all indexed fields, sorted.
    pub fn field_names(&self) -> Vec<&str> {
        self.segment.field_names()
    }
}

impl std::fmt::Debug for IndexReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexReader")
            .field("max_doc", &self.max_doc())
            .field("generation", &self.generation)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}
