//! In-memory inverted segment: term dictionaries, postings, and stored documents.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::analysis::analyzer::Analyzer;
use crate::document::document::Document;
use crate::error::{FieldprobeError, Result};
use crate::index::DocId;

/// One document's occurrences of a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// The document containing the term.
    pub doc_id: DocId,
    /// Token positions of the term inside the field, ascending.
    pub positions: Vec<u32>,
}

impl Posting {
    /// Number of occurrences in the document.
    pub fn term_freq(&self) -> u32 {
        self.positions.len() as u32
    }
}

/// Inverted data for a single field.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    /// Term dictionary, sorted, mapping to postings ordered by doc id.
    terms: BTreeMap<String, Vec<Posting>>,
    /// Token count per document that has this field.
    lengths: AHashMap<DocId, u32>,
    /// Sum of all token counts.
    total_length: u64,
}

impl FieldIndex {
    /// Postings of a term, empty when the term is unknown.
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.terms.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate the term dictionary in sorted order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.terms.iter().map(|(t, p)| (t.as_str(), p.as_slice()))
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Number of documents with at least one token in this field.
    pub fn doc_count(&self) -> usize {
        self.lengths.len()
    }

    /// Token count of the field in a document.
    pub fn field_length(&self, doc_id: DocId) -> u32 {
        self.lengths.get(&doc_id).copied().unwrap_or(0)
    }

    /// Mean token count over documents that have the field.
    pub fn avg_field_length(&self) -> f64 {
        if self.lengths.is_empty() {
            0.0
        } else {
            self.total_length as f64 / self.lengths.len() as f64
        }
    }

    fn add_token(&mut self, term: String, doc_id: DocId, position: u32) {
        let postings = self.terms.entry(term).or_default();
        match postings.last_mut() {
            Some(last) if last.doc_id == doc_id => last.positions.push(position),
            _ => postings.push(Posting {
                doc_id,
                positions: vec![position],
            }),
        }
    }
}

/// A set of analyzed documents.
///
/// Documents are only ever appended, so doc ids are dense and every postings
/// list stays sorted without re-sorting.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    fields: AHashMap<String, FieldIndex>,
    documents: Vec<Document>,
}

impl Segment {
    /// Create an empty segment.
    pub fn new() -> Self {
        Segment::default()
    }

    /// Analyze and append a document, returning its id.
    ///
    /// Repeated fields continue the position sequence of earlier values with a
    /// gap, so a phrase never matches across two values. Every field is
    /// analyzed before anything is merged, so a failing analyzer leaves the
    /// segment untouched.
    pub fn add_document(&mut self, doc: Document, analyzer: &dyn Analyzer) -> Result<DocId> {
        let doc_id = DocId::try_from(self.documents.len())
            .map_err(|_| FieldprobeError::index("segment is full"))?;

        // Per field, in first-seen order: (term, position) pairs.
        let mut pending: Vec<(&str, Vec<(String, u32)>)> = Vec::new();
        let mut next_position: AHashMap<&str, u32> = AHashMap::new();
        for field in doc.fields().iter().filter(|f| f.is_indexed()) {
            let name = field.name.as_str();
            let base = next_position.get(name).copied().unwrap_or(0);
            let tokens: Vec<(String, u32)> = analyzer
                .analyze_field(name, &field.value)?
                .map(|token| (token.text, base + token.position as u32))
                .collect();

            let slot = match pending.iter().position(|(n, _)| *n == name) {
                Some(slot) => slot,
                None => {
                    pending.push((name, Vec::new()));
                    pending.len() - 1
                }
            };
            if let Some(&(_, last)) = tokens.last() {
                // Leave a one-position gap before the next value of this field.
                next_position.insert(name, last + 2);
            }
            pending[slot].1.extend(tokens);
        }

        for (name, tokens) in pending {
            let field_index = self.fields.entry(name.to_string()).or_default();
            let count = tokens.len() as u32;
            for (term, position) in tokens {
                field_index.add_token(term, doc_id, position);
            }
            if count > 0 {
                field_index.lengths.insert(doc_id, count);
                field_index.total_length += u64::from(count);
            }
        }

        self.documents.push(doc);
        Ok(doc_id)
    }

    /// Inverted data of a field, if any document indexed it.
    pub fn field(&self, name: &str) -> Option<&FieldIndex> {
        self.fields.get(name)
    }

    /// Names of all indexed fields, sorted.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The stored document for an id.
    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.documents.get(doc_id as usize)
    }

    /// Number of documents, which is also one past the highest doc id.
    pub fn max_doc(&self) -> u32 {
        self.documents.len() as u32
    }

    /// Distinct terms summed over all fields.
    pub fn term_count(&self) -> usize {
        self.fields.values().map(FieldIndex::term_count).sum()
    }
}
