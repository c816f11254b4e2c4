//! Phrase query: terms at consecutive positions.

use std::any::Any;

use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::index::segment::Posting;
use crate::query::scorer::BM25Scorer;
use crate::query::{DocScores, Query, with_boost_suffix};

/// Matches documents where the terms appear next to each other, in order.
#[derive(Debug, Clone)]
pub struct PhraseQuery {
    field: String,
    terms: Vec<String>,
    boost: f32,
}

impl PhraseQuery {
    /// Create a new phrase query from already analyzed terms.
    pub fn new<F: Into<String>>(field: F, terms: Vec<String>) -> Self {
        PhraseQuery {
            field: field.into(),
            terms,
            boost: 1.0,
        }
    }

    /// Get the terms.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Count phrase occurrences given each term's positions in one document.
    fn phrase_freq(positions: &[&[u32]]) -> u32 {
        let Some((first, rest)) = positions.split_first() else {
            return 0;
        };

        first
            .iter()
            .filter(|&&start| {
                rest.iter().enumerate().all(|(offset, term_positions)| {
                    term_positions
                        .binary_search(&(start + offset as u32 + 1))
                        .is_ok()
                })
            })
            .count() as u32
    }
}

impl Query for PhraseQuery {
    fn execute(&self, reader: &IndexReader) -> Result<DocScores> {
        let mut scores = DocScores::new();
        if self.terms.is_empty() {
            return Ok(scores);
        }

        let lists: Vec<&[Posting]> = self
            .terms
            .iter()
            .map(|term| reader.postings(&self.field, term))
            .collect();
        if lists.iter().any(|list| list.is_empty()) {
            return Ok(scores);
        }

        let total_docs = u64::from(reader.max_doc());
        let avg_length = reader.avg_field_length(&self.field);
        let scorers: Vec<BM25Scorer> = lists
            .iter()
            .map(|list| BM25Scorer::new(list.len() as u64, total_docs, avg_length, self.boost))
            .collect();

        // Drive the intersection from the shortest postings list.
        let (driver_idx, driver) = lists
            .iter()
            .enumerate()
            .min_by_key(|(_, list)| list.len())
            .map(|(idx, list)| (idx, *list))
            .unwrap_or((0, lists[0]));

        'docs: for candidate in driver {
            let doc_id = candidate.doc_id;
            let mut positions: Vec<&[u32]> = Vec::with_capacity(lists.len());
            for (idx, list) in lists.iter().enumerate() {
                if idx == driver_idx {
                    positions.push(&candidate.positions);
                    continue;
                }
                match list.binary_search_by_key(&doc_id, |p| p.doc_id) {
                    Ok(found) => positions.push(&list[found].positions),
                    Err(_) => continue 'docs,
                }
            }

            let freq = Self::phrase_freq(&positions);
            if freq > 0 {
                let length = reader.field_length(&self.field, doc_id) as f32;
                let score: f32 = scorers
                    .iter()
                    .map(|scorer| scorer.score(freq as f32, length))
                    .sum();
                scores.insert(doc_id, score);
            }
        }

        Ok(scores)
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        with_boost_suffix(
            format!("{}:\"{}\"", self.field, self.terms.join(" ")),
            self.boost,
        )
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
