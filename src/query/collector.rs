//! Collector implementations for gathering search results.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Debug;

use serde::Serialize;

use crate::index::DocId;

/// A ranked reference to a matching document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreDoc {
    /// Document id within the index.
    pub doc_id: DocId,
    /// Relevance score.
    pub score: f32,
}

/// The top hits of a search plus the total number of matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopDocs {
    /// Number of documents that matched, including those beyond the limit.
    pub total_hits: usize,
    /// Hits ordered by descending score, then ascending doc id.
    pub hits: Vec<ScoreDoc>,
}

impl TopDocs {
    /// Number of hits returned.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Check if no hits were returned.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Doc ids of the returned hits in rank order.
    pub fn doc_ids(&self) -> Vec<DocId> {
        self.hits.iter().map(|hit| hit.doc_id).collect()
    }
}

/// Trait for collecting search results.
pub trait Collector: Send + Debug {
    /// Collect a document hit.
    fn collect(&mut self, doc_id: DocId, score: f32);

    /// Get the total number of hits collected.
    fn total_hits(&self) -> usize;
}

/// A collector that keeps the top N documents by score.
#[derive(Debug)]
pub struct TopDocsCollector {
    /// Maximum number of documents to keep.
    max_docs: usize,
    /// Heap whose top is the worst kept hit.
    hits: BinaryHeap<ScoredDoc>,
    /// Total number of documents processed.
    total_hits: usize,
}

/// A scored document for use in the heap.
#[derive(Debug, Clone)]
struct ScoredDoc {
    doc_id: DocId,
    score: f32,
}

impl PartialEq for ScoredDoc {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredDoc {}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDoc {
    // Greater means worse: lower score, then higher doc id.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

impl TopDocsCollector {
    /// Create a new top docs collector.
    pub fn new(max_docs: usize) -> Self {
        TopDocsCollector {
            max_docs,
            hits: BinaryHeap::with_capacity(max_docs.min(1024)),
            total_hits: 0,
        }
    }

    /// Get the maximum number of documents to collect.
    pub fn max_docs(&self) -> usize {
        self.max_docs
    }

    /// Consume the collector, returning hits in rank order.
    pub fn into_top_docs(self) -> TopDocs {
        // Ascending order of "worse" is best first.
        let hits = self
            .hits
            .into_sorted_vec()
            .into_iter()
            .map(|doc| ScoreDoc {
                doc_id: doc.doc_id,
                score: doc.score,
            })
            .collect();

        TopDocs {
            total_hits: self.total_hits,
            hits,
        }
    }
}

impl Collector for TopDocsCollector {
    fn collect(&mut self, doc_id: DocId, score: f32) {
        self.total_hits += 1;
        if self.max_docs == 0 {
            return;
        }

        let scored_doc = ScoredDoc { doc_id, score };
        if self.hits.len() < self.max_docs {
            self.hits.push(scored_doc);
        } else if let Some(worst) = self.hits.peek() {
            if scored_doc < *worst {
                self.hits.pop();
                self.hits.push(scored_doc);
            }
        }
    }

    fn total_hits(&self) -> usize {
        self.total_hits
    }
}

/// A collector that just counts the number of matching documents.
#[derive(Debug, Default)]
pub struct CountCollector {
    count: usize,
}

impl CountCollector {
    /// Create a new count collector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Collector for CountCollector {
    fn collect(&mut self, _doc_id: DocId, _score: f32) {
        self.count += 1;
    }

    fn total_hits(&self) -> usize {
        self.count
    }
}
