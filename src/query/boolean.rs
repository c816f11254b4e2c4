//! Boolean combination of queries: required, optional and prohibited clauses.

use std::any::Any;

use ahash::AHashMap;

use crate::error::Result;
use crate::index::DocId;
use crate::index::reader::IndexReader;
use crate::query::{DocScores, Query};

/// How a clause takes part in a [`BooleanQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    /// Required: `+clause` or `a AND b`.
    Must,
    /// Optional, contributes score: a bare clause or `a OR b`.
    Should,
    /// Prohibited: `-clause` or `NOT clause`.
    MustNot,
}

impl Occur {
    fn prefix(self) -> &'static str {
        match self {
            Occur::Must => "+",
            Occur::Should => "",
            Occur::MustNot => "-",
        }
    }
}

/// One sub-query with its [`Occur`].
#[derive(Debug, Clone)]
pub struct BooleanClause {
    pub query: Box<dyn Query>,
    pub occur: Occur,
}

impl BooleanClause {
    pub fn new(query: Box<dyn Query>, occur: Occur) -> Self {
        BooleanClause { query, occur }
    }

    fn description(&self) -> String {
        let inner = self.query.description();
        // Plain nested groups need parentheses; boosted or `~N` ones carry their own.
        let nested = self
            .query
            .as_any()
            .downcast_ref::<BooleanQuery>()
            .is_some_and(|q| q.boost == 1.0 && q.minimum_should_match == 0);
        if nested {
            format!("{}({inner})", self.occur.prefix())
        } else {
            format!("{}{inner}", self.occur.prefix())
        }
    }
}

/// Combines clauses the way the query syntax does.
///
/// - With MUST clauses, a document must match all of them; SHOULD clauses
///   only add to the score.
/// - Without MUST clauses, a document must match at least one SHOULD clause.
/// - MUST_NOT clauses remove documents and never contribute a match on their
///   own: a query made only of MUST_NOT clauses matches nothing. Pair it with
///   a match-everything clause (`* AND -term`) to select what is absent.
/// - `minimum_should_match` raises the number of SHOULD clauses required.
///
/// ```
/// use fieldprobe::query::{BooleanQuery, Occur, Query, TermQuery, WildcardQuery};
///
/// let missing_origin = BooleanQuery::new()
///     .with(Occur::Must, WildcardQuery::new("field_names", "*").unwrap())
///     .with(Occur::MustNot, TermQuery::new("field_names", "origin"));
/// assert_eq!(missing_origin.description(), "+field_names:* -field_names:origin");
/// ```
#[derive(Debug, Clone)]
pub struct BooleanQuery {
    clauses: Vec<BooleanClause>,
    boost: f32,
    minimum_should_match: usize,
}

impl BooleanQuery {
    /// An empty query, which matches nothing.
    pub fn new() -> Self {
        BooleanQuery {
            clauses: Vec::new(),
            boost: 1.0,
            minimum_should_match: 0,
        }
    }

    pub fn add_clause(&mut self, clause: BooleanClause) {
        self.clauses.push(clause);
    }

    /// Append a clause.
    pub fn add(&mut self, occur: Occur, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::new(query, occur));
    }

    /// Chaining form of [`add`](Self::add).
    pub fn with<Q: Query + 'static>(mut self, occur: Occur, query: Q) -> Self {
        self.add(occur, Box::new(query));
        self
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Require at least `minimum` SHOULD clauses to match.
    pub fn with_minimum_should_match(mut self, minimum: usize) -> Self {
        self.minimum_should_match = minimum;
        self
    }

    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    pub fn minimum_should_match(&self) -> usize {
        self.minimum_should_match
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    fn queries(&self, occur: Occur) -> impl Iterator<Item = &dyn Query> {
        self.clauses
            .iter()
            .filter(move |c| c.occur == occur)
            .map(|c| c.query.as_ref())
    }
}

impl Default for BooleanQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<BooleanClause> for BooleanQuery {
    fn from_iter<I: IntoIterator<Item = BooleanClause>>(iter: I) -> Self {
        BooleanQuery {
            clauses: iter.into_iter().collect(),
            ..BooleanQuery::new()
        }
    }
}

impl Query for BooleanQuery {
    fn execute(&self, reader: &IndexReader) -> Result<DocScores> {
        let has_must = self.queries(Occur::Must).next().is_some();
        if !has_must && self.queries(Occur::Should).next().is_none() {
            return Ok(DocScores::new());
        }

        // Required clauses: intersection, scores summed.
        let mut candidates: Option<DocScores> = None;
        for query in self.queries(Occur::Must) {
            let matched = query.execute(reader)?;
            let next: DocScores = match candidates.take() {
                None => matched,
                Some(current) => current
                    .into_iter()
                    .filter_map(|(doc_id, score)| {
                        matched.get(&doc_id).map(|other| (doc_id, score + other))
                    })
                    .collect(),
            };
            if next.is_empty() {
                return Ok(next);
            }
            candidates = Some(next);
        }

        // SHOULD clauses: score and count per document.
        let mut should_hits: AHashMap<DocId, (usize, f32)> = AHashMap::new();
        for query in self.queries(Occur::Should) {
            for (doc_id, score) in query.execute(reader)? {
                let entry = should_hits.entry(doc_id).or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 += score;
            }
        }

        let required_should = if !has_must {
            self.minimum_should_match.max(1)
        } else {
            self.minimum_should_match
        };

        let mut results: DocScores = match candidates {
            Some(candidates) => candidates
                .into_iter()
                .filter_map(|(doc_id, score)| {
                    let (count, extra) = should_hits.get(&doc_id).copied().unwrap_or((0, 0.0));
                    (count >= required_should).then_some((doc_id, score + extra))
                })
                .collect(),
            None => should_hits
                .into_iter()
                .filter(|(_, (count, _))| *count >= required_should)
                .map(|(doc_id, (_, score))| (doc_id, score))
                .collect(),
        };

        for query in self.queries(Occur::MustNot) {
            if results.is_empty() {
                break;
            }
            for doc_id in query.execute(reader)?.into_keys() {
                results.remove(&doc_id);
            }
        }

        if self.boost != 1.0 {
            for score in results.values_mut() {
                *score *= self.boost;
            }
        }

        Ok(results)
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        if self.clauses.is_empty() {
            return "()".to_string();
        }

        let mut result = self
            .clauses
            .iter()
            .map(BooleanClause::description)
            .collect::<Vec<_>>()
            .join(" ");

        if self.minimum_should_match > 0 {
            result = format!("({result})~{}", self.minimum_should_match);
        }

        if self.boost == 1.0 {
            result
        } else {
            format!("({result})^{:?}", self.boost)
        }
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
