//! Wildcard query implementation for pattern matching.

use std::any::Any;
use std::sync::Arc;

use regex::Regex;

use crate::error::{FieldprobeError, Result};
use crate::index::reader::IndexReader;
use crate::query::{DocScores, Query, with_boost_suffix};

/// A query that matches documents containing terms that match a wildcard pattern.
///
/// Supports the following wildcards:
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
/// - `\*` and `\?` match literal `*` and `?` characters
///
/// Every matching document scores the boost: a wildcard says whether a term is
/// there, not how relevant it is. The pattern `*` therefore matches every
/// document with at least one indexed token in the field.
#[derive(Debug, Clone)]
pub struct WildcardQuery {
    /// The field to search in.
    field: String,
    /// The wildcard pattern.
    pattern: String,
    /// The compiled regex for matching.
    regex: Arc<Regex>,
    /// The boost factor for this query.
    boost: f32,
}

impl WildcardQuery {
    /// Create a new wildcard query.
    pub fn new<F: Into<String>, P: Into<String>>(field: F, pattern: P) -> Result<Self> {
        let field = field.into();
        let pattern = pattern.into();
        let regex = Self::compile_pattern(&pattern)?;

        Ok(WildcardQuery {
            field,
            pattern,
            regex: Arc::new(regex),
            boost: 1.0,
        })
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the wildcard pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the pattern begins with a wildcard.
    pub fn has_leading_wildcard(&self) -> bool {
        self.pattern.starts_with(['*', '?'])
    }

    /// Compile a wildcard pattern into an anchored regex.
    fn compile_pattern(pattern: &str) -> Result<Regex> {
        let mut regex_pattern = String::with_capacity(pattern.len() + 8);
        regex_pattern.push('^');

        let mut chars = pattern.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some(escaped) => regex_pattern.push_str(&regex::escape(&escaped.to_string())),
                    None => regex_pattern.push_str(r"\\"),
                },
                '*' => regex_pattern.push_str(".*"),
                '?' => regex_pattern.push('.'),
                c => regex_pattern.push_str(&regex::escape(&c.to_string())),
            }
        }

        regex_pattern.push('$');

        Regex::new(&regex_pattern)
            .map_err(|e| FieldprobeError::query(format!("Invalid wildcard pattern '{pattern}': {e}")))
    }

    /// Check if a term matches the wildcard pattern.
    pub fn matches(&self, term: &str) -> bool {
        self.regex.is_match(term)
    }
}

impl Query for WildcardQuery {
    fn execute(&self, reader: &IndexReader) -> Result<DocScores> {
        let mut scores = DocScores::new();
        let Some(field) = reader.field(&self.field) else {
            return Ok(scores);
        };

        for (_, postings) in field.terms().filter(|(term, _)| self.matches(term)) {
            for posting in postings {
                scores.insert(posting.doc_id, self.boost);
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
        with_boost_suffix(format!("{}:{}", self.field, self.pattern), self.boost)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document::Document;
    use crate::index::config::IndexConfig;
    use crate::index::ram::RamIndex;

    #[test]
    fn test_wildcard_pattern_compilation() {
        let query = WildcardQuery::new("field", "hello*").unwrap();
        assert!(query.matches("hello"));
        assert!(query.matches("helloworld"));
        assert!(!query.matches("hell"));

        let query = WildcardQuery::new("field", "h?llo").unwrap();
        assert!(query.matches("hello"));
        assert!(query.matches("hallo"));
        assert!(!query.matches("heello"));

        let query = WildcardQuery::new("field", "*").unwrap();
        assert!(query.matches(""));
        assert!(query.matches("anything"));
        assert!(query.has_leading_wildcard());
    }

    #[test]
    fn test_escaped_wildcards() {
        let query = WildcardQuery::new("field", "hello\\*world").unwrap();
        assert!(query.matches("hello*world"));
        assert!(!query.matches("helloworld"));
        assert!(!query.has_leading_wildcard());

        let query = WildcardQuery::new("field", "hello\\?world").unwrap();
        assert!(query.matches("hello?world"));
        assert!(!query.matches("helloxworld"));
    }

    #[test]
    fn test_special_regex_characters() {
        let query = WildcardQuery::new("field", "hello.world").unwrap();
        assert!(query.matches("hello.world"));
        assert!(!query.matches("helloxworld"));

        let query = WildcardQuery::new("field", "a+(b)|[c]").unwrap();
        assert!(query.matches("a+(b)|[c]"));
    }

    #[test]
    fn test_execute_field_existence() {
        let index = RamIndex::create(IndexConfig::default()).unwrap();
        let mut writer = index.writer().unwrap();
        writer
            .add_document(Document::builder().add_text("source", "wiki").build())
            .unwrap();
        writer
            .add_document(Document::builder().add_text("origin", "paper").build())
            .unwrap();
        writer
            .add_document(Document::builder().add_text("source", "web page").build())
            .unwrap();
        writer.close().unwrap();
        let reader = index.reader().unwrap();

        let scores = WildcardQuery::new("source", "*").unwrap().execute(&reader).unwrap();
        assert_eq!(scores.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(scores[&2], 1.0);

        let scores = WildcardQuery::new("source", "w?b").unwrap().execute(&reader).unwrap();
        assert_eq!(scores.keys().copied().collect::<Vec<_>>(), vec![2]);

        let missing = WildcardQuery::new("nothing", "*").unwrap().execute(&reader).unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_description() {
        let query = WildcardQuery::new("source", "*").unwrap();
        assert_eq!(query.description(), "source:*");
        assert_eq!(query.with_boost(0.5).description(), "source:*^0.5");
    }
}
