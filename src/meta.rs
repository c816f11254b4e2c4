//! The `field_names` meta field and the existence queries built on it.
//!
//! An inverted index can say which documents contain a term, but not which
//! documents lack a field. Recording every document's field names in one extra
//! field turns both questions into ordinary term queries:
//!
//! | question              | query string     | default field  |
//! |-----------------------|------------------|----------------|
//! | does `source` exist?  | `*`              | `source`       |
//! | does `author` exist?  | `+author`        | `field_names`  |
//! | is `origin` missing?  | `* AND -origin`  | `field_names`  |
//!
//! ```
//! use fieldprobe::document::document::Document;
//! use fieldprobe::meta::{attach_field_names, synthesize};
//!
//! let mut doc = Document::builder()
//!     .add_text("title", "First Title")
//!     .add_text("source", "wiki")
//!     .build();
//!
//! assert_eq!(synthesize(&doc), "title source ");
//! assert_eq!(attach_field_names(&mut doc).unwrap(), "title source ");
//! assert_eq!(doc.get("field_names"), Some("title source "));
//! ```

use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::analysis::analyzer::Analyzer;
use crate::document::document::Document;
use crate::document::field::Field;
use crate::error::{FieldprobeError, Result};
use crate::query::{Query, QueryParser};

/// Conventional name of the meta field.
pub const FIELD_NAMES: &str = "field_names";

/// Separator written after every field name.
pub const SEPARATOR: char = ' ';

/// Build the meta value for a document: each field name followed by a space,
/// in insertion order. A document without fields yields `""`.
pub fn synthesize(doc: &Document) -> String {
    let mut value = String::new();
    for name in doc.field_names() {
        value.push_str(name);
        value.push(SEPARATOR);
    }
    value
}

/// Synthesize the meta value and append it to the document as the
/// `field_names` field, returning the value.
pub fn attach_field_names(doc: &mut Document) -> Result<String> {
    MetaFieldSynthesizer::default().attach(doc)
}

/// Computes and attaches the meta field under a configurable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaFieldSynthesizer {
    field_name: String,
}

impl Default for MetaFieldSynthesizer {
    fn default() -> Self {
        MetaFieldSynthesizer {
            field_name: FIELD_NAMES.to_string(),
        }
    }
}

impl MetaFieldSynthesizer {
    /// Create a synthesizer writing to the given field.
    pub fn new<S: Into<String>>(field_name: S) -> Self {
        MetaFieldSynthesizer {
            field_name: field_name.into(),
        }
    }

    /// The name of the meta field.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Same as [`synthesize`].
    pub fn synthesize(&self, doc: &Document) -> String {
        synthesize(doc)
    }

    /// Validate the document, then append the meta field to it.
    ///
    /// Field names must be non-empty and free of whitespace, or the meta value
    /// could not be split back into names. A document that already carries the
    /// meta field is rejected: the value is computed once, before attachment.
    pub fn attach(&self, doc: &mut Document) -> Result<String> {
        for name in doc.field_names() {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(FieldprobeError::field(format!(
                    "field name '{name}' cannot be listed in '{}': names must be non-empty and contain no whitespace",
                    self.field_name
                )));
            }
            if name == self.field_name {
                return Err(FieldprobeError::field(format!(
                    "document already has the meta field '{}'",
                    self.field_name
                )));
            }
        }

        let value = self.synthesize(doc);
        debug!("{}: {value}", self.field_name);
        doc.add_field(Field::text(self.field_name.clone(), value.clone()));
        Ok(value)
    }
}

/// The three ways of asking whether a field is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistenceKind {
    /// Any indexed term in the field itself.
    NativeExists,
    /// The field's name in the meta field.
    Exists,
    /// Every document whose meta field lacks the name.
    Missing,
}

/// A field existence question expressed as a parser setup and query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExistenceQuery {
    /// What is being asked.
    pub kind: ExistenceKind,
    /// The field whose presence is tested.
    pub field: String,
    /// The parser's default field.
    pub default_field: String,
    /// The query string handed to the parser.
    pub query_string: String,
    /// Whether the parser must accept a leading wildcard.
    pub allow_leading_wildcard: bool,
}

impl ExistenceQuery {
    /// `*` over the field itself. Matches documents with at least one indexed
    /// token in the field, so a field whose value analyzes to nothing is
    /// reported as absent.
    pub fn native_exists<S: Into<String>>(field: S) -> Self {
        let field = field.into();
        ExistenceQuery {
            kind: ExistenceKind::NativeExists,
            default_field: field.clone(),
            query_string: "*".to_string(),
            allow_leading_wildcard: true,
            field,
        }
    }

    /// `+<field>` over the meta field.
    pub fn exists<M: Into<String>, S: Into<String>>(meta_field: M, field: S) -> Self {
        let field = field.into();
        ExistenceQuery {
            kind: ExistenceKind::Exists,
            default_field: meta_field.into(),
            query_string: format!("+{}", escape(&field)),
            allow_leading_wildcard: false,
            field,
        }
    }

    /// `* AND -<field>` over the meta field. The `*` is required: a purely
    /// negative query matches nothing.
    pub fn missing<M: Into<String>, S: Into<String>>(meta_field: M, field: S) -> Self {
        let field = field.into();
        ExistenceQuery {
            kind: ExistenceKind::Missing,
            default_field: meta_field.into(),
            query_string: format!("* AND -{}", escape(&field)),
            allow_leading_wildcard: true,
            field,
        }
    }

    /// Human-readable description of the question.
    pub fn label(&self) -> String {
        match self.kind {
            ExistenceKind::NativeExists => format!(
                "Query '{}' field exists using the field itself.",
                self.field
            ),
            ExistenceKind::Exists => format!(
                "Query '{}' field exists using meta field '{}'.",
                self.field, self.default_field
            ),
            ExistenceKind::Missing => format!(
                "Query '{}' field does not exist using meta field '{}'.",
                self.field, self.default_field
            ),
        }
    }

    /// A parser configured for this question.
    pub fn parser(&self, analyzer: Arc<dyn Analyzer>) -> QueryParser {
        QueryParser::new(analyzer)
            .with_default_field(self.default_field.clone())
            .with_allow_leading_wildcard(self.allow_leading_wildcard)
    }

    /// Parse the query string with the given analyzer.
    pub fn parse(&self, analyzer: Arc<dyn Analyzer>) -> Result<Box<dyn Query>> {
        self.parser(analyzer).parse(&self.query_string)
    }
}

/// Escape query syntax characters so a field name parses as a single term.
pub fn escape(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(
            c,
            '\\' | '+' | '-' | '!' | '(' | ')' | ':' | '^' | '"' | '*' | '?' | '&' | '|'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::standard::StandardAnalyzer;

    fn doc_a() -> Document {
        Document::builder()
            .add_text("title", "First Title")
            .add_text("source", "wiki")
            .add_text("author", "anonymous")
            .build()
    }

    #[test]
    fn test_synthesize() {
        assert_eq!(synthesize(&doc_a()), "title source author ");

        let doc_b = Document::builder()
            .add_text("title", "Second Title")
            .add_text("origin", "paper")
            .add_text("author", "Spear")
            .build();
        assert_eq!(synthesize(&doc_b), "title origin author ");
    }

    #[test]
    fn test_synthesize_empty_document() {
        assert_eq!(synthesize(&Document::new()), "");
    }

    #[test]
    fn test_synthesize_keeps_order_and_duplicates() {
        let doc = Document::builder()
            .add_text("b", "1")
            .add_text("a", "2")
            .add_text("b", "3")
            .build();
        assert_eq!(synthesize(&doc), "b a b ");
    }

    #[test]
    fn test_synthesize_is_idempotent() {
        let doc = doc_a();
        let first = synthesize(&doc);
        assert_eq!(first, synthesize(&doc));
        assert!(first.ends_with(SEPARATOR));
        assert_eq!(first.split(SEPARATOR).filter(|s| !s.is_empty()).count(), doc.len());
    }

    #[test]
    fn test_attach_never_lists_itself() {
        let mut doc = doc_a();
        let value = attach_field_names(&mut doc).unwrap();

        assert!(!value.contains(FIELD_NAMES));
        assert_eq!(doc.get(FIELD_NAMES), Some(value.as_str()));
        assert_eq!(doc.len(), 4);
        assert_eq!(doc.fields().last().map(|f| f.name.as_str()), Some(FIELD_NAMES));
    }

    #[test]
    fn test_attach_rejects_bad_names() {
        let mut doc = doc_a();
        attach_field_names(&mut doc).unwrap();
        let err = attach_field_names(&mut doc).unwrap_err();
        assert!(matches!(err, FieldprobeError::Field(_)));

        let mut doc = Document::builder().add_text("first name", "x").build();
        assert!(attach_field_names(&mut doc).is_err());
        assert_eq!(doc.len(), 1);

        let mut doc = Document::builder().add_text("", "x").build();
        assert!(attach_field_names(&mut doc).is_err());
    }

    #[test]
    fn test_custom_meta_field() {
        let synthesizer = MetaFieldSynthesizer::new("_fields");
        let mut doc = doc_a();
        synthesizer.attach(&mut doc).unwrap();
        assert_eq!(doc.get("_fields"), Some("title source author "));
        assert!(doc.get(FIELD_NAMES).is_none());
    }

    #[test]
    fn test_existence_query_strings() {
        let native = ExistenceQuery::native_exists("source");
        assert_eq!(native.query_string, "*");
        assert_eq!(native.default_field, "source");
        assert!(native.allow_leading_wildcard);

        let exists = ExistenceQuery::exists(FIELD_NAMES, "author");
        assert_eq!(exists.query_string, "+author");
        assert!(!exists.allow_leading_wildcard);

        let missing = ExistenceQuery::missing(FIELD_NAMES, "origin");
        assert_eq!(missing.query_string, "* AND -origin");
        assert_eq!(
            missing.label(),
            "Query 'origin' field does not exist using meta field 'field_names'."
        );
    }

    #[test]
    fn test_existence_query_descriptions() {
        let analyzer: Arc<dyn Analyzer> = Arc::new(StandardAnalyzer::new());
        let describe = |q: ExistenceQuery| q.parse(analyzer.clone()).unwrap().description();

        assert_eq!(describe(ExistenceQuery::native_exists("source")), "source:*");
        assert_eq!(
            describe(ExistenceQuery::exists(FIELD_NAMES, "author")),
            "+field_names:author"
        );
        assert_eq!(
            describe(ExistenceQuery::missing(FIELD_NAMES, "origin")),
            "+field_names:* -field_names:origin"
        );
    }

    #[test]
    fn test_punctuated_names_stay_single_terms() {
        let analyzer = crate::index::config::IndexConfig::default().build_analyzer();
        let describe = |q: ExistenceQuery| q.parse(analyzer.clone()).unwrap().description();

        assert_eq!(
            describe(ExistenceQuery::exists(FIELD_NAMES, "e-mail")),
            "+field_names:e-mail"
        );
        assert_eq!(
            describe(ExistenceQuery::missing(FIELD_NAMES, "--")),
            "+field_names:* -field_names:--"
        );
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("author"), "author");
        assert_eq!(escape("a:b"), "a\\:b");
        assert_eq!(escape("-x*"), "\\-x\\*");
    }
}
