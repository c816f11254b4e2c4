//! Analyzers combine a tokenizer with a chain of filters.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream → Index
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 … Filter N
//! ```
//!
//! ```
//! use fieldprobe::analysis::analyzer::Analyzer;
//! use fieldprobe::analysis::analyzer::standard::StandardAnalyzer;
//!
//! let analyzer = StandardAnalyzer::new();
//! let tokens: Vec<_> = analyzer.analyze("Second Title").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "second");
//! assert_eq!(tokens[1].text, "title");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::token::TokenStream;
use crate::error::{FieldprobeError, Result};

pub mod per_field;
pub mod pipeline;
pub mod standard;
pub mod whitespace;

use self::standard::StandardAnalyzer;
use self::whitespace::WhitespaceAnalyzer;

/// Trait for analyzers that convert text into processed tokens.
///
/// The same analyzer must be used at indexing and query time; a query term
/// only matches when it normalizes to the indexed token.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Normalize a single term without splitting it.
    ///
    /// Used for wildcard patterns, where tokenizing would destroy the `*` and
    /// `?` metacharacters.
    fn normalize(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }

    /// Analyze a value of the named field.
    fn analyze_field(&self, _field: &str, text: &str) -> Result<TokenStream> {
        self.analyze(text)
    }

    /// Normalize a term for the named field.
    fn normalize_field(&self, _field: &str, text: &str) -> Result<String> {
        self.normalize(text)
    }

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// The analyzers selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// Unicode words, lowercased.
    #[default]
    Standard,
    /// Whitespace-separated words, case preserved.
    Whitespace,
}

impl AnalyzerKind {
    /// Instantiate the analyzer.
    pub fn build(self) -> Arc<dyn Analyzer> {
        match self {
            AnalyzerKind::Standard => Arc::new(StandardAnalyzer::new()),
            AnalyzerKind::Whitespace => Arc::new(WhitespaceAnalyzer::new()),
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerKind::Standard => write!(f, "standard"),
            AnalyzerKind::Whitespace => write!(f, "whitespace"),
        }
    }
}

impl FromStr for AnalyzerKind {
    type Err = FieldprobeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(AnalyzerKind::Standard),
            "whitespace" => Ok(AnalyzerKind::Whitespace),
            other => Err(FieldprobeError::invalid_config(format!(
                "unknown analyzer '{other}'"
            ))),
        }
    }
}
