//! Per-field analyzer: a different analyzer for selected fields.

use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Applies a field-specific analyzer where one is registered and the default
/// analyzer everywhere else.
///
/// ```
/// use std::sync::Arc;
/// use fieldprobe::analysis::analyzer::Analyzer;
/// use fieldprobe::analysis::analyzer::per_field::PerFieldAnalyzer;
/// use fieldprobe::analysis::analyzer::standard::StandardAnalyzer;
/// use fieldprobe::analysis::analyzer::whitespace::WhitespaceAnalyzer;
///
/// let mut analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()));
/// analyzer.add_analyzer("field_names", Arc::new(WhitespaceAnalyzer::new()));
///
/// let names: Vec<_> = analyzer
///     .analyze_field("field_names", "title e-mail ")
///     .unwrap()
///     .map(|t| t.text)
///     .collect();
/// assert_eq!(names, vec!["title", "e-mail"]);
/// ```
#[derive(Clone)]
pub struct PerFieldAnalyzer {
    default_analyzer: Arc<dyn Analyzer>,
    field_analyzers: AHashMap<String, Arc<dyn Analyzer>>,
}

impl PerFieldAnalyzer {
    /// Create a per-field analyzer falling back to `default_analyzer`.
    pub fn new(default_analyzer: Arc<dyn Analyzer>) -> Self {
        PerFieldAnalyzer {
            default_analyzer,
            field_analyzers: AHashMap::new(),
        }
    }

    /// Register the analyzer for one field.
    pub fn add_analyzer<S: Into<String>>(&mut self, field: S, analyzer: Arc<dyn Analyzer>) {
        self.field_analyzers.insert(field.into(), analyzer);
    }

    /// The analyzer that applies to a field.
    pub fn get_analyzer(&self, field: &str) -> &Arc<dyn Analyzer> {
        self.field_analyzers
            .get(field)
            .unwrap_or(&self.default_analyzer)
    }

    /// The fallback analyzer.
    pub fn default_analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.default_analyzer
    }
}

impl Analyzer for PerFieldAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.default_analyzer.analyze(text)
    }

    fn analyze_field(&self, field: &str, text: &str) -> Result<TokenStream> {
        self.get_analyzer(field).analyze(text)
    }

    fn normalize(&self, text: &str) -> Result<String> {
        self.default_analyzer.normalize(text)
    }

    fn normalize_field(&self, field: &str, text: &str) -> Result<String> {
        self.get_analyzer(field).normalize(text)
    }

    fn name(&self) -> &'static str {
        self.default_analyzer.name()
    }
}

impl std::fmt::Debug for PerFieldAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<(&str, &'static str)> = self
            .field_analyzers
            .iter()
            .map(|(field, analyzer)| (field.as_str(), analyzer.name()))
            .collect();
        fields.sort_unstable();
        f.debug_struct("PerFieldAnalyzer")
            .field("default", &self.default_analyzer.name())
            .field("fields", &fields)
            .finish()
    }
}
