//! Index configuration.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::per_field::PerFieldAnalyzer;
use crate::analysis::analyzer::whitespace::WhitespaceAnalyzer;
use crate::analysis::analyzer::{Analyzer, AnalyzerKind};
use crate::error::{FieldprobeError, Result};
use crate::meta::FIELD_NAMES;

/// Configuration for index creation and searching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Maximum number of hits returned per query.
    pub max_results: usize,

    /// Name of the synthesized field listing each document's field names.
    pub meta_field: String,

    /// Analyzer applied to every indexed field and to query terms.
    pub analyzer: AnalyzerKind,

    /// Whether query strings may start a term with `*` or `?`.
    pub allow_leading_wildcard: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            max_results: 10,
            meta_field: FIELD_NAMES.to_string(),
            analyzer: AnalyzerKind::Standard,
            allow_leading_wildcard: false,
        }
    }
}

impl IndexConfig {
    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: IndexConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the index cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(FieldprobeError::invalid_config(
                "max_results must be greater than zero",
            ));
        }
        if self.meta_field.is_empty() || self.meta_field.chars().any(char::is_whitespace) {
            return Err(FieldprobeError::invalid_config(format!(
                "meta_field '{}' must be a non-empty name without whitespace",
                self.meta_field
            )));
        }
        Ok(())
    }

    /// The analyzer for this index: the configured kind for ordinary fields,
    /// whitespace splitting for the meta field so every field name stays one
    /// exact term.
    pub fn build_analyzer(&self) -> Arc<dyn Analyzer> {
        let mut analyzer = PerFieldAnalyzer::new(self.analyzer.build());
        analyzer.add_analyzer(self.meta_field.clone(), Arc::new(WhitespaceAnalyzer::new()));
        Arc::new(analyzer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert_eq!(config.max_results, 10);
        assert_eq!(config.meta_field, "field_names");
        assert_eq!(config.analyzer, AnalyzerKind::Standard);
        assert!(!config.allow_leading_wildcard);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = IndexConfig {
            max_results: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = IndexConfig {
            meta_field: "field names".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_results": 3, "analyzer": "whitespace"}}"#).unwrap();
        file.flush().unwrap();

        let config = IndexConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_results, 3);
        assert_eq!(config.analyzer, AnalyzerKind::Whitespace);
        assert_eq!(config.meta_field, "field_names");
    }

    #[test]
    fn test_build_analyzer_keeps_meta_names_whole() {
        let config = IndexConfig::default();
        let analyzer = config.build_analyzer();

        let names: Vec<String> = analyzer
            .analyze_field("field_names", "title -- e-mail Author ")
            .unwrap()
            .map(|t| t.text)
            .collect();
        assert_eq!(names, vec!["title", "--", "e-mail", "Author"]);

        let words: Vec<String> = analyzer
            .analyze_field("title", "e-mail Author")
            .unwrap()
            .map(|t| t.text)
            .collect();
        assert_eq!(words, vec!["e", "mail", "author"]);
        assert_eq!(analyzer.name(), "standard");
    }

    #[test]
    fn test_from_file_rejects_bad_values() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_results": 0}}"#).unwrap();
        file.flush().unwrap();

        assert!(IndexConfig::from_file(file.path()).is_err());
    }
}
