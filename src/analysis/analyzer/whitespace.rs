//! Whitespace analyzer: splits on whitespace and keeps case.

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// An analyzer that only splits on whitespace.
#[derive(Debug, Clone)]
pub struct WhitespaceAnalyzer {
    inner: PipelineAnalyzer,
}

impl WhitespaceAnalyzer {
    /// Create a new whitespace analyzer.
    pub fn new() -> Self {
        let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .with_name("whitespace".to_string());

        WhitespaceAnalyzer { inner: analyzer }
    }
}

impl Default for WhitespaceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for WhitespaceAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn normalize(&self, text: &str) -> Result<String> {
        self.inner.normalize(text)
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_whitespace_analyzer_keeps_case() {
        let analyzer = WhitespaceAnalyzer::new();
        let tokens: Vec<Token> = analyzer.analyze("Spear wiki-Page").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "Spear");
        assert_eq!(tokens[1].text, "wiki-Page");
        assert_eq!(analyzer.normalize("Spe*").unwrap(), "Spe*");
    }
}
