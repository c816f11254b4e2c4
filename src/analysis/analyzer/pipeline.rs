//! Pipeline analyzer: one tokenizer followed by an ordered list of filters.

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A configurable analyzer that combines a tokenizer with a chain of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the name of this analyzer.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = name;
        self
    }

    /// Get the configured name.
    pub fn pipeline_name(&self) -> &str {
        &self.name
    }

    fn apply_filters(&self, mut tokens: TokenStream) -> Result<TokenStream> {
        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }
        Ok(tokens)
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let tokens = self.tokenizer.tokenize(text)?;
        self.apply_filters(tokens)
    }

    fn normalize(&self, text: &str) -> Result<String> {
        let single: TokenStream = Box::new(std::iter::once(Token::new(text, 0)));
        Ok(self
            .apply_filters(single)?
            .next()
            .map(|token| token.text)
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .field("name", &self.name)
            .finish()
    }
}
