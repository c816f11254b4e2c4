//! Text analysis: tokenizers, token filters, and the analyzers that chain them.
//!
//! Field values and query terms go through the same [`analyzer::Analyzer`], so
//! a term typed in a query matches the token produced at indexing time.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
