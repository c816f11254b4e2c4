//! Converters that turn files into documents.

use std::path::Path;

use crate::document::document::Document;
use crate::error::Result;

pub mod jsonl;

/// Trait for converting a file into a stream of documents.
pub trait DocumentConverter {
    /// The iterator type that yields documents.
    type Iter: Iterator<Item = Result<Document>>;

    /// Convert a file into an iterator of Documents.
    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Self::Iter>;
}
