//! Documents: ordered collections of named text fields.
//!
//! - [`document::Document`] - the record handed to the index writer
//! - [`field::Field`] - a single named value with its indexing options
//! - [`converter`] - file formats that produce documents (JSONL)

pub mod converter;
#[allow(clippy::module_inception)]
pub mod document;
pub mod field;
