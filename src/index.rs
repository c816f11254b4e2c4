//! The transient in-memory inverted index.
//!
//! A [`ram::RamIndex`] is an explicit handle: callers open it, take the single
//! [`writer::IndexWriter`], add documents, close the writer, and then read
//! through [`reader::IndexReader`] snapshots. Nothing is global and nothing
//! outlives the process.
//!
//! ```
//! use fieldprobe::document::document::Document;
//! use fieldprobe::index::config::IndexConfig;
//! use fieldprobe::index::ram::RamIndex;
//!
//! let index = RamIndex::create(IndexConfig::default()).unwrap();
//! let mut writer = index.writer().unwrap();
//! writer
//!     .add_document(Document::builder().add_text("title", "First Title").build())
//!     .unwrap();
//! writer.close().unwrap();
//!
//! let reader = index.reader().unwrap();
//! assert_eq!(reader.max_doc(), 1);
//! assert_eq!(reader.doc_freq("title", "first"), 1);
//! ```

pub mod config;
pub mod ram;
pub mod reader;
pub mod segment;
pub mod writer;

/// Identifier of a document inside one index, assigned in insertion order.
pub type DocId = u32;
