//! # fieldprobe
//!
//! Field existence and non-existence queries over a transient in-memory
//! full-text index.
//!
//! An inverted index answers "which documents contain this term" but has no
//! direct way to answer "which documents lack this field". fieldprobe records
//! every document's field names in a `field_names` meta field before it is
//! indexed, so both questions become ordinary queries:
//!
//! - `*` with the target field as default field: the field has an indexed term
//! - `+author` over `field_names`: the field is present
//! - `* AND -origin` over `field_names`: the field is absent
//!
//! ```
//! use fieldprobe::prelude::*;
//!
//! let index = RamIndex::create(IndexConfig::default())?;
//! let mut writer = index.writer()?;
//! for (title, extra) in [("First Title", "source"), ("Second Title", "origin")] {
//!     let mut doc = Document::builder()
//!         .add_text("title", title)
//!         .add_text(extra, "x")
//!         .build();
//!     attach_field_names(&mut doc)?;
//!     writer.add_document(doc)?;
//! }
//! writer.close()?;
//!
//! let searcher = IndexSearcher::new(index.reader()?);
//! let query = ExistenceQuery::missing(FIELD_NAMES, "origin").parse(index.analyzer())?;
//! let top_docs = searcher.search(query.as_ref(), 10)?;
//!
//! assert_eq!(top_docs.total_hits, 1);
//! assert_eq!(searcher.doc(top_docs.hits[0].doc_id)?.get("title"), Some("First Title"));
//! # Ok::<(), fieldprobe::error::FieldprobeError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod demo;
pub mod document;
pub mod error;
pub mod index;
pub mod meta;
pub mod query;
pub mod search;

pub mod prelude {
    pub use crate::document::document::Document;
    pub use crate::error::{FieldprobeError, Result};
    pub use crate::index::config::IndexConfig;
    pub use crate::index::ram::RamIndex;
    pub use crate::meta::{ExistenceQuery, FIELD_NAMES, attach_field_names, synthesize};
    pub use crate::query::{Query, QueryParser};
    pub use crate::search::IndexSearcher;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
