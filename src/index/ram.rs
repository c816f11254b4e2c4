//! The index handle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::error::{FieldprobeError, Result};
use crate::index::config::IndexConfig;
use crate::index::reader::IndexReader;
use crate::index::segment::Segment;
use crate::index::writer::IndexWriter;

/// Statistics about an index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of committed documents.
    pub doc_count: u64,
    /// Distinct terms summed over all fields.
    pub term_count: u64,
    /// Number of indexed fields.
    pub field_count: u64,
    /// Number of commits so far.
    pub generation: u64,
    /// Time of the last commit.
    pub last_commit: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub(crate) struct IndexState {
    pub(crate) committed: Arc<Segment>,
    pub(crate) generation: u64,
    pub(crate) last_commit: Option<DateTime<Utc>>,
    pub(crate) writer_open: bool,
    pub(crate) closed: bool,
}

pub(crate) struct IndexShared {
    pub(crate) config: IndexConfig,
    pub(crate) analyzer: Arc<dyn Analyzer>,
    pub(crate) state: RwLock<IndexState>,
}

impl IndexShared {
    pub(crate) fn check_open(&self) -> Result<()> {
        if self.state.read().closed {
            Err(FieldprobeError::index("Index is closed"))
        } else {
            Ok(())
        }
    }
}

/// A transient in-memory index.
///
/// Cloning the handle shares the same index. At most one [`IndexWriter`] is
/// open at a time; readers see the state of the last commit and stay valid
/// after the index is closed.
#[derive(Clone)]
pub struct RamIndex {
    shared: Arc<IndexShared>,
}

impl RamIndex {
    /// Create an empty index.
    pub fn create(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        let analyzer = config.build_analyzer();
        debug!(
            "Creating in-memory index (analyzer: {}, meta field: {})",
            analyzer.name(),
            config.meta_field
        );

        Ok(RamIndex {
            shared: Arc::new(IndexShared {
                config,
                analyzer,
                state: RwLock::new(IndexState {
                    committed: Arc::new(Segment::new()),
                    generation: 0,
                    last_commit: None,
                    writer_open: false,
                    closed: false,
                }),
            }),
        })
    }

    /// Open the writer, taking the write lock.
    pub fn writer(&self) -> Result<IndexWriter> {
        let mut state = self.shared.state.write();
        if state.closed {
            return Err(FieldprobeError::index("Index is closed"));
        }
        if state.writer_open {
            return Err(FieldprobeError::index(
                "Another writer is already open on this index",
            ));
        }
        state.writer_open = true;
        let base = Segment::clone(&state.committed);
        drop(state);

        Ok(IndexWriter::new(Arc::clone(&self.shared), base))
    }

    /// Open a reader on the last committed state.
    pub fn reader(&self) -> Result<IndexReader> {
        let state = self.shared.state.read();
        if state.closed {
            return Err(FieldprobeError::index("Index is closed"));
        }

        Ok(IndexReader::new(
            Arc::clone(&state.committed),
            Arc::clone(&self.shared.analyzer),
            state.generation,
        ))
    }

    /// Release the index. Open readers keep their snapshot; new writers and
    /// readers are refused.
    pub fn close(&self) -> Result<()> {
        let mut state = self.shared.state.write();
        if state.writer_open {
            return Err(FieldprobeError::index(
                "Cannot close the index while a writer is open",
            ));
        }
        if !state.closed {
            state.closed = true;
            info!("Closed in-memory index after {} commit(s)", state.generation);
        }
        Ok(())
    }

    /// Check if the index is closed.
    pub fn is_closed(&self) -> bool {
        self.shared.state.read().closed
    }

    /// The configuration this index was created with.
    pub fn config(&self) -> &IndexConfig {
        &self.shared.config
    }

    /// The analyzer used for every field.
    pub fn analyzer(&self) -> Arc<dyn Analyzer> {
        Arc::clone(&self.shared.analyzer)
    }

    /// Get index statistics.
    pub fn stats(&self) -> IndexStats {
        let state = self.shared.state.read();
        IndexStats {
            doc_count: u64::from(state.committed.max_doc()),
            term_count: state.committed.term_count() as u64,
            field_count: state.committed.field_names().len() as u64,
            generation: state.generation,
            last_commit: state.last_commit,
        }
    }
}

impl std::fmt::Debug for RamIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.read();
        f.debug_struct("RamIndex")
            .field("analyzer", &self.shared.analyzer.name())
            .field("doc_count", &state.committed.max_doc())
            .field("generation", &state.generation)
            .field("closed", &state.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document::Document;

    fn doc(title: &str) -> Document {
        Document::builder().add_text("title", title).build()
    }

    #[test]
    fn test_reader_sees_only_commits() {
        let index = RamIndex::create(IndexConfig::default()).unwrap();
        let mut writer = index.writer().unwrap();
        writer.add_document(doc("First Title")).unwrap();

        assert_eq!(index.reader().unwrap().max_doc(), 0);

        writer.close().unwrap();
        let reader = index.reader().unwrap();
        assert_eq!(reader.max_doc(), 1);
        assert_eq!(reader.generation(), 1);
    }

    #[test]
    fn test_single_writer() {
        let index = RamIndex::create(IndexConfig::default()).unwrap();
        let writer = index.writer().unwrap();
        assert!(matches!(index.writer(), Err(FieldprobeError::Index(_))));

        drop(writer);
        assert!(index.writer().is_ok());
    }

    #[test]
    fn test_close_lifecycle() {
        let index = RamIndex::create(IndexConfig::default()).unwrap();
        let mut writer = index.writer().unwrap();
        writer.add_document(doc("kept")).unwrap();
        assert!(index.close().is_err());
        writer.close().unwrap();

        let reader = index.reader().unwrap();
        index.close().unwrap();
        assert!(index.is_closed());
        assert!(index.reader().is_err());
        assert!(index.writer().is_err());
        assert_eq!(reader.max_doc(), 1);

        // Closing twice is harmless.
        index.close().unwrap();
    }

    #[test]
    fn test_stats() {
        let index = RamIndex::create(IndexConfig::default()).unwrap();
        assert_eq!(index.stats().generation, 0);
        assert!(index.stats().last_commit.is_none());

        let mut writer = index.writer().unwrap();
        writer.add_document(doc("First Title")).unwrap();
        writer.add_document(doc("Second Title")).unwrap();
        writer.close().unwrap();

        let stats = index.stats();
        assert_eq!(stats.doc_count, 2);
        assert_eq!(stats.term_count, 3);
        assert_eq!(stats.field_count, 1);
        assert_eq!(stats.generation, 1);
        assert!(stats.last_commit.is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = IndexConfig {
            max_results: 0,
            ..Default::default()
        };
        assert!(RamIndex::create(config).is_err());
    }
}
