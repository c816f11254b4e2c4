//! The index writer.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};

use crate::document::document::Document;
use crate::error::{FieldprobeError, Result};
use crate::index::DocId;
use crate::index::ram::IndexShared;
use crate::index::segment::Segment;

/// Adds documents to a [`RamIndex`](crate::index::ram::RamIndex).
///
/// Documents become visible to new readers on [`commit`](Self::commit) or
/// [`close`](Self::close). Dropping a writer without closing it discards
/// uncommitted documents and releases the write lock.
pub struct IndexWriter {
    shared: Arc<IndexShared>,
    working: Segment,
    pending: u64,
    closed: bool,
}

impl IndexWriter {
    pub(crate) fn new(shared: Arc<IndexShared>, working: Segment) -> Self {
        IndexWriter {
            shared,
            working,
            pending: 0,
            closed: false,
        }
    }

    /// Analyze and buffer a document, returning the id it will have once committed.
    pub fn add_document(&mut self, doc: Document) -> Result<DocId> {
        self.check_closed()?;
        let doc_id = self
            .working
            .add_document(doc, self.shared.analyzer.as_ref())?;
        self.pending += 1;
        debug!("Buffered document {doc_id}");
        Ok(doc_id)
    }

    /// Publish buffered documents to new readers.
    pub fn commit(&mut self) -> Result<()> {
        self.check_closed()?;
        self.shared.check_open()?;

        let mut state = self.shared.state.write();
        state.committed = Arc::new(self.working.clone());
        state.generation += 1;
        state.last_commit = Some(Utc::now());
        info!(
            "Committed {} document(s), generation {} holds {} document(s)",
            self.pending,
            state.generation,
            state.committed.max_doc()
        );
        self.pending = 0;
        Ok(())
    }

    /// Discard documents added since the last commit.
    pub fn rollback(&mut self) -> Result<()> {
        self.check_closed()?;
        let state = self.shared.state.read();
        self.working = Segment::clone(&state.committed);
        debug!("Rolled back {} document(s)", self.pending);
        self.pending = 0;
        Ok(())
    }

    /// Get the number of documents added since the last commit.
    pub fn pending_docs(&self) -> u64 {
        self.pending
    }

    /// Commit and release the write lock.
    pub fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.commit()?;
            self.release();
        }
        Ok(())
    }

    /// Check if the writer is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_closed(&self) -> Result<()> {
        if self.closed {
            Err(FieldprobeError::index("Writer is closed"))
        } else {
            Ok(())
        }
    }

    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            self.shared.state.write().writer_open = false;
        }
    }
}

impl Drop for IndexWriter {
    fn drop(&mut self) {
        if !self.closed && self.pending > 0 {
            debug!("Discarding {} uncommitted document(s)", self.pending);
        }
        self.release();
    }
}

impl std::fmt::Debug for IndexWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriter")
            .field("pending", &self.pending)
            .field("max_doc", &self.working.max_doc())
            .field("closed", &self.closed)
            .finish()
    }
}
