//! Error types for the Fieldprobe library.
//!
//! All errors are represented by the [`FieldprobeError`] enum. Query errors
//! (malformed syntax, disallowed wildcards) are recoverable: a caller can report
//! them and carry on with the next query. Index and I/O errors are not.
//!
//! # Examples
//!
//! ```
//! use fieldprobe::error::{FieldprobeError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FieldprobeError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Fieldprobe operations.
#[derive(Error, Debug)]
pub enum FieldprobeError {
    /// I/O errors (reading document files, writing output)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Index-related errors (writer lock, closed index, unknown document)
    #[error("Index error: {0}")]
    Index(String),

    /// Analysis-related errors (tokenization, filtering)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Query-related errors (parsing, invalid wildcard patterns)
    #[error("Query error: {0}")]
    Query(String),

    /// Field-related errors (reserved or malformed field names)
    #[error("Field error: {0}")]
    Field(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with FieldprobeError.
pub type Result<T> = std::result::Result<T, FieldprobeError>;

impl FieldprobeError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        FieldprobeError::Index(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        FieldprobeError::Analysis(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        FieldprobeError::Query(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        FieldprobeError::Query(msg.into()) // Parse errors are treated as query errors
    }

    /// Create a new field error.
    pub fn field<S: Into<String>>(msg: S) -> Self {
        FieldprobeError::Field(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FieldprobeError::Other(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        FieldprobeError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        FieldprobeError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error only invalidates the current query.
    pub fn is_query_error(&self) -> bool {
        matches!(self, FieldprobeError::Query(_))
    }
}
