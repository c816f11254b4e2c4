//! JSONL document converter: one JSON object per line.
//!
//! Blank lines are skipped. A line that is not valid JSON, or not an object,
//! yields a field error naming its 1-based line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::document::converter::DocumentConverter;
use crate::document::document::Document;
use crate::error::{FieldprobeError, Result};

/// A document converter for JSONL format.
#[derive(Debug, Clone, Default)]
pub struct JsonlDocumentConverter;

impl JsonlDocumentConverter {
    /// Create a new JSONL converter.
    pub fn new() -> Self {
        JsonlDocumentConverter
    }

    /// Parse a single JSON line into a Document.
    pub fn parse_line(&self, line: &str, line_number: usize) -> Result<Document> {
        let value: serde_json::Value = serde_json::from_str(line).map_err(|e| {
            FieldprobeError::field(format!("line {line_number}: invalid JSON: {e}"))
        })?;

        Document::from_json(&value).map_err(|e| match e {
            FieldprobeError::Field(msg) => FieldprobeError::field(format!("line {line_number}: {msg}")),
            other => other,
        })
    }
}

/// Iterator over JSONL documents.
pub struct JsonlDocumentIterator {
    reader: BufReader<File>,
    converter: JsonlDocumentConverter,
    line_number: usize,
}

impl Iterator for JsonlDocumentIterator {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            self.line_number += 1;
            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    return Some(self.converter.parse_line(trimmed, self.line_number));
                }
                Err(e) => return Some(Err(FieldprobeError::Io(e))),
            }
        }
    }
}

impl DocumentConverter for JsonlDocumentConverter {
    type Iter = JsonlDocumentIterator;

    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Self::Iter> {
        let file = File::open(path.as_ref())?;

        Ok(JsonlDocumentIterator {
            reader: BufReader::new(file),
            converter: self.clone(),
            line_number: 0,
        })
    }
}
