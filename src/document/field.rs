//! Field definitions for documents.

use serde::{Deserialize, Serialize};

/// How a field is handled by the index writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    /// Analyze the value and add its tokens to the inverted index.
    pub indexed: bool,
    /// Keep the original value so searches can return it.
    pub stored: bool,
}

impl FieldOptions {
    /// Indexed and stored: a searchable text field whose value is returned with hits.
    pub const TEXT: FieldOptions = FieldOptions {
        indexed: true,
        stored: true,
    };

    /// Stored only: returned with hits but never matched by queries.
    pub const STORED: FieldOptions = FieldOptions {
        indexed: false,
        stored: true,
    };
}

impl Default for FieldOptions {
    fn default() -> Self {
        FieldOptions::TEXT
    }
}

/// A named text value on a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// The field name.
    pub name: String,
    /// The raw text value.
    pub value: String,
    /// Indexing options.
    #[serde(default)]
    pub options: FieldOptions,
}

impl Field {
    /// Create an indexed, stored text field.
    pub fn text<S: Into<String>, T: Into<String>>(name: S, value: T) -> Self {
        Field {
            name: name.into(),
            value: value.into(),
            options: FieldOptions::TEXT,
        }
    }

    /// Create a field with explicit options.
    pub fn with_options<S: Into<String>, T: Into<String>>(
        name: S,
        value: T,
        options: FieldOptions,
    ) -> Self {
        Field {
            name: name.into(),
            value: value.into(),
            options,
        }
    }

    /// Whether the field's tokens go into the inverted index.
    pub fn is_indexed(&self) -> bool {
        self.options.indexed
    }

    /// Whether the field's value is kept for retrieval.
    pub fn is_stored(&self) -> bool {
        self.options.stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_defaults() {
        let field = Field::text("title", "First Title");
        assert_eq!(field.name, "title");
        assert!(field.is_indexed());
        assert!(field.is_stored());
    }

    #[test]
    fn test_stored_only_field() {
        let field = Field::with_options("raw", "blob", FieldOptions::STORED);
        assert!(!field.is_indexed());
        assert!(field.is_stored());
    }
}
