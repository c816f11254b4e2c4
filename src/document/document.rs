//! Document structure for schema-less indexing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::field::{Field, FieldOptions};
use crate::error::{FieldprobeError, Result};

/// A document represents a single item to be indexed.
///
/// Fields keep their insertion order and names may repeat; a repeated name is a
/// multi-valued field. Analyzers are configured on the index, not per document.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Document {
    fields: Vec<Field>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document { fields: Vec::new() }
    }

    /// Append an indexed, stored text field.
    pub fn add_text<S: Into<String>, T: Into<String>>(&mut self, name: S, value: T) {
        self.fields.push(Field::text(name, value));
    }

    /// Append a field.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Get the first value stored under a field name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Get every value stored under a field name, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.name == name)
            .map(|f| f.value.as_str())
            .collect()
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Field names in insertion order, repeated names included.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// All fields in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create a builder for constructing documents.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Build a document from a JSON object.
    ///
    /// Keys keep their source order. Strings are taken verbatim, other scalars
    /// use their JSON text, arrays become repeated fields, and nested objects
    /// are stored as their JSON text. `null` values are skipped.
    pub fn from_json(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            FieldprobeError::field(format!("expected a JSON object, found {value}"))
        })?;

        let mut doc = Document::new();
        for (key, val) in map {
            match val {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items.iter().filter(|v| !v.is_null()) {
                        doc.add_text(key.as_str(), json_text(item));
                    }
                }
                other => doc.add_text(key.as_str(), json_text(other)),
            }
        }

        Ok(doc)
    }

    /// The stored fields as a JSON object; repeated names become arrays.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for field in self.fields.iter().filter(|f| f.is_stored()) {
            let value = Value::String(field.value.clone());
            match map.get_mut(&field.name) {
                Some(Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(field.name.clone(), value);
                }
            }
        }
        Value::Object(map)
    }
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        DocumentBuilder {
            document: Document::new(),
        }
    }

    /// Add an indexed, stored text field.
    pub fn add_text<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.document.add_text(name, value);
        self
    }

    /// Add a stored-only field.
    pub fn add_stored<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.document
            .add_field(Field::with_options(name, value, FieldOptions::STORED));
        self
    }

    /// Add a field with explicit options.
    pub fn add_field(mut self, field: Field) -> Self {
        self.document.add_field(field);
        self
    }

    /// Build the final document.
    pub fn build(self) -> Document {
        self.document
    }
}
