//! Document-level types.

use super::{FormField, Table};
use serde::{Deserialize, Serialize};

/// Structured content recovered from one analysis response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (page and block counts)
    pub metadata: Metadata,

    /// Key/value pairs, in the order their keys appear
    pub form_fields: Vec<FormField>,

    /// Tables, in the order they appear (including ones without a header)
    pub tables: Vec<Table>,

    /// Text of LINE blocks, in reading order
    pub lines: Vec<String>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a form field.
    pub fn add_form_field(&mut self, field: FormField) {
        self.form_fields.push(field);
    }

    /// Add a table.
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Look up the value of the first form field with the given key.
    ///
    /// Keys are compared case-insensitively, ignoring a trailing colon.
    pub fn form_value(&self, key: &str) -> Option<&str> {
        let wanted = normalize_key(key);
        self.form_fields
            .iter()
            .find(|f| normalize_key(&f.key) == wanted)
            .map(|f| f.value.as_str())
    }

    /// Check if nothing was recovered.
    pub fn is_empty(&self) -> bool {
        self.form_fields.is_empty() && self.tables.is_empty() && self.lines.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.lines.join("\n")
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().trim_end_matches(':').trim_end().to_lowercase()
}

/// Metadata about the analysed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Number of pages analysed
    pub page_count: u32,

    /// Total number of blocks in the response
    pub block_count: usize,

    /// Number of WORD blocks
    pub word_count: usize,

    /// Number of KEY_VALUE_SET blocks with the KEY role
    pub key_count: usize,

    /// Number of TABLE blocks
    pub table_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_value_lookup() {
        let mut doc = Document::new();
        doc.add_form_field(FormField::new("Patient Name:", "Jane Roe"));
        doc.add_form_field(FormField::new("DOB", "1970-01-01"));

        assert_eq!(doc.form_value("patient name"), Some("Jane Roe"));
        assert_eq!(doc.form_value("DOB:"), Some("1970-01-01"));
        assert_eq!(doc.form_value("MRN"), None);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.plain_text(), "");
    }
}
