//! Key/value form fields.

use serde::{Deserialize, Serialize};

/// A resolved key/value pair from a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Key text
    pub key: String,

    /// Value text (empty when the key has no paired value)
    pub value: String,

    /// Page the key was found on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl FormField {
    /// Create a new form field.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            page: None,
        }
    }

    /// Set the page and return self.
    pub fn on_page(mut self, page: Option<u32>) -> Self {
        self.page = page;
        self
    }

    /// Check whether the key was left unanswered.
    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
    }
}
