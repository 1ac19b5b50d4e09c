//! Rendering result with metadata and statistics.

use crate::model::Metadata;
use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (Markdown, text, etc.)
    pub content: String,

    /// Document metadata (copied from source document)
    pub metadata: Metadata,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, metadata: Metadata, stats: ExtractionStats) -> Self {
        Self {
            content,
            metadata,
            stats,
        }
    }

    /// Create a simple result with just content.
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            metadata: Metadata::default(),
            stats: ExtractionStats::default(),
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected during rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Number of form fields rendered
    pub form_field_count: u32,

    /// Number of tables seen
    pub table_count: u32,

    /// Tables emitted as Markdown tables
    pub rendered_table_count: u32,

    /// Tables skipped for having no header row
    pub skipped_table_count: u32,

    /// Table rows emitted, headers included
    pub row_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment form field count.
    pub fn add_form_field(&mut self) {
        self.form_field_count += 1;
    }

    /// Record a rendered table with the given number of rows.
    pub fn add_table(&mut self, rows: usize) {
        self.table_count += 1;
        self.rendered_table_count += 1;
        self.row_count += rows as u32;
    }

    /// Record a table that was not rendered.
    pub fn add_skipped_table(&mut self) {
        self.table_count += 1;
        self.skipped_table_count += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.form_field_count += other.form_field_count;
        self.table_count += other.table_count;
        self.rendered_table_count += other.rendered_table_count;
        self.skipped_table_count += other.skipped_table_count;
        self.row_count += other.row_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
