//! Markdown rendering for reconstructed documents.
//!
//! Output is assembled as a list of lines joined with `\n`. Section headings
//! carry their own trailing newline, which yields the blank line after each
//! heading. A Markdown table needs a header, so tables whose first row is
//! blank keep their numbered heading but render no rows.

use crate::error::Result;
use crate::model::{Document, FormField, Table};

use super::{ExtractionStats, RenderOptions, RenderResult};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let mut options = options.clone();
    options.collect_stats = true;
    let renderer = MarkdownRenderer::new(options);
    renderer.render_with_stats(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: ExtractionStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: ExtractionStats::new(),
        }
    }

    /// Render a document to Markdown.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        Ok(self.render_internal(doc))
    }

    /// Render a document to Markdown with extraction statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let content = self.render_internal(doc);
        self.stats.count_text(&content);

        Ok(RenderResult::new(content, doc.metadata.clone(), self.stats))
    }

    fn render_internal(&mut self, doc: &Document) -> String {
        let mut lines = vec![format!("# {}\n", self.options.title)];

        let fields: Vec<&FormField> = if self.options.include_forms {
            doc.form_fields
                .iter()
                .filter(|f| self.options.page_selection.includes_opt(f.page))
                .collect()
        } else {
            Vec::new()
        };
        if !fields.is_empty() {
            self.render_form_fields(&mut lines, &fields);
        }

        let tables: Vec<&Table> = if self.options.include_tables {
            doc.tables
                .iter()
                .filter(|t| self.options.page_selection.includes_opt(t.page))
                .collect()
        } else {
            Vec::new()
        };
        if !tables.is_empty() {
            lines.push("## Tables\n".to_string());
            for (i, table) in tables.iter().enumerate() {
                lines.push(format!("### Table {}\n", i + 1));
                self.render_table(&mut lines, table);
            }
        }

        lines.join("\n")
    }

    fn render_form_fields(&mut self, lines: &mut Vec<String>, fields: &[&FormField]) {
        lines.push("## Form Data\n".to_string());
        for field in fields {
            if self.options.collect_stats {
                self.stats.add_form_field();
            }
            lines.push(format!(
                "- **{}:** {}",
                self.text(&field.key),
                self.text(&field.value)
            ));
        }
        lines.push("\n".to_string());
    }

    fn render_table(&mut self, lines: &mut Vec<String>, table: &Table) {
        if !table.has_header() {
            if self.options.collect_stats {
                self.stats.add_skipped_table();
            }
            return;
        }
        if self.options.collect_stats {
            self.stats.add_table(table.row_count());
        }

        let Some(header) = table.header() else {
            return;
        };
        lines.push(self.table_row(header));
        lines.push(format!("| {} |", vec!["---"; header.len()].join(" | ")));
        for row in table.body() {
            lines.push(self.table_row(row));
        }
        lines.push("\n".to_string());
    }

    fn table_row(&self, cells: &[String]) -> String {
        let cells: Vec<String> = cells.iter().map(|c| self.text(c)).collect();
        format!("| {} |", cells.join(" | "))
    }

    fn text(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

/// Escape characters that would break a pipe table or a bold key.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '|') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
