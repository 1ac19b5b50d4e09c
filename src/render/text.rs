//! Plain text rendering for reconstructed documents.

use crate::error::Result;
use crate::model::Document;

/// Convert a document to plain text.
///
/// Uses LINE text in reading order. When the response carried no lines,
/// falls back to `key: value` pairs and tab-separated table rows.
pub fn to_text(doc: &Document) -> Result<String> {
    if !doc.lines.is_empty() {
        return Ok(doc.plain_text());
    }

    let mut sections = Vec::new();
    if !doc.form_fields.is_empty() {
        let fields: Vec<String> = doc
            .form_fields
            .iter()
            .map(|f| format!("{}: {}", f.key.trim_end_matches(':'), f.value))
            .collect();
        sections.push(fields.join("\n"));
    }
    sections.extend(
        doc.tables
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| t.plain_text()),
    );

    Ok(sections.join("\n\n"))
}
