//! # medreport
//!
//! Rebuilds tables and key/value form fields from document-analysis block
//! graphs and renders them as Markdown, then turns that Markdown into
//! patient-facing narratives through a text-completion service.
//!
//! ## Quick Start
//!
//! ```no_run
//! use medreport::{parse_file, render};
//!
//! fn main() -> medreport::Result<()> {
//!     // Parse a saved analysis response
//!     let doc = parse_file("analysis.json")?;
//!
//!     // Convert to Markdown
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&doc, &options)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Table reconstruction**: sparse CELL blocks become dense row-major grids
//! - **Form resolution**: KEY blocks are paired with their VALUE text
//! - **Multiple output formats**: Markdown, plain text, JSON
//! - **Synthesis**: clinical summary, biomarker risk analysis and follow-up chat
//! - **Request handling**: API Gateway shaped handlers with CORS

pub mod analyzer;
pub mod convert;
pub mod detect;
pub mod error;
pub mod handler;
pub mod model;
pub mod parser;
pub mod render;
pub mod synthesis;

// Re-export commonly used types
pub use analyzer::DocumentAnalyzer;
#[cfg(feature = "remote")]
pub use analyzer::HttpAnalyzer;
pub use convert::{ConvertOptions, ConvertResult, OutputFormat};
pub use detect::{decode_base64_body, detect_format_from_bytes, DocumentFormat};
pub use error::{Error, Result};
pub use model::{AnalysisResponse, Block, BlockType, Document, FormField, Metadata, Table};
pub use parser::{AnalysisParser, ParseOptions};
pub use render::{JsonFormat, PageSelection, RenderOptions};
#[cfg(feature = "remote")]
pub use synthesis::{GeminiClient, GeminiConfig};
pub use synthesis::{AnalysisReport, AnalysisRequest, CompletionService, PatientDetails, Synthesizer};

use std::io::Read;
use std::path::Path;

/// Parse an analysis JSON file and return a structured document.
///
/// # Example
///
/// ```no_run
/// use medreport::parse_file;
///
/// let doc = parse_file("analysis.json").unwrap();
/// println!("Tables: {}", doc.tables.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse an analysis JSON file with custom options.
///
/// # Example
///
/// ```no_run
/// use medreport::{parse_file_with_options, ParseOptions};
///
/// let doc = parse_file_with_options("analysis.json", ParseOptions::new().tables_only()).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let parser = AnalysisParser::open_with_options(path, options)?;
    Ok(parser.parse())
}

/// Parse analysis JSON from a string.
pub fn parse_str(json: &str) -> Result<Document> {
    parse_str_with_options(json, ParseOptions::default())
}

/// Parse analysis JSON from a string with custom options.
pub fn parse_str_with_options(json: &str, options: ParseOptions) -> Result<Document> {
    let parser = AnalysisParser::from_json_with_options(json, options)?;
    Ok(parser.parse())
}

/// Parse analysis JSON from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    parse_bytes_with_options(data, ParseOptions::default())
}

/// Parse analysis JSON from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    let parser = AnalysisParser::from_bytes_with_options(data, options)?;
    Ok(parser.parse())
}

/// Parse analysis JSON from a reader.
///
/// # Example
///
/// ```no_run
/// use medreport::parse_reader;
/// use std::fs::File;
///
/// let file = File::open("analysis.json").unwrap();
/// let doc = parse_reader(file).unwrap();
/// ```
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    parse_reader_with_options(reader, ParseOptions::default())
}

/// Parse analysis JSON from a reader with custom options.
pub fn parse_reader_with_options<R: Read>(reader: R, options: ParseOptions) -> Result<Document> {
    let parser = AnalysisParser::from_reader_with_options(reader, options)?;
    Ok(parser.parse())
}

/// Convert an analysis JSON file to Markdown.
///
/// # Example
///
/// ```no_run
/// use medreport::to_markdown;
///
/// let markdown = to_markdown("analysis.json").unwrap();
/// std::fs::write("extract.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_markdown(&doc, &RenderOptions::default())
}

/// Convert an analysis JSON file to Markdown with custom options.
pub fn to_markdown_with_options<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_markdown(&doc, options)
}

/// Builder for parsing and rendering analysis responses.
///
/// # Example
///
/// ```no_run
/// use medreport::Extractor;
///
/// let markdown = Extractor::new()
///     .with_title("Lab Report")
///     .tables_only()
///     .parse("analysis.json")?
///     .to_markdown()?;
/// # Ok::<(), medreport::Error>(())
/// ```
pub struct Extractor {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Extractor {
    /// Create a new extractor with default options.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Resolve form fields only.
    pub fn forms_only(mut self) -> Self {
        self.parse_options = self.parse_options.forms_only();
        self
    }

    /// Reconstruct tables only.
    pub fn tables_only(mut self) -> Self {
        self.parse_options = self.parse_options.tables_only();
        self
    }

    /// Set the table size guard.
    pub fn with_max_table_cells(mut self, cells: usize) -> Self {
        self.parse_options = self.parse_options.with_max_table_cells(cells);
        self
    }

    /// Set the Markdown heading.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_title(title);
        self
    }

    /// Escape `|` and `\` in rendered text.
    pub fn with_escaping(mut self) -> Self {
        self.render_options = self.render_options.with_escaping(true);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.render_options = self.render_options.with_pages(pages);
        self
    }

    /// Parse an analysis JSON file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<Extraction> {
        let parser = AnalysisParser::open_with_options(path, self.parse_options)?;
        Ok(Extraction {
            document: parser.parse(),
            render_options: self.render_options,
        })
    }

    /// Parse analysis JSON from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<Extraction> {
        let parser = AnalysisParser::from_bytes_with_options(data, self.parse_options)?;
        Ok(Extraction {
            document: parser.parse(),
            render_options: self.render_options,
        })
    }

    /// Parse an already-decoded response.
    pub fn parse_response(self, response: AnalysisResponse) -> Extraction {
        let parser = AnalysisParser::with_options(response, self.parse_options);
        Extraction {
            document: parser.parse(),
            render_options: self.render_options,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed document paired with its render options.
pub struct Extraction {
    /// The parsed document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl Extraction {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "DocumentMetadata": {"Pages": 1},
        "Blocks": [
            {"Id": "t", "BlockType": "TABLE", "Page": 1,
             "Relationships": [{"Type": "CHILD", "Ids": ["c1", "c2"]}]},
            {"Id": "c1", "BlockType": "CELL", "RowIndex": 1, "ColumnIndex": 1,
             "Relationships": [{"Type": "CHILD", "Ids": ["w1"]}]},
            {"Id": "c2", "BlockType": "CELL", "RowIndex": 2, "ColumnIndex": 1,
             "Relationships": [{"Type": "CHILD", "Ids": ["w2"]}]},
            {"Id": "w1", "BlockType": "WORD", "Text": "Glucose"},
            {"Id": "w2", "BlockType": "WORD", "Text": "98"}
        ]
    }"#;

    #[test]
    fn test_extractor_builder() {
        let extractor = Extractor::new()
            .tables_only()
            .with_title("Labs")
            .with_escaping()
            .with_max_table_cells(16);

        assert!(!extractor.parse_options.extract_forms);
        assert_eq!(extractor.parse_options.max_table_cells, 16);
        assert_eq!(extractor.render_options.title, "Labs");
        assert!(extractor.render_options.escape_special_chars);
    }

    #[test]
    fn test_parse_str() {
        let doc = parse_str(SAMPLE).unwrap();
        assert_eq!(doc.metadata.page_count, 1);
        assert_eq!(doc.tables[0].rows, vec![vec!["Glucose"], vec!["98"]]);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(parse_str("not json"), Err(Error::Json(_))));
        assert!(matches!(parse_bytes(b"{}"), Err(Error::Json(_))));
    }

    #[test]
    fn test_extractor_markdown() {
        let markdown = Extractor::new()
            .with_title("Labs")
            .parse_bytes(SAMPLE.as_bytes())
            .unwrap()
            .to_markdown()
            .unwrap();

        assert_eq!(
            markdown,
            "# Labs\n\n## Tables\n\n### Table 1\n\n| Glucose |\n| --- |\n| 98 |\n\n"
        );
    }

    #[test]
    fn test_parse_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let doc = parse_file(&path).unwrap();
        assert_eq!(doc.tables.len(), 1);
        assert!(to_markdown(&path).unwrap().contains("| Glucose |"));
    }

    #[test]
    fn test_parse_file_missing() {
        assert!(matches!(
            parse_file("/nonexistent/analysis.json"),
            Err(Error::Io(_))
        ));
    }
}
