//! Conversion facade: analysis response in, rendered output out.
//!
//! # Example
//!
//! ```no_run
//! use medreport::convert::{convert_bytes, ConvertOptions, OutputFormat};
//!
//! fn main() -> medreport::Result<()> {
//!     let json = std::fs::read("analysis.json")?;
//!     let options = ConvertOptions::new().with_format(OutputFormat::Markdown);
//!     let result = convert_bytes(&json, &options)?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```

use std::path::Path;

use crate::error::Result;
use crate::model::{AnalysisResponse, Document, Metadata};
use crate::parser::{parse_response, AnalysisParser, ParseOptions};
use crate::render::{self, ExtractionStats, JsonFormat, RenderOptions};

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Parsing options
    pub parse: ParseOptions,

    /// Rendering options
    pub render: RenderOptions,

    /// Whether to collect statistics during conversion
    pub collect_stats: bool,

    /// Output format
    pub output_format: OutputFormat,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

/// Output format for conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown format
    #[default]
    Markdown,

    /// Plain text
    Text,

    /// JSON structure
    Json,
}

impl OutputFormat {
    /// MIME type of the rendered output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "text/markdown",
            OutputFormat::Text => "text/plain",
            OutputFormat::Json => "application/json",
        }
    }

    /// Parse a format name ("markdown", "md", "text", "txt", "json").
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Some(OutputFormat::Markdown),
            "text" | "txt" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Converted content
    pub content: String,

    /// Source document metadata
    pub metadata: Metadata,

    /// Extraction statistics (if collected)
    pub stats: Option<ExtractionStats>,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Create a new conversion result.
    pub fn new(content: String, metadata: Metadata) -> Self {
        Self {
            content,
            metadata,
            stats: None,
            mime_type: OutputFormat::Markdown.mime_type(),
        }
    }

    /// Set extraction statistics.
    pub fn with_stats(mut self, stats: ExtractionStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Set MIME type.
    pub fn with_mime_type(mut self, mime_type: &'static str) -> Self {
        self.mime_type = mime_type;
        self
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Convert an already-decoded analysis response.
pub fn convert_response(response: &AnalysisResponse, options: &ConvertOptions) -> Result<ConvertResult> {
    convert_document(&parse_response(response, &options.parse), options)
}

/// Convert analysis JSON bytes.
pub fn convert_bytes(data: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
    let parser = AnalysisParser::from_bytes_with_options(data, options.parse.clone())?;
    convert_document(&parser.parse(), options)
}

/// Convert an analysis JSON file.
pub fn convert_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> Result<ConvertResult> {
    let parser = AnalysisParser::open_with_options(path, options.parse.clone())?;
    convert_document(&parser.parse(), options)
}

/// Render a parsed document in the requested format.
pub fn convert_document(doc: &Document, options: &ConvertOptions) -> Result<ConvertResult> {
    let format = options.output_format;
    let mut stats = None;

    let content = match format {
        OutputFormat::Markdown if options.collect_stats => {
            let rendered = render::to_markdown_with_stats(doc, &options.render)?;
            stats = Some(rendered.stats);
            rendered.content
        }
        OutputFormat::Markdown => render::to_markdown(doc, &options.render)?,
        OutputFormat::Text => render::to_text(doc)?,
        OutputFormat::Json => render::to_json(doc, JsonFormat::Pretty)?,
    };

    if options.collect_stats && stats.is_none() {
        let mut text_stats = ExtractionStats::new();
        text_stats.count_text(&content);
        stats = Some(text_stats);
    }

    let mut result = ConvertResult::new(content, doc.metadata.clone()).with_mime_type(format.mime_type());
    if let Some(stats) = stats {
        result = result.with_stats(stats);
    }
    Ok(result)
}
