//! Analysis-response parser: block graph in, [`Document`] out.

use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::model::{AnalysisResponse, BlockType, Document, Metadata};

use super::options::ParseOptions;
use super::{reconstruct_table_bounded, resolve_form_fields, BlockIndex};

/// Parser over one document-analysis response.
pub struct AnalysisParser {
    response: AnalysisResponse,
    options: ParseOptions,
}

impl AnalysisParser {
    /// Wrap an already-decoded response.
    pub fn new(response: AnalysisResponse) -> Self {
        Self::with_options(response, ParseOptions::default())
    }

    /// Wrap an already-decoded response with custom options.
    pub fn with_options(response: AnalysisResponse, options: ParseOptions) -> Self {
        Self { response, options }
    }

    /// Open an analysis JSON file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open an analysis JSON file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Decode analysis JSON from a string.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with_options(json, ParseOptions::default())
    }

    /// Decode analysis JSON from a string with custom options.
    pub fn from_json_with_options(json: &str, options: ParseOptions) -> Result<Self> {
        let response = serde_json::from_str(json)?;
        Ok(Self::with_options(response, options))
    }

    /// Decode analysis JSON from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Decode analysis JSON from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let response = serde_json::from_slice(data)?;
        Ok(Self::with_options(response, options))
    }

    /// Decode analysis JSON from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Decode analysis JSON from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(reader: R, options: ParseOptions) -> Result<Self> {
        let response = serde_json::from_reader(reader)?;
        Ok(Self::with_options(response, options))
    }

    /// The underlying response.
    pub fn response(&self) -> &AnalysisResponse {
        &self.response
    }

    /// Rebuild forms, tables and lines from the block graph.
    ///
    /// Never fails: dangling edges and malformed cells are skipped.
    pub fn parse(&self) -> Document {
        parse_response(&self.response, &self.options)
    }
}

/// Rebuild a borrowed response without taking ownership of its blocks.
pub fn parse_response(response: &AnalysisResponse, options: &ParseOptions) -> Document {
    let blocks = &response.blocks;
    let index = BlockIndex::build(blocks);
    let mut document = Document::new();
    document.metadata = metadata(response);

    if options.extract_forms {
        document.form_fields = resolve_form_fields(blocks, &index);
    }

    if options.extract_tables {
        document.tables = blocks
            .iter()
            .filter(|b| b.block_type == BlockType::Table)
            .map(|table| reconstruct_table_bounded(table, &index, options.max_table_cells))
            .collect();
    }

    if options.extract_lines {
        document.lines = blocks
            .iter()
            .filter(|b| b.block_type == BlockType::Line)
            .filter_map(|b| b.text.clone())
            .collect();
    }

    debug!(
        "parsed {} blocks into {} form fields, {} tables, {} lines",
        blocks.len(),
        document.form_fields.len(),
        document.tables.len(),
        document.lines.len()
    );
    document
}

fn metadata(response: &AnalysisResponse) -> Metadata {
    let blocks = &response.blocks;
    Metadata {
        page_count: response.page_count(),
        block_count: blocks.len(),
        word_count: blocks.iter().filter(|b| b.block_type == BlockType::Word).count(),
        key_count: blocks.iter().filter(|b| b.is_form_key()).count(),
        table_count: blocks.iter().filter(|b| b.block_type == BlockType::Table).count(),
    }
}
