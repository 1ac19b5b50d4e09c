//! Analysis blocks: the flat, positional graph returned by the
//! document-analysis service.
//!
//! Field names follow the service's wire format (PascalCase JSON keys), so an
//! `AnalyzeDocument` response deserializes directly into [`AnalysisResponse`].

use serde::{Deserialize, Serialize};

/// A complete document-analysis response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalysisResponse {
    /// Document-level metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_metadata: Option<DocumentMetadata>,

    /// All blocks of the document, in service order
    pub blocks: Vec<Block>,
}

impl AnalysisResponse {
    /// Create a response from a list of blocks.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            document_metadata: None,
            blocks,
        }
    }

    /// Set the page count reported by the service.
    pub fn with_pages(mut self, pages: u32) -> Self {
        self.document_metadata = Some(DocumentMetadata { pages });
        self
    }

    /// Number of pages, falling back to the highest page seen on a block.
    pub fn page_count(&self) -> u32 {
        if let Some(meta) = &self.document_metadata {
            return meta.pages;
        }
        self.blocks.iter().filter_map(|b| b.page).max().unwrap_or(0)
    }
}

/// `DocumentMetadata` section of a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentMetadata {
    /// Number of pages analysed
    #[serde(default)]
    pub pages: u32,
}

/// A single positional fragment of the analysed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Identifier, unique within one response
    pub id: String,

    /// Kind of fragment
    pub block_type: BlockType,

    /// Recognised text (WORD and LINE blocks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// 1-based row position (CELL blocks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,

    /// 1-based column position (CELL blocks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_index: Option<u32>,

    /// Entity roles, e.g. KEY or VALUE on KEY_VALUE_SET blocks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_types: Vec<EntityType>,

    /// Typed edges to other blocks, in service order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,

    /// 1-based page the block appears on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Recognition confidence (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Block {
    /// Create a block with no text, position or edges.
    pub fn new(id: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
            text: None,
            row_index: None,
            column_index: None,
            entity_types: Vec::new(),
            relationships: Vec::new(),
            page: None,
            confidence: None,
        }
    }

    /// Create a WORD block.
    pub fn word(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BlockType::Word).with_text(text)
    }

    /// Create a LINE block.
    pub fn line(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BlockType::Line).with_text(text)
    }

    /// Create a TABLE block.
    pub fn table(id: impl Into<String>) -> Self {
        Self::new(id, BlockType::Table)
    }

    /// Create a CELL block at a 1-based position.
    pub fn cell(id: impl Into<String>, row: u32, column: u32) -> Self {
        let mut block = Self::new(id, BlockType::Cell);
        block.row_index = Some(row);
        block.column_index = Some(column);
        block
    }

    /// Create the KEY half of a key/value pair.
    pub fn key(id: impl Into<String>) -> Self {
        Self::new(id, BlockType::KeyValueSet).with_entity_type(EntityType::Key)
    }

    /// Create the VALUE half of a key/value pair.
    pub fn value(id: impl Into<String>) -> Self {
        Self::new(id, BlockType::KeyValueSet).with_entity_type(EntityType::Value)
    }

    /// Set the text and return self.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add an entity role and return self.
    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_types.push(entity_type);
        self
    }

    /// Set the page and return self.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Append CHILD edges and return self.
    pub fn with_children<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_relationship(RelationshipType::Child, ids)
    }

    /// Append VALUE edges and return self.
    pub fn with_values<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_relationship(RelationshipType::Value, ids)
    }

    /// Append an edge group of the given kind and return self.
    pub fn with_relationship<I, S>(mut self, kind: RelationshipType, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationships.push(Relationship {
            kind,
            ids: ids.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Target ids of every edge of the given kind, in edge order.
    pub fn related_ids(&self, kind: RelationshipType) -> impl Iterator<Item = &str> + '_ {
        self.relationships
            .iter()
            .filter(move |r| r.kind == kind)
            .flat_map(|r| r.ids.iter().map(String::as_str))
    }

    /// Check whether the block carries the given entity role.
    pub fn has_entity_type(&self, entity_type: EntityType) -> bool {
        self.entity_types.contains(&entity_type)
    }

    /// Check whether this is the KEY half of a key/value pair.
    pub fn is_form_key(&self) -> bool {
        self.block_type == BlockType::KeyValueSet && self.has_entity_type(EntityType::Key)
    }

    /// 1-based (row, column) position, when both indices are present and non-zero.
    pub fn cell_position(&self) -> Option<(u32, u32)> {
        match (self.row_index, self.column_index) {
            (Some(row), Some(col)) if row > 0 && col > 0 => Some((row, col)),
            _ => None,
        }
    }
}

/// Block kinds reported by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    Page,
    Line,
    Word,
    KeyValueSet,
    Table,
    Cell,
    MergedCell,
    SelectionElement,
    Title,
    Query,
    QueryResult,
    Signature,
    TableTitle,
    TableFooter,
    /// Any kind this crate does not interpret
    #[serde(other)]
    Unknown,
}

/// Kinds of edges between blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// Points toward the block's constituent parts (ultimately WORDs)
    Child,
    /// Points from a KEY to its paired VALUE
    Value,
    ComplexFeatures,
    MergedCell,
    Title,
    Answer,
    Table,
    TableTitle,
    TableFooter,
    #[serde(other)]
    Unknown,
}

/// Roles a block can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Key,
    Value,
    ColumnHeader,
    TableTitle,
    TableFooter,
    TableSectionTitle,
    TableSummary,
    StructuredTable,
    SemiStructuredTable,
    #[serde(other)]
    Unknown,
}

/// A group of typed edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    /// Edge kind
    #[serde(rename = "Type")]
    pub kind: RelationshipType,

    /// Target block ids, in order
    #[serde(default)]
    pub ids: Vec<String>,
}
