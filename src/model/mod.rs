//! Document model types.
//!
//! Two layers live here: the raw block graph exactly as the analysis service
//! returns it ([`AnalysisResponse`], [`Block`]) and the structured content
//! recovered from it ([`Document`], [`FormField`], [`Table`]).

mod block;
mod document;
mod form;
mod table;

pub use block::{
    AnalysisResponse, Block, BlockType, DocumentMetadata, EntityType, Relationship,
    RelationshipType,
};
pub use document::{Document, Metadata};
pub use form::FormField;
pub use table::Table;
