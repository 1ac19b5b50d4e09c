//! Block-graph parsing.
//!
//! Traversal is layered: [`BlockIndex`] resolves ids, [`assemble_text`]
//! follows CHILD edges to WORD leaves, and the form and table resolvers build
//! on both. [`AnalysisParser`] ties them together into a [`Document`](crate::model::Document).

mod analysis;
mod forms;
mod index;
mod options;
mod tables;
mod text;

pub use analysis::{parse_response, AnalysisParser};
pub use forms::{resolve_form_field, resolve_form_fields, resolve_value_text};
pub use index::BlockIndex;
pub use options::{FeatureType, ParseOptions, DEFAULT_MAX_TABLE_CELLS};
pub use tables::{reconstruct_table, reconstruct_table_bounded};
pub use text::{assemble_optional, assemble_text};
