//! Text assembly from CHILD edges.

use crate::model::{Block, BlockType};

use super::BlockIndex;

/// Concatenate the text of a block's WORD children, in edge order.
///
/// Only one CHILD hop is followed; WORD blocks are leaves. Non-WORD children
/// and unknown ids contribute nothing. The result has no trailing whitespace
/// and is empty when the block has no WORD children.
pub fn assemble_text<'a>(block: &'a Block, index: &BlockIndex<'a>) -> String {
    let mut text = String::new();
    for child in index.children_of_type(block, BlockType::Word) {
        if let Some(word) = &child.text {
            text.push_str(word);
            text.push(' ');
        }
    }
    text.truncate(text.trim_end().len());
    text
}

/// [`assemble_text`] for an optional block; an absent block yields `""`.
pub fn assemble_optional<'a>(block: Option<&'a Block>, index: &BlockIndex<'a>) -> String {
    block
        .map(|b| assemble_text(b, index))
        .unwrap_or_default()
}
