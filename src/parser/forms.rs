//! Key/value pair resolution.

use crate::model::{Block, FormField, RelationshipType};

use super::{assemble_text, BlockIndex};

/// Resolve every KEY block into a [`FormField`], preserving input order.
///
/// A KEY_VALUE_SET block counts as a key only when its entity types include
/// KEY; blocks without entity types are ignored.
pub fn resolve_form_fields<'a>(blocks: &'a [Block], index: &BlockIndex<'a>) -> Vec<FormField> {
    blocks
        .iter()
        .filter(|b| b.is_form_key())
        .map(|key| resolve_form_field(key, index))
        .collect()
}

/// Resolve one KEY block and its VALUE partner.
pub fn resolve_form_field<'a>(key: &'a Block, index: &BlockIndex<'a>) -> FormField {
    FormField::new(assemble_text(key, index), resolve_value_text(key, index)).on_page(key.page)
}

/// Text of the block(s) a KEY points at through VALUE edges.
///
/// One VALUE edge is the norm. When there are several, every target's text is
/// followed by a space and the result is trimmed, so a textless VALUE in the
/// middle leaves a double space. No VALUE edge, or only unknown targets,
/// yields `""`.
pub fn resolve_value_text<'a>(key: &'a Block, index: &BlockIndex<'a>) -> String {
    let parts: Vec<String> = index
        .related(key, RelationshipType::Value)
        .map(|value| assemble_text(value, index))
        .collect();
    parts.join(" ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockType, EntityType};

    fn sample() -> Vec<Block> {
        vec![
            Block::key("k1").with_children(["w1"]).with_values(["v1"]),
            Block::value("v1").with_children(["w2", "w3"]),
            Block::word("w1", "Name:"),
            Block::word("w2", "Jane"),
            Block::word("w3", "Roe"),
            Block::key("k2").with_children(["w4"]),
            Block::word("w4", "Allergies"),
        ]
    }

    #[test]
    fn test_key_with_value() {
        let blocks = sample();
        let index = BlockIndex::build(&blocks);

        let fields = resolve_form_fields(&blocks, &index);
        assert_eq!(fields[0], FormField::new("Name:", "Jane Roe"));
    }

    #[test]
    fn test_key_without_value_edge() {
        let blocks = sample();
        let index = BlockIndex::build(&blocks);

        let fields = resolve_form_fields(&blocks, &index);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1], FormField::new("Allergies", ""));
        assert!(fields[1].is_blank());
    }

    #[test]
    fn test_value_blocks_are_not_fields() {
        let blocks = vec![
            Block::value("v").with_children(["w"]),
            Block::word("w", "orphan"),
            Block::new("k", BlockType::KeyValueSet),
        ];
        let index = BlockIndex::build(&blocks);

        assert!(resolve_form_fields(&blocks, &index).is_empty());
    }

    #[test]
    fn test_missing_value_target() {
        let blocks = vec![
            Block::key("k").with_children(["w"]).with_values(["ghost"]),
            Block::word("w", "Weight"),
        ];
        let index = BlockIndex::build(&blocks);

        assert_eq!(
            resolve_form_field(&blocks[0], &index),
            FormField::new("Weight", "")
        );
    }

    #[test]
    fn test_multiple_values_joined() {
        let blocks = vec![
            Block::key("k").with_children(["wk"]).with_values(["v1", "v2", "v3"]),
            Block::value("v1").with_children(["a"]),
            Block::value("v2"),
            Block::value("v3").with_children(["b"]),
            Block::word("wk", "Phone"),
            Block::word("a", "555"),
            Block::word("b", "0100"),
        ];
        let index = BlockIndex::build(&blocks);

        assert_eq!(resolve_value_text(&blocks[0], &index), "555  0100");
    }

    #[test]
    fn test_textless_edge_values_trimmed() {
        let blocks = vec![
            Block::key("k").with_children(["wk"]).with_values(["v1", "v2"]),
            Block::value("v1"),
            Block::value("v2").with_children(["a"]),
            Block::word("wk", "Pulse"),
            Block::word("a", "72"),
        ];
        let index = BlockIndex::build(&blocks);

        assert_eq!(resolve_value_text(&blocks[0], &index), "72");
    }

    #[test]
    fn test_order_follows_input() {
        let blocks = vec![
            Block::key("b").with_children(["wb"]),
            Block::key("a").with_children(["wa"]),
            Block::word("wa", "Alpha"),
            Block::word("wb", "Beta"),
            Block::value("v").with_entity_type(EntityType::Key),
        ];
        let index = BlockIndex::build(&blocks);

        let keys: Vec<_> = resolve_form_fields(&blocks, &index)
            .into_iter()
            .map(|f| f.key)
            .collect();
        // The last block carries both roles and still counts as a key.
        assert_eq!(keys, ["Beta", "Alpha", ""]);
    }
}
