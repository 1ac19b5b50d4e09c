//! Identifier index over a flat block list.

use std::collections::HashMap;

use log::{debug, trace};

use crate::model::{Block, BlockType, RelationshipType};

/// Lookup table from block id to block.
///
/// Resolution is tolerant: an id that is not in the index is a lookup miss,
/// never an error. Edges pointing at unknown ids are skipped by every
/// traversal built on top of this index.
#[derive(Debug, Clone, Default)]
pub struct BlockIndex<'a> {
    blocks: HashMap<&'a str, &'a Block>,
}

impl<'a> BlockIndex<'a> {
    /// Index a block list. When an id appears more than once, the last
    /// occurrence wins.
    pub fn build(blocks: &'a [Block]) -> Self {
        let mut index = HashMap::with_capacity(blocks.len());
        for block in blocks {
            if index.insert(block.id.as_str(), block).is_some() {
                debug!("duplicate block id {:?}, keeping the later block", block.id);
            }
        }
        Self { blocks: index }
    }

    /// Look up a block by id.
    pub fn get(&self, id: &str) -> Option<&'a Block> {
        self.blocks.get(id).copied()
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Resolve every edge of `kind` on `block`, in edge order, skipping
    /// targets that are not indexed.
    pub fn related(
        &self,
        block: &'a Block,
        kind: RelationshipType,
    ) -> impl Iterator<Item = &'a Block> + '_ {
        block.related_ids(kind).filter_map(move |id| {
            let target = self.get(id);
            if target.is_none() {
                trace!("block {:?}: {:?} edge to unknown id {:?}", block.id, kind, id);
            }
            target
        })
    }

    /// Resolved CHILD targets of `block`.
    pub fn children(&self, block: &'a Block) -> impl Iterator<Item = &'a Block> + '_ {
        self.related(block, RelationshipType::Child)
    }

    /// Resolved CHILD targets of `block` with the given type.
    pub fn children_of_type(
        &self,
        block: &'a Block,
        block_type: BlockType,
    ) -> impl Iterator<Item = &'a Block> + '_ {
        self.children(block)
            .filter(move |child| child.block_type == block_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_lookup() {
        let blocks = vec![Block::word("w1", "Name"), Block::word("w2", "John")];
        let index = BlockIndex::build(&blocks);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("w2").and_then(|b| b.text.as_deref()), Some("John"));
        assert!(index.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        let blocks = vec![Block::word("w", "first"), Block::word("w", "second")];
        let index = BlockIndex::build(&blocks);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("w").and_then(|b| b.text.as_deref()), Some("second"));
    }

    #[test]
    fn test_empty_index() {
        let index = BlockIndex::build(&[]);
        assert!(index.is_empty());
    }

    #[test]
    fn test_children_skip_missing_targets() {
        let blocks = vec![
            Block::line("l", "a c").with_children(["w1", "gone", "w2"]),
            Block::word("w1", "a"),
            Block::word("w2", "c"),
        ];
        let index = BlockIndex::build(&blocks);

        let ids: Vec<_> = index.children(&blocks[0]).map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["w1", "w2"]);
    }

    #[test]
    fn test_children_of_type() {
        let blocks = vec![
            Block::table("t").with_children(["c1", "w", "c2"]),
            Block::cell("c1", 1, 1),
            Block::word("w", "stray"),
            Block::cell("c2", 1, 2),
        ];
        let index = BlockIndex::build(&blocks);

        let cells: Vec<_> = index
            .children_of_type(&blocks[0], BlockType::Cell)
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(cells, ["c1", "c2"]);
    }

    #[test]
    fn test_related_ignores_other_edge_kinds() {
        let blocks = vec![
            Block::key("k").with_children(["w"]).with_values(["v"]),
            Block::word("w", "Age"),
            Block::value("v"),
        ];
        let index = BlockIndex::build(&blocks);

        let values: Vec<_> = index
            .related(&blocks[0], RelationshipType::Value)
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(values, ["v"]);
    }
}
