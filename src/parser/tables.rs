//! Table reconstruction from TABLE / CELL blocks.
//!
//! Cells arrive as independent blocks that each declare a 1-based row and
//! column. They are gathered into a sparse `row -> (column -> text)` map and
//! then materialized into a dense grid sized by the largest indices seen.
//! Row gaps are kept: a table whose cells sit on rows 1 and 3 has a blank
//! second row.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::model::{Block, BlockType, Table};

use super::options::DEFAULT_MAX_TABLE_CELLS;
use super::{assemble_text, BlockIndex};

type SparseRows = BTreeMap<u32, BTreeMap<u32, String>>;

/// Rebuild a TABLE block into a dense grid.
pub fn reconstruct_table<'a>(table: &'a Block, index: &BlockIndex<'a>) -> Table {
    reconstruct_table_bounded(table, index, DEFAULT_MAX_TABLE_CELLS)
}

/// [`reconstruct_table`] with an explicit cap on `rows × columns`.
///
/// A table whose declared extent exceeds the cap comes back empty.
pub fn reconstruct_table_bounded<'a>(
    table: &'a Block,
    index: &BlockIndex<'a>,
    max_cells: usize,
) -> Table {
    let sparse = collect_cells(table, index);
    let Some((max_row, max_col)) = extent(&sparse) else {
        return Table::new().on_page(table.page);
    };

    let (rows, cols) = (max_row as usize, max_col as usize);
    if rows.saturating_mul(cols) > max_cells {
        warn!(
            "table {:?} declares a {}x{} grid, above the {} cell limit; skipping",
            table.id, rows, cols, max_cells
        );
        return Table::new().on_page(table.page);
    }

    let mut grid = Table::blank(rows, cols)
        .on_page(table.page)
        .with_header_present(sparse.contains_key(&1));
    for (row, cells) in sparse {
        for (col, text) in cells {
            grid.rows[row as usize - 1][col as usize - 1] = text;
        }
    }
    grid
}

fn collect_cells<'a>(table: &'a Block, index: &BlockIndex<'a>) -> SparseRows {
    let mut rows = SparseRows::new();
    for cell in index.children_of_type(table, BlockType::Cell) {
        let Some((row, col)) = cell.cell_position() else {
            debug!("table {:?}: cell {:?} has no usable position", table.id, cell.id);
            continue;
        };
        rows.entry(row)
            .or_default()
            .insert(col, assemble_text(cell, index));
    }
    rows
}

/// Largest (row, column) index present, or `None` when there are no cells.
fn extent(rows: &SparseRows) -> Option<(u32, u32)> {
    let max_row = *rows.keys().next_back()?;
    let max_col = rows
        .values()
        .filter_map(|cols| cols.keys().next_back())
        .copied()
        .max()?;
    Some((max_row, max_col))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A TABLE block plus one CELL (and one WORD) per `(row, col, text)`.
    fn table_blocks(cells: &[(u32, u32, &str)]) -> Vec<Block> {
        let cell_ids: Vec<String> = (0..cells.len()).map(|i| format!("c{i}")).collect();
        let mut blocks = vec![Block::table("t").on_page(1).with_children(cell_ids.clone())];
        for (i, (row, col, text)) in cells.iter().enumerate() {
            let mut cell = Block::cell(&cell_ids[i], *row, *col);
            if !text.is_empty() {
                cell = cell.with_children([format!("w{i}")]);
                blocks.push(Block::word(format!("w{i}"), *text));
            }
            blocks.push(cell);
        }
        blocks
    }

    fn rebuild(blocks: &[Block]) -> Table {
        let index = BlockIndex::build(blocks);
        reconstruct_table(&blocks[0], &index)
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let blocks = table_blocks(&[(1, 1, "A"), (1, 2, "B"), (2, 1, "C")]);
        let table = rebuild(&blocks);

        assert_eq!(table.rows, vec![vec!["A", "B"], vec!["C", ""]]);
        assert_eq!(table.page, Some(1));
    }

    #[test]
    fn test_missing_first_row_leaves_blank_header() {
        let blocks = table_blocks(&[(2, 1, "x"), (2, 2, "y")]);
        let table = rebuild(&blocks);

        assert_eq!(table.rows, vec![vec!["", ""], vec!["x", "y"]]);
        assert!(!table.has_header());
    }

    #[test]
    fn test_textless_first_row_still_a_header() {
        let blocks = table_blocks(&[(1, 1, ""), (1, 2, ""), (2, 1, "LDL"), (2, 2, "190")]);
        let table = rebuild(&blocks);

        assert_eq!(table.rows, vec![vec!["", ""], vec!["LDL", "190"]]);
        assert!(table.has_header());
    }

    #[test]
    fn test_row_gaps_are_preserved() {
        let blocks = table_blocks(&[(1, 1, "h"), (3, 1, "z")]);
        let table = rebuild(&blocks);

        assert_eq!(table.rows, vec![vec!["h"], vec![""], vec!["z"]]);
    }

    #[test]
    fn test_width_is_max_column_over_all_rows() {
        let blocks = table_blocks(&[(1, 1, "a"), (2, 3, "c")]);
        let table = rebuild(&blocks);

        assert_eq!(table.column_count(), 3);
        assert!(table.rows.iter().all(|r| r.len() == 3));
        assert_eq!(table.cell(1, 2), Some("c"));
    }

    #[test]
    fn test_no_cells_gives_empty_table() {
        let blocks = vec![Block::table("t")];
        assert!(rebuild(&blocks).is_empty());

        let blocks = vec![Block::table("t").with_children(["gone"])];
        assert!(rebuild(&blocks).is_empty());
    }

    #[test]
    fn test_non_cell_and_unpositioned_children_skipped() {
        let blocks = vec![
            Block::table("t").with_children(["c1", "w", "c2", "c3", "missing"]),
            Block::cell("c1", 1, 1).with_children(["w"]),
            Block::word("w", "Test"),
            Block::new("c2", BlockType::Cell),
            Block::cell("c3", 0, 4),
        ];
        let table = rebuild(&blocks);

        assert_eq!(table.rows, vec![vec!["Test"]]);
    }

    #[test]
    fn test_oversized_grid_is_dropped() {
        let blocks = table_blocks(&[(1, 1, "a"), (100, 100, "b")]);
        let index = BlockIndex::build(&blocks);

        assert!(reconstruct_table_bounded(&blocks[0], &index, 9_999).is_empty());
        let table = reconstruct_table_bounded(&blocks[0], &index, 10_000);
        assert_eq!(table.row_count(), 100);
        assert_eq!(table.cell(99, 99), Some("b"));
    }

    #[test]
    fn test_multi_word_cells() {
        let blocks = vec![
            Block::table("t").with_children(["c"]),
            Block::cell("c", 1, 1).with_children(["w1", "w2"]),
            Block::word("w1", "Reference"),
            Block::word("w2", "Range"),
        ];

        assert_eq!(rebuild(&blocks).cell(0, 0), Some("Reference Range"));
    }
}
