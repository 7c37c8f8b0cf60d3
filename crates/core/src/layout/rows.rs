//! Stage C: blocks to table rows and columns.
//!
//! Blocks whose vertical extents share a center line form a row. Inside a
//! row, blocks whose horizontal extents intersect are one cell that was
//! fragmented upstream and are merged top to bottom.

use itertools::Itertools;
use tracing::debug;

use crate::geometry::BoundingBox;

use super::components::connected_components;
use super::types::{TableRow, TextBlock};

/// Whether two blocks sit on the same table row.
///
/// Symmetric: either block's vertical center may fall inside the other,
/// which tolerates cells of unequal height.
pub fn same_row(a: &TextBlock, b: &TextBlock) -> bool {
    let (va, vb) = (a.bbox.vertical_span(), b.bbox.vertical_span());
    va.contains_center_of(&vb) || vb.contains_center_of(&va)
}

/// Whether two blocks of one row belong to the same column.
pub fn same_column(a: &TextBlock, b: &TextBlock) -> bool {
    a.bbox.horizontal_span().intersects(&b.bbox.horizontal_span())
}

/// Arranges blocks into rows sorted top to bottom, each holding cells sorted
/// left to right, and rewrites every block's `(row, col)`.
pub fn arrange_rows(blocks: Vec<TextBlock>) -> Vec<TableRow> {
    let row_groups = connected_components(blocks.len(), |i, j| same_row(&blocks[i], &blocks[j]));

    let mut slots: Vec<Option<TextBlock>> = blocks.into_iter().map(Some).collect();
    let mut rows: Vec<TableRow> = row_groups
        .into_iter()
        .filter_map(|members| {
            let group: Vec<TextBlock> = members.iter().filter_map(|&i| slots[i].take()).collect();
            TableRow::from_blocks(merge_columns(group))
        })
        .collect();

    rows.sort_by(|a, b| a.bbox.top().total_cmp(&b.bbox.top()));
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, block) in row.blocks.iter_mut().enumerate() {
            block.row = r;
            block.col = c;
        }
    }
    debug!(rows = rows.len(), "arranged rows");
    rows
}

/// Merges same-column blocks of one row and sorts the cells left to right.
fn merge_columns(group: Vec<TextBlock>) -> Vec<TextBlock> {
    let columns = connected_components(group.len(), |i, j| same_column(&group[i], &group[j]));

    let mut slots: Vec<Option<TextBlock>> = group.into_iter().map(Some).collect();
    let mut cells: Vec<TextBlock> = columns
        .into_iter()
        .filter_map(|members| {
            let parts: Vec<TextBlock> = members.iter().filter_map(|&i| slots[i].take()).collect();
            merge_cell(parts)
        })
        .collect();
    cells.sort_by(|a, b| a.bbox.left().total_cmp(&b.bbox.left()));
    cells
}

/// Joins the fragments of one cell top to bottom.
fn merge_cell(mut parts: Vec<TextBlock>) -> Option<TextBlock> {
    if parts.len() == 1 {
        return parts.pop();
    }
    parts.sort_by(|a, b| {
        a.bbox
            .top()
            .total_cmp(&b.bbox.top())
            .then(a.bbox.left().total_cmp(&b.bbox.left()))
    });

    let bbox = BoundingBox::union_all(parts.iter().map(|b| b.bbox))?;
    let text = parts.iter().map(|b| b.text.as_str()).join("\n");
    let head = parts.first()?;
    Some(TextBlock {
        text: text.trim_end().to_string(),
        bbox,
        font_size: head.font_size,
        orientation: head.orientation,
        row: head.row,
        col: head.col,
        segments: parts.iter().flat_map(|b| b.segments.iter().copied()).collect(),
    })
}
