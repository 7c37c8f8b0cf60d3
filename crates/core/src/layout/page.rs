//! A page of positioned characters and the structure clustered from them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LayoutError, Result};
use crate::geometry::BoundingBox;

use super::blocks::{ClusterReport, group_segments};
use super::params::LayoutParams;
use super::rows::arrange_rows;
use super::segments::group_characters;
use super::types::{Character, PreventBinding, TableRow, TextBlock, TextSegment};

/// One page: the rasterizer's characters plus the clustered segments and
/// rows derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    width: f64,
    height: f64,
    characters: Vec<Character>,
    segments: Vec<TextSegment>,
    pub(crate) rows: Vec<TableRow>,
}

impl Page {
    /// Creates an unclustered page.
    pub fn new(width: f64, height: f64, characters: Vec<Character>) -> Self {
        Self {
            width,
            height,
            characters,
            segments: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub const fn width(&self) -> f64 {
        self.width
    }

    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Page rectangle anchored at the origin; empty for degenerate sizes.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::from_ordered(0.0, 0.0, self.width.max(0.0), self.height.max(0.0))
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn segments(&self) -> &[TextSegment] {
        &self.segments
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// All blocks, row by row, left to right.
    pub fn blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.rows.iter().flat_map(|r| r.blocks.iter())
    }

    pub fn is_clustered(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Clusters the page's characters into segments, blocks and rows.
    ///
    /// Previous clustering results are discarded, so clustering the same
    /// characters twice yields the same page. Prevent-bindings that do not
    /// match exactly once are reported, not raised.
    pub fn cluster(&mut self, params: &LayoutParams, bindings: &[PreventBinding]) -> ClusterReport {
        let segments = group_characters(params, self.bbox(), &self.characters);
        let (blocks, uses) = group_segments(&segments, bindings);
        let block_count = blocks.len();
        let rows = arrange_rows(blocks);

        let report = ClusterReport {
            segments: segments.len(),
            blocks: block_count,
            rows: rows.len(),
            bindings: uses,
        };
        debug!(
            chars = self.characters.len(),
            segments = report.segments,
            blocks = report.blocks,
            rows = report.rows,
            "clustered page"
        );
        self.segments = segments;
        self.rows = rows;
        report
    }

    /// Number of cells in the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(TableRow::len).max().unwrap_or(0)
    }

    /// Fails when any row's column count differs from the first row's.
    pub fn check_rectangular(&self) -> Result<()> {
        let Some(expected) = self.rows.first().map(TableRow::len) else {
            return Ok(());
        };
        match self.rows.iter().position(|r| r.len() != expected) {
            Some(row) => Err(LayoutError::ColumnCountMismatch {
                row,
                expected,
                found: self.rows[row].len(),
            }),
            None => Ok(()),
        }
    }

    /// Cell texts as a rectangular grid.
    pub fn grid(&self) -> Result<Vec<Vec<String>>> {
        self.check_rectangular()?;
        Ok(self
            .rows
            .iter()
            .map(|r| r.texts().map(str::to_string).collect())
            .collect())
    }
}
