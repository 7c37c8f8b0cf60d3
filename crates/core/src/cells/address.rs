//! Signed cell addressing.
//!
//! Row and column indices may count from the end: `-1` is the last row or
//! cell. Indices outside the table resolve to `None`.

use serde::{Deserialize, Serialize};

use crate::layout::{Page, TableRow, TextBlock};

/// Absolute position of a cell within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellAddress {
    pub page: usize,
    pub row: usize,
    pub col: usize,
}

impl CellAddress {
    pub const fn new(page: usize, row: usize, col: usize) -> Self {
        Self { page, row, col }
    }
}

/// Resolves a signed index against a sequence of `len` items.
pub fn resolve_index(index: isize, len: usize) -> Option<usize> {
    if index >= 0 {
        let i = index.unsigned_abs();
        (i < len).then_some(i)
    } else {
        let back = index.unsigned_abs();
        (back <= len).then(|| len - back)
    }
}

impl Page {
    /// Row at a signed index.
    pub fn row(&self, row: isize) -> Option<&TableRow> {
        resolve_index(row, self.rows.len()).map(|r| &self.rows[r])
    }

    /// Absolute `(row, col)` of a signed cell address.
    pub fn resolve_cell(&self, row: isize, col: isize) -> Option<(usize, usize)> {
        let r = resolve_index(row, self.rows.len())?;
        let c = resolve_index(col, self.rows[r].len())?;
        Some((r, c))
    }

    /// Block at a signed cell address.
    pub fn cell(&self, row: isize, col: isize) -> Option<&TextBlock> {
        let (r, c) = self.resolve_cell(row, col)?;
        Some(&self.rows[r].blocks[c])
    }

    /// Text of the block at a signed cell address.
    pub fn cell_text(&self, row: isize, col: isize) -> Option<&str> {
        self.cell(row, col).map(|b| b.text.as_str())
    }

    pub fn cell_mut(&mut self, row: isize, col: isize) -> Option<&mut TextBlock> {
        let (r, c) = self.resolve_cell(row, col)?;
        Some(&mut self.rows[r].blocks[c])
    }
}
