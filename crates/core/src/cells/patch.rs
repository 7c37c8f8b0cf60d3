//! Verified cell corrections.
//!
//! A patch names the text it expects to find in its cell. Applying it to a
//! cell holding anything else is an error, so a patch written against one
//! extraction can never silently rewrite a different cell after the layout
//! shifts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::DocumentId;
use crate::error::{LayoutError, Result};
use crate::geometry::BoundingBox;
use crate::layout::Page;

/// What a patch does to its cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum PatchAction {
    /// Replace the cell text.
    Replace(String),
    /// Remove the cell; later cells of the row shift left.
    Remove,
}

/// A correction to one cell, guarded by the cell's expected text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub row: isize,
    pub col: isize,
    pub expected: String,
    pub action: PatchAction,
}

impl Patch {
    pub fn replace(
        row: isize,
        col: isize,
        expected: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            row,
            col,
            expected: expected.into(),
            action: PatchAction::Replace(replacement.into()),
        }
    }

    pub fn remove(row: isize, col: isize, expected: impl Into<String>) -> Self {
        Self {
            row,
            col,
            expected: expected.into(),
            action: PatchAction::Remove,
        }
    }

    /// The same correction addressed at another cell.
    pub fn with_address(&self, row: isize, col: isize) -> Self {
        Self {
            row,
            col,
            ..self.clone()
        }
    }
}

/// Patches for one document, keyed by page number.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatchCatalog {
    pub document: DocumentId,
    pub pages: BTreeMap<usize, Vec<Patch>>,
}

impl PatchCatalog {
    pub fn new(document: DocumentId) -> Self {
        Self {
            document,
            pages: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, page: usize, patch: Patch) {
        self.pages.entry(page).or_default().push(patch);
    }

    /// Total number of patches across all pages.
    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Patches with their page numbers, in page order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Patch)> {
        self.pages
            .iter()
            .flat_map(|(&page, patches)| patches.iter().map(move |p| (page, p)))
    }
}

impl Page {
    /// Applies one patch.
    ///
    /// Fails without touching the page when the addressed cell is missing
    /// or holds text other than `patch.expected`.
    pub fn apply_patch(&mut self, patch: &Patch) -> Result<()> {
        let (r, c) = self
            .resolve_cell(patch.row, patch.col)
            .ok_or(LayoutError::CellNotFound {
                row: patch.row,
                col: patch.col,
            })?;

        let row = &mut self.rows[r];
        let block = &mut row.blocks[c];
        if block.text != patch.expected {
            return Err(LayoutError::PatchMismatch {
                row: patch.row,
                col: patch.col,
                expected: patch.expected.clone(),
                found: block.text.clone(),
            });
        }

        match &patch.action {
            PatchAction::Replace(text) => {
                debug!(row = r, col = c, "replacing cell text");
                block.text = text.clone();
            }
            PatchAction::Remove => {
                debug!(row = r, col = c, "removing cell");
                row.blocks.remove(c);
                for block in &mut row.blocks[c..] {
                    block.col -= 1;
                }
                if let Some(bbox) = BoundingBox::union_all(row.blocks.iter().map(|b| b.bbox)) {
                    row.bbox = bbox;
                }
            }
        }
        Ok(())
    }

    /// Applies patches in order, all or nothing.
    ///
    /// Each patch sees the effect of the ones before it. On the first
    /// failure the page is restored to its state before the call.
    pub fn apply_patches(&mut self, patches: &[Patch]) -> Result<()> {
        let snapshot = self.rows.clone();
        for patch in patches {
            if let Err(e) = self.apply_patch(patch) {
                self.rows = snapshot;
                return Err(e);
            }
        }
        Ok(())
    }
}
