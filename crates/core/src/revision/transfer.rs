//! Cell mapping between revisions and patch catalog transfer.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cells::{CellAddress, Patch, PatchAction, PatchCatalog};
use crate::document::Document;
use crate::error::{LayoutError, Result};
use crate::layout::Page;

use super::hashing::FlatCells;
use super::suffix::{EqualRun, equal_runs};

/// Partial one-to-one map from old flat cell positions to new ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMapping {
    targets: Vec<Option<usize>>,
}

impl CellMapping {
    /// Accepts runs longest first; a run is taken only when neither of its
    /// end cells is already mapped by a longer run.
    pub fn from_runs(source_len: usize, mut runs: Vec<EqualRun>) -> Self {
        runs.sort_by(|x, y| {
            y.len
                .cmp(&x.len)
                .then(x.a_start.cmp(&y.a_start))
                .then(x.b_start.cmp(&y.b_start))
        });

        let mut targets = vec![None; source_len];
        for run in runs {
            if run.len == 0 || run.a_start + run.len > source_len {
                continue;
            }
            let last = run.a_start + run.len - 1;
            if targets[run.a_start].is_some() || targets[last].is_some() {
                continue;
            }
            for offset in 0..run.len {
                targets[run.a_start + offset] = Some(run.b_start + offset);
            }
        }
        Self { targets }
    }

    /// New flat position of old flat position `index`.
    pub fn get(&self, index: usize) -> Option<usize> {
        self.targets.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn mapped_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_some()).count()
    }

    /// Old flat positions with no counterpart.
    pub fn unmapped(&self) -> impl Iterator<Item = usize> + '_ {
        self.targets
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_none())
            .map(|(i, _)| i)
    }
}

/// Cell correspondence between two revisions of a document.
#[derive(Debug, Clone)]
pub struct RevisionMatch {
    pub source: FlatCells,
    pub target: FlatCells,
    pub mapping: CellMapping,
}

impl RevisionMatch {
    /// Counterpart in the new revision of a cell of the old one.
    pub fn locate(&self, address: CellAddress) -> Option<CellAddress> {
        let from = self.source.position(address)?;
        let to = self.mapping.get(from)?;
        self.target.address(to)
    }
}

/// Matches the cells of `old` against the cells of `new` by content.
pub fn match_revisions(old: &Document, new: &Document) -> RevisionMatch {
    let source = FlatCells::from_document(old);
    let target = FlatCells::from_document(new);
    let runs = equal_runs(source.hashes(), target.hashes());
    let mapping = CellMapping::from_runs(source.len(), runs);
    debug!(
        source_cells = source.len(),
        target_cells = target.len(),
        mapped = mapping.mapped_count(),
        "matched revisions"
    );
    RevisionMatch {
        source,
        target,
        mapping,
    }
}

/// Result of moving a catalog onto a newer revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferReport {
    /// Patches re-addressed against the new revision.
    pub transferred: PatchCatalog,
    /// Patches with no counterpart, still addressed against the old revision.
    pub failed: PatchCatalog,
}

/// Original column of every remaining cell, row by row, as removals shift
/// later cells left.
#[derive(Debug, Clone, Default)]
struct ColumnShifts {
    rows: Vec<Vec<usize>>,
}

impl ColumnShifts {
    fn of(page: &Page) -> Self {
        Self {
            rows: page.rows().iter().map(|r| (0..r.len()).collect()).collect(),
        }
    }

    fn original(&self, row: usize, col: usize) -> Option<usize> {
        self.rows.get(row)?.get(col).copied()
    }

    fn current(&self, row: usize, original: usize) -> Option<usize> {
        self.rows.get(row)?.iter().position(|&c| c == original)
    }

    fn remove(&mut self, row: usize, col: usize) {
        if let Some(cols) = self.rows.get_mut(row).filter(|cols| col < cols.len()) {
            cols.remove(col);
        }
    }
}

/// Replays `patch` on a working copy of its old page and returns the
/// original `(row, col)` of the cell it edits.
///
/// Patches of one page apply in order, so an address may point past cells
/// removed by earlier patches. `None` when the patch would not apply.
fn replay(
    old: &Document,
    working: &mut FxHashMap<usize, (Page, ColumnShifts)>,
    page: usize,
    patch: &Patch,
) -> Option<(usize, usize)> {
    let (copy, shifts) = match working.entry(page) {
        Entry::Occupied(e) => e.into_mut(),
        Entry::Vacant(e) => {
            let source = old.page(page)?;
            e.insert((source.clone(), ColumnShifts::of(source)))
        }
    };
    let (row, col) = copy.resolve_cell(patch.row, patch.col)?;
    copy.apply_patch(patch).ok()?;
    let original = shifts.original(row, col)?;
    if patch.action == PatchAction::Remove {
        shifts.remove(row, col);
    }
    Some((row, original))
}

/// Re-addresses `catalog`, written against `old`, onto `new`.
///
/// Each page's patches are replayed in order on both sides, so addresses
/// shifted by an earlier `Remove` resolve to the cell the patch really
/// edits, and the emitted catalog applies to `new` in the same order.
/// Patches whose cell has no counterpart in `new`, or that would not apply
/// to `old`, are collected in [`TransferReport::failed`] instead of raising.
/// The catalog must belong to `old`.
pub fn transfer_patches(
    old: &Document,
    new: &Document,
    catalog: &PatchCatalog,
) -> Result<TransferReport> {
    if catalog.document != old.id {
        return Err(LayoutError::CatalogMismatch {
            expected: old.id.to_string(),
            found: catalog.document.to_string(),
        });
    }
    if !old.id.same_lineage(&new.id) {
        warn!(old = %old.id, new = %new.id, "transferring patches across document lineages");
    }

    let matched = match_revisions(old, new);
    let mut report = TransferReport {
        transferred: PatchCatalog::new(new.id.clone()),
        failed: PatchCatalog::new(old.id.clone()),
    };
    let mut sources: FxHashMap<usize, (Page, ColumnShifts)> = FxHashMap::default();
    let mut targets: FxHashMap<usize, ColumnShifts> = FxHashMap::default();

    for (page, patch) in catalog.iter() {
        let target = replay(old, &mut sources, page, patch)
            .and_then(|(row, col)| matched.locate(CellAddress::new(page, row, col)))
            .and_then(|to| {
                let shifts = targets
                    .entry(to.page)
                    .or_insert_with(|| new.page(to.page).map(ColumnShifts::of).unwrap_or_default());
                let col = shifts.current(to.row, to.col)?;
                if patch.action == PatchAction::Remove {
                    shifts.remove(to.row, col);
                }
                Some(CellAddress::new(to.page, to.row, col))
            });
        match target {
            Some(to) => report.transferred.push(
                to.page,
                patch.with_address(to.row as isize, to.col as isize),
            ),
            None => {
                warn!(
                    page,
                    row = patch.row,
                    col = patch.col,
                    expected = %patch.expected,
                    "patch has no counterpart"
                );
                report.failed.push(page, patch.clone());
            }
        }
    }
    debug!(
        transferred = report.transferred.len(),
        failed = report.failed.len(),
        "transferred patch catalog"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_runs_win() {
        let runs = vec![
            EqualRun {
                a_start: 1,
                b_start: 7,
                len: 1,
            },
            EqualRun {
                a_start: 0,
                b_start: 2,
                len: 3,
            },
        ];
        let mapping = CellMapping::from_runs(4, runs);
        assert_eq!(mapping.get(0), Some(2));
        assert_eq!(mapping.get(1), Some(3));
        assert_eq!(mapping.get(2), Some(4));
        assert_eq!(mapping.get(3), None);
        assert_eq!(mapping.unmapped().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_run_overlapping_mapped_end_rejected() {
        let runs = vec![
            EqualRun {
                a_start: 0,
                b_start: 0,
                len: 3,
            },
            EqualRun {
                a_start: 2,
                b_start: 10,
                len: 2,
            },
        ];
        let mapping = CellMapping::from_runs(4, runs);
        assert_eq!(mapping.get(2), Some(2));
        assert_eq!(mapping.get(3), None);
    }

    #[test]
    fn test_out_of_range_lookup() {
        let mapping = CellMapping::from_runs(2, vec![]);
        assert_eq!(mapping.get(5), None);
        assert_eq!(mapping.mapped_count(), 0);
    }
}
