//! Documents and their cross-revision identity.
//!
//! A document is identified by its metadata rather than its file name, so
//! a re-exported or renamed file still pairs with its earlier revision.

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::cells::{CellAddress, PatchCatalog};
use crate::error::{LayoutError, Result};
use crate::layout::{ClusterReport, LayoutParams, Page, PreventBinding, TextBlock};

/// Identity of one document revision.
///
/// Revisions of the same document share title and creation date; the
/// modification date tells them apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId {
    pub title: String,
    pub creation_date: String,
    pub modification_date: String,
}

impl DocumentId {
    pub fn new(
        title: impl Into<String>,
        creation_date: impl Into<String>,
        modification_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            creation_date: creation_date.into(),
            modification_date: modification_date.into(),
        }
    }

    /// Whether both ids are revisions of the same document.
    pub fn same_lineage(&self, other: &DocumentId) -> bool {
        self.title == other.title && self.creation_date == other.creation_date
    }

    /// Stable hex digest of the lineage (title and creation date).
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.creation_date.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} (created {}, modified {})",
            self.title, self.creation_date, self.modification_date
        )
    }
}

/// A document revision: its identity and its pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(id: DocumentId, pages: Vec<Page>) -> Self {
        Self { id, pages }
    }

    pub fn page(&self, number: usize) -> Option<&Page> {
        self.pages.get(number)
    }

    /// Clusters every page in parallel.
    ///
    /// `bindings` maps page numbers to that page's prevent-bindings. Returns
    /// one report per page, in page order.
    pub fn cluster_pages(
        &mut self,
        params: &LayoutParams,
        bindings: &BTreeMap<usize, Vec<PreventBinding>>,
    ) -> Vec<ClusterReport> {
        for &number in bindings.keys().filter(|&&n| n >= self.pages.len()) {
            warn!(page = number, "prevent-bindings given for a page the document lacks");
        }
        self.pages
            .par_iter_mut()
            .enumerate()
            .map(|(number, page)| {
                let page_bindings = bindings.get(&number).map_or(&[][..], Vec::as_slice);
                page.cluster(params, page_bindings)
            })
            .collect()
    }

    /// Applies a catalog written for exactly this revision, all or nothing.
    pub fn apply_catalog(&mut self, catalog: &PatchCatalog) -> Result<()> {
        if catalog.document != self.id {
            return Err(LayoutError::CatalogMismatch {
                expected: self.id.to_string(),
                found: catalog.document.to_string(),
            });
        }
        if let Some(&missing) = catalog.pages.keys().find(|&&n| n >= self.pages.len()) {
            return Err(LayoutError::PageNotFound(missing));
        }

        let snapshot = self.pages.clone();
        for (&number, patches) in &catalog.pages {
            if let Err(e) = self.pages[number].apply_patches(patches) {
                self.pages = snapshot;
                return Err(e);
            }
        }
        debug!(document = %self.id, patches = catalog.len(), "applied patch catalog");
        Ok(())
    }

    /// Every cell in page, row, column order.
    pub fn cells(&self) -> impl Iterator<Item = (CellAddress, &TextBlock)> {
        self.pages.iter().enumerate().flat_map(|(p, page)| {
            page.rows().iter().enumerate().flat_map(move |(r, row)| {
                row.blocks
                    .iter()
                    .enumerate()
                    .map(move |(c, block)| (CellAddress::new(p, r, c), block))
            })
        })
    }
}

/// Pairs each old document with the newest revision of it in `new`.
///
/// Pairing uses document identity only; old documents without a
/// counterpart are left out.
pub fn pair_revisions<'a>(
    old: &'a [Document],
    new: &'a [Document],
) -> Vec<(&'a Document, &'a Document)> {
    old.iter()
        .filter_map(|o| {
            let latest = new
                .iter()
                .filter(|n| n.id.same_lineage(&o.id))
                .max_by(|a, b| a.id.modification_date.cmp(&b.id.modification_date));
            if latest.is_none() {
                debug!(document = %o.id, "no later revision found");
            }
            latest.map(|n| (o, n))
        })
        .collect()
}
