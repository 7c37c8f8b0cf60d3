//! Cross-revision cell matching.
//!
//! Cells of two revisions are hashed by content, flattened in page, row,
//! column order and compared with a suffix array of the combined sequence.
//! Long identical stretches anchor the mapping; patch catalogs follow it.

pub mod hashing;
pub mod suffix;
pub mod transfer;

pub use hashing::{FlatCells, SENTINEL, content_hash};
pub use suffix::{EqualRun, equal_runs, lcp_array, suffix_array};
pub use transfer::{CellMapping, RevisionMatch, TransferReport, match_revisions, transfer_patches};
