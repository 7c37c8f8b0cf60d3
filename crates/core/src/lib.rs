//! glyphgrid - table structure reconstruction from positioned glyphs.
//!
//! A page of positioned characters is clustered into segments, paragraph
//! blocks and finally table rows and columns. Cell-level correction patches
//! are applied against the clustered tables and carried forward when a
//! document is re-extracted from a newer revision.

pub mod cells;
pub mod document;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod revision;
pub mod spatial;

pub use cells::{CellAddress, Patch, PatchAction, PatchCatalog};
pub use document::{Document, DocumentId, pair_revisions};
pub use error::{LayoutError, Result};
pub use geometry::{BoundingBox, Orientation, Point, Span};
pub use layout::{Character, ClusterReport, LayoutParams, Page, PreventBinding};
pub use revision::{TransferReport, match_revisions, transfer_patches};
