//! Cell addressing and patch application on clustered pages.

pub mod address;
pub mod patch;

pub use address::{CellAddress, resolve_index};
pub use patch::{Patch, PatchAction, PatchCatalog};
