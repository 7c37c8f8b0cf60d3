//! Content hashes of flattened document cells.

use std::hash::Hasher;

use rustc_hash::{FxHashMap, FxHasher};

use crate::cells::CellAddress;
use crate::document::Document;

/// Separator between the two documents in the matcher's combined sequence.
/// No cell ever hashes to this value.
pub const SENTINEL: u64 = u64::MAX;

/// Stable 64-bit hash of a cell's text, never equal to [`SENTINEL`].
pub fn content_hash(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(text.as_bytes());
    match hasher.finish() {
        SENTINEL => SENTINEL - 1,
        h => h,
    }
}

/// Every cell of a document in page, row, column order.
#[derive(Debug, Clone, Default)]
pub struct FlatCells {
    addresses: Vec<CellAddress>,
    hashes: Vec<u64>,
    positions: FxHashMap<CellAddress, usize>,
}

impl FlatCells {
    pub fn from_document(doc: &Document) -> Self {
        let mut flat = Self::default();
        for (address, block) in doc.cells() {
            flat.positions.insert(address, flat.addresses.len());
            flat.addresses.push(address);
            flat.hashes.push(content_hash(&block.text));
        }
        flat
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn hashes(&self) -> &[u64] {
        &self.hashes
    }

    /// Address of the cell at flat position `index`.
    pub fn address(&self, index: usize) -> Option<CellAddress> {
        self.addresses.get(index).copied()
    }

    /// Flat position of the cell at `address`.
    pub fn position(&self, address: CellAddress) -> Option<usize> {
        self.positions.get(&address).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(content_hash("ADD r1, r2"), content_hash("ADD r1, r2"));
        assert_ne!(content_hash("ADD"), content_hash("SUB"));
        assert_ne!(content_hash(""), SENTINEL);
    }
}
