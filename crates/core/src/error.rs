//! Error types for glyphgrid layout and patch operations.

use thiserror::Error;

/// Primary error type for clustering, patching and revision matching.
///
/// Lookup misses are not errors: cell lookups return `None` and failed patch
/// transfers are collected in a separate catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("invalid bounding box ({left}, {top}, {right}, {bottom})")]
    InvalidBoundingBox {
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    },

    #[error("invalid span [{min}, {max}]")]
    InvalidSpan { min: f64, max: f64 },

    #[error("invalid layout parameter: {0}")]
    InvalidParams(String),

    #[error("prevent-binding {upper:?} / {lower:?} matched {matches} times, expected exactly once")]
    UnmatchedPreventBinding {
        upper: String,
        lower: String,
        matches: usize,
    },

    #[error("no cell at row {row}, col {col}")]
    CellNotFound { row: isize, col: isize },

    #[error("patch at row {row}, col {col} expected {expected:?}, found {found:?}")]
    PatchMismatch {
        row: isize,
        col: isize,
        expected: String,
        found: String,
    },

    #[error("row {row} has {found} columns, expected {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("page {0} not found")]
    PageNotFound(usize),

    #[error("patch catalog belongs to {found}, expected {expected}")]
    CatalogMismatch { expected: String, found: String },
}

/// Convenience Result type alias for LayoutError.
pub type Result<T> = std::result::Result<T, LayoutError>;
