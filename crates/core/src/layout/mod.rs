//! Layout analysis: positioned characters to table rows and columns.
//!
//! The pipeline runs in three stages over one page:
//! - `segments`: characters linked along their reading direction
//! - `blocks`: segments stacked into paragraphs
//! - `rows`: blocks aligned into rows and columns
//!
//! All stages share the connected-components utility in `components`.

pub mod blocks;
pub mod components;
pub mod page;
pub mod params;
pub mod rows;
pub mod segments;
pub mod types;

pub use blocks::{BindingUse, ClusterReport};
pub use page::Page;
pub use params::{DEFAULT_CHAR_MARGIN, LINE_MARGIN, LayoutParams};
pub use types::{Character, PreventBinding, TableRow, TextBlock, TextSegment};
