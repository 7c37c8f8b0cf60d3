//! Layout element types: characters, segments, blocks and rows.
//!
//! Elements refer to each other by position. A segment lists indices into
//! its page's characters and a block lists indices into the page's segments,
//! so a clustered page is a plain value that can be moved or serialized.

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, HasBBox, Orientation};

/// A positioned glyph, as delivered by the rasterizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub code_point: u32,
    pub text: String,
    pub font_size: f64,
    /// Fingerprint of the fill color; only compared for equality.
    pub color: u64,
    pub orientation: Orientation,
    pub bbox: BoundingBox,
}

impl Character {
    /// Creates an East-oriented character with color fingerprint 0.
    ///
    /// The code point is taken from the first scalar of `text` (0 when empty).
    pub fn new(text: &str, bbox: BoundingBox, font_size: f64) -> Self {
        Self {
            code_point: text.chars().next().map_or(0, u32::from),
            text: text.to_string(),
            font_size,
            color: 0,
            orientation: Orientation::East,
            bbox,
        }
    }

    /// Sets the reading direction (default: East).
    pub const fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the fill-color fingerprint (default: 0).
    pub const fn with_color(mut self, color: u64) -> Self {
        self.color = color;
        self
    }
}

impl HasBBox for Character {
    fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

/// A run of characters on one line, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSegment {
    /// Indices into the page's characters, in reading order. Never empty.
    pub chars: Vec<usize>,
    pub text: String,
    pub bbox: BoundingBox,
    pub font_size: f64,
    pub color: u64,
    pub orientation: Orientation,
}

impl TextSegment {
    /// Index of the first character in reading order.
    pub fn first_char(&self) -> usize {
        self.chars.first().copied().unwrap_or_default()
    }

    /// Index of the last character in reading order.
    pub fn last_char(&self) -> usize {
        self.chars.last().copied().unwrap_or_default()
    }
}

impl HasBBox for TextSegment {
    fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

/// A paragraph: one or more segments joined by newlines.
///
/// After clustering, `row` and `col` hold the block's table coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Indices into the page's segments, in line order.
    pub segments: Vec<usize>,
    pub text: String,
    pub bbox: BoundingBox,
    pub font_size: f64,
    pub orientation: Orientation,
    pub row: usize,
    pub col: usize,
}

impl HasBBox for TextBlock {
    fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

/// One table row: blocks ordered left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub blocks: Vec<TextBlock>,
    pub bbox: BoundingBox,
}

impl TableRow {
    /// Builds a row from blocks, `None` when there are no blocks.
    pub fn from_blocks(blocks: Vec<TextBlock>) -> Option<Self> {
        let bbox = BoundingBox::union_all(blocks.iter().map(|b| b.bbox))?;
        Some(Self { blocks, bbox })
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Cell texts of this row, left to right.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.text.as_str())
    }
}

impl HasBBox for TableRow {
    fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

/// Two segment texts that must never be merged into one block, even when
/// they satisfy the adjacency rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreventBinding {
    /// Text of the earlier segment.
    pub upper: String,
    /// Text of the segment that would otherwise continue it.
    pub lower: String,
}

impl PreventBinding {
    pub fn new(upper: impl Into<String>, lower: impl Into<String>) -> Self {
        Self {
            upper: upper.into(),
            lower: lower.into(),
        }
    }

    pub(crate) fn matches(&self, upper: &TextSegment, lower: &TextSegment) -> bool {
        self.upper == upper.text && self.lower == lower.text
    }
}
