//! Layout analysis parameters.
//!
//! Contains `LayoutParams` and the fixed thresholds of the clustering stages.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Default maximum character-adjacency distance, relative to font size.
pub const DEFAULT_CHAR_MARGIN: f64 = 0.9;

/// Two lines of one paragraph are at most this far apart along the line
/// advance direction, relative to font size.
pub const LINE_MARGIN: f64 = 1.7;

/// Half-extent of the neighbour search box, relative to font size.
pub(crate) const SEARCH_RADIUS: f64 = 1.0;

/// Parameters for layout analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// If a character's successor lies further ahead than this it starts a new
    /// segment. Specified relative to the font size of the character.
    pub char_margin: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            char_margin: DEFAULT_CHAR_MARGIN,
        }
    }
}

impl LayoutParams {
    /// Creates layout parameters, rejecting non-finite or non-positive margins.
    pub fn new(char_margin: f64) -> Result<Self> {
        let params = Self { char_margin };
        params.validate()?;
        Ok(params)
    }

    /// Checks parameters that may have been deserialized or edited in place.
    pub fn validate(&self) -> Result<()> {
        if !self.char_margin.is_finite() || self.char_margin <= 0.0 {
            return Err(LayoutError::InvalidParams(format!(
                "char_margin must be a positive finite number, got {}",
                self.char_margin
            )));
        }
        Ok(())
    }

    /// Half-extent of the neighbour search box for a glyph of `font_size`.
    pub(crate) fn search_radius(&self, font_size: f64) -> f64 {
        font_size * SEARCH_RADIUS.max(self.char_margin)
    }
}
