//! Stage B: segments to blocks.
//!
//! A segment continues another when it picks up the character stream right
//! where the other left off and sits one line further along the line advance
//! direction, in the same column, with identical font size, orientation and
//! color. Prevent-bindings veto individual continuations.

use itertools::Itertools;
use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{LayoutError, Result};
use crate::geometry::{BoundingBox, EPSILON, HasBBox, approx_eq};

use super::components::components_from_edges;
use super::params::LINE_MARGIN;
use super::types::{PreventBinding, TextBlock, TextSegment};

/// How often one prevent-binding vetoed a continuation on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingUse {
    pub binding: PreventBinding,
    pub matches: usize,
}

/// Outcome of clustering one page.
///
/// Each prevent-binding has to veto exactly one continuation. Bindings that
/// matched zero or several times are authoring errors; they are reported here
/// and clustering still completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub segments: usize,
    pub blocks: usize,
    pub rows: usize,
    pub bindings: Vec<BindingUse>,
}

impl ClusterReport {
    /// Bindings that did not match exactly once.
    pub fn inconsistent_bindings(&self) -> impl Iterator<Item = &BindingUse> {
        self.bindings.iter().filter(|u| u.matches != 1)
    }

    pub fn is_consistent(&self) -> bool {
        self.inconsistent_bindings().next().is_none()
    }

    /// Fails with the first inconsistent binding, for callers that treat them
    /// as fatal.
    pub fn into_result(self) -> Result<Self> {
        if let Some(u) = self.inconsistent_bindings().next() {
            return Err(LayoutError::UnmatchedPreventBinding {
                upper: u.binding.upper.clone(),
                lower: u.binding.lower.clone(),
                matches: u.matches,
            });
        }
        Ok(self)
    }
}

/// Whether `lower` continues `upper` geometrically and typographically.
///
/// The character-stream condition is checked by the caller.
pub fn continues(upper: &TextSegment, lower: &TextSegment) -> bool {
    if upper.orientation != lower.orientation
        || upper.color != lower.color
        || !approx_eq(upper.font_size, lower.font_size, EPSILON)
    {
        return false;
    }

    let along = upper.orientation.axis();
    if !upper.bbox.span(along).intersects(&lower.bbox.span(along)) {
        return false;
    }

    let advance = upper.orientation.clockwise().direction();
    let distance = upper.center().to(lower.center()).dot(advance);
    distance > 0.0 && distance < LINE_MARGIN * upper.font_size
}

/// Groups segments into blocks with `(row, col)` still unassigned.
///
/// Returns the blocks and, for each binding in order, how often it vetoed a
/// continuation.
pub fn group_segments(
    segments: &[TextSegment],
    bindings: &[PreventBinding],
) -> (Vec<TextBlock>, Vec<BindingUse>) {
    let starts: FxHashMap<usize, usize> = segments
        .iter()
        .enumerate()
        .map(|(i, s)| (s.first_char(), i))
        .collect();

    let mut matches = vec![0usize; bindings.len()];
    let mut edges = Vec::new();
    for (ai, upper) in segments.iter().enumerate() {
        let Some(&bi) = starts.get(&(upper.last_char() + 1)) else {
            continue;
        };
        if bi == ai || !continues(upper, &segments[bi]) {
            continue;
        }
        let lower = &segments[bi];
        if let Some(k) = veto(bindings, &matches, upper, lower) {
            matches[k] += 1;
            trace!(upper = %upper.text, lower = %lower.text, "continuation vetoed");
            continue;
        }
        edges.push((ai, bi));
    }

    let blocks: Vec<TextBlock> = components_from_edges(segments.len(), edges)
        .into_iter()
        .filter_map(|members| assemble_block(segments, members))
        .collect();
    debug!(segments = segments.len(), blocks = blocks.len(), "grouped segments");

    let uses: Vec<BindingUse> = bindings
        .iter()
        .cloned()
        .zip(matches)
        .map(|(binding, matches)| BindingUse { binding, matches })
        .collect();
    for u in uses.iter().filter(|u| u.matches != 1) {
        warn!(
            upper = %u.binding.upper,
            lower = %u.binding.lower,
            matches = u.matches,
            "prevent-binding did not match exactly once"
        );
    }
    (blocks, uses)
}

/// Binding vetoing `upper -> lower`, preferring one not yet consumed.
fn veto(
    bindings: &[PreventBinding],
    matches: &[usize],
    upper: &TextSegment,
    lower: &TextSegment,
) -> Option<usize> {
    let mut candidates = bindings
        .iter()
        .enumerate()
        .filter(|(_, b)| b.matches(upper, lower))
        .map(|(k, _)| k)
        .peekable();
    let first = *candidates.peek()?;
    Some(candidates.find(|&k| matches[k] == 0).unwrap_or(first))
}

/// Orders one component by line and joins the lines with newlines.
fn assemble_block(segments: &[TextSegment], mut members: Vec<usize>) -> Option<TextBlock> {
    let first = &segments[members[0]];
    let advance = first.orientation.clockwise().direction();
    members.sort_by_key(|&i| {
        (
            OrderedFloat(segments[i].center().dot(advance)),
            segments[i].first_char(),
        )
    });

    let head = &segments[members[0]];
    let bbox = BoundingBox::union_all(members.iter().map(|&i| segments[i].bbox))?;
    Some(TextBlock {
        text: members.iter().map(|&i| segments[i].text.as_str()).join("\n"),
        bbox,
        font_size: head.font_size,
        orientation: head.orientation,
        segments: members,
        row: 0,
        col: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Orientation;

    fn segment(text: &str, first: usize, left: f64, top: f64) -> TextSegment {
        let chars: Vec<usize> = (first..first + text.chars().count()).collect();
        TextSegment {
            chars,
            text: text.to_string(),
            bbox: BoundingBox::new(left, top, left + 6.0 * text.len() as f64, top + 10.0)
                .unwrap(),
            font_size: 10.0,
            color: 0,
            orientation: Orientation::East,
        }
    }

    #[test]
    fn test_stacked_lines_join() {
        let segs = vec![segment("Load", 0, 10.0, 10.0), segment("word", 4, 10.0, 22.0)];
        let (blocks, uses) = group_segments(&segs, &[]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Load\nword");
        assert_eq!(blocks[0].segments, vec![0, 1]);
        assert!(uses.is_empty());
    }

    #[test]
    fn test_stream_gap_prevents_join() {
        let segs = vec![segment("Load", 0, 10.0, 10.0), segment("word", 5, 10.0, 22.0)];
        let (blocks, _) = group_segments(&segs, &[]);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_far_lines_stay_apart() {
        let segs = vec![segment("Load", 0, 10.0, 10.0), segment("word", 4, 10.0, 40.0)];
        let (blocks, _) = group_segments(&segs, &[]);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_font_and_color_must_match() {
        let mut lower = segment("word", 4, 10.0, 22.0);
        lower.font_size = 12.0;
        assert!(!continues(&segment("Load", 0, 10.0, 10.0), &lower));

        let mut lower = segment("word", 4, 10.0, 22.0);
        lower.color = 0xff0000;
        assert!(!continues(&segment("Load", 0, 10.0, 10.0), &lower));
    }

    #[test]
    fn test_other_column_does_not_continue() {
        let upper = segment("Load", 0, 10.0, 10.0);
        let lower = segment("word", 4, 100.0, 22.0);
        assert!(!continues(&upper, &lower));
    }

    #[test]
    fn test_binding_vetoes_once() {
        let segs = vec![segment("Load", 0, 10.0, 10.0), segment("word", 4, 10.0, 22.0)];
        let bindings = vec![PreventBinding::new("Load", "word")];
        let (blocks, uses) = group_segments(&segs, &bindings);
        assert_eq!(blocks.len(), 2);
        assert_eq!(uses[0].matches, 1);
    }

    #[test]
    fn test_unused_binding_reported() {
        let segs = vec![segment("Load", 0, 10.0, 10.0), segment("word", 4, 10.0, 22.0)];
        let bindings = vec![PreventBinding::new("Store", "word")];
        let (blocks, uses) = group_segments(&segs, &bindings);
        assert_eq!(blocks.len(), 1);
        let report = ClusterReport {
            bindings: uses,
            ..ClusterReport::default()
        };
        assert!(!report.is_consistent());
        assert!(matches!(
            report.into_result(),
            Err(LayoutError::UnmatchedPreventBinding { matches: 0, .. })
        ));
    }

    #[test]
    fn test_duplicate_bindings_each_consume_once() {
        let segs = vec![
            segment("ab", 0, 10.0, 10.0),
            segment("cd", 2, 10.0, 22.0),
            segment("ab", 4, 100.0, 10.0),
            segment("cd", 6, 100.0, 22.0),
        ];
        let bindings = vec![PreventBinding::new("ab", "cd"), PreventBinding::new("ab", "cd")];
        let (blocks, uses) = group_segments(&segs, &bindings);
        assert_eq!(blocks.len(), 4);
        assert!(uses.iter().all(|u| u.matches == 1));
    }
}
