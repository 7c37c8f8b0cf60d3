//! Stage A: characters to segments.
//!
//! Every character links to at most one successor: the nearest character
//! ahead of it along its own reading direction that sits on the same line.
//! Connected components over these links become segments.

use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::geometry::{BoundingBox, HasBBox};
use crate::spatial::QuadTree;

use super::components::components_from_edges;
use super::params::LayoutParams;
use super::types::{Character, TextSegment};

/// Groups characters into segments, ordered by their first character index.
///
/// `page_box` seeds the spatial index region; characters outside the page
/// are still indexed.
pub fn group_characters(
    params: &LayoutParams,
    page_box: BoundingBox,
    chars: &[Character],
) -> Vec<TextSegment> {
    if chars.is_empty() {
        return Vec::new();
    }

    let region = chars.iter().fold(page_box, |acc, c| acc.union(&c.bbox));
    let mut tree = QuadTree::new(region);
    for (i, c) in chars.iter().enumerate() {
        if !tree.insert(c.center(), i) {
            trace!(index = i, "character center outside spatial index region");
        }
    }

    let links: Vec<(usize, usize)> = (0..chars.len())
        .filter_map(|i| successor(params, &tree, chars, i).map(|j| (i, j)))
        .collect();
    debug!(chars = chars.len(), links = links.len(), "linked characters");

    let mut segments: Vec<TextSegment> = components_from_edges(chars.len(), links)
        .into_iter()
        .filter_map(|members| assemble_segment(chars, members))
        .collect();
    segments.sort_by_key(TextSegment::first_char);
    segments
}

/// Nearest same-line character ahead of `chars[i]`.
fn successor(
    params: &LayoutParams,
    tree: &QuadTree<usize>,
    chars: &[Character],
    i: usize,
) -> Option<usize> {
    let c = &chars[i];
    let origin = c.center();
    let radius = params.search_radius(c.font_size);
    let search = BoundingBox::around(origin, radius, radius).ok()?;
    let forward = c.orientation.direction();
    let across = c.orientation.clockwise().direction();
    let limit = params.char_margin * c.font_size;

    tree.query(&search)
        .into_iter()
        .copied()
        .filter(|&j| j != i && chars[j].orientation == c.orientation)
        .filter_map(|j| {
            let d = origin.to(chars[j].center());
            let ahead = d.dot(forward);
            let aside = d.dot(across);
            (ahead > 0.0 && ahead < limit && ahead > aside.abs()).then_some((j, ahead))
        })
        .min_by_key(|&(j, ahead)| (OrderedFloat(ahead), j))
        .map(|(j, _)| j)
}

/// Orders one component in reading order and concatenates its text.
fn assemble_segment(chars: &[Character], mut members: Vec<usize>) -> Option<TextSegment> {
    let forward = chars[members[0]].orientation.direction();
    let projection = |i: usize| OrderedFloat(chars[i].center().dot(forward));
    members.sort_by_key(|&i| (projection(i), i));

    let text: String = members.iter().map(|&i| chars[i].text.as_str()).collect();
    if text.is_empty() {
        return None;
    }

    let first = &chars[members[0]];
    let bbox = BoundingBox::union_all(members.iter().map(|&i| chars[i].bbox))?;
    Some(TextSegment {
        text,
        bbox,
        font_size: first.font_size,
        color: first.color,
        orientation: first.orientation,
        chars: members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Orientation;

    fn page() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 200.0, 200.0).unwrap()
    }

    fn glyph(text: &str, left: f64, top: f64) -> Character {
        Character::new(
            text,
            BoundingBox::new(left, top, left + 6.0, top + 10.0).unwrap(),
            10.0,
        )
    }

    #[test]
    fn test_adjacent_characters_form_one_segment() {
        let chars = vec![glyph("I", 10.0, 10.0), glyph("n", 16.0, 10.0)];
        let segments = group_characters(&LayoutParams::default(), page(), &chars);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "In");
        assert_eq!(segments[0].chars, vec![0, 1]);
    }

    #[test]
    fn test_distant_characters_split() {
        let chars = vec![glyph("I", 10.0, 10.0), glyph("n", 20.0, 10.0)];
        let segments = group_characters(&LayoutParams::default(), page(), &chars);
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["I", "n"]);
    }

    #[test]
    fn test_reading_order_not_stream_order() {
        // Stream order is reversed; the segment still reads left to right.
        let chars = vec![glyph("b", 16.0, 10.0), glyph("a", 10.0, 10.0)];
        let segments = group_characters(&LayoutParams::default(), page(), &chars);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "ab");
        assert_eq!(segments[0].chars, vec![1, 0]);
    }

    #[test]
    fn test_orientation_mismatch_blocks_link() {
        let chars = vec![
            glyph("a", 10.0, 10.0),
            glyph("b", 16.0, 10.0).with_orientation(Orientation::West),
        ];
        let segments = group_characters(&LayoutParams::default(), page(), &chars);
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_west_text_reads_right_to_left() {
        let chars = vec![
            glyph("x", 16.0, 10.0).with_orientation(Orientation::West),
            glyph("y", 10.0, 10.0).with_orientation(Orientation::West),
        ];
        let segments = group_characters(&LayoutParams::default(), page(), &chars);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "xy");
    }

    #[test]
    fn test_empty_text_segments_dropped() {
        let chars = vec![glyph("", 10.0, 10.0), glyph("z", 100.0, 10.0)];
        let segments = group_characters(&LayoutParams::default(), page(), &chars);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "z");
    }

    #[test]
    fn test_wider_margin_joins_gap() {
        let chars = vec![glyph("I", 10.0, 10.0), glyph("n", 22.0, 10.0)];
        let params = LayoutParams::new(1.5).unwrap();
        let segments = group_characters(&params, page(), &chars);
        assert_eq!(segments.len(), 1);
    }
}
