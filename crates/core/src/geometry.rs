//! Geometric primitives for page layout.
//!
//! Provides:
//! - `BoundingBox`: validated, immutable axis-aligned rectangle
//! - `Span`: one-dimensional interval used for row/column alignment
//! - `Orientation`: reading direction of a glyph run
//!
//! Page coordinates grow to the right (x) and downwards (y), so a box's
//! `top` is never greater than its `bottom`.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Small epsilon for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// A 2D point (or vector) in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `self` to `other`.
    pub fn to(self, other: Point) -> Point {
        Point::new(other.x - self.x, other.y - self.y)
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x.mul_add(other.x, self.y * other.y)
    }
}

/// Horizontal or vertical page axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Reading direction of a run of glyphs.
///
/// `East` is ordinary left-to-right text and `North` runs down the page,
/// glyph above glyph. The clockwise successor of a direction is the
/// direction in which consecutive lines of a paragraph advance: East text
/// stacks its lines downward (North), North text stacks its columns to the
/// left (West).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    East,
    North,
    West,
    South,
}

impl Orientation {
    /// Unit direction vector in page coordinates.
    pub const fn direction(self) -> Point {
        match self {
            Orientation::East => Point::new(1.0, 0.0),
            Orientation::North => Point::new(0.0, 1.0),
            Orientation::West => Point::new(-1.0, 0.0),
            Orientation::South => Point::new(0.0, -1.0),
        }
    }

    /// The orientation rotated 90 degrees clockwise on the page.
    pub const fn clockwise(self) -> Orientation {
        match self {
            Orientation::East => Orientation::North,
            Orientation::North => Orientation::West,
            Orientation::West => Orientation::South,
            Orientation::South => Orientation::East,
        }
    }

    /// Page axis the reading direction runs along.
    pub const fn axis(self) -> Axis {
        match self {
            Orientation::East | Orientation::West => Axis::Horizontal,
            Orientation::North | Orientation::South => Axis::Vertical,
        }
    }
}

/// Trait for objects that have a bounding box.
pub trait HasBBox {
    fn bbox(&self) -> BoundingBox;

    fn width(&self) -> f64 {
        self.bbox().width()
    }

    fn height(&self) -> f64 {
        self.bbox().height()
    }

    fn center(&self) -> Point {
        self.bbox().center()
    }
}

/// Axis-aligned rectangle with `left <= right` and `top <= bottom`.
///
/// Deserialization goes through [`BoundingBox::new`], so persisted boxes are
/// validated like constructed ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoxEdges")]
pub struct BoundingBox {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl BoundingBox {
    /// Creates a bounding box, rejecting inverted edges.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        // `!(a <= b)` also rejects NaN edges
        if !(left <= right) || !(top <= bottom) {
            return Err(LayoutError::InvalidBoundingBox {
                left,
                top,
                right,
                bottom,
            });
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Builds a box from edges already known to be ordered.
    pub(crate) const fn from_ordered(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box of the given size centered on `center`.
    pub fn around(center: Point, half_width: f64, half_height: f64) -> Result<Self> {
        Self::new(
            center.x - half_width,
            center.y - half_height,
            center.x + half_width,
            center.y + half_height,
        )
    }

    pub const fn left(&self) -> f64 {
        self.left
    }

    pub const fn top(&self) -> f64 {
        self.top
    }

    pub const fn right(&self) -> f64 {
        self.right
    }

    pub const fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Union of a sequence of boxes, `None` when the sequence is empty.
    pub fn union_all<I>(boxes: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = BoundingBox>,
    {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    /// Edge-inclusive intersection test.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    /// Edge-inclusive point containment.
    pub fn contains_point(&self, p: Point) -> bool {
        self.left <= p.x && p.x <= self.right && self.top <= p.y && p.y <= self.bottom
    }

    /// Edge-inclusive box-in-box containment.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.left <= other.left
            && other.right <= self.right
            && self.top <= other.top
            && other.bottom <= self.bottom
    }

    pub fn horizontal_span(&self) -> Span {
        Span {
            min: self.left,
            max: self.right,
        }
    }

    pub fn vertical_span(&self) -> Span {
        Span {
            min: self.top,
            max: self.bottom,
        }
    }

    pub fn span(&self, axis: Axis) -> Span {
        match axis {
            Axis::Horizontal => self.horizontal_span(),
            Axis::Vertical => self.vertical_span(),
        }
    }
}

#[derive(Deserialize)]
struct BoxEdges {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl TryFrom<BoxEdges> for BoundingBox {
    type Error = LayoutError;

    fn try_from(e: BoxEdges) -> Result<Self> {
        BoundingBox::new(e.left, e.top, e.right, e.bottom)
    }
}

/// Closed one-dimensional interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SpanEnds")]
pub struct Span {
    min: f64,
    max: f64,
}

impl Span {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min <= max) {
            return Err(LayoutError::InvalidSpan { min, max });
        }
        Ok(Self { min, max })
    }

    pub const fn min(&self) -> f64 {
        self.min
    }

    pub const fn max(&self) -> f64 {
        self.max
    }

    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn union(&self, other: &Span) -> Span {
        Span {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Overlapping part of both spans; zero-width when they are disjoint.
    pub fn intersection(&self, other: &Span) -> Span {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if min <= max {
            Span { min, max }
        } else {
            Span { min, max: min }
        }
    }

    /// Intersection size over union size, 0 when the union is empty.
    pub fn overlap_ratio(&self, other: &Span) -> f64 {
        let union = self.union(other).size();
        if union <= 0.0 {
            return 0.0;
        }
        self.intersection(other).size() / union
    }

    /// Edge-inclusive intersection test.
    pub fn intersects(&self, other: &Span) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    pub fn contains_value(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }

    /// Span-in-span containment.
    pub fn contains(&self, other: &Span) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Whether the center of `other` lies within this span.
    pub fn contains_center_of(&self, other: &Span) -> bool {
        self.contains_value(other.center())
    }
}

#[derive(Deserialize)]
struct SpanEnds {
    min: f64,
    max: f64,
}

impl TryFrom<SpanEnds> for Span {
    type Error = LayoutError;

    fn try_from(e: SpanEnds) -> Result<Self> {
        Span::new(e.min, e.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(l: f64, t: f64, r: f64, b: f64) -> BoundingBox {
        BoundingBox::new(l, t, r, b).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_edges() {
        assert!(BoundingBox::new(10.0, 0.0, 5.0, 5.0).is_err());
        assert!(BoundingBox::new(0.0, 10.0, 5.0, 5.0).is_err());
        assert!(BoundingBox::new(0.0, 0.0, f64::NAN, 5.0).is_err());
        assert!(BoundingBox::new(3.0, 3.0, 3.0, 3.0).is_ok());
    }

    #[test]
    fn test_intersects_is_edge_inclusive() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(10.0, 10.0, 20.0, 20.0);
        let c = bbox(10.5, 0.0, 20.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!c.intersects(&a));
    }

    #[test]
    fn test_containment_laws() {
        let boxes = [
            bbox(0.0, 0.0, 10.0, 10.0),
            bbox(5.0, 5.0, 6.0, 30.0),
            bbox(-4.0, 2.0, -1.0, 3.0),
            bbox(7.0, 7.0, 7.0, 7.0),
        ];
        for a in &boxes {
            assert!(a.contains(a));
            for b in &boxes {
                let u = a.union(b);
                assert!(u.contains(a));
                assert!(u.contains(b));
                assert_eq!(a.intersects(b), b.intersects(a));
            }
        }
    }

    #[test]
    fn test_contains_point_on_edge() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains_point(Point::new(10.0, 0.0)));
        assert!(!a.contains_point(Point::new(10.01, 5.0)));
        assert_eq!(a.center(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_span_laws() {
        let spans = [
            Span::new(0.0, 10.0).unwrap(),
            Span::new(5.0, 15.0).unwrap(),
            Span::new(20.0, 21.0).unwrap(),
            Span::new(3.0, 3.0).unwrap(),
        ];
        for a in &spans {
            if a.size() > 0.0 {
                assert_eq!(a.overlap_ratio(a), 1.0);
            }
            for b in &spans {
                let r = a.overlap_ratio(b);
                assert!((0.0..=1.0).contains(&r));
                assert!(a.union(b).size() >= a.size().max(b.size()));
                assert!(a.intersection(b).size() <= a.size().min(b.size()));
            }
        }
    }

    #[test]
    fn test_span_disjoint_intersection_is_empty() {
        let a = Span::new(0.0, 1.0).unwrap();
        let b = Span::new(2.0, 3.0).unwrap();
        assert_eq!(a.intersection(&b).size(), 0.0);
        assert_eq!(a.overlap_ratio(&b), 0.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_span_zero_union_ratio() {
        let p = Span::new(4.0, 4.0).unwrap();
        assert_eq!(p.overlap_ratio(&p), 0.0);
    }

    #[test]
    fn test_contains_center_of_tolerates_unequal_heights() {
        let tall = Span::new(0.0, 30.0).unwrap();
        let short = Span::new(10.0, 14.0).unwrap();
        assert!(tall.contains_center_of(&short));
        assert!(!short.contains_center_of(&tall));
    }

    #[test]
    fn test_orientation_cycle() {
        let mut o = Orientation::East;
        for _ in 0..4 {
            let d = o.direction();
            let n = o.clockwise().direction();
            assert_eq!(d.dot(n), 0.0);
            o = o.clockwise();
        }
        assert_eq!(o, Orientation::East);
        assert_eq!(Orientation::East.clockwise(), Orientation::North);
        assert_eq!(Orientation::North.direction(), Point::new(0.0, 1.0));
        assert_eq!(Orientation::North.clockwise().direction(), Point::new(-1.0, 0.0));
        assert_eq!(Orientation::North.axis(), Axis::Vertical);
    }

    #[test]
    fn test_deserialize_validates_edges() {
        let ok: BoundingBox =
            serde_json::from_str(r#"{"left":1.0,"top":2.0,"right":3.0,"bottom":4.0}"#).unwrap();
        assert_eq!(ok, bbox(1.0, 2.0, 3.0, 4.0));
        assert!(
            serde_json::from_str::<BoundingBox>(r#"{"left":5.0,"top":0.0,"right":1.0,"bottom":1.0}"#)
                .is_err()
        );

        let span: Span = serde_json::from_str(r#"{"min":0.0,"max":2.0}"#).unwrap();
        assert_eq!(span.size(), 2.0);
        assert!(serde_json::from_str::<Span>(r#"{"min":3.0,"max":2.0}"#).is_err());
    }
}
