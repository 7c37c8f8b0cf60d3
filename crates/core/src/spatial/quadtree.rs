//! Point quad-tree.
//!
//! Nodes live in an arena and refer to their children by index. A leaf that
//! grows past `NODE_CAPACITY` points splits into four equal quadrants around
//! its geometric center, regardless of where the points actually lie.

use crate::geometry::{BoundingBox, Point};

/// Maximum number of points a leaf holds before it subdivides.
pub const NODE_CAPACITY: usize = 16;

/// Leaves narrower than this never subdivide, so coincident points cannot
/// force unbounded splitting.
const MIN_NODE_EXTENT: f64 = 1e-6;

/// Child slots, in `[north-west, north-east, south-west, south-east]` order.
type Children = [usize; 4];

#[derive(Debug, Clone)]
struct QuadNode<T> {
    region: BoundingBox,
    points: Vec<(Point, T)>,
    children: Option<Children>,
}

impl<T> QuadNode<T> {
    fn leaf(region: BoundingBox) -> Self {
        Self {
            region,
            points: Vec::new(),
            children: None,
        }
    }

    fn can_split(&self) -> bool {
        self.region.width() > MIN_NODE_EXTENT && self.region.height() > MIN_NODE_EXTENT
    }
}

/// Point quad-tree over a fixed region.
#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    nodes: Vec<QuadNode<T>>,
    len: usize,
}

impl<T> QuadTree<T> {
    /// Creates an empty tree covering `region`.
    pub fn new(region: BoundingBox) -> Self {
        Self {
            nodes: vec![QuadNode::leaf(region)],
            len: 0,
        }
    }

    pub fn region(&self) -> BoundingBox {
        self.nodes[0].region
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of arena nodes, including internal ones.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Inserts a point. Returns `false` when it lies outside the tree region.
    pub fn insert(&mut self, point: Point, value: T) -> bool {
        if !self.region().contains_point(point) {
            return false;
        }

        let mut idx = 0;
        while let Some(children) = self.nodes[idx].children {
            idx = children[quadrant_of(&self.nodes[idx].region, point)];
        }

        self.nodes[idx].points.push((point, value));
        self.len += 1;
        if self.nodes[idx].points.len() > NODE_CAPACITY && self.nodes[idx].can_split() {
            self.subdivide(idx);
        }
        true
    }

    /// All values whose point lies inside `area` (edges included).
    pub fn query(&self, area: &BoundingBox) -> Vec<&T> {
        let mut found = Vec::new();
        self.collect(0, area, &mut found);
        found
    }

    fn collect<'a>(&'a self, idx: usize, area: &BoundingBox, found: &mut Vec<&'a T>) {
        let node = &self.nodes[idx];
        if !node.region.intersects(area) {
            return;
        }
        match node.children {
            Some(children) => {
                for child in children {
                    self.collect(child, area, found);
                }
            }
            None => found.extend(
                node.points
                    .iter()
                    .filter(|(p, _)| area.contains_point(*p))
                    .map(|(_, v)| v),
            ),
        }
    }

    fn subdivide(&mut self, idx: usize) {
        let region = self.nodes[idx].region;
        let mid = region.center();
        let quadrants = [
            BoundingBox::from_ordered(region.left(), region.top(), mid.x, mid.y),
            BoundingBox::from_ordered(mid.x, region.top(), region.right(), mid.y),
            BoundingBox::from_ordered(region.left(), mid.y, mid.x, region.bottom()),
            BoundingBox::from_ordered(mid.x, mid.y, region.right(), region.bottom()),
        ];

        let first = self.nodes.len();
        self.nodes.extend(quadrants.into_iter().map(QuadNode::leaf));
        let children = [first, first + 1, first + 2, first + 3];

        let points = std::mem::take(&mut self.nodes[idx].points);
        self.nodes[idx].children = Some(children);
        for (point, value) in points {
            let child = children[quadrant_of(&region, point)];
            self.nodes[child].points.push((point, value));
        }

        for child in children {
            if self.nodes[child].points.len() > NODE_CAPACITY && self.nodes[child].can_split() {
                self.subdivide(child);
            }
        }
    }
}

/// Quadrant slot of `point` within `region`; points on a center line go
/// east/south.
fn quadrant_of(region: &BoundingBox, point: Point) -> usize {
    let mid = region.center();
    let east = usize::from(point.x >= mid.x);
    let south = usize::from(point.y >= mid.y);
    south * 2 + east
}
