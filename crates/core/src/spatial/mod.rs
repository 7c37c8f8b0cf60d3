//! Spatial indexing for nearest-neighbour pruning.

pub mod quadtree;

pub use quadtree::{NODE_CAPACITY, QuadTree};
