//! Connected components over an adjacency relation.
//!
//! Every clustering stage builds a graph (character links, segment
//! adjacency, row alignment, column overlap) and keeps its components.
//! Components come out with members in ascending index order and are
//! themselves ordered by their smallest member.

use rustc_hash::FxHashMap;

/// Disjoint-set forest with path halving and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of `x`'s set.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `x` and `y`. Returns `false` if already merged.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return false;
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry,
            std::cmp::Ordering::Greater => self.parent[ry] = rx,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] = self.rank[rx].saturating_add(1);
            }
        }
        true
    }

    /// All sets, members ascending, sets ordered by smallest member.
    pub fn into_components(mut self) -> Vec<Vec<usize>> {
        let mut slot_of_root: FxHashMap<usize, usize> = FxHashMap::default();
        let mut components: Vec<Vec<usize>> = Vec::new();
        for x in 0..self.len() {
            let root = self.find(x);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(x);
        }
        components
    }
}

/// Components of `len` nodes joined by explicit edges.
pub fn components_from_edges<I>(len: usize, edges: I) -> Vec<Vec<usize>>
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let mut sets = UnionFind::new(len);
    for (a, b) in edges {
        sets.union(a, b);
    }
    sets.into_components()
}

/// Components of `len` nodes under a symmetric pairwise predicate.
///
/// The predicate is evaluated once per unordered pair `(i, j)` with `i < j`.
pub fn connected_components<F>(len: usize, mut adjacent: F) -> Vec<Vec<usize>>
where
    F: FnMut(usize, usize) -> bool,
{
    let mut sets = UnionFind::new(len);
    for i in 0..len {
        for j in (i + 1)..len {
            if adjacent(i, j) {
                sets.union(i, j);
            }
        }
    }
    sets.into_components()
}
