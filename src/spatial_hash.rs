//! Grid-based vertex set with epsilon-aware deduplication.
//!
//! Space is bucketed into cubes twice the merge tolerance wide, so any
//! vertex within tolerance of a query lives in the query's cube or one of its
//! 26 neighbours. Only those buckets are scanned.
//!
//! Coordinates are never rounded: a stored vertex keeps the exact position of
//! the first point that claimed it.

use std::cmp::Ordering;

use glam::DVec3;
use rustc_hash::FxHashMap;

/// Deduplicating point set. Points within `tolerance` of a stored vertex
/// merge into it.
#[derive(Clone, Debug)]
pub struct VertexSet {
    cells: FxHashMap<(i64, i64, i64), Vec<usize>>,
    points: Vec<DVec3>,
    cell_size: f64,
    tolerance: f64,
}

impl VertexSet {
    /// Create an empty set with the given merge tolerance.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            cells: FxHashMap::default(),
            points: Vec::new(),
            cell_size: tolerance * 2.0,
            tolerance,
        }
    }

    /// Map a point to its grid cell indices.
    #[inline]
    fn cell_coords(&self, p: DVec3) -> (i64, i64, i64) {
        #[expect(clippy::cast_possible_truncation)]
        let discretize = |v: f64| (v / self.cell_size).floor() as i64;
        (discretize(p.x), discretize(p.y), discretize(p.z))
    }

    /// Index of a stored vertex within tolerance of `point`, if any.
    #[must_use]
    pub fn find(&self, point: DVec3) -> Option<usize> {
        let (cx, cy, cz) = self.cell_coords(point);

        let mut best: Option<(usize, f64)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(indices) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &idx in indices {
                        let dist = (self.points[idx] - point).length();
                        if dist < self.tolerance && best.is_none_or(|(_, d)| dist < d) {
                            best = Some((idx, dist));
                        }
                    }
                }
            }
        }

        best.map(|(idx, _)| idx)
    }

    #[must_use]
    pub fn contains(&self, point: DVec3) -> bool {
        self.find(point).is_some()
    }

    /// Insert a point, returning `(index, inserted)`. When a stored vertex is
    /// within tolerance, its index is returned and nothing is inserted.
    pub fn insert(&mut self, point: DVec3) -> (usize, bool) {
        if let Some(idx) = self.find(point) {
            return (idx, false);
        }

        let idx = self.points.len();
        self.points.push(point);
        self.cells
            .entry(self.cell_coords(point))
            .or_default()
            .push(idx);
        (idx, true)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Stored vertices in insertion order.
    #[must_use]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Stored vertices in lexicographic `(x, y, z)` order.
    #[must_use]
    pub fn into_sorted(self) -> Vec<DVec3> {
        let mut points = self.points;
        points.sort_by(lexicographic_cmp);
        points
    }
}

/// Total lexicographic order on `(x, y, z)`.
#[must_use]
pub fn lexicographic_cmp(a: &DVec3, b: &DVec3) -> Ordering {
    a.x.total_cmp(&b.x)
        .then_with(|| a.y.total_cmp(&b.y))
        .then_with(|| a.z.total_cmp(&b.z))
}
