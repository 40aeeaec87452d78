//! # Vertex Enumeration
//!
//! Converts an H-representation (planes) into a V-representation (vertices)
//! with the brute-force double-description method:
//!
//! 1. For every triple of planes, solve for their common point
//! 2. Skip singular triples (parallel or pencil planes)
//! 3. Keep the point only if it lies inside every half-space
//! 4. Merge near-coincident points in a [`VertexSet`], best-conditioned
//!    solutions first
//! 5. Drop points lying on a segment between two others (mid-edge points
//!    produced by planes that graze an edge)
//!
//! ## Complexity
//!
//! `O(N³)` triples × `O(N)` feasibility checks = `O(N⁴)`. Brushes are hand
//! authored and small, and [`BrushConfig::max_planes`] caps the cost.

use glam::DVec3;
use itertools::Itertools;
use log::{debug, trace};

use crate::config::BrushConfig;
use crate::error::{BrushError, Result};
use crate::plane::{Plane, solve_three_planes};
use crate::spatial_hash::VertexSet;

/// Enumerate the corners of the region bounded by `planes`.
///
/// The result is independent of plane order: vertices come back in
/// lexicographic `(x, y, z)` order.
///
/// # Errors
///
/// [`BrushError::InsufficientConstraints`] for fewer than four planes and
/// [`BrushError::TooManyPlanes`] above [`BrushConfig::max_planes`].
pub fn enumerate_vertices(planes: &[Plane], config: &BrushConfig) -> Result<Vec<DVec3>> {
    check_plane_count(planes.len(), config)?;

    let epsilon = config.epsilon;
    let mut candidates: Vec<(f64, DVec3)> = Vec::new();
    let mut singular = 0usize;
    let mut infeasible = 0usize;

    for (p1, p2, p3) in planes.iter().tuple_combinations() {
        let Some((point, det)) = solve_three_planes(p1, p2, p3) else {
            singular += 1;
            continue;
        };

        if !satisfies_all(point, planes, epsilon) {
            infeasible += 1;
            continue;
        }

        candidates.push((det.abs(), point));
    }

    // A corner met by several triples keeps the most accurate solution.
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
    let mut vertices = VertexSet::new(epsilon);
    for (_, point) in candidates {
        if vertices.insert(point).1 {
            trace!("accepted vertex {point}");
        }
    }

    let mut vertices = vertices.into_sorted();
    let merged = vertices.len();
    retain_extreme(&mut vertices, epsilon);

    debug!(
        "enumerated {} vertices from {} planes ({singular} singular, {infeasible} infeasible triples, {} on edges)",
        vertices.len(),
        planes.len(),
        merged - vertices.len(),
    );

    Ok(vertices)
}

/// Remove every point lying within `epsilon` of the segment between two other
/// points of the set.
///
/// Points must already be more than `epsilon` apart, as a [`VertexSet`]
/// guarantees, so a point is never compared against a copy of itself.
pub fn retain_extreme(points: &mut Vec<DVec3>, epsilon: f64) {
    let on_segment: Vec<bool> = points
        .iter()
        .map(|&p| {
            points
                .iter()
                .filter(|&&q| q != p)
                .tuple_combinations()
                .any(|(&a, &b)| segment_distance(p, a, b) <= epsilon)
        })
        .collect();

    let mut flags = on_segment.into_iter();
    points.retain(|_| !flags.next().unwrap_or(false));
}

fn segment_distance(p: DVec3, a: DVec3, b: DVec3) -> f64 {
    let ab = b - a;
    let t = ((p - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Check if a point satisfies all half-space constraints.
#[must_use]
pub fn satisfies_all(point: DVec3, planes: &[Plane], epsilon: f64) -> bool {
    planes.iter().all(|p| p.contains(point, epsilon))
}

pub(crate) const fn check_plane_count(planes: usize, config: &BrushConfig) -> Result<()> {
    if planes < 4 {
        return Err(BrushError::InsufficientConstraints { planes });
    }
    if planes > config.max_planes {
        return Err(BrushError::TooManyPlanes {
            planes,
            limit: config.max_planes,
        });
    }
    Ok(())
}
