//! # Facet Enumeration
//!
//! The dual of vertex enumeration: given a point cloud, find the planes of
//! its convex hull, one per facet, with outward normals.
//!
//! ## Algorithm
//!
//! QuickHull (Barber, Dobkin & Huhdanpaa, 1996):
//!
//! 1. Build an initial tetrahedron from the axis-extreme points
//! 2. Assign every remaining point to one face it lies outside of
//! 3. Repeatedly take the farthest outside point ("eye"):
//!    - collect every face visible from it
//!    - find the horizon (edges shared by one visible face only)
//!    - replace the visible faces with a fan from the horizon to the eye
//!    - hand orphaned outside points to the new faces
//! 4. Merge triangles into facets: a triangle joins a facet when each lies
//!    within ε of the other's plane
//!
//! ## Degenerate Input
//!
//! Duplicates (within ε) are merged first. A cloud without 4 affinely
//! independent points spans no volume and fails with
//! [`BrushError::DegenerateFace`] (`required = 4`, `vertex_count` = number of
//! independent points found). Points on a facet, or in its interior, are
//! kept out of the returned vertex set: a hull vertex must lie on at least
//! three facet planes with independent normals.

use glam::{DMat3, DVec3};
use itertools::Itertools;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::BrushConfig;
use crate::error::{BrushError, Result};
use crate::plane::{Plane, SINGULAR_DETERMINANT};
use crate::spatial_hash::VertexSet;
use crate::vertex_enum::retain_extreme;

/// Planes bounding a point cloud's hull plus the cloud's true hull corners.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HullFacets {
    /// One outward-facing plane per hull facet.
    pub planes: Vec<Plane>,
    /// Deduplicated input points that are corners of the hull, in
    /// lexicographic order. Interior and mid-facet points are dropped.
    pub vertices: Vec<DVec3>,
}

/// A triangle of the hull under construction.
#[derive(Clone, Debug)]
struct HullFace {
    /// Counter-clockwise seen from outside.
    vertices: [usize; 3],
    plane: Plane,
    outside_points: Vec<usize>,
    furthest: Option<(usize, f64)>,
    deleted: bool,
}

impl HullFace {
    fn new(a: usize, b: usize, c: usize, points: &[DVec3], interior: DVec3) -> Option<Self> {
        let normal = (points[b] - points[a]).cross(points[c] - points[a]);
        let plane = Plane::from_normal_and_point(normal, points[a])?;

        // Normal must point away from the interior
        let (vertices, plane) = if plane.signed_distance(interior) > 0.0 {
            ([a, c, b], plane.flipped())
        } else {
            ([a, b, c], plane)
        };

        Some(Self {
            vertices,
            plane,
            outside_points: Vec::new(),
            furthest: None,
            deleted: false,
        })
    }

    #[inline]
    fn distance(&self, point: DVec3) -> f64 {
        self.plane.signed_distance(point)
    }

    fn assign_point(&mut self, point_idx: usize, distance: f64) {
        self.outside_points.push(point_idx);
        if self.furthest.is_none_or(|(_, d)| distance > d) {
            self.furthest = Some((point_idx, distance));
        }
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }
}

/// Compute the facet planes of the convex hull of `points`.
///
/// # Errors
///
/// [`BrushError::DegenerateFace`] when the cloud spans no volume and
/// [`BrushError::HullDidNotConverge`] past
/// [`BrushConfig::max_hull_iterations`].
pub fn enumerate_facets(points: &[DVec3], config: &BrushConfig) -> Result<HullFacets> {
    let epsilon = config.epsilon;

    let mut unique = VertexSet::new(epsilon);
    for &p in points {
        unique.insert(p);
    }
    let points = unique.into_sorted();

    let simplex = find_initial_simplex(&points, epsilon)?;
    let interior = simplex.iter().map(|&i| points[i]).sum::<DVec3>() / 4.0;

    let [v0, v1, v2, v3] = simplex;
    let mut faces: Vec<HullFace> = [[v0, v1, v2], [v0, v2, v3], [v0, v3, v1], [v1, v3, v2]]
        .into_iter()
        .filter_map(|[a, b, c]| HullFace::new(a, b, c, &points, interior))
        .collect();

    let remaining: Vec<usize> = (0..points.len())
        .filter(|i| !simplex.contains(i))
        .collect();
    assign_points(&mut faces, &remaining, &points, epsilon);

    let mut iterations = 0;
    while let Some(eye) = furthest_outside_point(&faces) {
        iterations += 1;
        if iterations > config.max_hull_iterations {
            warn!(
                "hull of {} points still open after {} iterations",
                points.len(),
                config.max_hull_iterations
            );
            return Err(BrushError::HullDidNotConverge {
                iterations: config.max_hull_iterations,
            });
        }
        expand_hull(&mut faces, eye, &points, interior, epsilon);
    }

    faces.retain(|f| !f.deleted);

    let planes = merge_coplanar(&faces, &points, epsilon);

    let mut vertices: Vec<DVec3> = points
        .iter()
        .copied()
        .filter(|&p| is_hull_corner(p, &planes, epsilon))
        .collect();
    retain_extreme(&mut vertices, epsilon);

    debug!(
        "hull: {} points -> {} triangles, {} facets, {} corners in {iterations} iterations",
        points.len(),
        faces.len(),
        planes.len(),
        vertices.len(),
    );

    Ok(HullFacets { planes, vertices })
}

/// Group hull triangles into facets and return one plane per facet.
///
/// A triangle joins the first facet whose plane it lies within `epsilon` of,
/// provided every point already in the facet lies within `epsilon` of the
/// triangle's own plane too. A corner raised by less than `epsilon` does not
/// split a face in two.
fn merge_coplanar(faces: &[HullFace], points: &[DVec3], epsilon: f64) -> Vec<Plane> {
    let near = |plane: &Plane, idx: &usize| plane.signed_distance(points[*idx]).abs() <= epsilon;

    let mut facets: Vec<(Plane, Vec<usize>)> = Vec::new();
    for face in faces {
        let joined = facets.iter_mut().find(|(plane, members)| {
            plane.normal().dot(face.plane.normal()) > 0.0
                && face.vertices.iter().all(|v| near(plane, v))
                && members.iter().all(|v| near(&face.plane, v))
        });

        match joined {
            Some((_, members)) => {
                for v in face.vertices {
                    if !members.contains(&v) {
                        members.push(v);
                    }
                }
            }
            None => facets.push((face.plane, face.vertices.to_vec())),
        }
    }

    facets.into_iter().map(|(plane, _)| plane).collect()
}

/// Replace every face visible from `eye` with a fan over the horizon.
fn expand_hull(
    faces: &mut Vec<HullFace>,
    eye: usize,
    points: &[DVec3],
    interior: DVec3,
    epsilon: f64,
) {
    let eye_pos = points[eye];
    let visible: Vec<usize> = faces
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.deleted && f.distance(eye_pos) > epsilon)
        .map(|(i, _)| i)
        .collect();

    // Edges shared by two visible faces cancel; the rest form the horizon.
    // Insertion order is kept so the output is deterministic.
    let mut edge_counts: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    let mut oriented_edges = Vec::new();
    for &fi in &visible {
        for (a, b) in faces[fi].edges() {
            *edge_counts.entry((a.min(b), a.max(b))).or_default() += 1;
            oriented_edges.push((a, b));
        }
    }
    let horizon: Vec<(usize, usize)> = oriented_edges
        .into_iter()
        .filter(|&(a, b)| edge_counts[&(a.min(b), a.max(b))] == 1)
        .collect();

    let mut orphans = Vec::new();
    for &fi in &visible {
        let face = &mut faces[fi];
        face.deleted = true;
        orphans.append(&mut face.outside_points);
        face.furthest = None;
    }
    orphans.retain(|&p| p != eye);

    let mut new_faces: Vec<HullFace> = horizon
        .iter()
        .filter_map(|&(a, b)| {
            let face = HullFace::new(a, b, eye, points, interior);
            if face.is_none() {
                warn!("dropped zero-area hull triangle ({a}, {b}, {eye})");
            }
            face
        })
        .collect();

    for orphan in orphans {
        let pos = points[orphan];
        if let Some(face) = new_faces.iter_mut().find(|f| f.distance(pos) > epsilon) {
            let d = face.distance(pos);
            face.assign_point(orphan, d);
        } else if let Some(face) = faces
            .iter_mut()
            .find(|f| !f.deleted && f.distance(pos) > epsilon)
        {
            let d = face.distance(pos);
            face.assign_point(orphan, d);
        }
        // Otherwise the point is inside the hull and drops out.
    }

    faces.retain(|f| !f.deleted);
    faces.append(&mut new_faces);
}

fn assign_points(faces: &mut [HullFace], indices: &[usize], points: &[DVec3], epsilon: f64) {
    for &idx in indices {
        let pos = points[idx];
        if let Some(face) = faces.iter_mut().find(|f| f.distance(pos) > epsilon) {
            let d = face.distance(pos);
            face.assign_point(idx, d);
        }
    }
}

fn furthest_outside_point(faces: &[HullFace]) -> Option<usize> {
    faces
        .iter()
        .filter(|f| !f.deleted)
        .filter_map(|f| f.furthest)
        .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(idx, _)| idx)
}

/// Find 4 affinely independent points: farthest pair among the axis
/// extremes, farthest point from their line, farthest point from that plane.
fn find_initial_simplex(points: &[DVec3], epsilon: f64) -> Result<[usize; 4]> {
    let degenerate = |vertex_count| BrushError::DegenerateFace {
        vertex_count,
        required: 4,
    };

    if points.is_empty() {
        return Err(degenerate(0));
    }

    let extremes = find_extreme_points(points);
    let (mut v0, mut v1, mut best) = (extremes[0], extremes[0], 0.0);
    for (&i, &j) in extremes.iter().tuple_combinations() {
        let dist = points[i].distance(points[j]);
        if dist > best {
            (v0, v1, best) = (i, j, dist);
        }
    }
    if best <= epsilon {
        return Err(degenerate(1));
    }

    let dir = (points[v1] - points[v0]) / best;
    let Some((v2, dist)) = farthest_by(points, |p| {
        let rel = p - points[v0];
        (rel - dir * rel.dot(dir)).length()
    }) else {
        return Err(degenerate(2));
    };
    if dist <= epsilon {
        return Err(degenerate(2));
    }

    let Some(plane) = Plane::from_points(points[v0], points[v1], points[v2]) else {
        return Err(degenerate(2));
    };
    let Some((v3, dist)) = farthest_by(points, |p| plane.signed_distance(p).abs()) else {
        return Err(degenerate(3));
    };
    if dist <= epsilon {
        return Err(degenerate(3));
    }

    Ok([v0, v1, v2, v3])
}

/// Index and value of the point maximizing `metric` (first wins on ties).
fn farthest_by(points: &[DVec3], metric: impl Fn(DVec3) -> f64) -> Option<(usize, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| (i, metric(p)))
        .fold(None, |best, (i, m)| match best {
            Some((_, bm)) if bm >= m => best,
            _ => Some((i, m)),
        })
}

/// Indices of the min/max point along each axis.
fn find_extreme_points(points: &[DVec3]) -> [usize; 6] {
    let mut extremes = [0; 6];
    for (i, p) in points.iter().enumerate() {
        for axis in 0..3 {
            if p[axis] < points[extremes[axis * 2]][axis] {
                extremes[axis * 2] = i;
            }
            if p[axis] > points[extremes[axis * 2 + 1]][axis] {
                extremes[axis * 2 + 1] = i;
            }
        }
    }
    extremes
}

/// A point is a hull corner when it lies on three facet planes with linearly
/// independent normals. Independence uses the same determinant bound as
/// vertex enumeration, so shallow corners are kept on both sides.
fn is_hull_corner(point: DVec3, planes: &[Plane], epsilon: f64) -> bool {
    let incident: Vec<DVec3> = planes
        .iter()
        .filter(|p| p.signed_distance(point).abs() <= epsilon)
        .map(Plane::normal)
        .collect();

    incident
        .iter()
        .tuple_combinations()
        .any(|(&a, &b, &c)| DMat3::from_cols(a, b, c).determinant().abs() > SINGULAR_DETERMINANT)
}
