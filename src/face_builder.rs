//! Per-face polygon construction.
//!
//! Given one plane and the vertex set of the whole brush, select the vertices
//! lying on that plane and order them into a convex polygon wound
//! counter-clockwise as seen from outside the brush, i.e. so that
//! `(v1 - v0) × (v2 - v0)` points along the plane's outward normal.

use std::f64::consts::TAU;

use glam::DVec3;

use crate::error::{BrushError, Result};
use crate::plane::Plane;
use crate::spatial_hash::lexicographic_cmp;

/// Collect the vertices on `plane` and wind them into a polygon.
///
/// The local basis is canonical: `v0` is the lexicographically smallest
/// vertex on the plane and `v1` the one farthest from it, so the output does
/// not depend on the order of `vertices`.
///
/// # Errors
///
/// [`BrushError::DegenerateFace`] when fewer than three vertices lie on the
/// plane.
pub fn build_face(plane: &Plane, vertices: &[DVec3], epsilon: f64) -> Result<Vec<DVec3>> {
    let mut on_plane: Vec<DVec3> = vertices
        .iter()
        .copied()
        .filter(|&v| plane.signed_distance(v).abs() <= epsilon)
        .collect();

    if on_plane.len() < 3 {
        return Err(BrushError::DegenerateFace {
            vertex_count: on_plane.len(),
            required: 3,
        });
    }

    on_plane.sort_by(lexicographic_cmp);
    let (u_axis, v_axis) = canonical_basis(&on_plane, plane.normal()).ok_or(
        BrushError::DegenerateFace {
            vertex_count: 1,
            required: 3,
        },
    )?;

    #[expect(
        clippy::cast_precision_loss,
        reason = "face vertex count is small enough that f64 mantissa is sufficient"
    )]
    let center = on_plane.iter().copied().sum::<DVec3>() / on_plane.len() as f64;

    let mut keyed: Vec<(f64, f64, DVec3)> = on_plane
        .into_iter()
        .map(|p| {
            let local = p - center;
            let angle = local.dot(v_axis).atan2(local.dot(u_axis)).rem_euclid(TAU);
            (angle, local.length(), p)
        })
        .collect();

    // (u, v, n) is left-handed: u × v = -n. Descending angle in this frame is
    // counter-clockwise seen from the +n side.
    keyed.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| a.1.total_cmp(&b.1))
            .then_with(|| lexicographic_cmp(&a.2, &b.2))
    });

    Ok(keyed.into_iter().map(|(_, _, p)| p).collect())
}

/// `u = normalize(v1 - v0)`, `v = normalize(u × n)` from the first sorted
/// vertex and the vertex farthest from it.
fn canonical_basis(sorted: &[DVec3], normal: DVec3) -> Option<(DVec3, DVec3)> {
    let v0 = *sorted.first()?;

    // Strict comparison keeps the lexicographically first vertex on ties.
    let mut v1 = None;
    let mut farthest = 0.0;
    for &p in &sorted[1..] {
        let dist = (p - v0).length_squared();
        if dist > farthest {
            farthest = dist;
            v1 = Some(p);
        }
    }
    let v1 = v1?;

    let u = (v1 - v0).try_normalize()?;
    let v = u.cross(normal).try_normalize()?;
    Some((u, v))
}

/// Newell normal of a polygon; points along the side from which the loop
/// appears counter-clockwise.
#[must_use]
pub fn polygon_normal(polygon: &[DVec3]) -> DVec3 {
    let mut normal = DVec3::ZERO;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        normal += DVec3::new(
            (a.y - b.y) * (a.z + b.z),
            (a.z - b.z) * (a.x + b.x),
            (a.x - b.x) * (a.y + b.y),
        );
    }
    normal
}
