//! # Planes and Half-Spaces
//!
//! A plane is stored in general form `ax + by + cz + d = 0` with a unit normal
//! `(a, b, c)`. The signed distance of a point is `f(p) = n·p + d`.
//!
//! ## Sign Convention
//!
//! The normal points **out of** the solid. A point is inside the half-space
//! when `f(p) ≤ ε`:
//!
//! - **Inside**: `f(p) < -ε`
//! - **On**: `|f(p)| ≤ ε`
//! - **Outside**: `f(p) > ε`
//!
//! The face `x ≤ 1` of a cube is therefore `Plane::new(DVec3::X, -1.0)`.

use glam::{DMat3, DVec3, DVec4};
use serde::{Deserialize, Serialize};

/// Smallest normal length accepted before normalization.
const MIN_NORMAL_LENGTH: f64 = 1e-12;

/// An oriented plane whose normal points toward the outside of a solid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    normal: DVec3,
    d: f64,
}

impl Plane {
    /// Create a plane from a normal and the `d` coefficient, rescaling both so
    /// the normal has unit length.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    #[must_use]
    pub fn new(normal: DVec3, d: f64) -> Self {
        Self::try_new(normal, d).expect("Normal vector must be non-zero")
    }

    /// Try to create, returning `None` if the normal is zero or not finite.
    #[must_use]
    pub fn try_new(normal: DVec3, d: f64) -> Option<Self> {
        let len = normal.length();
        (len.is_finite() && len >= MIN_NORMAL_LENGTH && d.is_finite()).then(|| Self {
            normal: normal / len,
            d: d / len,
        })
    }

    /// Create from the four coefficients `(a, b, c, d)`.
    #[must_use]
    pub fn from_coefficients(coefficients: DVec4) -> Option<Self> {
        Self::try_new(coefficients.truncate(), coefficients.w)
    }

    /// Plane through `point` with the given (not necessarily unit) normal.
    #[must_use]
    pub fn from_normal_and_point(normal: DVec3, point: DVec3) -> Option<Self> {
        let len = normal.length();
        if !(len.is_finite() && len >= MIN_NORMAL_LENGTH) {
            return None;
        }
        let normal = normal / len;
        Some(Self {
            normal,
            d: -normal.dot(point),
        })
    }

    /// Plane through three ordered points.
    ///
    /// `normal = normalize((p2 - p0) × (p1 - p0))`, so the normal points
    /// toward a viewer who sees `p0, p1, p2` in clockwise order. Returns `None`
    /// for collinear or coincident points.
    #[must_use]
    pub fn from_points(p0: DVec3, p1: DVec3, p2: DVec3) -> Option<Self> {
        Self::from_normal_and_point((p2 - p0).cross(p1 - p0), p0)
    }

    /// Unit normal `(a, b, c)`.
    #[inline]
    #[must_use]
    pub const fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Constant term of `ax + by + cz + d = 0`.
    #[inline]
    #[must_use]
    pub const fn d(&self) -> f64 {
        self.d
    }

    /// All four coefficients as `(a, b, c, d)`.
    #[must_use]
    pub const fn coefficients(&self) -> DVec4 {
        DVec4::new(self.normal.x, self.normal.y, self.normal.z, self.d)
    }

    /// Signed distance: negative = inside, zero = on the plane, positive =
    /// outside.
    #[inline]
    #[must_use]
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) + self.d
    }

    /// Classify a point: Inside, On (within `epsilon`) or Outside.
    #[must_use]
    pub fn classify(&self, point: DVec3, epsilon: f64) -> Classification {
        let f = self.signed_distance(point);
        if f < -epsilon {
            Classification::Inside
        } else if f > epsilon {
            Classification::Outside
        } else {
            Classification::On
        }
    }

    /// `true` if the point satisfies the half-space within `epsilon`.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: DVec3, epsilon: f64) -> bool {
        self.signed_distance(point) <= epsilon
    }

    /// Closest point on the plane.
    #[must_use]
    pub fn project(&self, point: DVec3) -> DVec3 {
        point - self.normal * self.signed_distance(point)
    }

    /// Same plane, opposite orientation.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            d: -self.d,
        }
    }

    /// `true` if both planes describe the same oriented plane within
    /// `epsilon`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.normal - other.normal).length() <= epsilon && (self.d - other.d).abs() <= epsilon
    }
}

/// Classification of a point relative to a plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Strictly inside: `f(p) < -ε`
    Inside,

    /// On the plane within tolerance: `|f(p)| ≤ ε`
    On,

    /// Strictly outside: `f(p) > ε`
    Outside,
}

/// Determinant below which three unit normals are treated as linearly
/// dependent.
///
/// This is a conditioning bound, not a distance: three facets meeting at a
/// shallow corner have nearly parallel normals and a tiny determinant, yet
/// their common point is a real vertex. Spurious solutions of ill-conditioned
/// triples are rejected by the half-space test instead.
pub const SINGULAR_DETERMINANT: f64 = 1e-12;

/// Intersect three planes with Cramer's rule.
///
/// The system has the three normals as rows and `(-d1, -d2, -d3)` as its
/// right-hand side. Returns `None` when `|det| ≤ min_determinant` (two or more
/// planes parallel, or all three sharing a line). Normals are unit length, so
/// `min_determinant` is scale-free; [`SINGULAR_DETERMINANT`] is what the
/// enumerators use.
#[must_use]
pub fn intersect_three_planes(
    p1: &Plane,
    p2: &Plane,
    p3: &Plane,
    min_determinant: f64,
) -> Option<DVec3> {
    solve_three_planes(p1, p2, p3)
        .filter(|&(_, det)| det.abs() > min_determinant)
        .map(|(point, _)| point)
}

/// Common point of three planes together with the determinant of their
/// normals, or `None` if the system is singular.
pub(crate) fn solve_three_planes(p1: &Plane, p2: &Plane, p3: &Plane) -> Option<(DVec3, f64)> {
    let rows = DMat3::from_cols(p1.normal, p2.normal, p3.normal).transpose();
    let det = rows.determinant();
    if det.abs() <= SINGULAR_DETERMINANT {
        return None;
    }

    let rhs = DVec3::new(-p1.d, -p2.d, -p3.d);
    let solve_for = |col: usize| {
        let mut m = rows;
        *m.col_mut(col) = rhs;
        m.determinant() / det
    };

    let point = DVec3::new(solve_for(0), solve_for(1), solve_for(2));
    point.is_finite().then_some((point, det))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_classification() {
        // x ≤ 1
        let plane = Plane::new(DVec3::X, -1.0);

        assert_eq!(plane.classify(DVec3::ZERO, EPSILON), Classification::Inside);
        assert_eq!(
            plane.classify(DVec3::new(1.0, 5.0, -3.0), EPSILON),
            Classification::On
        );
        assert_eq!(
            plane.classify(DVec3::new(2.0, 0.0, 0.0), EPSILON),
            Classification::Outside
        );
    }

    #[test]
    fn test_new_normalizes_coefficients() {
        let plane = Plane::new(DVec3::new(0.0, 2.0, 0.0), -4.0);
        assert!((plane.normal() - DVec3::Y).length() < EPSILON);
        assert!((plane.d() + 2.0).abs() < EPSILON);
        assert!(Plane::try_new(DVec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_from_points_clockwise_points_toward_viewer() {
        // Seen from +Z these run clockwise: (0,0) -> (0,1) -> (1,0).
        let plane = Plane::from_points(
            DVec3::new(0.0, 0.0, 2.0),
            DVec3::new(0.0, 1.0, 2.0),
            DVec3::new(1.0, 0.0, 2.0),
        )
        .unwrap();

        assert!((plane.normal() - DVec3::Z).length() < EPSILON);
        assert!((plane.d() + 2.0).abs() < EPSILON);
        assert_eq!(
            plane.classify(DVec3::ZERO, EPSILON),
            Classification::Inside
        );
    }

    #[test]
    fn test_from_points_collinear() {
        assert!(
            Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::new(2.0, 0.0, 0.0)).is_none()
        );
    }

    #[test]
    fn test_three_plane_intersection() {
        let p1 = Plane::new(DVec3::X, -1.0);
        let p2 = Plane::new(DVec3::Y, 2.0);
        let p3 = Plane::new(DVec3::new(0.0, 0.0, -1.0), 3.0);

        let point = intersect_three_planes(&p1, &p2, &p3, EPSILON).unwrap();
        assert!((point - DVec3::new(1.0, -2.0, 3.0)).length() < EPSILON);
    }

    #[test]
    fn test_three_plane_intersection_oblique() {
        let p1 = Plane::new(DVec3::new(1.0, 1.0, 0.0), -1.0);
        let p2 = Plane::new(DVec3::new(0.0, 1.0, 1.0), -1.0);
        let p3 = Plane::new(DVec3::new(1.0, 0.0, 1.0), -1.0);

        let point = intersect_three_planes(&p1, &p2, &p3, EPSILON).unwrap();
        for plane in [p1, p2, p3] {
            assert!(plane.signed_distance(point).abs() < EPSILON);
        }
    }

    #[test]
    fn test_parallel_planes_no_intersection() {
        let p1 = Plane::new(DVec3::X, 0.0);
        let p2 = Plane::new(DVec3::X, -1.0);
        let p3 = Plane::new(DVec3::Y, 0.0);

        assert!(intersect_three_planes(&p1, &p2, &p3, EPSILON).is_none());
    }

    #[test]
    fn test_shallow_corner_is_not_singular() {
        // Three planes through (3, 4, 5) whose normals differ by 1e-3 rad:
        // |det| is about 1e-6, well under the distance tolerance.
        let corner = DVec3::new(3.0, 4.0, 5.0);
        let p1 = Plane::from_normal_and_point(DVec3::Z, corner).unwrap();
        let p2 = Plane::from_normal_and_point(DVec3::new(1e-3, 0.0, 1.0), corner).unwrap();
        let p3 = Plane::from_normal_and_point(DVec3::new(0.0, 1e-3, 1.0), corner).unwrap();

        let (point, det) = solve_three_planes(&p1, &p2, &p3).unwrap();
        assert!(det.abs() < 1e-4);
        assert!((point - corner).length() < 1e-6);
        assert!(intersect_three_planes(&p1, &p2, &p3, SINGULAR_DETERMINANT).is_some());
        assert!(intersect_three_planes(&p1, &p2, &p3, 1e-4).is_none());
    }

    #[test]
    fn test_flip_and_project() {
        let plane = Plane::new(DVec3::Z, -1.0);
        let flipped = plane.flipped();
        assert!((flipped.signed_distance(DVec3::ZERO) - 1.0).abs() < EPSILON);
        assert!(!plane.approx_eq(&flipped, EPSILON));

        let projected = plane.project(DVec3::new(3.0, 4.0, 7.0));
        assert!((projected - DVec3::new(3.0, 4.0, 1.0)).length() < EPSILON);
    }
}
