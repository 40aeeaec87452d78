//! # `poly_brush`
//!
//! Convex brush geometry for Half-Life-style level editors: convert a solid
//! between its half-space description (planes) and its vertex/face
//! description (wound polygons), in both directions.
//!
//! ## What is this?
//!
//! Map formats store a brush either as a list of planes (`.map`) or as a list
//! of pre-wound polygons (`.rmf`), and interactive tools create brushes from
//! dragged-out corner points. Rendering and editing need the polygons; saving
//! needs the planes. This crate is the engine in between.
//!
//! ## Quick Start
//!
//! ```rust
//! use poly_brush::{BrushBuilder, BrushSide, Plane};
//! use glam::DVec3;
//!
//! // Six faces of a cube [-1, 1]³. Normals point out of the solid.
//! let sides: Vec<BrushSide> = [DVec3::X, -DVec3::X, DVec3::Y, -DVec3::Y, DVec3::Z, -DVec3::Z]
//!     .into_iter()
//!     .map(|n| Plane::new(n, -1.0).into())
//!     .collect();
//!
//! let mut brush = BrushBuilder::new().build_from_planes(&sides).unwrap();
//! assert_eq!(brush.face_count(), 6);
//! assert!(brush.faces().iter().all(|f| f.vertices().len() == 4));
//!
//! // Moving a brush reports what changed
//! let change = brush.translate(DVec3::new(0.0, 0.0, 8.0));
//! assert_eq!(change.new_bounds.min.z, 7.0);
//!
//! // Export as MAP plane records and read them back
//! let records = brush.to_plane_records();
//! let again = BrushBuilder::new().build_from_map(&records).unwrap();
//! assert_eq!(again.face_count(), 6);
//! ```
//!
//! ## Conventions
//!
//! - A plane `ax + by + cz + d = 0` has a unit normal pointing **out of** the
//!   solid; a point is inside when `n·p + d ≤ ε`.
//! - Face polygons wind **counter-clockwise** seen from outside.
//! - MAP plane points and RMF vertex loops are **clockwise** seen from
//!   outside; export reverses the first three polygon vertices to match.
//!
//! ## Algorithm
//!
//! - Planes → vertices: every plane triple solved with Cramer's rule, kept if
//!   inside all half-spaces, merged in a grid-bucketed spatial hash, and
//!   dropped again if it sits on an edge. `O(N⁴)`, capped by
//!   [`BrushConfig::max_planes`].
//! - Vertices → polygon: per plane, sort on-plane vertices by angle around
//!   their centroid in a canonical local basis.
//! - Points → planes: QuickHull, triangles within ε of each other's planes
//!   merged into one facet.
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade; install any logger to see
//! which planes were dropped and how hulls were built.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod brush;
mod config;
mod error;
mod face_builder;
mod facet_enum;
mod plane;
mod spatial_hash;
mod vertex_enum;
mod world;

pub use brush::{
    Bounds, Brush, BrushBuilder, BrushSide, Face, FaceRecord, GeometryChanged, PlaneRecord,
    TextureInfo,
};
pub use config::{BrushConfig, DEFAULT_EPSILON, DEFAULT_MAX_HULL_ITERATIONS, DEFAULT_MAX_PLANES};
pub use error::{BrushError, Result};
pub use face_builder::{build_face, polygon_normal};
pub use facet_enum::{HullFacets, enumerate_facets};
pub use plane::{Classification, Plane, SINGULAR_DETERMINANT, intersect_three_planes};
pub use spatial_hash::{VertexSet, lexicographic_cmp};
pub use vertex_enum::{enumerate_vertices, retain_extreme, satisfies_all};
pub use world::{BrushIdx, Entity, EntityIdx, World};

/// Re-export glam types for convenience
pub mod math {
    pub use glam::{DAffine3, DMat3, DVec2, DVec3, DVec4};
}
