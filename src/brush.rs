//! # Brushes
//!
//! A [`Brush`] is a convex solid stored as an ordered list of [`Face`]s, each
//! a convex polygon wound counter-clockwise as seen from outside. Brushes are
//! created whole by a [`BrushBuilder`] from one of:
//!
//! - a list of planes with texture data ([`BrushSide`])
//! - MAP-style plane records (three clockwise points per plane)
//! - RMF-style face records (a clockwise vertex loop per face)
//! - a bare point cloud (the hull of the points)
//!
//! After construction only vertex positions change ([`Brush::transform`],
//! [`Brush::translate`]). Any topology change means building a new brush.

use glam::{DAffine3, DVec2, DVec3};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::BrushConfig;
use crate::error::{BrushError, Result};
use crate::face_builder::build_face;
use crate::facet_enum::enumerate_facets;
use crate::plane::Plane;
use crate::spatial_hash::{VertexSet, lexicographic_cmp};
use crate::vertex_enum::enumerate_vertices;

/// Texture mapping for one face. Carried along, never read by geometry code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub name: String,
    pub u_axis: DVec3,
    pub v_axis: DVec3,
    /// Offset along (u, v) in texels.
    pub shift: DVec2,
    pub scale: DVec2,
    /// Degrees.
    pub rotation: f64,
}

impl Default for TextureInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            u_axis: DVec3::X,
            v_axis: DVec3::NEG_Y,
            shift: DVec2::ZERO,
            scale: DVec2::ONE,
            rotation: 0.0,
        }
    }
}

impl TextureInfo {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One bounding plane of a brush-to-be, with its texture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrushSide {
    pub plane: Plane,
    pub texture: TextureInfo,
}

impl BrushSide {
    #[must_use]
    pub const fn new(plane: Plane, texture: TextureInfo) -> Self {
        Self { plane, texture }
    }
}

impl From<Plane> for BrushSide {
    fn from(plane: Plane) -> Self {
        Self::new(plane, TextureInfo::default())
    }
}

/// MAP-format plane: three points, clockwise as seen from outside the brush.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneRecord {
    pub points: [DVec3; 3],
    pub texture: TextureInfo,
}

impl PlaneRecord {
    /// The outward plane through the three points, or `None` if they are
    /// collinear.
    #[must_use]
    pub fn plane(&self) -> Option<Plane> {
        let [p0, p1, p2] = self.points;
        Plane::from_points(p0, p1, p2)
    }
}

/// RMF-format face: a vertex loop, clockwise as seen from outside the brush.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceRecord {
    pub vertices: Vec<DVec3>,
    pub texture: TextureInfo,
}

impl FaceRecord {
    /// The outward plane of the loop, taken from the first three vertices
    /// that are not collinear.
    #[must_use]
    pub fn plane(&self) -> Option<Plane> {
        let (&p0, rest) = self.vertices.split_first()?;
        rest.iter()
            .zip(rest.iter().skip(1))
            .find_map(|(&p1, &p2)| Plane::from_points(p0, p1, p2))
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Bounds {
    /// Box around `points`, or `None` if there are none.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |b, p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        }))
    }

    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}

/// Returned by every call that moves brush vertices, so views and tools can
/// resynchronize.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryChanged {
    /// Number of face vertices written (shared corners count once per face).
    pub vertices_moved: usize,
    pub old_bounds: Bounds,
    pub new_bounds: Bounds,
}

/// A convex polygon of a brush.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Face {
    vertices: Vec<DVec3>,
    pub texture: TextureInfo,
}

impl Face {
    /// Counter-clockwise as seen from outside; at least three.
    #[must_use]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Outward plane through the first three vertices.
    #[must_use]
    pub fn plane(&self) -> Option<Plane> {
        match self.vertices.as_slice() {
            [v0, v1, v2, ..] => Plane::from_points(*v2, *v1, *v0),
            _ => None,
        }
    }

    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "vertex count is small enough that f64 mantissa is sufficient"
    )]
    pub fn center(&self) -> DVec3 {
        self.vertices.iter().copied().sum::<DVec3>() / self.vertices.len() as f64
    }
}

/// A convex solid: at least four faces whose planes bound it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    faces: Vec<Face>,
}

impl Brush {
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Unique corner positions, lexicographically ordered.
    #[must_use]
    pub fn vertices(&self, epsilon: f64) -> Vec<DVec3> {
        let mut set = VertexSet::new(epsilon);
        for v in self.faces.iter().flat_map(|f| f.vertices.iter()) {
            set.insert(*v);
        }
        set.into_sorted()
    }

    /// Bounding box of all face vertices.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(self.faces.iter().flat_map(|f| f.vertices.iter().copied()))
            .unwrap_or(Bounds {
                min: DVec3::ZERO,
                max: DVec3::ZERO,
            })
    }

    /// Mean of the unique corners.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "vertex count is small enough that f64 mantissa is sufficient"
    )]
    pub fn center(&self, epsilon: f64) -> DVec3 {
        let vertices = self.vertices(epsilon);
        if vertices.is_empty() {
            return DVec3::ZERO;
        }
        vertices.iter().copied().sum::<DVec3>() / vertices.len() as f64
    }

    /// `true` if `point` is inside or on every face plane.
    #[must_use]
    pub fn contains_point(&self, point: DVec3, epsilon: f64) -> bool {
        self.faces
            .iter()
            .filter_map(Face::plane)
            .all(|p| p.contains(point, epsilon))
    }

    /// Apply an affine map to every vertex in place.
    ///
    /// Stored winding is kept and nothing is re-enumerated. Callers must pass
    /// rigid or uniform-scale maps with a positive determinant: non-uniform
    /// scale or shear keeps each face planar but can leave later derived
    /// planes inconsistent with the stored polygons, and a mirroring map
    /// inverts every face's winding.
    pub fn transform(&mut self, matrix: &DAffine3) -> GeometryChanged {
        let old_bounds = self.bounds();
        let mut vertices_moved = 0;
        for face in &mut self.faces {
            for v in &mut face.vertices {
                *v = matrix.transform_point3(*v);
                vertices_moved += 1;
            }
        }
        GeometryChanged {
            vertices_moved,
            old_bounds,
            new_bounds: self.bounds(),
        }
    }

    pub fn translate(&mut self, offset: DVec3) -> GeometryChanged {
        self.transform(&DAffine3::from_translation(offset))
    }

    /// Export as MAP plane records: for each face, its first three vertices
    /// in reverse order (clockwise from outside) plus the face texture.
    /// Faces with fewer than three vertices have no plane and are skipped.
    #[must_use]
    pub fn to_plane_records(&self) -> Vec<PlaneRecord> {
        self.faces
            .iter()
            .filter_map(|face| match face.vertices.as_slice() {
                [v0, v1, v2, ..] => Some(PlaneRecord {
                    points: [*v2, *v1, *v0],
                    texture: face.texture.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Outward planes of every face, with textures.
    #[must_use]
    pub fn to_sides(&self) -> Vec<BrushSide> {
        self.faces
            .iter()
            .filter_map(|face| Some(BrushSide::new(face.plane()?, face.texture.clone())))
            .collect()
    }
}

/// Builds brushes from planes, records, or point clouds.
#[derive(Clone, Debug, Default)]
pub struct BrushBuilder {
    config: BrushConfig,
}

impl BrushBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_config(config: BrushConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &BrushConfig {
        &self.config
    }

    /// Enumerate the vertices of all planes once, then wind one face per
    /// plane.
    ///
    /// A side yields no face when it touches the solid in fewer than three
    /// vertices, or when it touches exactly the vertices of an earlier face
    /// (a duplicate, possibly tilted within tolerance).
    ///
    /// # Errors
    ///
    /// Fails like [`enumerate_vertices`], and with
    /// [`BrushError::BrushGeometry`] if fewer than four faces remain.
    pub fn build_from_planes(&self, sides: &[BrushSide]) -> Result<Brush> {
        let epsilon = self.config.epsilon;
        let planes: Vec<Plane> = sides.iter().map(|s| s.plane).collect();
        let vertices = enumerate_vertices(&planes, &self.config)?;

        let mut faces = Vec::with_capacity(sides.len());
        let mut incident_sets: Vec<Vec<DVec3>> = Vec::with_capacity(sides.len());
        for (i, side) in sides.iter().enumerate() {
            let polygon = match build_face(&side.plane, &vertices, epsilon) {
                Ok(polygon) => polygon,
                Err(BrushError::DegenerateFace { vertex_count, .. }) => {
                    debug!("side {i} touches the solid in {vertex_count} vertices; skipped");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let mut incident = polygon.clone();
            incident.sort_by(lexicographic_cmp);
            if incident_sets.contains(&incident) {
                debug!("side {i} duplicates an earlier face; skipped");
                continue;
            }
            incident_sets.push(incident);

            faces.push(Face {
                vertices: polygon,
                texture: side.texture.clone(),
            });
        }

        if faces.len() < 4 {
            return Err(BrushError::BrushGeometry {
                valid_faces: faces.len(),
            });
        }

        debug!(
            "built brush: {} sides -> {} faces, {} vertices",
            sides.len(),
            faces.len(),
            vertices.len()
        );
        Ok(Brush { faces })
    }

    /// Brush spanning the convex hull of `points`, with default textures.
    ///
    /// # Errors
    ///
    /// Fails like [`enumerate_facets`] and [`Self::build_from_planes`].
    pub fn build_from_vertices(&self, points: &[DVec3]) -> Result<Brush> {
        let hull = enumerate_facets(points, &self.config)?;
        let sides: Vec<BrushSide> = hull.planes.into_iter().map(BrushSide::from).collect();
        self.build_from_planes(&sides)
    }

    /// Import MAP plane records.
    ///
    /// # Errors
    ///
    /// [`BrushError::DegenerateFace`] for a record with collinear points,
    /// otherwise as [`Self::build_from_planes`].
    pub fn build_from_map(&self, records: &[PlaneRecord]) -> Result<Brush> {
        let sides = records
            .iter()
            .map(|r| {
                r.plane()
                    .map(|plane| BrushSide::new(plane, r.texture.clone()))
                    .ok_or(BrushError::DegenerateFace {
                        vertex_count: 2,
                        required: 3,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        self.build_from_planes(&sides)
    }

    /// Import RMF face records. Only each loop's plane is used; vertices are
    /// re-derived from the planes.
    ///
    /// # Errors
    ///
    /// [`BrushError::DegenerateFace`] for a loop without three non-collinear
    /// vertices, otherwise as [`Self::build_from_planes`].
    pub fn build_from_solid(&self, records: &[FaceRecord]) -> Result<Brush> {
        let sides = records
            .iter()
            .map(|r| {
                r.plane()
                    .map(|plane| BrushSide::new(plane, r.texture.clone()))
                    .ok_or(BrushError::DegenerateFace {
                        vertex_count: r.vertices.len().min(2),
                        required: 3,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        self.build_from_planes(&sides)
    }
}
