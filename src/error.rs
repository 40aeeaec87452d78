//! Construction errors for brush geometry.
//!
//! Every error here is raised while building a brush and is deterministic:
//! the same input always fails the same way. Singular plane triples found
//! during vertex enumeration are skipped candidates, not errors.

use thiserror::Error;

/// Errors surfaced by plane/vertex conversions and brush assembly.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BrushError {
    /// Fewer than 4 planes can never bound a solid.
    #[error("{planes} planes cannot bound a convex solid (need at least 4)")]
    InsufficientConstraints { planes: usize },

    /// A face (or a hull) lacks enough independent vertices.
    ///
    /// `required` is 3 for a polygon or plane definition and 4 for a point
    /// cloud that must span a volume.
    #[error("degenerate face: {vertex_count} independent vertices (need at least {required})")]
    DegenerateFace { vertex_count: usize, required: usize },

    /// The assembled brush has too few valid faces.
    #[error("brush has only {valid_faces} valid faces (need at least 4)")]
    BrushGeometry { valid_faces: usize },

    /// Plane count exceeds the enumeration guard.
    #[error("{planes} planes exceeds the limit of {limit}")]
    TooManyPlanes { planes: usize, limit: usize },

    /// QuickHull hit its iteration ceiling.
    #[error("convex hull did not converge after {iterations} iterations")]
    HullDidNotConverge { iterations: usize },
}

pub type Result<T> = std::result::Result<T, BrushError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BrushError::InsufficientConstraints { planes: 3 };
        assert_eq!(
            err.to_string(),
            "3 planes cannot bound a convex solid (need at least 4)"
        );

        let err = BrushError::DegenerateFace {
            vertex_count: 2,
            required: 3,
        };
        assert!(err.to_string().contains("need at least 3"));
    }
}
