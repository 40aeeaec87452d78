//! Tolerances and resource guards shared by every builder.

use serde::{Deserialize, Serialize};

/// Default tolerance for point classification and vertex merging.
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Default ceiling on planes per brush. Enumeration is O(N⁴).
pub const DEFAULT_MAX_PLANES: usize = 128;

/// Default ceiling on QuickHull expansion steps.
pub const DEFAULT_MAX_HULL_ITERATIONS: usize = 10_000;

/// Numerical tolerance and size limits for brush construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Distance below which a point counts as on a plane, and two vertices
    /// count as the same vertex.
    pub epsilon: f64,
    /// Maximum number of planes accepted by vertex enumeration.
    pub max_planes: usize,
    /// Maximum QuickHull iterations before giving up.
    pub max_hull_iterations: usize,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            max_planes: DEFAULT_MAX_PLANES,
            max_hull_iterations: DEFAULT_MAX_HULL_ITERATIONS,
        }
    }
}

impl BrushConfig {
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    #[must_use]
    pub const fn with_max_planes(mut self, max_planes: usize) -> Self {
        self.max_planes = max_planes;
        self
    }

    #[must_use]
    pub const fn with_max_hull_iterations(mut self, iterations: usize) -> Self {
        self.max_hull_iterations = iterations;
        self
    }
}
