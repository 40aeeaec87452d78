//! Benchmarks for `poly_brush` conversions.
//!
//! Run with: `cargo bench --bench brush_benchmarks`
//!
//! Covers:
//! - Planes → brush on regular solids
//! - Scalability of vertex enumeration with plane count
//! - Point cloud → brush (hull) on random clouds
//! - MAP export/import round trip
//! - In-place transforms

use divan::{Bencher, black_box};
use glam::{DAffine3, DVec3};
use poly_brush::{
    BrushBuilder, BrushConfig, BrushSide, Plane, enumerate_facets, enumerate_vertices,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    divan::main();
}

// ============================================================================
// Test Data Generators
// ============================================================================

/// Sides of `n·x ≤ offset` for each `(n, offset)`.
fn sides(planes: &[(DVec3, f64)]) -> Vec<BrushSide> {
    planes
        .iter()
        .map(|&(normal, offset)| Plane::new(normal, -offset).into())
        .collect()
}

/// Cube planes (6 planes)
fn cube_planes() -> Vec<(DVec3, f64)> {
    [DVec3::X, -DVec3::X, DVec3::Y, -DVec3::Y, DVec3::Z, -DVec3::Z]
        .into_iter()
        .map(|n| (n, 32.0))
        .collect()
}

/// Octahedron planes (8 planes with diagonal normals)
fn octahedron_planes() -> Vec<(DVec3, f64)> {
    let mut planes = Vec::with_capacity(8);
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                planes.push((DVec3::new(x, y, z).normalize(), 32.0));
            }
        }
    }
    planes
}

/// Dodecahedron planes (12 planes)
fn dodecahedron_planes() -> Vec<(DVec3, f64)> {
    let phi = f64::midpoint(1.0, 5.0_f64.sqrt());

    let normals = [
        DVec3::new(0.0, 1.0, phi),
        DVec3::new(0.0, 1.0, -phi),
        DVec3::new(0.0, -1.0, phi),
        DVec3::new(0.0, -1.0, -phi),
        DVec3::new(1.0, phi, 0.0),
        DVec3::new(1.0, -phi, 0.0),
        DVec3::new(-1.0, phi, 0.0),
        DVec3::new(-1.0, -phi, 0.0),
        DVec3::new(phi, 0.0, 1.0),
        DVec3::new(phi, 0.0, -1.0),
        DVec3::new(-phi, 0.0, 1.0),
        DVec3::new(-phi, 0.0, -1.0),
    ];

    normals.into_iter().map(|n| (n.normalize(), 48.0)).collect()
}

/// Sphere-like brush using a Fibonacci distribution of normals
#[expect(clippy::cast_precision_loss)]
fn fibonacci_sphere_planes(n: usize) -> Vec<(DVec3, f64)> {
    let golden = f64::midpoint(1.0, 5.0_f64.sqrt());

    (0..n)
        .map(|i| {
            let theta = std::f64::consts::TAU * (i as f64) / golden;
            let phi = (1.0 - 2.0 * (i as f64 + 0.5) / n as f64).acos();

            let normal = DVec3::new(
                phi.sin() * theta.cos(),
                phi.sin() * theta.sin(),
                phi.cos(),
            );
            (normal, 64.0)
        })
        .collect()
}

/// A cube cut by random planes, so the result stays bounded
fn random_planes(count: usize, seed: u64) -> Vec<(DVec3, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut planes = cube_planes();

    while planes.len() < count {
        let normal = DVec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        if normal.length() > 0.1 {
            planes.push((normal.normalize(), rng.random_range(24.0..36.0)));
        }
    }

    planes
}

/// Uniform points in a 128-unit box
fn random_cloud(count: usize, seed: u64) -> Vec<DVec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            DVec3::new(
                rng.random_range(-64.0..64.0),
                rng.random_range(-64.0..64.0),
                rng.random_range(-64.0..64.0),
            )
        })
        .collect()
}

// ============================================================================
// Planes → Brush
// ============================================================================

#[divan::bench]
fn planes_cube(bencher: Bencher) {
    let sides = sides(&cube_planes());
    let builder = BrushBuilder::new();

    bencher.bench_local(|| black_box(builder.build_from_planes(&sides)));
}

#[divan::bench]
fn planes_octahedron(bencher: Bencher) {
    let sides = sides(&octahedron_planes());
    let builder = BrushBuilder::new();

    bencher.bench_local(|| black_box(builder.build_from_planes(&sides)));
}

#[divan::bench]
fn planes_dodecahedron(bencher: Bencher) {
    let sides = sides(&dodecahedron_planes());
    let builder = BrushBuilder::new();

    bencher.bench_local(|| black_box(builder.build_from_planes(&sides)));
}

// ============================================================================
// Scalability
// ============================================================================

#[divan::bench(args = [10, 20, 30, 50])]
fn scale_random(bencher: Bencher, n: usize) {
    let planes: Vec<Plane> = random_planes(n, 42)
        .into_iter()
        .map(|(normal, offset)| Plane::new(normal, -offset))
        .collect();
    let config = BrushConfig::default();

    bencher.bench_local(|| black_box(enumerate_vertices(&planes, &config)));
}

#[divan::bench(args = [8, 12, 16, 20, 30, 50])]
fn scale_fibonacci(bencher: Bencher, n: usize) {
    let sides = sides(&fibonacci_sphere_planes(n));
    let builder = BrushBuilder::new();

    bencher.bench_local(|| black_box(builder.build_from_planes(&sides)));
}

// ============================================================================
// Point Cloud → Brush
// ============================================================================

#[divan::bench(args = [8, 32, 128, 512])]
fn hull_random_cloud(bencher: Bencher, n: usize) {
    let points = random_cloud(n, 7);
    let config = BrushConfig::default();

    bencher.bench_local(|| black_box(enumerate_facets(&points, &config)));
}

#[divan::bench(args = [8, 32, 128])]
fn brush_from_random_cloud(bencher: Bencher, n: usize) {
    let points = random_cloud(n, 7);
    let builder = BrushBuilder::new();

    bencher.bench_local(|| black_box(builder.build_from_vertices(&points)));
}

// ============================================================================
// Export and Editing
// ============================================================================

#[divan::bench]
fn map_round_trip(bencher: Bencher) {
    let builder = BrushBuilder::new();
    let Ok(brush) = builder.build_from_planes(&sides(&dodecahedron_planes())) else {
        return;
    };

    bencher.bench_local(|| {
        let records = brush.to_plane_records();
        black_box(builder.build_from_map(&records))
    });
}

#[divan::bench]
fn transform_in_place(bencher: Bencher) {
    let builder = BrushBuilder::new();
    let Ok(mut brush) = builder.build_from_planes(&sides(&fibonacci_sphere_planes(30))) else {
        return;
    };
    let motion = DAffine3::from_rotation_z(0.01) * DAffine3::from_translation(DVec3::X);

    bencher.bench_local(|| black_box(brush.transform(&motion)));
}
