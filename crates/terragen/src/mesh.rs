use crate::error::ConfigError;
use crate::samples::ElevationSample;
use glam::Vec3;

/// Axis-aligned bounds of the source sample set.
///
/// `x` carries longitude, `y` elevation, `z` latitude, matching the
/// normalized vertex layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBounds {
    pub min: Vec3,
    pub max: Vec3,
}

/// Regular-grid triangulated surface resampled from elevation samples.
///
/// Invariants for resolution `n`:
/// - `vertices.len() == 3 * n * n` (flat x, y, z triples)
/// - `indices.len() == 6 * (n - 1) * (n - 1)`, every index `< n * n`
/// - `normals.len() == vertices.len()`, every normal unit length
/// - `texture_coords.len() == 2 * n * n`
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub normals: Vec<f32>,
    pub texture_coords: Vec<f32>,
    pub resolution: usize,
    pub bounds: MeshBounds,
}

impl TerrainMesh {
    /// Vertex position at grid node `(i, j)`.
    pub fn position(&self, i: usize, j: usize) -> Vec3 {
        let base = (j * self.resolution + i) * 3;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    /// Normalized height in `[0, 1]` at grid node `(i, j)`.
    pub fn height01(&self, i: usize, j: usize) -> f32 {
        self.position(i, j).y / HEIGHT_SCALE
    }
}

/// Horizontal extent of the normalized mesh: lon/lat map to `[-5, 5]`.
pub const PLANE_HALF_EXTENT: f32 = 5.0;
/// Vertical extent: elevation maps to `[0, 2]`.
pub const HEIGHT_SCALE: f32 = 2.0;

/// Build a regular-grid triangulated surface from the sample set.
///
/// Grid nodes resample elevation by nearest-neighbour search over the
/// full sample set — a linear scan, `O(n² · samples)` in total. Fine at
/// the capped sample and grid sizes; swap in a k-d tree or uniform grid
/// hash here if either bound grows, the contract does not change.
///
/// An empty sample set is not an error: the mesh stays unset and the
/// renderer falls back to background only.
pub fn synthesize(
    samples: &[ElevationSample],
    resolution: usize,
) -> Result<Option<TerrainMesh>, ConfigError> {
    if resolution <= 1 {
        return Err(ConfigError::ResolutionTooLow(resolution));
    }
    if samples.is_empty() {
        return Ok(None);
    }

    let bounds = sample_bounds(samples);
    let lon_span = (bounds.max.x - bounds.min.x).max(f32::EPSILON);
    let lat_span = (bounds.max.z - bounds.min.z).max(f32::EPSILON);
    let elev_span = bounds.max.y - bounds.min.y;

    let n = resolution;
    let inv = 1.0 / (n as f32 - 1.0);
    let mut vertices = Vec::with_capacity(3 * n * n);
    let mut normals = Vec::with_capacity(3 * n * n);
    let mut texture_coords = Vec::with_capacity(2 * n * n);

    for j in 0..n {
        let v = j as f32 * inv;
        let lat = bounds.min.z + v * lat_span;
        for i in 0..n {
            let u = i as f32 * inv;
            let lon = bounds.min.x + u * lon_span;

            let elevation = nearest_elevation(samples, lat, lon);

            let x = (u * 2.0 - 1.0) * PLANE_HALF_EXTENT;
            let z = (v * 2.0 - 1.0) * PLANE_HALF_EXTENT;
            let y = if elev_span > f32::EPSILON {
                (elevation - bounds.min.y) / elev_span * HEIGHT_SCALE
            } else {
                0.0
            };
            vertices.extend_from_slice(&[x, y, z]);
            // Reference behavior: flat up normals. Replace with
            // cross-product vertex normals if the renderer ever needs
            // real slope from them.
            normals.extend_from_slice(&[0.0, 1.0, 0.0]);
            texture_coords.extend_from_slice(&[u, v]);
        }
    }

    let mut indices = Vec::with_capacity(6 * (n - 1) * (n - 1));
    for j in 0..n - 1 {
        for i in 0..n - 1 {
            let a = (j * n + i) as u32;
            let b = (j * n + i + 1) as u32;
            let c = ((j + 1) * n + i) as u32;
            let d = ((j + 1) * n + i + 1) as u32;
            indices.extend_from_slice(&[a, b, c, c, b, d]);
        }
    }

    Ok(Some(TerrainMesh {
        vertices,
        indices,
        normals,
        texture_coords,
        resolution: n,
        bounds,
    }))
}

fn sample_bounds(samples: &[ElevationSample]) -> MeshBounds {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for s in samples {
        let p = Vec3::new(s.longitude, s.elevation, s.latitude);
        min = min.min(p);
        max = max.max(p);
    }
    MeshBounds { min, max }
}

fn nearest_elevation(samples: &[ElevationSample], lat: f32, lon: f32) -> f32 {
    let mut best = f32::INFINITY;
    let mut elevation = 0.0;
    for s in samples {
        let dlat = s.latitude - lat;
        let dlon = s.longitude - lon;
        let d2 = dlat * dlat + dlon * dlon;
        if d2 < best {
            best = d2;
            elevation = s.elevation;
        }
    }
    elevation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PointCloudDensity;
    use crate::samples::{GeoBounds, SampleIngestor};
    use rstest::rstest;

    fn test_samples() -> Vec<ElevationSample> {
        let bounds = GeoBounds::new(50.0, 51.0, 8.0, 9.0).unwrap();
        SampleIngestor::new(bounds, 0.1, PointCloudDensity::High, 4242).ingest()
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(8)]
    #[case(64)]
    fn mesh_counts_match_resolution(#[case] n: usize) {
        let mesh = synthesize(&test_samples(), n).unwrap().unwrap();
        assert_eq!(mesh.vertices.len(), 3 * n * n);
        assert_eq!(mesh.indices.len(), 6 * (n - 1) * (n - 1));
        assert_eq!(mesh.normals.len(), 3 * n * n);
        assert_eq!(mesh.texture_coords.len(), 2 * n * n);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < n * n));
    }

    #[test]
    fn normals_are_unit_length() {
        let mesh = synthesize(&test_samples(), 16).unwrap().unwrap();
        for normal in mesh.normals.chunks_exact(3) {
            let len2 = normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2];
            assert!((len2 - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn bounds_contain_every_sample() {
        let samples = test_samples();
        let mesh = synthesize(&samples, 8).unwrap().unwrap();
        for s in &samples {
            assert!(mesh.bounds.min.x <= s.longitude && s.longitude <= mesh.bounds.max.x);
            assert!(mesh.bounds.min.y <= s.elevation && s.elevation <= mesh.bounds.max.y);
            assert!(mesh.bounds.min.z <= s.latitude && s.latitude <= mesh.bounds.max.z);
        }
    }

    #[test]
    fn synthesis_is_idempotent() {
        let samples = test_samples();
        let a = synthesize(&samples, 32).unwrap().unwrap();
        let b = synthesize(&samples, 32).unwrap().unwrap();
        assert_eq!(a.vertices, b.vertices);
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn empty_sample_set_leaves_mesh_unset() {
        assert!(synthesize(&[], 16).unwrap().is_none());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn rejects_degenerate_resolution(#[case] n: usize) {
        assert!(matches!(
            synthesize(&test_samples(), n),
            Err(ConfigError::ResolutionTooLow(_))
        ));
    }

    /// End-to-end: the demo bounding box at high density and N = 64.
    #[test]
    fn scenario_a_central_europe_box() {
        let bounds = GeoBounds::new(47.0, 55.0, 6.0, 15.0).unwrap();
        let samples = SampleIngestor::new(bounds, 0.1, PointCloudDensity::High, 7).ingest();
        let mesh = synthesize(&samples, 64).unwrap().unwrap();

        assert_eq!(mesh.vertices.len(), 12_288);
        assert_eq!(mesh.indices.len(), 6 * 63 * 63);
        for vertex in mesh.vertices.chunks_exact(3) {
            assert!((0.0..=HEIGHT_SCALE).contains(&vertex[1]));
        }
    }
}
