use crate::render::raster::Raster;
use crate::view::ViewState;
use glam::{Vec2, Vec3};
use terragen::TerrainMesh;
use terragen::mesh::PLANE_HALF_EXTENT;

/// Pseudo-3-D transform: yaw around the vertical axis, then a fixed
/// axonometric tilt onto the screen plane.
pub struct Projector {
    center: Vec2,
    scale: f32,
    yaw_sin: f32,
    yaw_cos: f32,
    tilt_sin: f32,
    tilt_cos: f32,
    translation: Vec2,
    exaggeration: f32,
}

impl Projector {
    pub fn from_view(view: &ViewState, width: usize, height: usize) -> Self {
        let yaw = view.rotation.y.to_radians();
        let tilt = view.rotation.x.to_radians();
        let scale = view.zoom * height.min(width) as f32 / (PLANE_HALF_EXTENT * 3.2);
        Self {
            center: Vec2::new(width as f32 * 0.5, height as f32 * 0.58),
            scale,
            yaw_sin: yaw.sin(),
            yaw_cos: yaw.cos(),
            tilt_sin: tilt.sin(),
            tilt_cos: tilt.cos(),
            translation: view.translation,
            exaggeration: view.terrain_exaggeration,
        }
    }

    /// Returns the screen position and a depth key (larger = nearer).
    pub fn project(&self, p: Vec3) -> (Vec2, f32) {
        let xr = p.x * self.yaw_cos - p.z * self.yaw_sin;
        let zr = p.x * self.yaw_sin + p.z * self.yaw_cos;
        let sx = self.center.x + self.translation.x + xr * self.scale;
        let sy = self.center.y + self.translation.y + zr * self.scale * self.tilt_sin
            - p.y * self.scale * self.tilt_cos * self.exaggeration;
        (Vec2::new(sx, sy), zr)
    }
}

/// Height bands for the shaded terrain surface.
fn band_color(h: f32) -> [f32; 3] {
    if h < 0.18 {
        [0.15, 0.35, 0.62] // water
    } else if h < 0.45 {
        [0.30, 0.55, 0.25] // plains
    } else if h < 0.75 {
        [0.48, 0.40, 0.28] // hills
    } else {
        [0.85, 0.85, 0.88] // mountains
    }
}

/// Flat fallback when terrain shading is disabled: plain elevation ramp.
fn flat_color(h: f32) -> [f32; 3] {
    [0.2 + 0.6 * h, 0.45 + 0.4 * h, 0.25 + 0.55 * h]
}

/// Paint the terrain surface cell by cell, far cells first.
pub fn draw(raster: &mut Raster, mesh: &TerrainMesh, projector: &Projector, shaded: bool) {
    let n = mesh.resolution;
    let mut cells: Vec<(usize, usize, f32)> = Vec::with_capacity((n - 1) * (n - 1));
    for j in 0..n - 1 {
        for i in 0..n - 1 {
            let (_, depth) = projector.project(cell_center(mesh, i, j));
            cells.push((i, j, depth));
        }
    }
    // Painter's order: back to front.
    cells.sort_by(|a, b| a.2.total_cmp(&b.2));

    for (i, j, _) in cells {
        let corners = [
            mesh.position(i, j),
            mesh.position(i + 1, j),
            mesh.position(i, j + 1),
            mesh.position(i + 1, j + 1),
        ];
        let h = (mesh.height01(i, j)
            + mesh.height01(i + 1, j)
            + mesh.height01(i, j + 1)
            + mesh.height01(i + 1, j + 1))
            / 4.0;

        let rgb = if shaded {
            let slope = cell_slope(mesh, i, j);
            let shade = (1.0 - slope * 2.5).clamp(0.55, 1.0);
            let base = band_color(h);
            [base[0] * shade, base[1] * shade, base[2] * shade]
        } else {
            flat_color(h)
        };

        let s: Vec<[f32; 2]> = corners
            .iter()
            .map(|&c| {
                let (p, _) = projector.project(c);
                [p.x, p.y]
            })
            .collect();
        raster.fill_triangle(s[0], s[1], s[2], rgb, 1.0);
        raster.fill_triangle(s[2], s[1], s[3], rgb, 1.0);
    }
}

fn cell_center(mesh: &TerrainMesh, i: usize, j: usize) -> Vec3 {
    (mesh.position(i, j)
        + mesh.position(i + 1, j)
        + mesh.position(i, j + 1)
        + mesh.position(i + 1, j + 1))
        / 4.0
}

/// Largest normalized height difference across the cell.
fn cell_slope(mesh: &TerrainMesh, i: usize, j: usize) -> f32 {
    let h = [
        mesh.height01(i, j),
        mesh.height01(i + 1, j),
        mesh.height01(i, j + 1),
        mesh.height01(i + 1, j + 1),
    ];
    let min = h.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = h.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    max - min
}

#[cfg(test)]
mod tests {
    use super::*;
    use terragen::config::PointCloudDensity;
    use terragen::samples::{GeoBounds, SampleIngestor};

    fn test_mesh() -> TerrainMesh {
        let bounds = GeoBounds::new(50.0, 51.0, 8.0, 9.0).unwrap();
        let samples = SampleIngestor::new(bounds, 0.1, PointCloudDensity::High, 11).ingest();
        terragen::synthesize(&samples, 12).unwrap().unwrap()
    }

    #[test]
    fn terrain_paints_into_the_raster() {
        let mut raster = Raster::new(160, 120);
        let view = ViewState::default();
        let projector = Projector::from_view(&view, 160, 120);
        draw(&mut raster, &test_mesh(), &projector, true);
        assert!(raster.pixels().iter().any(|&b| b > 0));
    }

    #[test]
    fn yaw_moves_projected_points() {
        let mut view = ViewState::default();
        let a = Projector::from_view(&view, 160, 120).project(Vec3::new(3.0, 0.5, 1.0));
        view.rotation.y += 45.0;
        let b = Projector::from_view(&view, 160, 120).project(Vec3::new(3.0, 0.5, 1.0));
        assert!((a.0 - b.0).length() > 1.0);
    }

    #[test]
    fn bands_cover_the_height_range() {
        assert_ne!(band_color(0.05), band_color(0.3));
        assert_ne!(band_color(0.3), band_color(0.6));
        assert_ne!(band_color(0.6), band_color(0.9));
    }
}
