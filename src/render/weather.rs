use crate::render::raster::Raster;
use crate::render::terrain::Projector;
use glam::Vec3;
use terragen::mesh::PLANE_HALF_EXTENT;
use terragen::{LayerKind, WeatherLayer};

/// Vertical placement of a layer plane above the terrain, in mesh units.
fn plane_height(altitude: f32) -> f32 {
    2.4 + altitude / 9_000.0 * 1.8
}

/// Composite the filtered layer stack, in list order. Cells are
/// alpha-blended squares except for wind, which draws directional
/// segments. A small time-based jitter proportional to the layer's
/// animation speed keeps the overlays drifting between regenerations.
pub fn draw(
    raster: &mut Raster,
    layers: &[&WeatherLayer],
    projector: &Projector,
    sim_time: f64,
    volumetric_clouds: bool,
) {
    for layer in layers {
        draw_layer(raster, layer, projector, sim_time, 0.0);
        if volumetric_clouds && layer.kind == LayerKind::Clouds {
            // Cheap volumetric hint: a second, offset, fainter pass.
            draw_layer(raster, layer, projector, sim_time, 0.35);
        }
    }
}

fn draw_layer(
    raster: &mut Raster,
    layer: &WeatherLayer,
    projector: &Projector,
    sim_time: f64,
    lift: f32,
) {
    let size = layer.data.size();
    if size == 0 {
        return;
    }
    let (min, max) = layer.data.range();
    let span = (max - min).max(f32::EPSILON);
    let y = plane_height(layer.altitude) + lift;
    let step = 2.0 * PLANE_HALF_EXTENT / size as f32;
    let fade = if lift > 0.0 { 0.5 } else { 1.0 };

    // One cell's footprint in pixels, from two adjacent projections.
    let (a, _) = projector.project(Vec3::new(0.0, y, 0.0));
    let (b, _) = projector.project(Vec3::new(step, y, 0.0));
    let cell_px = ((b - a).length().round() as i32).max(2);

    for j in 0..size {
        for i in 0..size {
            let value = layer.data.get(i, j);
            let norm = (value - min) / span;
            let alpha = layer.opacity * layer.intensity * norm * fade;
            if alpha < 0.01 {
                continue;
            }

            let x = -PLANE_HALF_EXTENT + (i as f32 + 0.5) * step;
            let z = -PLANE_HALF_EXTENT + (j as f32 + 0.5) * step;
            let (p, _) = projector.project(Vec3::new(x, y, z));
            let jitter = ((sim_time * layer.animation_speed as f64
                + (i + j) as f64 * 0.7)
                .sin() as f32)
                * 2.0;
            let px = (p.x + jitter) as i32;
            let py = p.y as i32;
            let rgb = [layer.color[0], layer.color[1], layer.color[2]];

            if layer.kind == LayerKind::Wind {
                // Short directional segments instead of filled cells.
                let angle = value * 0.35 + (sim_time * layer.animation_speed as f64) as f32 * 0.2;
                let len = 3.0 + norm * 5.0;
                let dx = (angle.cos() * len) as i32;
                let dy = (angle.sin() * len * 0.5) as i32;
                raster.line(px - dx, py - dy, px + dx, py + dy, rgb, alpha);
            } else {
                raster.blend_rect(px - cell_px / 2, py - cell_px / 2, cell_px, cell_px, rgb, alpha);
            }
        }
    }
}
