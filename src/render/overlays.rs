use crate::render::glyphs::{self, GLYPH_HEIGHT};
use crate::render::raster::Raster;
use terragen::tools::{splitmix64, unit_f32};
use terragen::{LayerKind, MissionStatus, SatelliteMission, WeatherLayer};

/// Daylight window for the sky and lighting palettes.
fn is_day(local_hour: u32) -> bool {
    (6..18).contains(&local_hour)
}

/// Vertical sky gradient, branching on local hour.
pub fn sky(raster: &mut Raster, local_hour: u32) {
    let (top, bottom) = if is_day(local_hour) {
        ([0.36, 0.58, 0.85], [0.78, 0.86, 0.94])
    } else {
        ([0.02, 0.03, 0.10], [0.10, 0.12, 0.25])
    };
    let height = raster.height().max(1);
    for y in 0..height {
        let t = y as f32 / height as f32;
        let rgb = [
            top[0] + (bottom[0] - top[0]) * t,
            top[1] + (bottom[1] - top[1]) * t,
            top[2] + (bottom[2] - top[2]) * t,
        ];
        for x in 0..raster.width() {
            raster.blend(x as i32, y as i32, rgb, 1.0);
        }
    }
}

fn status_color(status: MissionStatus) -> [f32; 3] {
    match status {
        MissionStatus::Active => [0.25, 0.95, 0.45],
        MissionStatus::Planned => [0.95, 0.85, 0.25],
        MissionStatus::Completed => [0.65, 0.65, 0.70],
        MissionStatus::Failed => [0.95, 0.30, 0.25],
    }
}

/// Markers on elliptical orbit paths keyed by mission index and sim time.
pub fn satellites(raster: &mut Raster, missions: &[SatelliteMission], sim_time: f64, paths: bool) {
    let cx = raster.width() as f32 * 0.5;
    let cy = raster.height() as f32 * 0.42;
    for (idx, mission) in missions.iter().enumerate() {
        let a = raster.width() as f32 * 0.26 + idx as f32 * 13.0;
        let b = raster.height() as f32 * 0.11 + idx as f32 * 7.0;
        let rgb = status_color(mission.status);

        if paths {
            let steps = 72;
            let mut prev: Option<(i32, i32)> = None;
            for s in 0..=steps {
                let ang = s as f32 / steps as f32 * std::f32::consts::TAU;
                let px = (cx + a * ang.cos()) as i32;
                let py = (cy + b * ang.sin()) as i32;
                if let Some((lx, ly)) = prev {
                    raster.line(lx, ly, px, py, rgb, 0.18);
                }
                prev = Some((px, py));
            }
        }

        let phase = sim_time * (0.20 + idx as f64 * 0.05) + idx as f64 * 1.3;
        let px = (cx + a * phase.cos() as f32) as i32;
        let py = (cy + b * phase.sin() as f32) as i32;
        raster.disc(px, py, 3, rgb, 0.9);
    }
}

const PARTICLES_PER_LAYER: u64 = 140;

/// Falling streaks for layers carrying active precipitation.
pub fn particles(raster: &mut Raster, layers: &[&WeatherLayer], sim_time: f64) {
    let w = raster.width() as f32;
    let h = raster.height() as f32;
    for layer in layers {
        if layer.kind != LayerKind::Precipitation || layer.intensity < 0.2 {
            continue;
        }
        let fall = sim_time * 90.0 * layer.animation_speed as f64;
        for p in 0..PARTICLES_PER_LAYER {
            let hx = splitmix64(p.wrapping_mul(0x9E37) ^ layer.id as u64);
            let hy = splitmix64(hx);
            let x = (unit_f32(hx) * w) as i32;
            let y = ((unit_f32(hy) * h + fall as f32) % h) as i32;
            let rgb = [layer.color[0], layer.color[1], layer.color[2]];
            raster.line(x, y, x, y + 3, rgb, 0.35);
        }
    }
}

/// Reference grid, one line per tenth of the frame.
pub fn grid(raster: &mut Raster) {
    let w = raster.width() as i32;
    let h = raster.height() as i32;
    let rgb = [1.0, 1.0, 1.0];
    for k in 1..10 {
        let x = w * k / 10;
        let y = h * k / 10;
        raster.line(x, 0, x, h - 1, rgb, 0.12);
        raster.line(0, y, w - 1, y, rgb, 0.12);
    }
}

/// Text labels over a translucent backing plate.
pub fn labels(raster: &mut Raster, lines: &[String]) {
    let pad = 4;
    let line_h = GLYPH_HEIGHT + 3;
    let widest = lines.iter().map(|l| glyphs::text_width(l)).max().unwrap_or(0);
    raster.blend_rect(
        4,
        4,
        widest + pad * 2,
        lines.len() as i32 * line_h + pad * 2,
        [0.05, 0.08, 0.12],
        0.55,
    );
    for (row, line) in lines.iter().enumerate() {
        glyphs::draw_text(
            raster,
            4 + pad,
            4 + pad + row as i32 * line_h,
            line,
            [0.9, 0.95, 1.0],
            0.95,
        );
    }
}

/// Additive radial gradient anchored off-center, intensity by local hour.
pub fn lighting(raster: &mut Raster, local_hour: u32) {
    let strength = if is_day(local_hour) { 0.30 } else { 0.08 };
    let cx = raster.width() as f32 * 0.30;
    let cy = raster.height() as f32 * 0.25;
    let radius = raster.width().max(raster.height()) as f32 * 0.6;

    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            if d < radius {
                let falloff = 1.0 - d / radius;
                raster.add(x as i32, y as i32, [1.0, 0.97, 0.88], strength * falloff * falloff);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, false)]
    #[case(5, false)]
    #[case(6, true)]
    #[case(12, true)]
    #[case(17, true)]
    #[case(18, false)]
    #[case(23, false)]
    fn daylight_window(#[case] hour: u32, #[case] expected: bool) {
        assert_eq!(is_day(hour), expected);
    }

    #[test]
    fn sky_palette_branches_on_hour() {
        let mut day = Raster::new(8, 8);
        sky(&mut day, 12);
        let mut night = Raster::new(8, 8);
        sky(&mut night, 2);
        assert!(day.pixel(4, 0)[2] > night.pixel(4, 0)[2]);
    }

    #[test]
    fn satellite_markers_move_with_time() {
        let missions = terragen::default_missions();
        let mut a = Raster::new(120, 90);
        satellites(&mut a, &missions, 0.0, false);
        let mut b = Raster::new(120, 90);
        satellites(&mut b, &missions, 40.0, false);
        assert_ne!(a.pixels(), b.pixels());
    }

    #[test]
    fn labels_draw_a_backing_plate() {
        let mut raster = Raster::new(160, 60);
        labels(&mut raster, &["MODE: COMPOSITE".to_string()]);
        assert!(raster.pixel(6, 6)[3] == 255);
    }

    #[test]
    fn lighting_brightens_the_anchor_region() {
        let mut raster = Raster::new(64, 64);
        raster.clear([0.2, 0.2, 0.2]);
        let before = raster.pixel(19, 16)[0];
        lighting(&mut raster, 12);
        assert!(raster.pixel(19, 16)[0] > before);
    }
}
