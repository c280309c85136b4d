//! Fixed-order compositing of mesh, weather layers and overlays into one
//! raster frame. Every stage is independently toggleable and costs
//! nothing when disabled.

pub mod glyphs;
pub mod overlays;
pub mod raster;
pub mod terrain;
pub mod weather;

pub use raster::{Raster, RenderError};

use crate::view::ViewState;
use terrain::Projector;
use terragen::{EngineConfig, SatelliteMission, TerrainMesh, WeatherLayer};

/// Read-only snapshot consumed by one frame. Regenerations swap the
/// underlying state between frames, never during one.
pub struct FrameInput<'a> {
    pub mesh: Option<&'a TerrainMesh>,
    /// Already filtered to `altitude <= selected + margin`, in stack order.
    pub layers: &'a [&'a WeatherLayer],
    pub missions: &'a [SatelliteMission],
    pub view: &'a ViewState,
    pub config: &'a EngineConfig,
    pub sim_time: f64,
    pub local_hour: u32,
}

/// Composite one frame, back to front: sky, terrain, weather layers,
/// satellites, particles, grid, labels, lighting.
///
/// With no mesh available only the sky (and any enabled overlays) is
/// drawn; a zero-sized target is reported so the scheduler can skip the
/// frame and retry.
pub fn render_frame(raster: &mut Raster, input: &FrameInput) -> Result<(), RenderError> {
    if raster.is_empty() {
        return Err(RenderError::EmptyTarget {
            width: raster.width(),
            height: raster.height(),
        });
    }

    overlays::sky(raster, input.local_hour);

    let projector = Projector::from_view(input.view, raster.width(), raster.height());
    if let Some(mesh) = input.mesh {
        terrain::draw(raster, mesh, &projector, input.config.enable_terrain_shading);
    }

    weather::draw(
        raster,
        input.layers,
        &projector,
        input.sim_time,
        input.config.enable_volumetric_clouds,
    );

    if input.view.show_satellite_paths {
        overlays::satellites(raster, input.missions, input.sim_time, true);
    }
    if input.config.enable_particle_effects {
        overlays::particles(raster, input.layers, input.sim_time);
    }
    if input.view.show_grid {
        overlays::grid(raster);
    }
    if input.view.show_labels {
        overlays::labels(raster, &label_lines(input));
    }
    if input.view.enable_lighting {
        overlays::lighting(raster, input.local_hour);
    }
    Ok(())
}

fn label_lines(input: &FrameInput) -> Vec<String> {
    vec![
        format!("MODE: {}", input.config.render_mode.to_ascii_uppercase()),
        format!("ALT: {:.0} M", input.view.selected_altitude),
        format!("HOUR: {:02}", input.local_hour),
        format!("LAYERS: {}", input.layers.len()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_without_mesh<'a>(
        view: &'a ViewState,
        config: &'a EngineConfig,
        missions: &'a [SatelliteMission],
    ) -> FrameInput<'a> {
        FrameInput {
            mesh: None,
            layers: &[],
            missions,
            view,
            config,
            sim_time: 0.0,
            local_hour: 12,
        }
    }

    /// Scenario: no samples ingested yet. Only the background renders,
    /// and nothing panics.
    #[test]
    fn renders_sky_only_without_a_mesh() {
        let view = ViewState {
            show_grid: false,
            show_labels: false,
            show_satellite_paths: false,
            enable_lighting: false,
            ..ViewState::default()
        };
        let config = EngineConfig::default();
        let mut raster = Raster::new(64, 48);
        render_frame(&mut raster, &input_without_mesh(&view, &config, &[])).unwrap();

        // Uniform sky gradient: every row is a single color.
        for y in [0usize, 24, 47] {
            let first = raster.pixel(0, y);
            for x in 0..raster.width() {
                assert_eq!(raster.pixel(x, y), first);
            }
        }
    }

    #[test]
    fn zero_sized_target_is_reported_not_fatal() {
        let view = ViewState::default();
        let config = EngineConfig::default();
        let mut raster = Raster::new(0, 0);
        let err = render_frame(&mut raster, &input_without_mesh(&view, &config, &[])).unwrap_err();
        assert!(matches!(err, RenderError::EmptyTarget { .. }));
    }

    #[test]
    fn toggled_overlay_stages_change_the_output() {
        let view = ViewState {
            show_grid: false,
            show_labels: false,
            show_satellite_paths: false,
            enable_lighting: false,
            ..ViewState::default()
        };
        let mut config = EngineConfig::default();
        config.enable_particle_effects = false;

        let missions = terragen::default_missions();
        let mut bare = Raster::new(64, 48);
        render_frame(&mut bare, &input_without_mesh(&view, &config, &missions)).unwrap();

        let full_view = ViewState::default();
        let mut full = Raster::new(64, 48);
        render_frame(&mut full, &input_without_mesh(&full_view, &config, &missions)).unwrap();

        assert_ne!(bare.pixels(), full.pixels());
    }
}
