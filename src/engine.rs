use crate::render::{self, FrameInput, Raster, RenderError};
use crate::view::{ALTITUDE_FILTER_MARGIN, ViewState};
use std::time::Duration;
use terragen::{
    ConfigError, ElevationSample, EngineConfig, FieldGenerator, GeoBounds, SampleIngestor,
    SatelliteMission, TerrainMesh, WeatherLayer, build_layers, default_missions, synthesize,
};

/// Weather layers regenerate on their own timer, independent of samples.
const LAYER_REGEN_PERIOD: Duration = Duration::from_secs(120);
/// Target frame period while animating.
const FRAME_PERIOD: Duration = Duration::from_millis(33);
/// Raw sweep spacing handed to the ingestor, in degrees.
const SAMPLE_SPACING_DEG: f32 = 0.1;

struct PeriodicTimer {
    due: Duration,
    period: Duration,
}

/// Advance a due timer past `now` and report whether it fired.
fn fire(slot: &mut Option<PeriodicTimer>, now: Duration) -> bool {
    match slot {
        Some(timer) if now >= timer.due => {
            while timer.due <= now {
                timer.due += timer.period;
            }
            true
        }
        _ => false,
    }
}

/// The engine owns all mutable state: sample set, mesh, layer stack,
/// view, and the three timers (sample regeneration, layer regeneration,
/// frame loop). Single-threaded and cooperative — callers drive it with
/// `tick` and `render_frame` off one clock, so a regeneration completing
/// between frames is visible to the next frame, never mid-frame.
///
/// `dispose` cancels all three timers; nothing mutates afterwards.
pub struct Engine {
    config: EngineConfig,
    ingestor: SampleIngestor,
    generator: FieldGenerator,
    mesh_resolution: usize,
    field_size: usize,

    samples: Vec<ElevationSample>,
    mesh: Option<TerrainMesh>,
    layers: Vec<WeatherLayer>,
    missions: Vec<SatelliteMission>,
    view: ViewState,

    sample_timer: Option<PeriodicTimer>,
    layer_timer: Option<PeriodicTimer>,
    next_frame: Option<Duration>,

    mutations: u64,
    disposed: bool,
}

impl Engine {
    /// Validates the configuration up front; invalid values are rejected
    /// here, never clamped later.
    pub fn new(config: EngineConfig, bounds: GeoBounds) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed();
        let ingestor = SampleIngestor::new(
            bounds,
            SAMPLE_SPACING_DEG,
            config.point_cloud_density,
            seed,
        );
        Ok(Self {
            mesh_resolution: config.data_resolution.mesh_resolution(),
            field_size: config.data_resolution.field_size(),
            generator: FieldGenerator::new(seed),
            ingestor,
            config,
            samples: Vec::new(),
            mesh: None,
            layers: Vec::new(),
            missions: default_missions(),
            view: ViewState::default(),
            sample_timer: None,
            layer_timer: None,
            next_frame: None,
            mutations: 0,
            disposed: false,
        })
    }

    /// Arm all three timers. The regeneration timers fire immediately on
    /// the next tick so the first frame has data.
    pub fn start(&mut self, now: Duration) {
        if self.disposed {
            return;
        }
        self.sample_timer = Some(PeriodicTimer {
            due: now,
            period: Duration::from_millis(self.config.update_interval_ms as u64),
        });
        self.layer_timer = Some(PeriodicTimer {
            due: now,
            period: LAYER_REGEN_PERIOD,
        });
        if self.view.is_animating {
            self.next_frame = Some(now);
        }
    }

    /// Run any regeneration timers that have come due. A failed
    /// regeneration logs and leaves the previous state in place; the
    /// other timers keep running.
    pub fn tick(&mut self, now: Duration) {
        if self.disposed {
            return;
        }
        if fire(&mut self.sample_timer, now) {
            self.regenerate_samples();
        }
        if fire(&mut self.layer_timer, now) {
            self.regenerate_layers(now.as_secs_f64());
        }
    }

    fn regenerate_samples(&mut self) {
        let samples = self.ingestor.ingest();
        match synthesize(&samples, self.mesh_resolution) {
            Ok(mesh) => {
                log::debug!(
                    "regenerated {} samples, mesh {}",
                    samples.len(),
                    if mesh.is_some() { "rebuilt" } else { "unset" }
                );
                self.samples = samples;
                self.mesh = mesh;
                self.mutations += 1;
            }
            Err(err) => {
                // Keep the previous mesh; the other timers are unaffected.
                log::warn!("sample regeneration failed: {err}");
            }
        }
    }

    fn regenerate_layers(&mut self, t: f64) {
        self.layers = build_layers(
            &self.generator,
            self.field_size,
            t,
            self.config.interpolation_method,
        );
        self.mutations += 1;
        log::debug!("rebuilt {} weather layers", self.layers.len());
    }

    /// Render one frame if one is due. Completing a frame advances the
    /// yaw rotation by `animation_speed` (mod 360) and schedules the
    /// next frame while animating. An unavailable target skips the frame
    /// and retries on the next schedule slot.
    ///
    /// Returns whether a frame was actually drawn.
    pub fn render_frame(&mut self, raster: &mut Raster, now: Duration) -> Result<bool, RenderError> {
        if self.disposed {
            return Ok(false);
        }
        let Some(due) = self.next_frame else {
            return Ok(false);
        };
        if now < due {
            return Ok(false);
        }

        let visible = self.visible_layers();
        let input = FrameInput {
            mesh: self.mesh.as_ref(),
            layers: &visible,
            missions: &self.missions,
            view: &self.view,
            config: &self.config,
            sim_time: now.as_secs_f64(),
            local_hour: self.local_hour(now),
        };
        match render::render_frame(raster, &input) {
            Ok(()) => {}
            Err(RenderError::EmptyTarget { width, height }) => {
                log::warn!("render target unavailable ({width}x{height}), skipping frame");
                self.next_frame = Some(now + FRAME_PERIOD);
                return Ok(false);
            }
            Err(err) => return Err(err),
        }

        self.view.rotation.y = (self.view.rotation.y + self.view.animation_speed).rem_euclid(360.0);
        self.mutations += 1;
        self.next_frame = if self.view.is_animating {
            Some(now + FRAME_PERIOD)
        } else {
            None
        };
        Ok(true)
    }

    /// Toggle the animation loop. Turning it off cancels the pending
    /// frame — the only cancellation path short of `dispose`.
    pub fn set_animating(&mut self, animating: bool, now: Duration) {
        if self.disposed {
            return;
        }
        self.view.is_animating = animating;
        self.next_frame = if animating { Some(now) } else { None };
    }

    /// Cancel all three timers. The engine never mutates again.
    pub fn dispose(&mut self) {
        self.sample_timer = None;
        self.layer_timer = None;
        self.next_frame = None;
        self.disposed = true;
        log::debug!("engine disposed after {} mutations", self.mutations);
    }

    /// Layer stack filtered by the selected altitude, in stack order.
    pub fn visible_layers(&self) -> Vec<&WeatherLayer> {
        let ceiling = self.view.selected_altitude + ALTITUDE_FILTER_MARGIN;
        self.layers.iter().filter(|l| l.altitude <= ceiling).collect()
    }

    fn local_hour(&self, now: Duration) -> u32 {
        ((now.as_secs() / 3_600) % 24) as u32
    }

    pub fn mesh(&self) -> Option<&TerrainMesh> {
        self.mesh.as_ref()
    }

    pub fn samples(&self) -> &[ElevationSample] {
        &self.samples
    }

    pub fn layers(&self) -> &[WeatherLayer] {
        &self.layers
    }

    pub fn missions(&self) -> &[SatelliteMission] {
        &self.missions
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
