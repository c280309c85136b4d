use glam::{Vec2, Vec3};

/// Layers anchored at most this far above the selected altitude are
/// still composited.
pub const ALTITUDE_FILTER_MARGIN: f32 = 2_000.0;

/// Process-lifetime view state. Owned by the engine, mutated only by
/// user input and the animation tick; never reset by a data refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Euler angles in degrees; the animation tick advances `y`.
    pub rotation: Vec3,
    /// Screen-space pan in pixels.
    pub translation: Vec2,
    pub zoom: f32,
    /// Altitude filter for the weather layer stack, in meters.
    pub selected_altitude: f32,
    /// Degrees of yaw per completed frame while animating.
    pub animation_speed: f32,
    pub is_animating: bool,
    pub terrain_exaggeration: f32,
    pub show_grid: bool,
    pub show_labels: bool,
    pub enable_lighting: bool,
    pub show_satellite_paths: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            rotation: Vec3::new(52.0, 0.0, 0.0),
            translation: Vec2::ZERO,
            zoom: 1.0,
            selected_altitude: 10_000.0,
            animation_speed: 0.5,
            is_animating: true,
            terrain_exaggeration: 1.0,
            show_grid: true,
            show_labels: true,
            enable_lighting: true,
            show_satellite_paths: true,
        }
    }
}
