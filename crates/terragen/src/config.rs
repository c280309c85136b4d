use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Grid and field density preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataResolution {
    Low,
    Medium,
    High,
}

impl DataResolution {
    /// Terrain grid resolution (vertices per axis).
    pub fn mesh_resolution(self) -> usize {
        match self {
            DataResolution::Low => 32,
            DataResolution::Medium => 48,
            DataResolution::High => 64,
        }
    }

    /// Weather field grid size (cells per axis).
    pub fn field_size(self) -> usize {
        match self {
            DataResolution::Low => 24,
            DataResolution::Medium => 32,
            DataResolution::High => 48,
        }
    }
}

/// How aggressively raw elevation samples are decimated before meshing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointCloudDensity {
    Adaptive,
    Low,
    Medium,
    High,
}

impl PointCloudDensity {
    /// Keep one raw sample in every `stride`.
    pub fn keep_stride(self) -> usize {
        match self {
            PointCloudDensity::High => 1,
            PointCloudDensity::Medium => 5,
            PointCloudDensity::Low => 10,
            // Adaptive resolves to the medium tier until a real
            // density heuristic exists.
            PointCloudDensity::Adaptive => 5,
        }
    }
}

/// Rendering hint carried per layer. Not a real numerical method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    Linear,
    Cubic,
    Kriging,
}

/// Engine configuration. All options have defaults; `validate` rejects
/// out-of-range values instead of clamping them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub data_resolution: DataResolution,
    /// Cosmetic label shown in overlays, no behavioral effect.
    pub render_mode: String,
    pub enable_terrain_shading: bool,
    pub enable_volumetric_clouds: bool,
    pub enable_particle_effects: bool,
    pub point_cloud_density: PointCloudDensity,
    /// Sample regeneration period in milliseconds.
    pub update_interval_ms: i64,
    /// Declared but not currently applied to the mesh; validated so a
    /// future smoothing pass can rely on the range.
    pub elevation_smoothing: f32,
    pub interpolation_method: InterpolationMethod,
    /// 8-digit user seed, expanded to 64 bits for all generators.
    pub user_seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_resolution: DataResolution::High,
            render_mode: "composite".to_string(),
            enable_terrain_shading: true,
            enable_volumetric_clouds: true,
            enable_particle_effects: true,
            point_cloud_density: PointCloudDensity::High,
            update_interval_ms: 300_000,
            elevation_smoothing: 0.0,
            interpolation_method: InterpolationMethod::Linear,
            user_seed: 73_920_184,
        }
    }
}

impl EngineConfig {
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_interval_ms <= 0 {
            return Err(ConfigError::NonPositiveInterval(self.update_interval_ms));
        }
        if !(0.0..=1.0).contains(&self.elevation_smoothing) || self.elevation_smoothing.is_nan() {
            return Err(ConfigError::SmoothingOutOfRange(self.elevation_smoothing));
        }
        Ok(())
    }

    /// Full 64-bit seed driving every procedural generator.
    pub fn seed(&self) -> u64 {
        crate::tools::expand_seed64(self.user_seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_negative_interval() {
        let mut config = EngineConfig::default();
        config.update_interval_ms = -5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveInterval(-5))
        ));
    }

    #[test]
    fn rejects_out_of_range_smoothing() {
        let mut config = EngineConfig::default();
        config.elevation_smoothing = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SmoothingOutOfRange(_))
        ));
    }

    #[test]
    fn toml_round_trip_preserves_settings() {
        let mut config = EngineConfig::default();
        config.data_resolution = DataResolution::Medium;
        config.point_cloud_density = PointCloudDensity::Low;
        config.user_seed = 11_223_344;

        let text = toml::to_string_pretty(&config).unwrap();
        let back: EngineConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.data_resolution, DataResolution::Medium);
        assert_eq!(back.point_cloud_density, PointCloudDensity::Low);
        assert_eq!(back.user_seed, 11_223_344);
    }
}
