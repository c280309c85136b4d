use thiserror::Error;

/// Rejections raised while constructing the engine or loading its config.
///
/// Invalid values are rejected outright, never silently clamped.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("mesh resolution must be at least 2, got {0}")]
    ResolutionTooLow(usize),
    #[error("update interval must be positive, got {0} ms")]
    NonPositiveInterval(i64),
    #[error("elevation smoothing must be within [0, 1], got {0}")]
    SmoothingOutOfRange(f32),
    #[error("malformed bounding box: {0}")]
    MalformedBounds(String),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
