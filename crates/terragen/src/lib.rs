pub mod config;
pub mod error;
pub mod fields;
pub mod layers;
pub mod mesh;
pub mod samples;
pub mod satellites;
pub mod tools;

pub use config::{DataResolution, EngineConfig, InterpolationMethod, PointCloudDensity};
pub use error::ConfigError;
pub use fields::{FieldGenerator, LayerKind, ScalarField};
pub use layers::{WeatherLayer, build_layers};
pub use mesh::{TerrainMesh, synthesize};
pub use samples::{ElevationSample, GeoBounds, SampleIngestor};
pub use satellites::{MissionStatus, SatelliteMission, default_missions};
