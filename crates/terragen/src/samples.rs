use crate::config::PointCloudDensity;
use crate::error::ConfigError;
use crate::tools::{hash_cell, splitmix64, unit_f32};
use noise::{NoiseFn, Perlin};

/// Hard cap on the working sample set, applied after decimation.
pub const MAX_SAMPLES: usize = 5_000;

/// Geographic bounding box in degrees. Rejected at construction when
/// malformed; a zero-area box is legal and yields an empty sample set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f32,
    pub max_lat: f32,
    pub min_lon: f32,
    pub max_lon: f32,
}

impl GeoBounds {
    pub fn new(min_lat: f32, max_lat: f32, min_lon: f32, max_lon: f32) -> Result<Self, ConfigError> {
        let values = [min_lat, max_lat, min_lon, max_lon];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::MalformedBounds(
                "coordinates must be finite".to_string(),
            ));
        }
        if min_lat > max_lat || min_lon > max_lon {
            return Err(ConfigError::MalformedBounds(format!(
                "min exceeds max (lat {min_lat}..{max_lat}, lon {min_lon}..{max_lon})"
            )));
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    pub fn lat_span(&self) -> f32 {
        self.max_lat - self.min_lat
    }

    pub fn lon_span(&self) -> f32 {
        self.max_lon - self.min_lon
    }

    pub fn is_empty(&self) -> bool {
        self.lat_span() <= 0.0 || self.lon_span() <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSource {
    Satellite,
    Aerial,
    Ground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceType {
    Ground,
    Vegetation,
    Building,
    Water,
    Infrastructure,
}

/// A single geotagged height measurement with acquisition metadata.
/// Immutable once generated; the working set is replaced wholesale on
/// each regeneration cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationSample {
    pub latitude: f32,
    pub longitude: f32,
    /// Meters above the reference level.
    pub elevation: f32,
    pub accuracy: f32,
    pub source: SampleSource,
    pub surface_type: SurfaceType,
    pub point_density: f32,
    pub reflectance: f32,
    pub error_margin: f32,
}

/// Produces a bounded, deterministic set of elevation samples over a
/// bounding box. Elevation and classification come from seeded Perlin
/// noise, not measurement.
#[derive(Debug, Clone)]
pub struct SampleIngestor {
    pub bounds: GeoBounds,
    /// Target spacing between raw samples, in degrees.
    pub spacing_deg: f32,
    pub density: PointCloudDensity,
    pub seed: u64,
}

impl SampleIngestor {
    pub fn new(bounds: GeoBounds, spacing_deg: f32, density: PointCloudDensity, seed: u64) -> Self {
        Self {
            bounds,
            spacing_deg,
            density,
            seed,
        }
    }

    /// Sweep the box at the target spacing, decimate by density tier,
    /// then hard-cap the final set.
    pub fn ingest(&self) -> Vec<ElevationSample> {
        if self.bounds.is_empty() || self.spacing_deg <= 0.0 {
            return Vec::new();
        }

        let relief = Perlin::new(self.seed as u32);
        let detail = Perlin::new((self.seed >> 32) as u32);
        let stride = self.density.keep_stride();

        let lat_steps = (self.bounds.lat_span() / self.spacing_deg).ceil() as usize + 1;
        let lon_steps = (self.bounds.lon_span() / self.spacing_deg).ceil() as usize + 1;

        let mut samples = Vec::new();
        let mut raw_index = 0usize;
        'sweep: for j in 0..lat_steps {
            let lat = (self.bounds.min_lat + j as f32 * self.spacing_deg).min(self.bounds.max_lat);
            for i in 0..lon_steps {
                let keep = raw_index % stride == 0;
                raw_index += 1;
                if !keep {
                    continue;
                }

                let lon =
                    (self.bounds.min_lon + i as f32 * self.spacing_deg).min(self.bounds.max_lon);
                samples.push(self.make_sample(i, j, lat, lon, &relief, &detail));
                if samples.len() >= MAX_SAMPLES {
                    break 'sweep;
                }
            }
        }
        samples
    }

    fn make_sample(
        &self,
        i: usize,
        j: usize,
        lat: f32,
        lon: f32,
        relief: &Perlin,
        detail: &Perlin,
    ) -> ElevationSample {
        let broad = relief.get([lon as f64 * 0.35, lat as f64 * 0.35]) as f32;
        let fine = detail.get([lon as f64 * 1.7, lat as f64 * 1.7]) as f32;
        let elevation = (420.0 * (broad + 1.0) + 160.0 * fine).max(0.0);

        let h = hash_cell(i, j, self.seed);
        let u_class = unit_f32(h);
        let u_source = unit_f32(splitmix64(h ^ 0x51));
        let u_accuracy = unit_f32(splitmix64(h ^ 0x52));
        let u_density = unit_f32(splitmix64(h ^ 0x53));
        let u_reflect = unit_f32(splitmix64(h ^ 0x54));

        let surface_type = if elevation < 60.0 {
            SurfaceType::Water
        } else if u_class < 0.06 {
            SurfaceType::Building
        } else if u_class < 0.11 {
            SurfaceType::Infrastructure
        } else if u_class < 0.55 {
            SurfaceType::Vegetation
        } else {
            SurfaceType::Ground
        };

        let source = if u_source < 0.5 {
            SampleSource::Satellite
        } else if u_source < 0.8 {
            SampleSource::Aerial
        } else {
            SampleSource::Ground
        };

        let accuracy = 0.7 + 0.3 * u_accuracy;
        ElevationSample {
            latitude: lat,
            longitude: lon,
            elevation,
            accuracy,
            source,
            surface_type,
            point_density: 2.0 + 10.0 * u_density,
            reflectance: 0.1 + 0.8 * u_reflect,
            error_margin: (1.0 - accuracy) * 5.0,
        }
    }
}
