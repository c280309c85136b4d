use crate::tools::{hash_cell, splitmix64, unit_f32};
use std::f64::consts::TAU;

/// Atmospheric variable a layer carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Temperature,
    Precipitation,
    Wind,
    Pressure,
    Clouds,
    Visibility,
    Turbulence,
}

impl LayerKind {
    pub fn label(self) -> &'static str {
        match self {
            LayerKind::Temperature => "temperature",
            LayerKind::Precipitation => "precipitation",
            LayerKind::Wind => "wind",
            LayerKind::Pressure => "pressure",
            LayerKind::Clouds => "clouds",
            LayerKind::Visibility => "visibility",
            LayerKind::Turbulence => "turbulence",
        }
    }

    /// Decorrelates the per-kind hash streams.
    fn salt(self) -> u64 {
        match self {
            LayerKind::Temperature => 0x7E17,
            LayerKind::Precipitation => 0x9A1B,
            LayerKind::Wind => 0x11D0,
            LayerKind::Pressure => 0x5E55,
            LayerKind::Clouds => 0xC10D,
            LayerKind::Visibility => 0x1B11,
            LayerKind::Turbulence => 0x7B31,
        }
    }
}

/// Square scalar grid, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    size: usize,
    values: Vec<f32>,
}

impl ScalarField {
    pub fn filled(size: usize, value: f32) -> Self {
        Self {
            size,
            values: vec![value; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[j * self.size + i]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Min/max over the grid, `(0, 0)` when empty.
    pub fn range(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &self.values {
            min = min.min(v);
            max = max.max(v);
        }
        if min > max { (0.0, 0.0) } else { (min, max) }
    }
}

/// Nominal altitude feeding the wind magnitude term, in meters.
const WIND_REFERENCE_ALTITUDE: f32 = 5_000.0;

/// Produces the per-variable procedural fields: sinusoidal spatial terms
/// with a slow temporal phase so the grids appear to drift. All
/// randomness is hashed from the seed, never ambient.
#[derive(Debug, Clone, Copy)]
pub struct FieldGenerator {
    pub seed: u64,
}

impl FieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generate an `size`×`size` field for `kind` at continuous time `t`
    /// (seconds).
    ///
    /// Only `Visibility` consumes `coupled`: the finalized field it
    /// degrades against (precipitation in the standard layer stack).
    /// Absent coupling it degrades against nothing. Kinds without a
    /// closed form (`Pressure`) fall back to a uniform random field.
    pub fn generate(
        &self,
        kind: LayerKind,
        size: usize,
        t: f64,
        coupled: Option<&ScalarField>,
    ) -> ScalarField {
        let mut field = ScalarField::filled(size, 0.0);
        let stream = self.seed ^ kind.salt();
        // Jitter re-rolls once per second of sim time, not per frame.
        let t_bucket = t.floor() as u64;

        for j in 0..size {
            for i in 0..size {
                let value = match kind {
                    LayerKind::Temperature => temperature(i, j, t),
                    LayerKind::Precipitation => {
                        let u = unit_f32(hash_cell(i, j, splitmix64(stream ^ t_bucket)));
                        precipitation(i, j, t, size, u)
                    }
                    LayerKind::Wind => wind(i, j, t),
                    LayerKind::Clouds => clouds(i, j, t),
                    LayerKind::Visibility => {
                        let severity = coupled.map_or(0.0, |c| c.get(i, j));
                        visibility(severity)
                    }
                    LayerKind::Turbulence => turbulence(i, j, t),
                    // Permissive default for anything without a model.
                    LayerKind::Pressure => {
                        980.0 + 50.0 * unit_f32(hash_cell(i, j, splitmix64(stream ^ t_bucket)))
                    }
                };
                field.values[j * size + i] = value;
            }
        }
        field
    }
}

/// Diurnal sinusoid plus two spatial sinusoids standing in for terrain
/// and coastal gradients. Roughly 0–30 °C, unclamped.
fn temperature(i: usize, j: usize, t: f64) -> f32 {
    let diurnal = 10.0 * (t / 86_400.0 * TAU).sin() as f32;
    15.0 + diurnal + 5.0 * (i as f32 * 0.35).sin() + 3.0 * (j as f32 * 0.45).cos()
}

/// A front whose position is linear in `t`; intensity decays with
/// distance from it, jittered multiplicatively in `[0.5, 1]`.
fn precipitation(i: usize, _j: usize, t: f64, size: usize, u: f32) -> f32 {
    let front = (t / 90.0) % size as f64;
    let dist = (i as f32 - front as f32).abs();
    let base = (42.0 - 3.5 * dist).max(0.0);
    base * (0.5 + 0.5 * u)
}

/// Magnitude grows with the nominal altitude term plus spatial
/// turbulence. Never negative.
fn wind(i: usize, j: usize, t: f64) -> f32 {
    let phase = (t / 900.0 * TAU).fract() as f32 * std::f32::consts::TAU;
    let gusts = 4.0 * (i as f32 * 0.45 + phase).sin() * (j as f32 * 0.3).cos();
    (2.0 + WIND_REFERENCE_ALTITUDE / 1_200.0 + gusts).max(0.0)
}

/// Two spatial sinusoids plus bias, clamped to the 0–100 coverage scale.
fn clouds(i: usize, j: usize, t: f64) -> f32 {
    let drift = (t / 1_800.0 * TAU) as f32;
    let value =
        50.0 + 30.0 * (i as f32 * 0.22 + drift).sin() + 20.0 * (j as f32 * 0.27 + drift * 0.7).cos();
    value.clamp(0.0, 100.0)
}

/// Base visibility reduced by current weather severity, floored at 10.
fn visibility(severity: f32) -> f32 {
    (80.0 - 1.2 * severity).max(10.0)
}

/// Terrain-roughness proxy (product of two sinusoids) plus a slow
/// thermal term. Never negative.
fn turbulence(i: usize, j: usize, t: f64) -> f32 {
    let roughness = ((i as f32 * 0.6).sin() * (j as f32 * 0.5).cos()).abs() * 12.0;
    let thermal = 3.0 + 2.0 * (t / 3_600.0 * TAU).sin() as f32;
    (roughness + thermal).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SIZE: usize = 32;

    fn generator() -> FieldGenerator {
        FieldGenerator::new(0xA7_001)
    }

    #[rstest]
    #[case(0.0)]
    #[case(13_500.0)]
    #[case(86_400.0 * 3.5)]
    fn clouds_stay_in_coverage_scale(#[case] t: f64) {
        let field = generator().generate(LayerKind::Clouds, SIZE, t, None);
        for &v in field.values() {
            assert!((0.0..=100.0).contains(&v));
        }
    }

    #[rstest]
    #[case(LayerKind::Wind)]
    #[case(LayerKind::Turbulence)]
    #[case(LayerKind::Precipitation)]
    fn magnitudes_never_go_negative(#[case] kind: LayerKind) {
        for t in [0.0, 777.0, 100_000.0] {
            let field = generator().generate(kind, SIZE, t, None);
            assert!(field.values().iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn visibility_floors_at_ten_and_couples_to_severity() {
        let fields = generator();
        let heavy = ScalarField::filled(SIZE, 500.0);
        let degraded = fields.generate(LayerKind::Visibility, SIZE, 0.0, Some(&heavy));
        assert!(degraded.values().iter().all(|&v| v == 10.0));

        let clear = fields.generate(LayerKind::Visibility, SIZE, 0.0, None);
        let rain = fields.generate(LayerKind::Precipitation, SIZE, 0.0, None);
        let coupled = fields.generate(LayerKind::Visibility, SIZE, 0.0, Some(&rain));
        for j in 0..SIZE {
            for i in 0..SIZE {
                assert!(coupled.get(i, j) <= clear.get(i, j));
                assert!(coupled.get(i, j) >= 10.0);
            }
        }
    }

    #[test]
    fn pressure_takes_the_uniform_fallback() {
        let field = generator().generate(LayerKind::Pressure, SIZE, 60.0, None);
        let (min, max) = field.range();
        assert!(min >= 980.0 && max <= 1_030.0);
        // Uniform noise, not a constant plate.
        assert!(max - min > 1.0);
    }

    #[test]
    fn fields_are_deterministic_per_seed() {
        let a = generator().generate(LayerKind::Precipitation, SIZE, 42.0, None);
        let b = generator().generate(LayerKind::Precipitation, SIZE, 42.0, None);
        assert_eq!(a, b);

        let other = FieldGenerator::new(0xA7_002).generate(LayerKind::Precipitation, SIZE, 42.0, None);
        assert_ne!(a, other);
    }

    #[test]
    fn temperature_sits_in_a_plausible_band() {
        let field = generator().generate(LayerKind::Temperature, SIZE, 3_600.0 * 10.0, None);
        let (min, max) = field.range();
        assert!(min > -15.0 && max < 45.0);
    }
}
