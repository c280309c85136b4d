use crate::config::InterpolationMethod;
use crate::fields::{FieldGenerator, LayerKind, ScalarField};

/// One animated atmospheric overlay: a scalar grid anchored to a nominal
/// altitude with rendering parameters. Regenerated wholesale on the layer
/// timer; never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherLayer {
    pub id: u32,
    pub kind: LayerKind,
    /// Nominal anchor altitude in meters; drives the altitude filter.
    pub altitude: f32,
    pub data: ScalarField,
    pub intensity: f32,
    pub opacity: f32,
    pub color: [f32; 4],
    pub thickness: f32,
    pub animation_speed: f32,
    /// Rendering hint only.
    pub interpolation: InterpolationMethod,
}

struct LayerSpec {
    kind: LayerKind,
    altitude: f32,
    intensity: f32,
    opacity: f32,
    thickness: f32,
    animation_speed: f32,
}

/// Fixed build order. Visibility comes last so it couples against the
/// finalized precipitation field instead of its own half-written grid.
const LAYER_STACK: [LayerSpec; 7] = [
    LayerSpec {
        kind: LayerKind::Temperature,
        altitude: 1_500.0,
        intensity: 0.7,
        opacity: 0.30,
        thickness: 400.0,
        animation_speed: 0.4,
    },
    LayerSpec {
        kind: LayerKind::Precipitation,
        altitude: 2_500.0,
        intensity: 0.85,
        opacity: 0.50,
        thickness: 900.0,
        animation_speed: 1.2,
    },
    LayerSpec {
        kind: LayerKind::Clouds,
        altitude: 3_500.0,
        intensity: 0.75,
        opacity: 0.45,
        thickness: 1_200.0,
        animation_speed: 0.6,
    },
    LayerSpec {
        kind: LayerKind::Wind,
        altitude: 5_500.0,
        intensity: 0.8,
        opacity: 0.40,
        thickness: 600.0,
        animation_speed: 1.6,
    },
    LayerSpec {
        kind: LayerKind::Pressure,
        altitude: 7_000.0,
        intensity: 0.5,
        opacity: 0.25,
        thickness: 1_500.0,
        animation_speed: 0.3,
    },
    LayerSpec {
        kind: LayerKind::Turbulence,
        altitude: 9_000.0,
        intensity: 0.65,
        opacity: 0.35,
        thickness: 800.0,
        animation_speed: 1.0,
    },
    LayerSpec {
        kind: LayerKind::Visibility,
        altitude: 800.0,
        intensity: 0.6,
        opacity: 0.30,
        thickness: 300.0,
        animation_speed: 0.5,
    },
];

/// Base tint per variable, RGBA in `[0, 1]`.
pub fn kind_color(kind: LayerKind) -> [f32; 4] {
    match kind {
        LayerKind::Temperature => [1.0, 0.45, 0.10, 1.0],
        LayerKind::Precipitation => [0.20, 0.45, 0.95, 1.0],
        LayerKind::Wind => [0.55, 0.85, 0.95, 1.0],
        LayerKind::Pressure => [0.60, 0.40, 0.90, 1.0],
        LayerKind::Clouds => [0.92, 0.93, 0.96, 1.0],
        LayerKind::Visibility => [0.75, 0.80, 0.85, 1.0],
        LayerKind::Turbulence => [0.95, 0.30, 0.25, 1.0],
    }
}

/// Build the full layer stack for time `t`, in fixed order, replacing
/// whatever stack existed before.
pub fn build_layers(
    generator: &FieldGenerator,
    size: usize,
    t: f64,
    interpolation: InterpolationMethod,
) -> Vec<WeatherLayer> {
    let mut precipitation: Option<ScalarField> = None;
    let mut layers = Vec::with_capacity(LAYER_STACK.len());

    for (id, spec) in LAYER_STACK.iter().enumerate() {
        let coupled = match spec.kind {
            LayerKind::Visibility => precipitation.as_ref(),
            _ => None,
        };
        let data = generator.generate(spec.kind, size, t, coupled);
        if spec.kind == LayerKind::Precipitation {
            precipitation = Some(data.clone());
        }

        layers.push(WeatherLayer {
            id: id as u32,
            kind: spec.kind,
            altitude: spec.altitude,
            data,
            intensity: spec.intensity,
            opacity: spec.opacity,
            color: kind_color(spec.kind),
            thickness: spec.thickness,
            animation_speed: spec.animation_speed,
            interpolation,
        });
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> Vec<WeatherLayer> {
        let generator = FieldGenerator::new(314_159);
        build_layers(&generator, 24, 30.0, InterpolationMethod::Linear)
    }

    #[test]
    fn stack_holds_all_kinds_in_fixed_order() {
        let layers = stack();
        let kinds: Vec<_> = layers.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LayerKind::Temperature,
                LayerKind::Precipitation,
                LayerKind::Clouds,
                LayerKind::Wind,
                LayerKind::Pressure,
                LayerKind::Turbulence,
                LayerKind::Visibility,
            ]
        );
        for (idx, layer) in layers.iter().enumerate() {
            assert_eq!(layer.id, idx as u32);
            assert!((0.0..=1.0).contains(&layer.intensity));
            assert!((0.0..=1.0).contains(&layer.opacity));
        }
    }

    #[test]
    fn visibility_reflects_the_finalized_precipitation_field() {
        let layers = stack();
        let rain = &layers[1];
        let vis = layers.last().unwrap();
        let size = rain.data.size();
        for j in 0..size {
            for i in 0..size {
                let expected = (80.0 - 1.2 * rain.data.get(i, j)).max(10.0);
                assert_eq!(vis.data.get(i, j), expected);
            }
        }
    }

    #[test]
    fn rebuild_replaces_rather_than_mutates() {
        let generator = FieldGenerator::new(1);
        let a = build_layers(&generator, 16, 0.0, InterpolationMethod::Cubic);
        let b = build_layers(&generator, 16, 600.0, InterpolationMethod::Cubic);
        // Same parameters except time: the drifting kinds must differ.
        assert_ne!(a[2].data, b[2].data);
        assert_eq!(a.len(), b.len());
    }
}
