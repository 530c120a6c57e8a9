//! Multi-octave coherent noise sampling
//!
//! Produces a normalized height grid from octave / persistence / lacunarity
//! parameters. Per-octave sample offsets come from a seeded ChaCha stream, so
//! the same settings always yield bit-identical grids on every platform.

use cgmath::Vector2;
use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::HeightMap;
use crate::config::{NoiseSettings, NormalizeMode};
use crate::constants::noise::{
    GLOBAL_NORMALIZATION_ESTIMATE, MIN_SCALE, OCTAVE_OFFSET_RANGE, PERLIN_SEED,
};

/// Deterministic 2D noise sampler.
///
/// Holds only immutable state, so one instance can be shared across worker
/// threads and sampled concurrently.
#[derive(Debug, Clone)]
pub struct NoiseField {
    perlin: Perlin,
    settings: NoiseSettings,
}

impl NoiseField {
    /// Create a sampler. Settings are expected to be sanitized already.
    pub fn new(settings: &NoiseSettings) -> Self {
        Self {
            perlin: Perlin::new(PERLIN_SEED),
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    /// Perlin noise remapped to [0, 1]
    #[inline]
    fn perlin01(&self, x: f64, y: f64) -> f64 {
        (self.perlin.get([x, y]) * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// Sample a `width x height` grid whose sampling window is shifted by `offset`.
    ///
    /// `offset.x` is added to and `offset.y` subtracted from the octave
    /// offsets, which lines the grid rows up with world-space tiles whose
    /// mesh rows run towards -z.
    pub fn sample(&self, width: usize, height: usize, offset: Vector2<f32>) -> HeightMap {
        let settings = &self.settings;
        let octaves = settings.octaves.max(0) as usize;
        let persistence = settings.persistence as f64;
        let lacunarity = settings.lacunarity as f64;
        let scale = if settings.scale <= 0.0 {
            MIN_SCALE
        } else {
            settings.scale.max(MIN_SCALE)
        } as f64;

        let octave_offsets = octave_offsets(settings.seed, octaves, offset);

        let mut max_possible_height = 0.0f64;
        let mut amplitude = 1.0f64;
        for _ in 0..octaves {
            max_possible_height += amplitude;
            amplitude *= persistence;
        }

        // Scale around the grid centre rather than the top-left corner
        let half_width = width as f64 / 2.0;
        let half_height = height as f64 / 2.0;

        let mut map = HeightMap::new(width, height);
        let mut min_local = f32::MAX;
        let mut max_local = f32::MIN;

        for y in 0..height {
            for x in 0..width {
                let mut amplitude = 1.0f64;
                let mut frequency = 1.0f64;
                let mut noise_height = 0.0f64;

                for octave_offset in &octave_offsets {
                    let sample_x = (x as f64 - half_width + octave_offset.x) / scale * frequency;
                    let sample_y = (y as f64 - half_height + octave_offset.y) / scale * frequency;

                    let perlin_value = self.perlin01(sample_x, sample_y) * 2.0 - 1.0;
                    noise_height += perlin_value * amplitude;

                    amplitude *= persistence;
                    frequency *= lacunarity;
                }

                let noise_height = noise_height as f32;
                min_local = min_local.min(noise_height);
                max_local = max_local.max(noise_height);
                map.set(x, y, noise_height);
            }
        }

        match settings.normalize_mode {
            NormalizeMode::Local => {
                for value in map.values_mut() {
                    *value = inverse_lerp(min_local, max_local, *value);
                }
            }
            NormalizeMode::Global => {
                let estimate = 2.0 * max_possible_height as f32 / GLOBAL_NORMALIZATION_ESTIMATE;
                for value in map.values_mut() {
                    *value = if estimate > 0.0 {
                        ((*value + 1.0) / estimate).max(0.0)
                    } else {
                        0.0
                    };
                }
            }
        }

        log::trace!(
            "[NoiseField::sample] {}x{} grid at ({}, {}), {} octaves, local range [{}, {}]",
            width,
            height,
            offset.x,
            offset.y,
            octaves,
            min_local,
            max_local
        );

        map
    }
}

/// Convenience wrapper: sample once with throwaway sampler state
pub fn generate_noise_map(
    width: usize,
    height: usize,
    settings: &NoiseSettings,
    offset: Vector2<f32>,
) -> HeightMap {
    NoiseField::new(settings).sample(width, height, offset)
}

/// One `(x, y)` sampling offset per octave, drawn from the seed and shifted by `offset`
fn octave_offsets(seed: i32, octaves: usize, offset: Vector2<f32>) -> Vec<Vector2<f64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as i64 as u64);
    (0..octaves)
        .map(|_| {
            let offset_x = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f64
                + offset.x as f64;
            let offset_y = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f64
                - offset.y as f64;
            Vector2::new(offset_x, offset_y)
        })
        .collect()
}

/// Position of `value` within `[a, b]`, clamped to [0, 1]; 0 when the range is empty
#[inline]
fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        0.0
    } else {
        ((value - a) / (b - a)).clamp(0.0, 1.0)
    }
}
