//! Terrain configuration
//!
//! Plain structured input consumed by the generation core. Values can be
//! built in code or deserialized from TOML; either way they go through
//! [`NoiseSettings::sanitized`] and [`TerrainConfig::validate`] before use.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{clouds, streaming, tile};
use crate::error::{ConfigError, ConfigErrorContext, TerrainResult};
use crate::world::Color;

/// How a noise grid is remapped into [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalizeMode {
    /// Per-grid min/max remap. Only valid for a single, non-tiled map.
    Local,
    /// Estimated from the theoretical maximum so independently generated tiles agree.
    #[default]
    Global,
}

/// Coherent noise parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub scale: f32,
    pub seed: i32,
    pub octaves: i32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub offset: [f32; 2],
    pub normalize_mode: NormalizeMode,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            scale: 50.0,
            seed: 1,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: [1.0, 1.0],
            normalize_mode: NormalizeMode::Global,
        }
    }
}

impl NoiseSettings {
    /// Clamp out-of-range values at the configuration boundary
    pub fn sanitized(&self) -> NoiseSettings {
        let mut settings = self.clone();
        if settings.lacunarity < 1.0 {
            log::warn!(
                "[NoiseSettings::sanitized] lacunarity {} below 1, clamping",
                settings.lacunarity
            );
            settings.lacunarity = 1.0;
        }
        if settings.octaves < 0 {
            log::warn!(
                "[NoiseSettings::sanitized] octaves {} below 0, clamping",
                settings.octaves
            );
            settings.octaves = 0;
        }
        settings
    }
}

/// A height threshold and the color it paints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainBand {
    #[serde(default)]
    pub name: String,
    pub min_height: f32,
    pub color: Color,
}

impl TerrainBand {
    pub fn new(name: &str, min_height: f32, color: Color) -> Self {
        Self {
            name: name.to_string(),
            min_height,
            color,
        }
    }

    /// Classic island palette, sorted ascending by threshold
    pub fn default_bands() -> Vec<TerrainBand> {
        vec![
            TerrainBand::new("deep water", 0.0, Color::rgb(0.20, 0.38, 0.75)),
            TerrainBand::new("shallow water", 0.3, Color::rgb(0.21, 0.40, 0.78)),
            TerrainBand::new("sand", 0.4, Color::rgb(0.82, 0.82, 0.50)),
            TerrainBand::new("grass", 0.45, Color::rgb(0.34, 0.60, 0.10)),
            TerrainBand::new("dense grass", 0.55, Color::rgb(0.24, 0.42, 0.07)),
            TerrainBand::new("rock", 0.6, Color::rgb(0.37, 0.27, 0.23)),
            TerrainBand::new("high rock", 0.7, Color::rgb(0.29, 0.23, 0.21)),
            TerrainBand::new("snow", 0.9, Color::rgb(1.0, 1.0, 1.0)),
        ]
    }
}

/// One entry of the viewer-distance level of detail table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LodBand {
    pub level_of_detail: u32,
    pub visible_distance_threshold: f32,
    #[serde(default)]
    pub used_for_collision: bool,
}

impl LodBand {
    pub fn new(level_of_detail: u32, visible_distance_threshold: f32) -> Self {
        Self {
            level_of_detail,
            visible_distance_threshold,
            used_for_collision: false,
        }
    }

    pub fn with_collision(mut self) -> Self {
        self.used_for_collision = true;
        self
    }

    pub fn default_bands() -> Vec<LodBand> {
        vec![
            LodBand::new(0, 200.0).with_collision(),
            LodBand::new(1, 400.0),
            LodBand::new(4, 600.0),
        ]
    }
}

/// One keyframe of a height curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

/// Remaps normalized height before it is multiplied into vertex elevation.
///
/// Keys are evaluated by piecewise-linear interpolation and held flat
/// outside their range. A curve with no keys is the identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeightCurve {
    keys: Vec<CurveKey>,
}

impl HeightCurve {
    pub fn identity() -> Self {
        Self { keys: Vec::new() }
    }

    /// Build from `(time, value)` pairs; keys are sorted by time
    pub fn from_keys(keys: &[(f32, f32)]) -> Self {
        let mut keys: Vec<CurveKey> = keys
            .iter()
            .map(|&(time, value)| CurveKey { time, value })
            .collect();
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return t,
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }
        // First key strictly after t; t > first.time guarantees index >= 1
        let upper = self.keys.partition_point(|key| key.time <= t);
        let (a, b) = (self.keys[upper - 1], self.keys[upper]);
        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return b.value;
        }
        a.value + (b.value - a.value) * ((t - a.time) / span)
    }
}

/// Driver-side streaming tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamerSettings {
    /// Viewer positions are divided by this before tile math
    pub world_scale: f32,
    /// Visibility refreshes only after the viewer moves this far (scaled units)
    pub viewer_move_threshold: f32,
}

impl Default for StreamerSettings {
    fn default() -> Self {
        Self {
            world_scale: streaming::WORLD_SCALE,
            viewer_move_threshold: streaming::VIEWER_MOVE_THRESHOLD,
        }
    }
}

/// Cloud layer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSettings {
    pub noise: NoiseSettings,
    pub color: Color,
    pub size: usize,
    /// Height of the layer's base when tessellated
    pub start_height: f32,
    pub height_multiplier: f32,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            noise: NoiseSettings {
                scale: 30.0,
                seed: 7,
                octaves: 3,
                ..NoiseSettings::default()
            },
            color: Color::new(1.0, 1.0, 1.0, 0.8),
            size: clouds::CLOUD_CHUNK_SIZE,
            start_height: clouds::CLOUD_START_HEIGHT,
            height_multiplier: clouds::CLOUD_HEIGHT_MULTIPLIER,
        }
    }
}

/// Complete terrain configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub noise: NoiseSettings,
    pub bands: Vec<TerrainBand>,
    pub lod_bands: Vec<LodBand>,
    pub height_multiplier: f32,
    pub height_curve: HeightCurve,
    pub use_falloff: bool,
    pub generate_water: bool,
    pub flat_shading: bool,
    pub streamer: StreamerSettings,
    pub clouds: CloudSettings,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            noise: NoiseSettings::default(),
            bands: TerrainBand::default_bands(),
            lod_bands: LodBand::default_bands(),
            height_multiplier: 30.0,
            height_curve: HeightCurve::identity(),
            use_falloff: false,
            generate_water: false,
            flat_shading: false,
            streamer: StreamerSettings::default(),
            clouds: CloudSettings::default(),
        }
    }
}

impl TerrainConfig {
    /// Parse a TOML document; missing fields fall back to defaults
    pub fn from_toml_str(source: &str) -> TerrainResult<Self> {
        let config: TerrainConfig = toml::from_str(source)?;
        Ok(config)
    }

    /// Load and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::info!("[TerrainConfig::load] Loaded terrain config from {}", path.display());
        Ok(config)
    }

    /// Interior tile size. Flat shading triples vertex count, so tiles shrink.
    pub fn chunk_size(&self) -> usize {
        if self.flat_shading {
            tile::FLAT_SHADED_CHUNK_SIZE
        } else {
            tile::CHUNK_SIZE
        }
    }

    /// Side of the generated height field, including the border ring
    pub fn bordered_size(&self) -> usize {
        self.chunk_size() + 2 * tile::BORDER
    }

    /// Threshold of the last LOD band
    pub fn max_view_distance(&self) -> TerrainResult<f32> {
        self.lod_bands
            .last()
            .map(|band| band.visible_distance_threshold)
            .config_context("lod_bands")
    }

    /// Index of the band marked for collision, if any
    pub fn collision_lod_index(&self) -> Option<usize> {
        self.lod_bands.iter().position(|band| band.used_for_collision)
    }

    /// Copy with noise settings clamped
    pub fn sanitized(&self) -> TerrainConfig {
        let mut config = self.clone();
        config.noise = self.noise.sanitized();
        config.clouds.noise = self.clouds.noise.sanitized();
        config
    }

    /// Check the invariants the mesh builder and streamer rely on
    pub fn validate(&self) -> TerrainResult<()> {
        if self.lod_bands.is_empty() {
            return Err(ConfigError::NoDetailLevels);
        }

        for (index, pair) in self.lod_bands.windows(2).enumerate() {
            if pair[1].visible_distance_threshold < pair[0].visible_distance_threshold {
                return Err(ConfigError::UnsortedDetailLevels {
                    index: index + 1,
                    threshold: pair[1].visible_distance_threshold,
                    previous: pair[0].visible_distance_threshold,
                });
            }
        }

        let collision_count = self
            .lod_bands
            .iter()
            .filter(|band| band.used_for_collision)
            .count();
        if collision_count > 1 {
            return Err(ConfigError::MultipleCollisionLevels {
                count: collision_count,
            });
        }

        let bordered_size = self.bordered_size();
        for band in &self.lod_bands {
            let step = simplification_step(band.level_of_detail);
            if (bordered_size - 1) % step != 0 || bordered_size < 2 * step + 2 {
                return Err(ConfigError::IncompatibleDetailLevel {
                    lod: band.level_of_detail,
                    step,
                    bordered_size,
                });
            }
        }

        if !(self.noise.scale.is_finite() && self.height_multiplier.is_finite()) {
            return Err(ConfigError::InvalidField {
                field: "noise.scale / height_multiplier".to_string(),
            });
        }

        if self.clouds.size == 0 {
            return Err(ConfigError::InvalidField {
                field: "clouds.size".to_string(),
            });
        }

        Ok(())
    }
}

/// Grid step for a level of detail: 1 for LOD 0, otherwise `2 * lod`
pub fn simplification_step(level_of_detail: u32) -> usize {
    if level_of_detail == 0 {
        1
    } else {
        level_of_detail as usize * 2
    }
}
