//! Height fields: normalized noise plus band colors for one tile

use cgmath::Vector2;

use super::{generate_falloff_map, HeightMap, NoiseField};
use crate::config::{NoiseSettings, TerrainBand, TerrainConfig};
use crate::constants::tile::BORDER;
use crate::world::Color;

/// Height and color samples for one tile, including the one-cell border ring.
///
/// Immutable once built; shared with mesh workers behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    heights: HeightMap,
    colors: Vec<Color>,
}

impl HeightField {
    pub fn new(heights: HeightMap, colors: Vec<Color>) -> Self {
        assert_eq!(
            heights.values().len(),
            colors.len(),
            "one color sample per height sample"
        );
        Self { heights, colors }
    }

    /// Side of the bordered grid
    pub fn size(&self) -> usize {
        self.heights.width()
    }

    pub fn width(&self) -> usize {
        self.heights.width()
    }

    pub fn height(&self) -> usize {
        self.heights.height()
    }

    pub fn heights(&self) -> &HeightMap {
        &self.heights
    }

    #[inline]
    pub fn height_at(&self, x: usize, y: usize) -> f32 {
        self.heights.get(x, y)
    }

    /// Row-major color samples, same layout as the heights
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[inline]
    pub fn color_at(&self, x: usize, y: usize) -> Color {
        self.colors[self.heights.index(x, y)]
    }
}

/// Scan `bands` in order, keeping every band whose threshold `height` meets
/// and stopping at the first it does not. With ascending bands this is the
/// highest band reached; with unsorted bands the early stop still applies.
pub fn classify_height(height: f32, bands: &[TerrainBand]) -> Color {
    let mut color = Color::CLEAR;
    for band in bands {
        if height >= band.min_height {
            color = band.color;
        } else {
            break;
        }
    }
    color
}

/// Builds [`HeightField`]s for tiles of one interior size
#[derive(Debug, Clone)]
pub struct HeightFieldBuilder {
    chunk_size: usize,
    noise: NoiseField,
    bands: Vec<TerrainBand>,
    falloff: Option<HeightMap>,
}

impl HeightFieldBuilder {
    /// `chunk_size` is the interior size; generated fields are `chunk_size + 2` wide.
    pub fn new(
        chunk_size: usize,
        noise: &NoiseSettings,
        bands: Vec<TerrainBand>,
        use_falloff: bool,
    ) -> Self {
        assert!(chunk_size > 0, "tile interior size must be positive");
        let bordered_size = chunk_size + 2 * BORDER;
        let falloff = use_falloff.then(|| generate_falloff_map(bordered_size));
        Self {
            chunk_size,
            noise: NoiseField::new(noise),
            bands,
            falloff,
        }
    }

    pub fn from_config(config: &TerrainConfig) -> Self {
        Self::new(
            config.chunk_size(),
            &config.noise,
            config.bands.clone(),
            config.use_falloff,
        )
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn bordered_size(&self) -> usize {
        self.chunk_size + 2 * BORDER
    }

    /// Falloff grid in use, if island carving is enabled
    pub fn falloff_map(&self) -> Option<&HeightMap> {
        self.falloff.as_ref()
    }

    /// Build the field for the tile centred at `centre`
    pub fn build(&self, centre: Vector2<f32>) -> HeightField {
        let size = self.bordered_size();
        let [offset_x, offset_y] = self.noise.settings().offset;
        let offset = centre + Vector2::new(offset_x, offset_y);

        let mut heights = self.noise.sample(size, size, offset);

        if let Some(falloff) = &self.falloff {
            for (height, carve) in heights.values_mut().iter_mut().zip(falloff.values()) {
                *height = (*height - carve).clamp(0.0, 1.0);
            }
        }

        let colors = heights
            .values()
            .iter()
            .map(|&height| classify_height(height, &self.bands))
            .collect();

        log::debug!(
            "[HeightFieldBuilder::build] Built {}x{} height field at ({}, {})",
            size,
            size,
            centre.x,
            centre.y
        );

        HeightField::new(heights, colors)
    }
}

/// One-shot form of [`HeightFieldBuilder::build`]
pub fn build_height_field(
    chunk_size: usize,
    centre: Vector2<f32>,
    noise: &NoiseSettings,
    bands: &[TerrainBand],
    use_falloff: bool,
) -> HeightField {
    HeightFieldBuilder::new(chunk_size, noise, bands.to_vec(), use_falloff).build(centre)
}
