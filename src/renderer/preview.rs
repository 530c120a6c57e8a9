//! Single-tile previews for tuning noise and band settings without a streamer

use cgmath::Vector2;

use super::{ColorMapRasterizer, ColorTexture, TerrainMeshBuilder, TileMesh, WaterMeshBuilder};
use crate::config::{CloudSettings, HeightCurve, TerrainConfig};
use crate::world::generation::{build_cloud_field, generate_falloff_map};
use crate::world::{HeightField, HeightFieldBuilder};

/// What a preview shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Grayscale of the final normalized heights
    NoiseMap,
    /// Band colors
    ColorMap,
    /// Terrain mesh, optional water mesh and the band texture
    Mesh,
    /// Grayscale of the island falloff grid
    FalloffMap,
    /// Cloud layer tessellated and lifted to its start height
    Clouds,
}

impl std::str::FromStr for DrawMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "noise" | "noisemap" | "noise_map" => Ok(DrawMode::NoiseMap),
            "color" | "colormap" | "color_map" => Ok(DrawMode::ColorMap),
            "mesh" => Ok(DrawMode::Mesh),
            "falloff" | "falloffmap" | "falloff_map" => Ok(DrawMode::FalloffMap),
            "clouds" | "cloud" => Ok(DrawMode::Clouds),
            other => Err(format!("unknown draw mode '{}'", other)),
        }
    }
}

/// Rendered preview
#[derive(Debug, Clone)]
pub enum Preview {
    Texture(ColorTexture),
    Mesh {
        terrain: TileMesh,
        water: Option<TileMesh>,
        texture: ColorTexture,
    },
}

impl Preview {
    /// The texture shown on screen for this preview
    pub fn texture(&self) -> &ColorTexture {
        match self {
            Preview::Texture(texture) => texture,
            Preview::Mesh { texture, .. } => texture,
        }
    }
}

/// Render the tile at the origin. `config` is sanitized here; callers
/// that want validation errors should call [`TerrainConfig::validate`] first.
pub fn render(config: &TerrainConfig, mode: DrawMode, level_of_detail: u32) -> Preview {
    let config = config.sanitized();

    log::info!(
        "[preview::render] Rendering {:?} preview at level of detail {}",
        mode,
        level_of_detail
    );

    let centre = Vector2::new(0.0, 0.0);
    match mode {
        DrawMode::FalloffMap => {
            let falloff = generate_falloff_map(config.bordered_size());
            Preview::Texture(ColorMapRasterizer::from_height_map(&falloff))
        }
        DrawMode::NoiseMap => {
            let height_field = HeightFieldBuilder::from_config(&config).build(centre);
            Preview::Texture(ColorMapRasterizer::from_height_map(height_field.heights()))
        }
        DrawMode::ColorMap => {
            let height_field = HeightFieldBuilder::from_config(&config).build(centre);
            Preview::Texture(ColorMapRasterizer::from_height_field(&height_field))
        }
        DrawMode::Mesh => {
            let height_field = HeightFieldBuilder::from_config(&config).build(centre);
            let terrain = TerrainMeshBuilder::from_config(&config).build(&height_field, level_of_detail);
            let water = config.generate_water.then(|| {
                WaterMeshBuilder::new(config.height_multiplier).build(&height_field, level_of_detail)
            });
            Preview::Mesh {
                terrain,
                water,
                texture: ColorMapRasterizer::from_height_field(&height_field),
            }
        }
        DrawMode::Clouds => {
            let field = build_cloud_field(&config.clouds, centre);
            Preview::Mesh {
                terrain: build_cloud_mesh(&field, &config.clouds, level_of_detail),
                water: None,
                texture: ColorMapRasterizer::from_height_field(&field),
            }
        }
    }
}

/// Tessellate a cloud field like terrain, then raise it to the layer's base.
///
/// The outer ring of the field only shapes edge normals, as it does for terrain.
pub fn build_cloud_mesh(
    field: &HeightField,
    settings: &CloudSettings,
    level_of_detail: u32,
) -> TileMesh {
    let mut mesh = TerrainMeshBuilder::new(settings.height_multiplier, HeightCurve::identity(), false)
        .build(field, level_of_detail);
    for vertex in &mut mesh.vertices {
        vertex.y += settings.start_height;
    }
    mesh
}
