//! Procedural terrain generation and streaming
//!
//! Height fields are built from layered Perlin noise, tessellated into tile
//! meshes at several levels of detail and streamed around a moving viewer.
//! All generation runs on worker threads; results are handed back to a
//! single driver thread through FIFO queues.

pub mod config;
pub mod constants;
pub mod error;
pub mod renderer;
pub mod streaming;
pub mod thread_pool;
pub mod world;

pub use config::{
    simplification_step, CloudSettings, HeightCurve, LodBand, NoiseSettings, NormalizeMode,
    StreamerSettings, TerrainBand, TerrainConfig,
};
pub use error::{ConfigError, TerrainResult};
pub use renderer::{
    ColorMapRasterizer, ColorTexture, DrawMode, MeshNormals, Preview, TerrainMeshBuilder,
    TileMesh, WaterMeshBuilder,
};
pub use streaming::{select_lod_index, StreamerStats, TileDisplay, TileStreamer};
pub use thread_pool::{InlineSpawner, RayonSpawner, TaskSpawner};
pub use world::{Color, HeightField, HeightFieldBuilder, HeightMap, NoiseField, TileBounds, TileCoord};
