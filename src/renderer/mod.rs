// Mesh and texture building for terrain tiles
//
// Everything here produces plain data (TileMesh, ColorTexture); placing it
// in a scene is the job of a TileDisplay implementation.

mod color_map;
mod mesh;
pub mod preview;
mod terrain_mesher;
mod water_mesher;

pub use color_map::{ColorMapRasterizer, ColorTexture, FilterMode, WrapMode};
pub use mesh::{MeshNormals, TileMesh};
pub use preview::{DrawMode, Preview};
pub use terrain_mesher::{build_terrain_mesh, TerrainMeshBuilder};
pub use water_mesher::{build_water_mesh, WaterMeshBuilder};
