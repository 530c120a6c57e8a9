use std::sync::Arc;

use cgmath::Vector3;

use crate::renderer::{ColorTexture, TileMesh};
use crate::world::TileCoord;

/// Receives streamer output and places it in a scene.
///
/// Every method is invoked on the driver thread from inside
/// [`TileStreamer::update`](super::TileStreamer::update).
pub trait TileDisplay {
    /// A tile was created; `position` is its world-space origin and `scale` its uniform scale
    fn place_tile(&mut self, coord: TileCoord, position: Vector3<f32>, scale: f32);

    /// Band colors for a tile, one texel per interior cell
    fn set_tile_texture(&mut self, coord: TileCoord, texture: ColorTexture);

    /// Swap the displayed terrain (and water, when generated) mesh
    fn set_tile_mesh(&mut self, coord: TileCoord, terrain: Arc<TileMesh>, water: Option<Arc<TileMesh>>);

    /// Collision geometry for a tile; sent at most once per tile
    fn set_collision_mesh(&mut self, coord: TileCoord, mesh: Arc<TileMesh>);

    fn set_tile_visible(&mut self, coord: TileCoord, visible: bool);
}
