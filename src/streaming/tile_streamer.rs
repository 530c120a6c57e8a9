//! Viewer-driven tile streaming
//!
//! The streamer lives on a single driver thread. Each call to
//! [`TileStreamer::update`] drains the height, mesh and water queues in that
//! order, then refreshes visibility if the viewer has moved far enough.

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::{InnerSpace, Vector2, Vector3};

use super::display::TileDisplay;
use super::tile::{HeightState, Tile, UpdateContext};
use super::tile_generator::{DeliveredCounts, TileGenerator};
use crate::config::{LodBand, TerrainConfig};
use crate::error::TerrainResult;
use crate::renderer::ColorMapRasterizer;
use crate::thread_pool::TaskSpawner;
use crate::world::TileCoord;

/// Snapshot of streamer bookkeeping
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamerStats {
    pub tiles_known: usize,
    pub tiles_visible: usize,
    pub heights_pending: usize,
    pub meshes_pending: usize,
    pub delivered: DeliveredCounts,
}

pub struct TileStreamer {
    generator: TileGenerator,
    tiles: HashMap<TileCoord, Tile>,
    visible_last_update: Vec<TileCoord>,
    lod_bands: Vec<LodBand>,
    collision_lod_index: Option<usize>,
    generate_water: bool,
    max_view_distance: f32,
    tile_world_size: f32,
    chunks_visible: i32,
    world_scale: f32,
    sqr_move_threshold: f32,
    viewer: Vector2<f32>,
    viewer_at_last_refresh: Option<Vector2<f32>>,
}

impl TileStreamer {
    /// Sanitize and validate `config`, then set up builders and queues
    pub fn new(config: &TerrainConfig, spawner: Arc<dyn TaskSpawner>) -> TerrainResult<Self> {
        let config = config.sanitized();
        config.validate()?;

        let max_view_distance = config.max_view_distance()?;
        let tile_world_size = (config.chunk_size() - 1) as f32;
        let chunks_visible = (max_view_distance / tile_world_size).round() as i32;

        log::info!(
            "[TileStreamer::new] Streaming {} unit tiles, {} tile radius, {} LOD bands",
            tile_world_size,
            chunks_visible,
            config.lod_bands.len()
        );

        Ok(Self {
            generator: TileGenerator::from_config(&config, spawner),
            tiles: HashMap::new(),
            visible_last_update: Vec::new(),
            lod_bands: config.lod_bands.clone(),
            collision_lod_index: config.collision_lod_index(),
            generate_water: config.generate_water,
            max_view_distance,
            tile_world_size,
            chunks_visible,
            world_scale: config.streamer.world_scale,
            sqr_move_threshold: config.streamer.viewer_move_threshold.powi(2),
            viewer: Vector2::new(0.0, 0.0),
            viewer_at_last_refresh: None,
        })
    }

    /// One driver tick. `viewer` is in world space; only x and z are used.
    pub fn update(&mut self, viewer: Vector3<f32>, display: &mut dyn TileDisplay) {
        self.viewer = Vector2::new(viewer.x, viewer.z) / self.world_scale;

        self.drain_results(display);

        let moved_enough = match self.viewer_at_last_refresh {
            None => true,
            Some(last) => (last - self.viewer).magnitude2() > self.sqr_move_threshold,
        };
        if moved_enough {
            self.viewer_at_last_refresh = Some(self.viewer);
            self.refresh_visible_tiles(display);
        }
    }

    /// Refresh visibility on the next [`update`](Self::update) regardless of movement
    pub fn force_refresh(&mut self) {
        self.viewer_at_last_refresh = None;
    }

    /// Viewer position in scaled tile space
    pub fn viewer(&self) -> Vector2<f32> {
        self.viewer
    }

    pub fn tile_world_size(&self) -> f32 {
        self.tile_world_size
    }

    /// Tile radius scanned around the viewer
    pub fn chunks_visible(&self) -> i32 {
        self.chunks_visible
    }

    pub fn visible_tiles(&self) -> &[TileCoord] {
        &self.visible_last_update
    }

    pub fn is_known(&self, coord: TileCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    /// LOD index currently shown for `coord`, if any mesh has been displayed
    pub fn displayed_lod(&self, coord: TileCoord) -> Option<usize> {
        self.tiles.get(&coord).and_then(|tile| tile.displayed_lod)
    }

    pub fn stats(&self) -> StreamerStats {
        let heights_pending = self
            .tiles
            .values()
            .filter(|tile| matches!(tile.height, HeightState::Pending))
            .count();
        let meshes_pending = self.tiles.values().map(Tile::pending_meshes).sum();
        StreamerStats {
            tiles_known: self.tiles.len(),
            tiles_visible: self.visible_last_update.len(),
            heights_pending,
            meshes_pending,
            delivered: self.generator.delivered(),
        }
    }

    fn drain_results(&mut self, display: &mut dyn TileDisplay) {
        for result in self.generator.drain_heights() {
            let Some(tile) = self.tiles.get_mut(&result.coord) else {
                log::warn!(
                    "[TileStreamer::drain_results] Height field for unknown tile ({}, {})",
                    result.coord.x,
                    result.coord.y
                );
                continue;
            };
            let texture = ColorMapRasterizer::from_height_field(&result.height_field);
            display.set_tile_texture(result.coord, texture);
            tile.height = HeightState::Ready(result.height_field);
            self.update_tile(result.coord, display);
        }

        for result in self.generator.drain_meshes() {
            let Some(tile) = self.tiles.get_mut(&result.coord) else {
                log::warn!(
                    "[TileStreamer::drain_results] Mesh for unknown tile ({}, {})",
                    result.coord.x,
                    result.coord.y
                );
                continue;
            };
            let chain_water = tile.receive_mesh(result.lod_index, result.mesh, self.generate_water);
            if chain_water {
                if let Some(field) = tile.height_field() {
                    self.generator.request_water_mesh(
                        result.coord,
                        result.lod_index,
                        self.lod_bands[result.lod_index].level_of_detail,
                        Arc::clone(field),
                    );
                }
            } else {
                self.update_tile(result.coord, display);
            }
        }

        for result in self.generator.drain_water_meshes() {
            let Some(tile) = self.tiles.get_mut(&result.coord) else {
                log::warn!(
                    "[TileStreamer::drain_results] Water mesh for unknown tile ({}, {})",
                    result.coord.x,
                    result.coord.y
                );
                continue;
            };
            tile.receive_water_mesh(result.lod_index, result.mesh);
            self.update_tile(result.coord, display);
        }
    }

    fn refresh_visible_tiles(&mut self, display: &mut dyn TileDisplay) {
        for coord in std::mem::take(&mut self.visible_last_update) {
            if let Some(tile) = self.tiles.get_mut(&coord) {
                tile.set_visible(false, display);
            }
        }

        let current = TileCoord::from_viewer(self.viewer, self.tile_world_size);
        let radius = self.chunks_visible;

        log::debug!(
            "[TileStreamer::refresh_visible_tiles] Viewer in tile ({}, {})",
            current.x,
            current.y
        );

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let coord = current.offset(dx, dy);
                if self.tiles.contains_key(&coord) {
                    self.update_tile(coord, display);
                } else {
                    self.create_tile(coord, display);
                }
            }
        }
    }

    fn create_tile(&mut self, coord: TileCoord, display: &mut dyn TileDisplay) {
        let tile = Tile::new(coord, self.tile_world_size, self.lod_bands.len());
        let centre = tile.centre();

        display.place_tile(
            coord,
            Vector3::new(centre.x, 0.0, centre.y) * self.world_scale,
            self.world_scale,
        );
        display.set_tile_visible(coord, false);

        self.tiles.insert(coord, tile);
        self.generator.request_height_field(coord, centre);
    }

    fn update_tile(&mut self, coord: TileCoord, display: &mut dyn TileDisplay) {
        let ctx = UpdateContext {
            generator: &self.generator,
            lod_bands: &self.lod_bands,
            max_view_distance: self.max_view_distance,
            collision_lod_index: self.collision_lod_index,
            generate_water: self.generate_water,
            viewer: self.viewer,
        };
        let Some(tile) = self.tiles.get_mut(&coord) else {
            return;
        };
        if tile.update(&ctx, display) && !self.visible_last_update.contains(&coord) {
            self.visible_last_update.push(coord);
        }
    }
}
