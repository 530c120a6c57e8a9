//! Request side of the streaming protocol
//!
//! Each request captures immutable snapshots (`Arc` builders and fields),
//! runs on the spawner and pushes exactly one result onto the queue for its
//! kind. Nothing here is cancelled; every request is eventually delivered.

use std::sync::Arc;

use cgmath::Vector2;

use super::result_queue::ResultQueue;
use crate::config::TerrainConfig;
use crate::renderer::{TerrainMeshBuilder, TileMesh, WaterMeshBuilder};
use crate::thread_pool::TaskSpawner;
use crate::world::{HeightField, HeightFieldBuilder, TileCoord};

/// A finished height field
#[derive(Debug)]
pub struct HeightResult {
    pub coord: TileCoord,
    pub height_field: Arc<HeightField>,
}

/// A finished terrain or water mesh for one LOD slot
#[derive(Debug)]
pub struct MeshResult {
    pub coord: TileCoord,
    pub lod_index: usize,
    pub mesh: Arc<TileMesh>,
}

/// Queue sizes at a point in time
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueDepths {
    pub heights: usize,
    pub meshes: usize,
    pub water_meshes: usize,
}

/// Results delivered to the driver so far
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveredCounts {
    pub heights: u64,
    pub meshes: u64,
    pub water_meshes: u64,
}

/// Owns the builders, the spawner and the three result queues
pub struct TileGenerator {
    height_builder: Arc<HeightFieldBuilder>,
    mesh_builder: Arc<TerrainMeshBuilder>,
    water_builder: Arc<WaterMeshBuilder>,
    spawner: Arc<dyn TaskSpawner>,
    height_results: Arc<ResultQueue<HeightResult>>,
    mesh_results: Arc<ResultQueue<MeshResult>>,
    water_results: Arc<ResultQueue<MeshResult>>,
}

impl TileGenerator {
    pub fn new(
        height_builder: HeightFieldBuilder,
        mesh_builder: TerrainMeshBuilder,
        water_builder: WaterMeshBuilder,
        spawner: Arc<dyn TaskSpawner>,
    ) -> Self {
        Self {
            height_builder: Arc::new(height_builder),
            mesh_builder: Arc::new(mesh_builder),
            water_builder: Arc::new(water_builder),
            spawner,
            height_results: Arc::new(ResultQueue::new()),
            mesh_results: Arc::new(ResultQueue::new()),
            water_results: Arc::new(ResultQueue::new()),
        }
    }

    pub fn from_config(config: &TerrainConfig, spawner: Arc<dyn TaskSpawner>) -> Self {
        Self::new(
            HeightFieldBuilder::from_config(config),
            TerrainMeshBuilder::from_config(config),
            WaterMeshBuilder::new(config.height_multiplier),
            spawner,
        )
    }

    pub fn height_builder(&self) -> &HeightFieldBuilder {
        &self.height_builder
    }

    pub fn request_height_field(&self, coord: TileCoord, centre: Vector2<f32>) {
        let builder = Arc::clone(&self.height_builder);
        let results = Arc::clone(&self.height_results);
        log::debug!(
            "[TileGenerator::request_height_field] Requesting height field for ({}, {})",
            coord.x,
            coord.y
        );
        self.spawner.spawn(Box::new(move || {
            let height_field = Arc::new(builder.build(centre));
            results.push(HeightResult {
                coord,
                height_field,
            });
        }));
    }

    pub fn request_mesh(
        &self,
        coord: TileCoord,
        lod_index: usize,
        level_of_detail: u32,
        height_field: Arc<HeightField>,
    ) {
        let builder = Arc::clone(&self.mesh_builder);
        let results = Arc::clone(&self.mesh_results);
        log::debug!(
            "[TileGenerator::request_mesh] Requesting LOD {} mesh for ({}, {})",
            level_of_detail,
            coord.x,
            coord.y
        );
        self.spawner.spawn(Box::new(move || {
            let mesh = Arc::new(builder.build(&height_field, level_of_detail));
            results.push(MeshResult {
                coord,
                lod_index,
                mesh,
            });
        }));
    }

    pub fn request_water_mesh(
        &self,
        coord: TileCoord,
        lod_index: usize,
        level_of_detail: u32,
        height_field: Arc<HeightField>,
    ) {
        let builder = Arc::clone(&self.water_builder);
        let results = Arc::clone(&self.water_results);
        log::debug!(
            "[TileGenerator::request_water_mesh] Requesting LOD {} water for ({}, {})",
            level_of_detail,
            coord.x,
            coord.y
        );
        self.spawner.spawn(Box::new(move || {
            let mesh = Arc::new(builder.build(&height_field, level_of_detail));
            results.push(MeshResult {
                coord,
                lod_index,
                mesh,
            });
        }));
    }

    pub fn drain_heights(&self) -> impl Iterator<Item = HeightResult> {
        self.height_results.drain_all().into_iter()
    }

    pub fn drain_meshes(&self) -> impl Iterator<Item = MeshResult> {
        self.mesh_results.drain_all().into_iter()
    }

    pub fn drain_water_meshes(&self) -> impl Iterator<Item = MeshResult> {
        self.water_results.drain_all().into_iter()
    }

    pub fn queue_depths(&self) -> QueueDepths {
        QueueDepths {
            heights: self.height_results.len(),
            meshes: self.mesh_results.len(),
            water_meshes: self.water_results.len(),
        }
    }

    pub fn delivered(&self) -> DeliveredCounts {
        DeliveredCounts {
            heights: self.height_results.delivered(),
            meshes: self.mesh_results.delivered(),
            water_meshes: self.water_results.delivered(),
        }
    }
}
