use std::sync::Arc;

use cgmath::Vector2;

use super::display::TileDisplay;
use super::tile_generator::TileGenerator;
use crate::config::LodBand;
use crate::renderer::TileMesh;
use crate::world::{HeightField, TileBounds, TileCoord};

/// Height field state of a tile
#[derive(Debug, Clone)]
pub(super) enum HeightState {
    Pending,
    Ready(Arc<HeightField>),
}

/// One mesh of one LOD slot
#[derive(Debug, Clone, Default)]
pub(super) enum MeshSlot {
    #[default]
    NoMesh,
    Pending,
    Ready(Arc<TileMesh>),
}

impl MeshSlot {
    pub(super) fn mesh(&self) -> Option<&Arc<TileMesh>> {
        match self {
            MeshSlot::Ready(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub(super) fn is_pending(&self) -> bool {
        matches!(self, MeshSlot::Pending)
    }
}

/// Terrain mesh plus the water mesh chained after it
#[derive(Debug, Clone, Default)]
pub(super) struct LodSlot {
    pub(super) terrain: MeshSlot,
    pub(super) water: MeshSlot,
}

impl LodSlot {
    fn is_requested(&self) -> bool {
        !matches!(self.terrain, MeshSlot::NoMesh)
    }

    /// Displayable: terrain ready, and water ready when water is generated
    fn is_ready(&self, generate_water: bool) -> bool {
        self.terrain.mesh().is_some() && (!generate_water || self.water.mesh().is_some())
    }
}

/// Read-only inputs for one tile update
pub(super) struct UpdateContext<'a> {
    pub(super) generator: &'a TileGenerator,
    pub(super) lod_bands: &'a [LodBand],
    pub(super) max_view_distance: f32,
    pub(super) collision_lod_index: Option<usize>,
    pub(super) generate_water: bool,
    pub(super) viewer: Vector2<f32>,
}

/// Smallest band index whose threshold covers `distance`, else the last band.
///
/// # Panics
/// If `bands` is empty.
pub fn select_lod_index(bands: &[LodBand], distance: f32) -> usize {
    assert!(!bands.is_empty(), "at least one level of detail band is required");
    bands
        .iter()
        .position(|band| distance <= band.visible_distance_threshold)
        .unwrap_or(bands.len() - 1)
}

/// Driver-side state of one streamed tile
#[derive(Debug)]
pub(super) struct Tile {
    pub(super) coord: TileCoord,
    pub(super) bounds: TileBounds,
    pub(super) height: HeightState,
    pub(super) lods: Vec<LodSlot>,
    pub(super) displayed_lod: Option<usize>,
    pub(super) visible: bool,
    pub(super) collision_sent: bool,
}

impl Tile {
    pub(super) fn new(coord: TileCoord, tile_world_size: f32, lod_count: usize) -> Self {
        let centre = coord.to_world_pos(tile_world_size);
        Self {
            coord,
            bounds: TileBounds::new(centre, tile_world_size),
            height: HeightState::Pending,
            lods: vec![LodSlot::default(); lod_count],
            displayed_lod: None,
            visible: false,
            collision_sent: false,
        }
    }

    pub(super) fn centre(&self) -> Vector2<f32> {
        self.bounds.centre
    }

    pub(super) fn height_field(&self) -> Option<&Arc<HeightField>> {
        match &self.height {
            HeightState::Ready(field) => Some(field),
            HeightState::Pending => None,
        }
    }

    pub(super) fn set_visible(&mut self, visible: bool, display: &mut dyn TileDisplay) {
        self.visible = visible;
        display.set_tile_visible(self.coord, visible);
    }

    /// Re-evaluate visibility, LOD and collision; returns whether the tile is visible
    pub(super) fn update(&mut self, ctx: &UpdateContext<'_>, display: &mut dyn TileDisplay) -> bool {
        let height_field = match self.height_field() {
            Some(field) => Arc::clone(field),
            None => return false,
        };

        let distance = self.bounds.distance(ctx.viewer);
        let visible = distance <= ctx.max_view_distance;

        if visible {
            let lod_index = select_lod_index(ctx.lod_bands, distance);
            if self.displayed_lod != Some(lod_index) {
                self.show_or_request(lod_index, &height_field, ctx, display);
            }
            self.update_collision(distance, &height_field, ctx, display);
        }

        self.set_visible(visible, display);
        visible
    }

    fn show_or_request(
        &mut self,
        lod_index: usize,
        height_field: &Arc<HeightField>,
        ctx: &UpdateContext<'_>,
        display: &mut dyn TileDisplay,
    ) {
        let slot = &self.lods[lod_index];
        if slot.is_ready(ctx.generate_water) {
            if let Some(terrain) = slot.terrain.mesh() {
                let water = slot.water.mesh().cloned();
                log::debug!(
                    "[Tile::update] ({}, {}) switching to LOD index {}",
                    self.coord.x,
                    self.coord.y,
                    lod_index
                );
                display.set_tile_mesh(self.coord, Arc::clone(terrain), water);
                self.displayed_lod = Some(lod_index);
            }
        } else if !slot.is_requested() {
            self.request_mesh(lod_index, height_field, ctx);
        }
    }

    fn update_collision(
        &mut self,
        distance: f32,
        height_field: &Arc<HeightField>,
        ctx: &UpdateContext<'_>,
        display: &mut dyn TileDisplay,
    ) {
        let index = match ctx.collision_lod_index {
            Some(index) if !self.collision_sent => index,
            _ => return,
        };
        if distance > ctx.lod_bands[index].visible_distance_threshold {
            return;
        }

        let slot = &self.lods[index];
        if let Some(mesh) = slot.terrain.mesh() {
            display.set_collision_mesh(self.coord, Arc::clone(mesh));
            self.collision_sent = true;
        } else if !slot.is_requested() {
            self.request_mesh(index, height_field, ctx);
        }
    }

    fn request_mesh(&mut self, lod_index: usize, height_field: &Arc<HeightField>, ctx: &UpdateContext<'_>) {
        self.lods[lod_index].terrain = MeshSlot::Pending;
        ctx.generator.request_mesh(
            self.coord,
            lod_index,
            ctx.lod_bands[lod_index].level_of_detail,
            Arc::clone(height_field),
        );
    }

    /// Terrain mesh arrived; returns the water request to chain, if any
    pub(super) fn receive_mesh(&mut self, lod_index: usize, mesh: Arc<TileMesh>, generate_water: bool) -> bool {
        let slot = &mut self.lods[lod_index];
        slot.terrain = MeshSlot::Ready(mesh);
        if generate_water {
            slot.water = MeshSlot::Pending;
        }
        generate_water
    }

    pub(super) fn receive_water_mesh(&mut self, lod_index: usize, mesh: Arc<TileMesh>) {
        self.lods[lod_index].water = MeshSlot::Ready(mesh);
    }

    /// In-flight mesh requests (terrain and water) for this tile
    pub(super) fn pending_meshes(&self) -> usize {
        self.lods
            .iter()
            .map(|slot| slot.terrain.is_pending() as usize + slot.water.is_pending() as usize)
            .sum()
    }
}
