//! Flat water plane meshes

use cgmath::{Vector2, Vector3};

use super::mesh::{MeshNormals, TileMesh};
use crate::config::simplification_step;
use crate::constants::water::WATER_LEVEL;
use crate::world::HeightField;

/// Builds the water plane for a tile.
///
/// The plane covers the full bordered grid at `WATER_LEVEL`. It is planar,
/// so normals are always left to the consumer.
#[derive(Debug, Clone, Copy)]
pub struct WaterMeshBuilder {
    pub height_multiplier: f32,
}

impl WaterMeshBuilder {
    pub fn new(height_multiplier: f32) -> Self {
        Self { height_multiplier }
    }

    pub fn build(&self, height_field: &HeightField, level_of_detail: u32) -> TileMesh {
        build_water_mesh(height_field, self.height_multiplier, level_of_detail)
    }
}

/// Tessellate a water plane over `height_field`'s grid.
///
/// `height_multiplier` is accepted so water and terrain builds share a call
/// shape; the plane sits at `WATER_LEVEL` regardless.
///
/// # Panics
/// If the grid cannot be walked evenly at the LOD's step.
pub fn build_water_mesh(
    height_field: &HeightField,
    height_multiplier: f32,
    level_of_detail: u32,
) -> TileMesh {
    let width = height_field.width();
    let height = height_field.height();
    let step = simplification_step(level_of_detail);
    assert!(
        width >= 2 && (width - 1) % step == 0 && (height - 1) % step == 0,
        "LOD {} (step {}) cannot walk a water grid of {}x{}",
        level_of_detail,
        step,
        width,
        height
    );

    let top_left_x = (width - 1) as f32 / -2.0;
    let top_left_z = (height - 1) as f32 / 2.0;
    let vertices_per_line = (width - 1) / step + 1;
    let lines = (height - 1) / step + 1;

    let mut vertices = Vec::with_capacity(vertices_per_line * lines);
    let mut uvs = Vec::with_capacity(vertices_per_line * lines);
    let mut indices = Vec::with_capacity((vertices_per_line - 1) * (lines - 1) * 6);

    let mut vertex_index = 0u32;
    let stride = vertices_per_line as u32;
    for y in (0..height).step_by(step) {
        for x in (0..width).step_by(step) {
            vertices.push(Vector3::new(top_left_x + x as f32, WATER_LEVEL, top_left_z - y as f32));
            uvs.push(Vector2::new(x as f32 / width as f32, y as f32 / height as f32));

            if x < width - 1 && y < height - 1 {
                indices.extend_from_slice(&[
                    vertex_index,
                    vertex_index + stride + 1,
                    vertex_index + stride,
                    vertex_index + stride + 1,
                    vertex_index,
                    vertex_index + 1,
                ]);
            }
            vertex_index += 1;
        }
    }

    log::trace!(
        "[build_water_mesh] LOD {} (multiplier {} ignored): {} vertices",
        level_of_detail,
        height_multiplier,
        vertices.len()
    );

    TileMesh {
        vertices,
        uvs,
        indices,
        normals: MeshNormals::Recalculate,
    }
}
