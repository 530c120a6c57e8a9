//! Terrain tessellation with seam-correct normals
//!
//! The height field carries a one-cell border ring. Border cells become
//! vertices in a separate scratch buffer: their triangles feed the normal
//! accumulation of the real edge vertices but are never exported, so
//! neighbouring tiles light their shared edge identically.

use cgmath::{Vector2, Vector3, Zero};

use super::mesh::{normalize_or_zero, surface_normal, MeshNormals, TileMesh};
use crate::config::{simplification_step, HeightCurve, TerrainConfig};
use crate::world::HeightField;

/// Addresses either an exported vertex or a border-ring scratch vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VertexSlot {
    Interior(usize),
    Border(usize),
}

/// Intermediate geometry for one build; border data never leaves it
#[derive(Debug)]
struct MeshAssembly {
    vertices: Vec<Vector3<f32>>,
    uvs: Vec<Vector2<f32>>,
    triangles: Vec<[usize; 3]>,
    border_vertices: Vec<Vector3<f32>>,
    border_triangles: Vec<[VertexSlot; 3]>,
}

impl MeshAssembly {
    fn with_capacity(vertices_per_line: usize) -> Self {
        let squares = (vertices_per_line - 1) * (vertices_per_line - 1);
        Self {
            vertices: vec![Vector3::zero(); vertices_per_line * vertices_per_line],
            uvs: vec![Vector2::zero(); vertices_per_line * vertices_per_line],
            triangles: Vec::with_capacity(squares * 2),
            // One line per side plus the four corners
            border_vertices: vec![Vector3::zero(); vertices_per_line * 4 + 4],
            border_triangles: Vec::with_capacity(vertices_per_line * 8),
        }
    }

    fn add_vertex(&mut self, slot: VertexSlot, position: Vector3<f32>, uv: Vector2<f32>) {
        match slot {
            VertexSlot::Interior(index) => {
                self.vertices[index] = position;
                self.uvs[index] = uv;
            }
            VertexSlot::Border(index) => self.border_vertices[index] = position,
        }
    }

    fn add_triangle(&mut self, a: VertexSlot, b: VertexSlot, c: VertexSlot) {
        match (a, b, c) {
            (VertexSlot::Interior(a), VertexSlot::Interior(b), VertexSlot::Interior(c)) => {
                self.triangles.push([a, b, c]);
            }
            _ => self.border_triangles.push([a, b, c]),
        }
    }

    fn position(&self, slot: VertexSlot) -> Vector3<f32> {
        match slot {
            VertexSlot::Interior(index) => self.vertices[index],
            VertexSlot::Border(index) => self.border_vertices[index],
        }
    }

    /// Smooth normals for the exported vertices. Border triangles contribute
    /// to any interior corner they touch when `include_border` is set.
    fn bake_normals(&self, include_border: bool) -> Vec<Vector3<f32>> {
        let mut normals = vec![Vector3::zero(); self.vertices.len()];

        for &[a, b, c] in &self.triangles {
            let normal = surface_normal(self.vertices[a], self.vertices[b], self.vertices[c]);
            normals[a] += normal;
            normals[b] += normal;
            normals[c] += normal;
        }

        if include_border {
            for &corners in &self.border_triangles {
                let [a, b, c] = corners.map(|slot| self.position(slot));
                let normal = surface_normal(a, b, c);
                for slot in corners {
                    if let VertexSlot::Interior(index) = slot {
                        normals[index] += normal;
                    }
                }
            }
        }

        normals.into_iter().map(normalize_or_zero).collect()
    }

    fn into_smooth_mesh(self) -> TileMesh {
        let normals = self.bake_normals(true);
        TileMesh {
            indices: flatten_triangles(&self.triangles),
            vertices: self.vertices,
            uvs: self.uvs,
            normals: MeshNormals::Baked(normals),
        }
    }

    /// One vertex per triangle corner, indices renumbered sequentially
    fn into_flat_mesh(self) -> TileMesh {
        let corner_count = self.triangles.len() * 3;
        let mut vertices = Vec::with_capacity(corner_count);
        let mut uvs = Vec::with_capacity(corner_count);
        for &triangle in &self.triangles {
            for index in triangle {
                vertices.push(self.vertices[index]);
                uvs.push(self.uvs[index]);
            }
        }
        TileMesh {
            vertices,
            uvs,
            indices: (0..corner_count as u32).collect(),
            normals: MeshNormals::Recalculate,
        }
    }
}

fn flatten_triangles(triangles: &[[usize; 3]]) -> Vec<u32> {
    triangles
        .iter()
        .flat_map(|triangle| triangle.iter().map(|&index| index as u32))
        .collect()
}

/// Builds terrain meshes from height fields.
///
/// Stateless apart from its settings; the height curve is cloned per build
/// so concurrent builds never share curve state.
#[derive(Debug, Clone)]
pub struct TerrainMeshBuilder {
    pub height_multiplier: f32,
    pub height_curve: HeightCurve,
    pub flat_shading: bool,
}

impl TerrainMeshBuilder {
    pub fn new(height_multiplier: f32, height_curve: HeightCurve, flat_shading: bool) -> Self {
        Self {
            height_multiplier,
            height_curve,
            flat_shading,
        }
    }

    pub fn from_config(config: &TerrainConfig) -> Self {
        Self::new(
            config.height_multiplier,
            config.height_curve.clone(),
            config.flat_shading,
        )
    }

    pub fn build(&self, height_field: &HeightField, level_of_detail: u32) -> TileMesh {
        build_terrain_mesh(
            height_field,
            self.height_multiplier,
            &self.height_curve,
            level_of_detail,
            self.flat_shading,
        )
    }
}

/// Tessellate `height_field` at `level_of_detail`.
///
/// Smooth meshes carry baked normals; flat-shaded meshes carry exactly three
/// unique vertices per triangle and ask the consumer to recompute normals.
///
/// # Panics
/// If the bordered grid cannot be walked evenly at the LOD's step.
pub fn build_terrain_mesh(
    height_field: &HeightField,
    height_multiplier: f32,
    height_curve: &HeightCurve,
    level_of_detail: u32,
    flat_shading: bool,
) -> TileMesh {
    let assembly = assemble(height_field, height_multiplier, height_curve, level_of_detail);

    log::trace!(
        "[build_terrain_mesh] LOD {}: {} vertices, {} triangles, {} border triangles",
        level_of_detail,
        assembly.vertices.len(),
        assembly.triangles.len(),
        assembly.border_triangles.len()
    );

    if flat_shading {
        assembly.into_flat_mesh()
    } else {
        assembly.into_smooth_mesh()
    }
}

fn assemble(
    height_field: &HeightField,
    height_multiplier: f32,
    height_curve: &HeightCurve,
    level_of_detail: u32,
) -> MeshAssembly {
    let height_curve = height_curve.clone();

    let step = simplification_step(level_of_detail);
    let bordered_size = height_field.size();
    assert_eq!(
        bordered_size,
        height_field.height(),
        "terrain height fields are square"
    );
    assert!(
        bordered_size >= 2 * step + 2 && (bordered_size - 1) % step == 0,
        "LOD {} (step {}) cannot walk a bordered grid of {}",
        level_of_detail,
        step,
        bordered_size
    );

    let mesh_size = bordered_size - 2 * step;
    let mesh_size_unsimplified = bordered_size - 2;
    let extent = (mesh_size_unsimplified - 1) as f32;
    let top_left_x = extent / -2.0;
    let top_left_z = extent / 2.0;

    let vertices_per_line = (mesh_size - 1) / step + 1;
    let cells_per_line = (bordered_size - 1) / step + 1;

    let mut slots = Vec::with_capacity(cells_per_line * cells_per_line);
    let mut mesh_index = 0;
    let mut border_index = 0;
    for gy in 0..cells_per_line {
        for gx in 0..cells_per_line {
            let (x, y) = (gx * step, gy * step);
            let is_border = x == 0 || y == 0 || x == bordered_size - 1 || y == bordered_size - 1;
            if is_border {
                slots.push(VertexSlot::Border(border_index));
                border_index += 1;
            } else {
                slots.push(VertexSlot::Interior(mesh_index));
                mesh_index += 1;
            }
        }
    }
    debug_assert_eq!(mesh_index, vertices_per_line * vertices_per_line);

    let mut assembly = MeshAssembly::with_capacity(vertices_per_line);
    let slot_at = |gx: usize, gy: usize| slots[gy * cells_per_line + gx];

    for gy in 0..cells_per_line {
        for gx in 0..cells_per_line {
            let (x, y) = (gx * step, gy * step);

            // Interior spans [0, 1] at every LOD so textures line up between levels
            let percent = Vector2::new(
                (x as f32 - step as f32) / (mesh_size - 1) as f32,
                (y as f32 - step as f32) / (mesh_size - 1) as f32,
            );
            let height = height_curve.evaluate(height_field.height_at(x, y)) * height_multiplier;
            let position = Vector3::new(
                top_left_x + percent.x * extent,
                height,
                top_left_z - percent.y * extent,
            );
            assembly.add_vertex(slot_at(gx, gy), position, percent);

            if gx + 1 < cells_per_line && gy + 1 < cells_per_line {
                let a = slot_at(gx, gy);
                let b = slot_at(gx + 1, gy);
                let c = slot_at(gx, gy + 1);
                let d = slot_at(gx + 1, gy + 1);
                assembly.add_triangle(a, d, c);
                assembly.add_triangle(d, a, b);
            }
        }
    }

    assembly
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Color, HeightMap};
    use cgmath::InnerSpace;

    fn field_from(size: usize, height: impl Fn(usize, usize) -> f32) -> HeightField {
        let mut map = HeightMap::new(size, size);
        for y in 0..size {
            for x in 0..size {
                map.set(x, y, height(x, y));
            }
        }
        HeightField::new(map, vec![Color::CLEAR; size * size])
    }

    fn bumpy(size: usize) -> HeightField {
        field_from(size, |x, y| {
            let (fx, fy) = (x as f32 * 0.7, y as f32 * 1.3);
            (fx.sin() * fy.cos() * 0.5 + 0.5).clamp(0.0, 1.0)
        })
    }

    #[test]
    fn test_lod_zero_counts() {
        let field = bumpy(12);
        let mesh = build_terrain_mesh(&field, 10.0, &HeightCurve::identity(), 0, false);
        let vertices_per_line = 10;
        assert_eq!(mesh.vertex_count(), vertices_per_line * vertices_per_line);
        assert_eq!(mesh.uvs.len(), mesh.vertex_count());
        assert_eq!(mesh.indices.len(), 6 * (vertices_per_line - 1) * (vertices_per_line - 1));
        assert!(mesh.has_baked_normals());
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_simplified_counts() {
        // bordered 25: step 2 and 4 both divide 24
        let field = bumpy(25);
        for (lod, step) in [(1u32, 2usize), (2, 4)] {
            let mesh = build_terrain_mesh(&field, 10.0, &HeightCurve::identity(), lod, false);
            let vertices_per_line = (25 - 2 * step - 1) / step + 1;
            assert_eq!(mesh.vertex_count(), vertices_per_line * vertices_per_line, "lod {}", lod);
            assert_eq!(mesh.indices.len(), 6 * (vertices_per_line - 1) * (vertices_per_line - 1));
        }
    }

    #[test]
    fn test_uvs_and_positions_span_the_interior_at_every_lod() {
        let field = bumpy(25);
        for lod in [0u32, 1, 2] {
            let mesh = build_terrain_mesh(&field, 1.0, &HeightCurve::identity(), lod, false);
            let (min_u, max_u) = mesh.uvs.iter().fold((f32::MAX, f32::MIN), |(lo, hi), uv| (lo.min(uv.x), hi.max(uv.x)));
            assert_eq!((min_u, max_u), (0.0, 1.0), "lod {}", lod);
            let min_x = mesh.vertices.iter().map(|v| v.x).fold(f32::MAX, f32::min);
            let max_x = mesh.vertices.iter().map(|v| v.x).fold(f32::MIN, f32::max);
            assert!((min_x + 11.0).abs() < 1e-5 && (max_x - 11.0).abs() < 1e-5, "lod {}", lod);
        }
    }

    #[test]
    fn test_height_curve_and_multiplier_shape_elevation() {
        let field = field_from(6, |_, _| 0.5);
        let curve = HeightCurve::from_keys(&[(0.0, 0.0), (1.0, 0.5)]);
        let mesh = build_terrain_mesh(&field, 8.0, &curve, 0, false);
        assert!(mesh.vertices.iter().all(|v| (v.y - 2.0).abs() < 1e-6));
    }

    #[test]
    fn test_flat_shading_duplicates_vertices() {
        let field = bumpy(12);
        let smooth = build_terrain_mesh(&field, 10.0, &HeightCurve::identity(), 0, false);
        let flat = build_terrain_mesh(&field, 10.0, &HeightCurve::identity(), 0, true);

        assert_eq!(flat.vertex_count(), 3 * smooth.triangle_count());
        assert_eq!(flat.uvs.len(), flat.vertex_count());
        assert_eq!(flat.normals, MeshNormals::Recalculate);
        for (i, [a, b, c]) in flat.triangles().enumerate() {
            let base = 3 * i as u32;
            assert_eq!([a, b, c], [base, base + 1, base + 2]);
        }
        for (i, [a, b, c]) in smooth.triangles().enumerate() {
            let j = 3 * i;
            assert_eq!(flat.vertices[j], smooth.vertices[a as usize]);
            assert_eq!(flat.vertices[j + 1], smooth.vertices[b as usize]);
            assert_eq!(flat.vertices[j + 2], smooth.vertices[c as usize]);
        }
    }

    #[test]
    fn test_tilted_plane_normals_match_plane() {
        let k = 0.25;
        let field = field_from(9, |x, _| x as f32 * k);
        let mesh = build_terrain_mesh(&field, 1.0, &HeightCurve::identity(), 0, false);
        let expected = Vector3::new(-k, 1.0, 0.0).normalize();
        for normal in mesh.resolved_normals() {
            assert!((normal - expected).magnitude() < 1e-5, "{:?}", normal);
        }
    }

    #[test]
    fn test_border_ring_changes_edge_normals() {
        let field = bumpy(12);
        let assembly = assemble(&field, 10.0, &HeightCurve::identity(), 0);
        assert!(!assembly.border_triangles.is_empty());

        let with_border = assembly.bake_normals(true);
        let interior_only = assembly.bake_normals(false);
        let differs = with_border
            .iter()
            .zip(&interior_only)
            .any(|(a, b)| (a - b).magnitude() > 1e-4);
        assert!(differs, "border triangles must influence edge normals");

        // Vertices away from the edge only see interior triangles
        let centre = 5 * 10 + 5;
        assert!((with_border[centre] - interior_only[centre]).magnitude() < 1e-6);
    }

    #[test]
    fn test_border_vertices_are_never_exported() {
        let field = bumpy(12);
        let assembly = assemble(&field, 10.0, &HeightCurve::identity(), 0);
        assert_eq!(assembly.border_vertices.len(), 10 * 4 + 4);
        let mesh = assembly.into_smooth_mesh();
        // Border ring sits one unit outside the exported extent
        assert!(mesh.vertices.iter().all(|v| v.x.abs() <= 4.5 + 1e-5 && v.z.abs() <= 4.5 + 1e-5));
        assert!(mesh.uvs.iter().all(|uv| (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y)));
    }

    #[test]
    #[should_panic(expected = "cannot walk")]
    fn test_incompatible_lod_panics() {
        let field = bumpy(12);
        build_terrain_mesh(&field, 1.0, &HeightCurve::identity(), 1, false);
    }
}
