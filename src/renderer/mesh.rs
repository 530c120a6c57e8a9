use cgmath::{InnerSpace, Vector2, Vector3, Zero};

/// Where a mesh's normals come from
#[derive(Debug, Clone, PartialEq)]
pub enum MeshNormals {
    /// Smooth normals computed with the border ring, one per vertex
    Baked(Vec<Vector3<f32>>),
    /// The consumer must derive normals from the final triangles
    Recalculate,
}

/// Triangle mesh handed to the display layer.
///
/// `uvs` is index-aligned with `vertices`; `indices` holds clockwise
/// triangles three at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMesh {
    pub vertices: Vec<Vector3<f32>>,
    pub uvs: Vec<Vector2<f32>>,
    pub indices: Vec<u32>,
    pub normals: MeshNormals,
}

impl TileMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn has_baked_normals(&self) -> bool {
        matches!(self.normals, MeshNormals::Baked(_))
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Area-weighted smooth normals from the exported triangles only.
    ///
    /// For flat-shaded meshes no vertex is shared, so this yields face normals.
    pub fn recalculate_normals(&self) -> Vec<Vector3<f32>> {
        let mut normals = vec![Vector3::zero(); self.vertices.len()];
        for [a, b, c] in self.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let normal = surface_normal(self.vertices[a], self.vertices[b], self.vertices[c]);
            normals[a] += normal;
            normals[b] += normal;
            normals[c] += normal;
        }
        normals.into_iter().map(normalize_or_zero).collect()
    }

    /// Baked normals if present, otherwise freshly recalculated ones
    pub fn resolved_normals(&self) -> Vec<Vector3<f32>> {
        match &self.normals {
            MeshNormals::Baked(normals) => normals.clone(),
            MeshNormals::Recalculate => self.recalculate_normals(),
        }
    }
}

/// Un-normalized normal of a clockwise triangle; its length is twice the area
#[inline]
pub(crate) fn surface_normal(a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> Vector3<f32> {
    (b - a).cross(c - a)
}

#[inline]
pub(crate) fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    let length2 = v.magnitude2();
    if length2 > f32::EPSILON * f32::EPSILON {
        v / length2.sqrt()
    } else {
        Vector3::zero()
    }
}
