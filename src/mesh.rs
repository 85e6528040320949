//! Indexed triangle mesh model: positions, optional per-face-vertex colors,
//! optional UVs, and normals (synthesized from face winding when absent).

use thiserror::Error;

use crate::math::Mat4;
use crate::math::Vec3;
use crate::math::Vec2;

/// Declared winding order of the input index arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Cw,
    Ccw,
}

/// Construction-time contract failure. The only fallible path in the core
/// (spec's `InvalidMesh`); never recovered, just reported to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("vert_indices length {0} is not a multiple of 3")]
    IndexCountNotMultipleOfThree(usize),
    #[error("uv_indices length {uv} does not match vert_indices length {vert}")]
    UvIndexCountMismatch { uv: usize, vert: usize },
    #[error("uv index {index} out of range (uvs has {len} entries)")]
    UvIndexOutOfRange { index: usize, len: usize },
    #[error("vert index {index} out of range (positions has {len} entries)")]
    VertIndexOutOfRange { index: usize, len: usize },
}

/// A normalized, CW-wound triangle soup with indices.
///
/// Invariants enforced at construction (see `MeshError`):
/// - `vert_indices.len() % 3 == 0`
/// - if `uv_indices` is non-empty, it is the same length as `vert_indices`
///   and every entry indexes into `uvs`
/// - `normals`/`normal_indices` are synthesized (one flat face normal per
///   triangle) when the caller supplies no normal data
/// - triangles are stored in CW winding regardless of the declared input
///   winding
#[derive(Debug, Clone)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub vert_indices: Vec<u32>,
    pub uv_indices: Vec<u32>,
    pub normal_indices: Vec<u32>,
}

impl Mesh {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        winding: Winding,
        positions: Vec<Vec3>,
        colors: Vec<Vec3>,
        vert_indices: Vec<u32>,
        uvs: Vec<Vec2>,
        uv_indices: Vec<u32>,
        normals: Vec<Vec3>,
        normal_indices: Vec<u32>,
    ) -> Result<Self, MeshError> {
        if vert_indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotMultipleOfThree(vert_indices.len()));
        }

        if !uv_indices.is_empty() {
            if uv_indices.len() != vert_indices.len() {
                return Err(MeshError::UvIndexCountMismatch {
                    uv: uv_indices.len(),
                    vert: vert_indices.len(),
                });
            }
            for &idx in &uv_indices {
                if idx as usize >= uvs.len() {
                    return Err(MeshError::UvIndexOutOfRange {
                        index: idx as usize,
                        len: uvs.len(),
                    });
                }
            }
        }

        for &idx in &vert_indices {
            if idx as usize >= positions.len() {
                return Err(MeshError::VertIndexOutOfRange {
                    index: idx as usize,
                    len: positions.len(),
                });
            }
        }

        let mut vert_indices = vert_indices;
        let mut uv_indices = uv_indices;
        let mut normal_indices = normal_indices;
        let mut normals = normals;

        if winding == Winding::Ccw {
            for tri in vert_indices.chunks_mut(3) {
                tri.swap(1, 2);
            }
            for tri in uv_indices.chunks_mut(3) {
                tri.swap(1, 2);
            }
            for tri in normal_indices.chunks_mut(3) {
                tri.swap(1, 2);
            }
        }

        if normal_indices.is_empty() {
            normals.clear();
            for tri in vert_indices.chunks(3) {
                let v0 = positions[tri[0] as usize];
                let v1 = positions[tri[1] as usize];
                let v2 = positions[tri[2] as usize];
                normals.push((v2 - v0).cross(v1 - v0));
            }
        }

        Ok(Mesh {
            positions,
            colors,
            uvs,
            normals,
            vert_indices,
            uv_indices,
            normal_indices,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.vert_indices.len() / 3
    }

    /// Returns a copy of this mesh with every position passed through
    /// `transform`, leaving indices, colors, UVs, and normals unchanged.
    ///
    /// `raster::rasterize` expects the mesh it is handed to already be in
    /// view space (its `projection` parameter is a pure projection matrix,
    /// not a combined model-view-projection one) — a driver calls this once
    /// per frame with its model*view matrix before calling `rasterize`, per
    /// the "a driver may transform vertex positions externally and pass a
    /// new Mesh" construction note.
    pub fn transformed(&self, transform: &Mat4) -> Mesh {
        Mesh {
            positions: self
                .positions
                .iter()
                .map(|&p| transform.transform_vector(p))
                .collect(),
            colors: self.colors.clone(),
            uvs: self.uvs.clone(),
            normals: self.normals.clone(),
            vert_indices: self.vert_indices.clone(),
            uv_indices: self.uv_indices.clone(),
            normal_indices: self.normal_indices.clone(),
        }
    }
}
