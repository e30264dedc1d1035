use crate::math::Aabb;
use nalgebra_glm as glm;

/// Joint indices stored in skin weights are 1-based; index 0 is reserved by
/// the asset convention. Subtract this before indexing pose arrays.
pub const JOINT_INDEX_BASE: u32 = 1;

/// One joint influence on a vertex.
#[derive(Debug, Clone, Copy)]
pub struct SkinWeight {
    pub joint: u32,
    pub weight: f32,
}

/// Half-open slice `[start, end)` into a sub-mesh's flat weight list.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightRange {
    pub start: u32,
    pub end: u32,
}

/// One material-grouped geometry chunk.
///
/// `normals`, `tangents` and `bitangents` run parallel to `positions` and are
/// unit length (normalized on parse). `uvs` holds one sequence per texture
/// channel. `weight_ranges` runs parallel to `positions`; each vertex's
/// influences are `weights[range.start..range.end]`.
#[derive(Debug, Clone, Default)]
pub struct SubMesh {
    pub texture_name: String,
    pub positions: Vec<glm::Vec3>,
    pub normals: Vec<glm::Vec3>,
    pub tangents: Vec<glm::Vec3>,
    pub bitangents: Vec<glm::Vec3>,
    pub uvs: Vec<Vec<glm::Vec2>>,
    pub indices: Vec<u32>,
    pub weight_ranges: Vec<WeightRange>,
    pub weights: Vec<SkinWeight>,
    pub base_bbox: Aabb,
}

impl SubMesh {
    /// Influences of vertex `n`, empty when the range table does not cover it.
    pub fn vertex_weights(&self, n: usize) -> &[SkinWeight] {
        match self.weight_ranges.get(n) {
            Some(range) => {
                let start = range.start as usize;
                let end = (range.end as usize).min(self.weights.len());
                &self.weights[start.min(end)..end]
            }
            None => &[],
        }
    }
}
