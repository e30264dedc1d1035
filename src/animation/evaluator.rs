use crate::animation::interpolation::{joint_matrix, lerp_vec3, slerp_normalized};
use crate::math::Aabb;
use crate::model::{AnimationClip, MeshModel, SubMesh, JOINT_INDEX_BASE};
use nalgebra_glm as glm;

/// Posed vertex buffers for one sub-mesh, parallel to its rest-pose arrays
/// and safe to hand to a renderer verbatim.
#[derive(Debug, Clone)]
pub struct PosedSubMesh {
    pub positions: Vec<glm::Vec3>,
    pub normals: Vec<glm::Vec3>,
}

/// Everything the renderer needs for one frame: posed buffers per sub-mesh
/// and the display bounds already taken through the model matrix.
#[derive(Debug, Clone)]
pub struct PoseSnapshot {
    pub sub_meshes: Vec<PosedSubMesh>,
    pub bounds: Aabb,
}

/// Adjacent frame pair and blend weight for a clip-local time.
///
/// `next` wraps to frame 0 when `prev` is the last frame, so interpolation at
/// the end of a looping clip blends back toward the start.
pub(crate) fn frame_span(clip: &AnimationClip, anim_time: f64) -> (usize, usize, f32) {
    let frame_float = anim_time * clip.frame_rate as f64;
    let last = clip.frames.len() - 1;
    let prev = (frame_float.floor() as usize).min(last);
    let next = if prev == last { 0 } else { prev + 1 };
    let delta = (frame_float - prev as f64) as f32;
    (prev, next, delta)
}

/// Componentwise interpolation of `min` and `max` independently.
///
/// Geometrically an approximation: the swept volume of an animating box is
/// not generally axis-aligned at intermediate times. This matches the
/// per-frame bounds semantics of the animation format, so it is intentional.
fn lerp_bounds(a: &Aabb, b: &Aabb, t: f32) -> Aabb {
    Aabb::new(lerp_vec3(&a.min(), &b.min(), t), lerp_vec3(&a.max(), &b.max(), t))
}

/// Interpolated joint rotations/translations for a clip at `anim_time`.
fn interpolate_joints(
    clip: &AnimationClip,
    prev: usize,
    next: usize,
    delta: f32,
) -> (Vec<glm::Quat>, Vec<glm::Vec3>) {
    let joint_count = clip.joint_count();
    let mut rotations = Vec::with_capacity(joint_count);
    let mut translations = Vec::with_capacity(joint_count);

    for i in 0..joint_count {
        rotations.push(slerp_normalized(
            &clip.frames[prev].rotations[i],
            &clip.frames[next].rotations[i],
            delta,
        ));
        translations.push(lerp_vec3(
            &clip.frames[prev].translations[i],
            &clip.frames[next].translations[i],
            delta,
        ));
    }

    (rotations, translations)
}

/// Skins one sub-mesh against interpolated joint transforms.
///
/// Each vertex's blend matrix is the weighted sum of its influences' joint
/// matrices. Weights are used as stored, with no renormalization: influences
/// that do not sum to 1 scale the result proportionally. Normals go through
/// the upper 3x3 of the blend without re-normalization, an accepted
/// approximation since a non-uniform blend is not orthonormal.
fn skin_sub_mesh(
    sub_mesh: &SubMesh,
    rotations: &[glm::Quat],
    translations: &[glm::Vec3],
) -> PosedSubMesh {
    let mut positions = Vec::with_capacity(sub_mesh.positions.len());
    let mut normals = Vec::with_capacity(sub_mesh.normals.len());

    for n in 0..sub_mesh.positions.len() {
        let mut blend = glm::Mat4::zeros();
        for w in sub_mesh.vertex_weights(n) {
            if w.joint < JOINT_INDEX_BASE {
                continue;
            }
            let joint = (w.joint - JOINT_INDEX_BASE) as usize;
            if joint >= rotations.len() {
                continue;
            }
            blend += joint_matrix(&rotations[joint], &translations[joint]) * w.weight;
        }

        let pos = sub_mesh.positions[n];
        let posed = blend * glm::vec4(pos.x, pos.y, pos.z, 1.0);
        positions.push(glm::vec4_to_vec3(&posed));

        // A truncated normal stream parses fine under the silent-skip rule,
        // so the rest pose may carry fewer normals than positions.
        let rest_normal = sub_mesh
            .normals
            .get(n)
            .copied()
            .unwrap_or_else(|| glm::vec3(0.0, 0.0, 0.0));
        normals.push(glm::mat4_to_mat3(&blend) * rest_normal);
    }

    PosedSubMesh { positions, normals }
}

/// Evaluates the model at `elapsed` seconds of application time.
///
/// Pure in (model, elapsed): the caller supplies the clock. A static model
/// skips the controller and skinning entirely and snapshots its rest pose,
/// bounded by the aggregate box; an animated one is posed from clip 0 with
/// its per-frame bounds interpolated alongside. Either way the bounds come
/// back already transformed by the model matrix.
pub fn evaluate(model: &MeshModel, elapsed: f64) -> PoseSnapshot {
    if !model.is_animated() {
        let sub_meshes = model
            .sub_meshes
            .iter()
            .map(|m| PosedSubMesh {
                positions: m.positions.clone(),
                normals: m.normals.clone(),
            })
            .collect();
        // Transforming the unset sentinels would poison them with NaN.
        let bounds = if model.base_bounds().is_set() {
            model.base_bounds().transformed(model.model_matrix())
        } else {
            Aabb::default()
        };
        return PoseSnapshot { sub_meshes, bounds };
    }

    let clip = &model.clips[0];
    let anim_time = model.controller().control_time(elapsed);
    let (prev, next, delta) = frame_span(clip, anim_time);
    let (rotations, translations) = interpolate_joints(clip, prev, next, delta);

    let sub_meshes = model
        .sub_meshes
        .iter()
        .map(|m| skin_sub_mesh(m, &rotations, &translations))
        .collect();

    // Frames may omit their optional bounds; guard the sentinels here the
    // same way the static path does.
    let lerped = lerp_bounds(&clip.frames[prev].bounds, &clip.frames[next].bounds, delta);
    let bounds = if lerped.is_set() {
        lerped.transformed(model.model_matrix())
    } else {
        Aabb::default()
    };

    PoseSnapshot { sub_meshes, bounds }
}
