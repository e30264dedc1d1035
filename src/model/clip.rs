use crate::math::Aabb;
use nalgebra_glm as glm;

/// Joint rotations and translations for one animation frame, plus the bounds
/// of the posed mesh at that frame. `rotations` and `translations` run
/// parallel, one entry per joint.
#[derive(Debug, Clone)]
pub struct JointPose {
    pub rotations: Vec<glm::Quat>,
    pub translations: Vec<glm::Vec3>,
    pub bounds: Aabb,
}

impl JointPose {
    pub fn identity(joint_count: usize) -> Self {
        Self {
            rotations: vec![glm::quat_identity(); joint_count],
            translations: vec![glm::vec3(0.0, 0.0, 0.0); joint_count],
            bounds: Aabb::default(),
        }
    }
}

/// An ordered run of joint poses sampled at a fixed frame rate.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub frames: Vec<JointPose>,
    pub frame_rate: f32,
}

impl AnimationClip {
    /// Clip length in seconds.
    pub fn duration(&self) -> f64 {
        self.frames.len() as f64 / self.frame_rate as f64
    }

    pub fn joint_count(&self) -> usize {
        self.frames.first().map_or(0, |f| f.rotations.len())
    }
}
