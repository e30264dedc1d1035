use nalgebra_glm as glm;

/// Spherical interpolation between two joint rotations, re-normalized so the
/// result is a unit quaternion even when the inputs have drifted.
pub fn slerp_normalized(a: &glm::Quat, b: &glm::Quat, t: f32) -> glm::Quat {
    glm::quat_normalize(&glm::quat_slerp(a, b, t))
}

/// Plain linear interpolation for joint translations.
pub fn lerp_vec3(a: &glm::Vec3, b: &glm::Vec3, t: f32) -> glm::Vec3 {
    glm::lerp(a, b, t)
}

/// Joint transform as a 4x4: the rotation as a matrix with the translation
/// placed in its translation column.
pub fn joint_matrix(rotation: &glm::Quat, translation: &glm::Vec3) -> glm::Mat4 {
    let mut m = glm::quat_to_mat4(rotation);
    m[(0, 3)] = translation.x;
    m[(1, 3)] = translation.y;
    m[(2, 3)] = translation.z;
    m[(3, 3)] = 1.0;
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slerp_endpoints() {
        let a = glm::quat_identity();
        let b = glm::quat_angle_axis(std::f32::consts::FRAC_PI_2, &glm::vec3(0.0, 0.0, 1.0));
        let at_zero = slerp_normalized(&a, &b, 0.0);
        let at_one = slerp_normalized(&a, &b, 1.0);
        assert!((glm::quat_dot(&at_zero, &a).abs() - 1.0).abs() < 1e-5);
        assert!((glm::quat_dot(&at_one, &b).abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn slerp_result_is_unit_length() {
        let a = glm::Quat::new(0.9, 0.1, 0.2, 0.3);
        let b = glm::Quat::new(0.95, -0.3, 0.1, 0.0);
        let q = slerp_normalized(&a, &b, 0.37);
        assert!((glm::quat_magnitude(&q) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn joint_matrix_applies_rotation_then_translation() {
        let rot = glm::quat_angle_axis(std::f32::consts::FRAC_PI_2, &glm::vec3(0.0, 0.0, 1.0));
        let m = joint_matrix(&rot, &glm::vec3(5.0, 0.0, 0.0));
        let p = m * glm::vec4(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 5.0).abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
        assert!(p.z.abs() < 1e-5);
    }
}
