use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::animation::{RepeatMode, TimeController};
use crate::error::MeshError;
use crate::math::Aabb;
use crate::model::{AnimationClip, SubMesh};
use crate::parser;
use crate::settings::DisplaySettings;
use crate::texture::{self, ImageData};
use nalgebra_glm as glm;

/// A loaded skeletal mesh: geometry, animation clips, model transform and
/// aggregate bounds.
///
/// Loads replace state wholesale: a successful `load_mesh_file` swaps in the
/// freshly parsed geometry, a failed one leaves the previous model untouched.
#[derive(Debug)]
pub struct MeshModel {
    model_matrix: glm::Mat4,
    pub sub_meshes: Vec<SubMesh>,
    pub clips: Vec<AnimationClip>,
    base_bbox: Aabb,
    texture: Option<ImageData>,
    draw_bbox: bool,
    controller: TimeController,
}

impl Default for MeshModel {
    fn default() -> Self {
        Self {
            model_matrix: glm::identity::<f32, 4>(),
            sub_meshes: Vec::new(),
            clips: Vec::new(),
            base_bbox: Aabb::default(),
            texture: None,
            draw_bbox: false,
            controller: TimeController::default(),
        }
    }
}

impl MeshModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a mesh geometry file and swaps it in, replacing any previously
    /// loaded sub-meshes and clips.
    pub fn load_mesh_file(&mut self, path: impl AsRef<Path>) -> Result<(), MeshError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            MeshError::new("mesh-open")
                .with_arg("path", path.display())
                .push_std(e)
        })?;

        let geometry = parser::parse_mesh(BufReader::new(file))?;
        log::info!(
            "loaded mesh '{}': {} sub-meshes",
            path.display(),
            geometry.sub_meshes.len()
        );

        self.sub_meshes = geometry.sub_meshes;
        self.base_bbox = geometry.bounds;
        self.clips.clear();
        self.controller = TimeController::default();
        Ok(())
    }

    /// Parses an animation clip file, appends the clip and binds the time
    /// controller to its duration in wrap mode.
    pub fn load_anim_file(&mut self, path: impl AsRef<Path>) -> Result<(), MeshError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            MeshError::new("anim-open")
                .with_arg("path", path.display())
                .push_std(e)
        })?;

        let clip = parser::parse_anim(BufReader::new(file))?;
        log::info!(
            "loaded clip '{}': {} frames, {} joints, {:.2}s",
            path.display(),
            clip.frames.len(),
            clip.joint_count(),
            clip.duration()
        );

        self.controller = TimeController::new(RepeatMode::Wrap, 0.0, clip.duration());
        self.clips.push(clip);
        Ok(())
    }

    /// Loads the texture image referenced by the mesh. Decoding is delegated
    /// to the image collaborator; the pixels are kept opaque for the renderer.
    pub fn load_texture_file(&mut self, path: impl AsRef<Path>) -> Result<(), MeshError> {
        self.texture = Some(texture::load_image(path.as_ref())?);
        Ok(())
    }

    pub fn texture(&self) -> Option<&ImageData> {
        self.texture.as_ref()
    }

    pub fn model_matrix(&self) -> &glm::Mat4 {
        &self.model_matrix
    }

    /// Aggregate bounds of all sub-meshes, in model space.
    pub fn base_bounds(&self) -> &Aabb {
        &self.base_bbox
    }

    pub fn controller(&self) -> &TimeController {
        &self.controller
    }

    /// True once a non-empty clip is loaded.
    pub fn is_animated(&self) -> bool {
        self.clips.first().is_some_and(|c| !c.frames.is_empty())
    }

    pub fn translate(&mut self, translation: glm::Vec3) {
        self.model_matrix = glm::translate(&self.model_matrix, &translation);
    }

    /// Accumulates a rotation given as XYZ Euler angles in degrees.
    pub fn rotate_degrees(&mut self, euler_angles: glm::Vec3) {
        let mut rotation = glm::identity::<f32, 4>();
        rotation = glm::rotate(&rotation, euler_angles.x.to_radians(), &glm::vec3(1.0, 0.0, 0.0));
        rotation = glm::rotate(&rotation, euler_angles.y.to_radians(), &glm::vec3(0.0, 1.0, 0.0));
        rotation = glm::rotate(&rotation, euler_angles.z.to_radians(), &glm::vec3(0.0, 0.0, 1.0));
        self.model_matrix = self.model_matrix * rotation;
    }

    pub fn set_draw_bbox(&mut self, val: bool) {
        self.draw_bbox = val;
    }

    pub fn draw_bbox(&self) -> bool {
        self.draw_bbox
    }

    pub fn apply_display_settings(&mut self, settings: &DisplaySettings) {
        self.draw_bbox = settings.show_bounding_box;
    }
}
