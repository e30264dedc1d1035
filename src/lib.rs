//! Skeletal mesh & animation pipeline for a desktop model viewer.
//!
//! Parses the text-based mesh (`.msh`) and animation clip (`.anm`) formats
//! into a [`model::MeshModel`], maps wall-clock time to animation time
//! through a [`animation::TimeController`], and poses vertices each frame
//! via [`animation::evaluate`]. Rendering, windowing and input live outside
//! this crate and consume the posed buffers it produces.

pub mod animation;
pub mod error;
pub mod math;
pub mod model;
pub mod parser;
pub mod settings;
pub mod texture;

pub const CONFY_APP_NAME: &str = "mshvis";

pub use animation::{evaluate, PoseSnapshot, PosedSubMesh, RepeatMode, TimeController};
pub use error::MeshError;
pub use math::Aabb;
pub use model::MeshModel;
