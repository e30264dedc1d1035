mod anim;
mod mesh;

pub use anim::*;
pub use mesh::*;
