mod clip;
mod model;
mod submesh;

pub use clip::*;
pub use model::*;
pub use submesh::*;
