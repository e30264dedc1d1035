mod controller;
mod evaluator;
mod interpolation;

pub use controller::*;
pub use evaluator::*;
pub use interpolation::*;
