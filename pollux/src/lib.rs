#[macro_use]
mod macros;

pub mod bvh;
pub mod camera;
pub mod error;
pub mod film;
pub mod integrators;
pub mod intersection;
pub mod materials;
pub mod math;
pub mod ray;
pub mod renderer;
pub mod sampling;
pub mod scene;
pub mod settings;
pub mod shapes;

pub use error::{Error, Result};

#[doc(hidden)]
pub use log;
