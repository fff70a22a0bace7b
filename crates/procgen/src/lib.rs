//! Procedural generation for the globe surface.

pub mod rng;
pub mod rocks;

pub use rng::*;
pub use rocks::*;
