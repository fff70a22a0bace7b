//! Globe collision queries using Rapier3D shapes.

pub mod globe;
pub mod raycast;

pub use globe::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;
