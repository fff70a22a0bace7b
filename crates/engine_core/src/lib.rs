//! Core types shared by every crate in the workspace.
//!
//! - Spherical-surface geometry (`sphere`)
//! - Transform and common components
//! - Tick-driven clock and timers

pub mod components;
pub mod sphere;
pub mod time;
pub mod transform;

pub use components::*;
pub use sphere::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
