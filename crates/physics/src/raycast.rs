//! Ray queries against the globe surface.

use crate::Globe;
use engine_core::Vec3;
use rapier3d::parry::query::RayCast;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

impl Globe {
    /// Cast a ray at the outside of the globe and return the first surface hit.
    ///
    /// Origins inside the globe report no hit: the shell is only visible from outside.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        if origin.distance_squared(self.center) < self.radius * self.radius {
            log::debug!("Ray origin {:?} is inside the globe", origin);
            return None;
        }

        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.shape
            .cast_ray_and_get_normal(&self.isometry(), &ray, max_distance, true)
            .map(|intersection| {
                let point = ray.point_at(intersection.time_of_impact);
                RaycastHit {
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                }
            })
    }
}
