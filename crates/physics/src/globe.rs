//! The planet the game is played on: a sphere with a radius and a center.

use engine_core::{spherical_to_cartesian, SphericalCoord, Vec3};
use rapier3d::prelude::*;

/// Globe collaborator: radius, center and the solid used for ray queries.
#[derive(Debug, Clone)]
pub struct Globe {
    pub center: Vec3,
    pub radius: f32,
    pub(crate) shape: Ball,
}

impl Globe {
    pub fn new(center: Vec3, radius: f32) -> Self {
        let radius = radius.max(f32::EPSILON);
        Self {
            center,
            radius,
            shape: Ball::new(radius),
        }
    }

    /// Unit surface normal at (or above) a world position.
    pub fn normal_at(&self, position: Vec3) -> Vec3 {
        (position - self.center).normalize_or_zero()
    }

    /// Spherical coordinates of a world position relative to the globe center.
    pub fn world_to_spherical(&self, position: Vec3) -> SphericalCoord {
        SphericalCoord::from_cartesian(position - self.center)
    }

    /// World position for spherical coordinates relative to the globe center.
    pub fn spherical_to_world(&self, radius: f32, theta: f32, phi: f32) -> Vec3 {
        self.center + spherical_to_cartesian(radius, theta, phi)
    }

    /// Surface point at the given longitude/colatitude.
    pub fn surface_point(&self, theta: f32, phi: f32) -> Vec3 {
        self.spherical_to_world(self.radius, theta, phi)
    }

    /// Push a point radially onto the shell `radius + altitude`. The center maps to the +Y pole.
    pub fn project_to_shell(&self, position: Vec3, altitude: f32) -> Vec3 {
        let dir = self.normal_at(position);
        let dir = if dir == Vec3::ZERO { Vec3::Y } else { dir };
        self.center + dir * (self.radius + altitude)
    }

    pub fn project_to_surface(&self, position: Vec3) -> Vec3 {
        self.project_to_shell(position, 0.0)
    }

    pub(crate) fn isometry(&self) -> Isometry<Real> {
        Isometry::translation(self.center.x, self.center.y, self.center.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_lands_on_shell() {
        let globe = Globe::new(Vec3::new(1.0, 2.0, 3.0), 50.0);
        let p = globe.project_to_shell(Vec3::new(40.0, -8.0, 3.0), 1.8);
        assert!((p.distance(globe.center) - 51.8).abs() < 1e-3);
        let center = globe.project_to_surface(globe.center);
        assert!((center - globe.center).distance(Vec3::Y * 50.0) < 1e-4);
    }

    #[test]
    fn spherical_conversion_is_center_relative() {
        let globe = Globe::new(Vec3::new(10.0, 0.0, 0.0), 5.0);
        let s = globe.world_to_spherical(Vec3::new(15.0, 0.0, 0.0));
        assert!((s.radius - 5.0).abs() < 1e-5);
        let back = globe.spherical_to_world(s.radius, s.theta, s.phi);
        assert!(back.distance(Vec3::new(15.0, 0.0, 0.0)) < 1e-4);
    }
}
