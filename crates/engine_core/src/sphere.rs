//! Geometry on the surface of a sphere.
//!
//! Angles follow the physics convention: `phi` is the colatitude measured from the +Y pole
//! (0..π) and `theta` is the longitude around the Y axis (0..2π), with
//! `x = r·sinφ·cosθ`, `y = r·cosφ`, `z = r·sinφ·sinθ`.

use std::f32::consts::{PI, TAU};

use glam::{Mat3, Quat, Vec3};
use rand::Rng;

/// Horizontal extent (relative to radius) below which a point counts as on the pole axis.
const AXIS_EPSILON: f32 = 1e-6;
/// Below this, `sin(phi)` after a move is treated as zero and longitude is left untouched.
/// Loose enough to absorb `acos` error near 1.0 in single precision.
const POLE_EPSILON: f32 = 1e-3;

/// A point expressed as radius, longitude and colatitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCoord {
    pub radius: f32,
    /// Longitude in `[0, 2π)`.
    pub theta: f32,
    /// Colatitude in `[0, π]`.
    pub phi: f32,
}

impl SphericalCoord {
    pub fn new(radius: f32, theta: f32, phi: f32) -> Self {
        Self {
            radius,
            theta: normalize_angle(theta),
            phi: clamp(phi, 0.0, PI),
        }
    }

    /// Convert a cartesian point. The origin and the poles report `theta = 0`.
    pub fn from_cartesian(p: Vec3) -> Self {
        let radius = p.length();
        if radius <= f32::EPSILON {
            return Self { radius: 0.0, theta: 0.0, phi: 0.0 };
        }
        let phi = clamp(p.y / radius, -1.0, 1.0).acos();
        let theta = if p.x * p.x + p.z * p.z <= (radius * AXIS_EPSILON).powi(2) {
            0.0
        } else {
            normalize_angle(p.z.atan2(p.x))
        };
        Self { radius, theta, phi }
    }

    pub fn to_cartesian(&self) -> Vec3 {
        spherical_to_cartesian(self.radius, self.theta, self.phi)
    }
}

pub fn spherical_to_cartesian(radius: f32, theta: f32, phi: f32) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(
        radius * sin_phi * cos_theta,
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

pub fn cartesian_to_spherical(p: Vec3) -> SphericalCoord {
    SphericalCoord::from_cartesian(p)
}

/// Haversine great-circle distance between two surface points.
pub fn sphere_distance(phi1: f32, theta1: f32, phi2: f32, theta2: f32, radius: f32) -> f32 {
    let lat1 = PI / 2.0 - phi1;
    let lat2 = PI / 2.0 - phi2;
    let half_dlat = (lat2 - lat1) * 0.5;
    let half_dlon = (theta2 - theta1) * 0.5;
    let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
    let a = clamp(a, 0.0, 1.0);
    2.0 * radius * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Travel `distance` along a great circle starting at `(phi, theta)` with the given heading
/// (0 points at the +Y pole, π/2 toward increasing longitude). Returns `(phi, theta)`.
pub fn move_on_sphere(phi: f32, theta: f32, heading: f32, distance: f32, radius: f32) -> (f32, f32) {
    if radius <= f32::EPSILON {
        return (phi, normalize_angle(theta));
    }
    let delta = distance / radius;
    let (sin_d, cos_d) = delta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();

    let cos_new_phi = clamp(cos_p * cos_d + sin_p * sin_d * heading.cos(), -1.0, 1.0);
    let new_phi = cos_new_phi.acos();

    if new_phi.sin().abs() < POLE_EPSILON {
        return (new_phi, normalize_angle(theta));
    }

    let d_theta = (heading.sin() * sin_d * sin_p).atan2(cos_d - cos_p * cos_new_phi);
    (new_phi, normalize_angle(theta + d_theta))
}

/// Initial bearing from point 1 to point 2, in `[0, 2π)`.
pub fn calculate_heading(phi1: f32, theta1: f32, phi2: f32, theta2: f32) -> f32 {
    let d_theta = theta2 - theta1;
    let y = d_theta.sin() * phi2.sin();
    let x = phi1.sin() * phi2.cos() - phi1.cos() * phi2.sin() * d_theta.cos();
    normalize_angle(y.atan2(x))
}

/// Uniform point on the sphere surface. Latitude comes from an inverse cosine so the
/// poles are not oversampled.
pub fn random_sphere_point_with<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let phi = clamp(2.0 * rng.gen::<f32>() - 1.0, -1.0, 1.0).acos();
    spherical_to_cartesian(radius, theta, phi)
}

pub fn random_sphere_point(radius: f32) -> Vec3 {
    random_sphere_point_with(&mut rand::thread_rng(), radius)
}

/// Rotation for an object standing on the sphere at `position`.
///
/// Local +Y maps to the surface normal. When `face_toward` is given, the object is yawed
/// about the normal so its local +Z points at that point projected into the tangent plane.
pub fn surface_orientation(position: Vec3, center: Vec3, face_toward: Option<Vec3>) -> Quat {
    let up = (position - center).normalize_or_zero();
    if up == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let reference = if up.dot(Vec3::Y).abs() > 0.99 { Vec3::Z } else { Vec3::Y };
    let right = reference.cross(up).normalize();
    let forward = right.cross(up).normalize();
    let base = Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize();

    let Some(target) = face_toward else {
        return base;
    };
    let to_target = target - position;
    let tangent = (to_target - up * to_target.dot(up)).normalize_or_zero();
    if tangent == Vec3::ZERO {
        return base;
    }

    let angle = forward.cross(tangent).dot(up).atan2(forward.dot(tangent));
    (Quat::from_axis_angle(up, angle) * base).normalize()
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Wrap an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn cartesian_roundtrip() {
        let points = [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-4.0, 0.5, -2.0),
            Vec3::new(0.0, -7.0, 0.1),
            Vec3::new(50.0, 0.0, 0.0),
            Vec3::new(-0.3, -0.2, 10.0),
        ];
        for p in points {
            let s = SphericalCoord::from_cartesian(p);
            assert!(s.theta >= 0.0 && s.theta < TAU);
            assert!(s.phi >= 0.0 && s.phi <= PI);
            let back = s.to_cartesian();
            assert!(back.distance(p) < 1e-4 * p.length().max(1.0), "{p:?} -> {back:?}");
        }
    }

    #[test]
    fn pole_reports_zero_longitude() {
        let s = SphericalCoord::from_cartesian(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(s.theta, 0.0);
        assert!(approx(s.phi, 0.0, 1e-6));
        let south = SphericalCoord::from_cartesian(Vec3::new(0.0, -5.0, 0.0));
        assert!(approx(south.phi, PI, 1e-6));
    }

    #[test]
    fn distance_same_point_is_zero() {
        assert_eq!(sphere_distance(1.1, 2.2, 1.1, 2.2, 50.0), 0.0);
    }

    #[test]
    fn distance_antipodal_is_half_circumference() {
        let r = 50.0;
        let d = sphere_distance(0.7, 1.0, PI - 0.7, 1.0 + PI, r);
        assert!(approx(d, PI * r, 1e-3 * r), "got {d}");
    }

    #[test]
    fn move_north_along_meridian() {
        let r = 10.0;
        let (phi, theta) = move_on_sphere(PI / 2.0, 0.5, 0.0, r * 0.25, r);
        assert!(approx(phi, PI / 2.0 - 0.25, 1e-4));
        assert!(approx(theta, 0.5, 1e-4));
    }

    #[test]
    fn move_east_along_equator() {
        let r = 10.0;
        let (phi, theta) = move_on_sphere(PI / 2.0, 0.0, PI / 2.0, r * 0.3, r);
        assert!(approx(phi, PI / 2.0, 1e-4));
        assert!(approx(theta, 0.3, 1e-4));
    }

    #[test]
    fn move_through_pole_keeps_longitude() {
        let r = 1.0;
        let (phi, theta) = move_on_sphere(0.25, 1.5, 0.0, 0.25, r);
        assert!(phi.abs() < 1e-3);
        assert!(approx(theta, 1.5, 1e-6));
    }

    #[test]
    fn move_distance_matches_haversine() {
        let r = 50.0;
        let (phi, theta) = move_on_sphere(1.0, 2.0, 0.8, 7.5, r);
        let d = sphere_distance(1.0, 2.0, phi, theta, r);
        assert!(approx(d, 7.5, 1e-2));
    }

    #[test]
    fn heading_points_back_at_target() {
        let r = 20.0;
        let (phi, theta) = move_on_sphere(1.2, 0.4, 1.1, 3.0, r);
        let heading = calculate_heading(1.2, 0.4, phi, theta);
        assert!(approx(heading, 1.1, 2e-3), "heading {heading}");
    }

    #[test]
    fn random_points_lie_on_surface() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut northern = 0;
        for _ in 0..2000 {
            let p = random_sphere_point_with(&mut rng, 50.0);
            assert!(approx(p.length(), 50.0, 1e-3));
            if p.y > 0.0 {
                northern += 1;
            }
        }
        assert!((800..1200).contains(&northern));
    }

    #[test]
    fn orientation_aligns_up_with_normal() {
        let pos = Vec3::new(3.0, 4.0, 12.0);
        let q = surface_orientation(pos, Vec3::ZERO, None);
        assert!((q * Vec3::Y).distance(pos.normalize()) < 1e-4);
        let at_pole = surface_orientation(Vec3::new(0.0, 9.0, 0.0), Vec3::ZERO, None);
        assert!((at_pole * Vec3::Y).distance(Vec3::Y) < 1e-4);
    }

    #[test]
    fn orientation_faces_target_in_tangent_plane() {
        let pos = Vec3::new(50.0, 0.0, 0.0);
        let camera = Vec3::new(55.0, 3.0, -10.0);
        let q = surface_orientation(pos, Vec3::ZERO, Some(camera));
        let expected = Vec3::new(0.0, 3.0, -10.0).normalize();
        assert!((q * Vec3::Z).distance(expected) < 1e-3);
        assert!((q * Vec3::Y).distance(Vec3::X) < 1e-4);
    }

    #[test]
    fn numeric_helpers() {
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert!(approx(normalize_angle(-PI / 2.0), 1.5 * PI, 1e-5));
        assert!(approx(normalize_angle(5.0 * PI), PI, 1e-4));
    }
}
