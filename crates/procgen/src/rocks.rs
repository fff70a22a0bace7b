//! Rock placement on the globe surface.
//!
//! **Seed-based determinism:** `RockField::generate` draws positions and sizes from a
//! [`XorShift`] seeded with `options.seed`, so every client builds the same field without
//! syncing terrain over the network. Colour, roughness and yaw come from a hash of each
//! rock's own position, never from further draws, so the look of a rock does not depend on
//! generation order.

use std::f32::consts::TAU;

use engine_core::{move_on_sphere, random_sphere_point_with, sphere_distance, spherical_to_cartesian, SphericalCoord};
use glam::Vec3;
use rand::Rng;

use crate::rng::{hash_unit, position_hash, XorShift};

/// Collider radius relative to rock size.
pub const COLLIDER_SCALE: f32 = 1.2;
/// Collision queries shrink colliders so blocking matches the visible mesh.
pub const COLLISION_QUERY_SCALE: f32 = 0.9;

/// Base Mars regolith tint.
const BASE_COLOR: [f32; 3] = [0.55, 0.27, 0.17];

/// How rocks are scattered over the globe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RockDistribution {
    /// Independent uniform points over the whole sphere.
    Uniform,
    /// `clusters` centres; each rock lies within `angular_radius` radians of its centre.
    Clustered { clusters: u32, angular_radius: f32 },
}

/// Generation parameters. Same options + same count = same field.
#[derive(Debug, Clone)]
pub struct RockOptions {
    pub seed: u64,
    pub distribution: RockDistribution,
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for RockOptions {
    fn default() -> Self {
        Self {
            seed: 0x4d41_5253, // "MARS"
            distribution: RockDistribution::Uniform,
            min_size: 0.5,
            max_size: 2.0,
        }
    }
}

/// Position-derived visual variation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RockVisual {
    pub color: [f32; 3],
    pub roughness: f32,
    /// Yaw about the surface normal, radians.
    pub yaw: f32,
}

impl RockVisual {
    pub fn from_position(phi: f32, theta: f32) -> Self {
        let h = position_hash(phi, theta);
        let brightness = 0.8 + hash_unit(h, 0) * 0.4;
        let warmth = 0.9 + hash_unit(h, 1) * 0.2;
        Self {
            color: [
                (BASE_COLOR[0] * brightness * warmth).min(1.0),
                (BASE_COLOR[1] * brightness).min(1.0),
                (BASE_COLOR[2] * brightness / warmth).min(1.0),
            ],
            roughness: 0.7 + hash_unit(h, 2) * 0.3,
            yaw: hash_unit(h, 3) * TAU,
        }
    }
}

/// A rock anchored on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Rock {
    pub phi: f32,
    pub theta: f32,
    pub size: f32,
    pub collider_radius: f32,
    /// Current world position; collision reads this rather than `phi`/`theta`.
    pub world_position: Vec3,
    pub visual: RockVisual,
}

/// Every rock on the globe plus the globe frame they were placed in.
#[derive(Debug, Clone)]
pub struct RockField {
    pub center: Vec3,
    pub radius: f32,
    pub rocks: Vec<Rock>,
}

impl RockField {
    /// An empty field (no blocking).
    pub fn empty(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            rocks: Vec::new(),
        }
    }

    /// Generate `count` rocks on a globe of `radius` centred at `center`.
    pub fn generate(center: Vec3, radius: f32, count: usize, options: &RockOptions) -> Self {
        let mut rng = XorShift::new(options.seed);
        let (min_size, max_size) = if options.min_size <= options.max_size {
            (options.min_size, options.max_size)
        } else {
            (options.max_size, options.min_size)
        };

        let positions: Vec<(f32, f32)> = match options.distribution {
            RockDistribution::Uniform => (0..count)
                .map(|_| {
                    let p = SphericalCoord::from_cartesian(random_sphere_point_with(&mut rng, 1.0));
                    (p.phi, p.theta)
                })
                .collect(),
            RockDistribution::Clustered { clusters, angular_radius } => {
                clustered_positions(&mut rng, count, clusters, angular_radius, radius)
            }
        };

        let rocks = positions
            .into_iter()
            .map(|(phi, theta)| {
                let size = if max_size > min_size {
                    rng.gen_range(min_size..max_size)
                } else {
                    min_size
                };
                Rock {
                    phi,
                    theta,
                    size,
                    collider_radius: size * COLLIDER_SCALE,
                    world_position: center + spherical_to_cartesian(radius, theta, phi),
                    visual: RockVisual::from_position(phi, theta),
                }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Generated {} rocks (seed {:#x}, {:?})",
            rocks.len(),
            options.seed,
            options.distribution
        );

        Self { center, radius, rocks }
    }

    /// First rock whose shrunken collider overlaps a circle of `radius` around `position`,
    /// measured as great-circle distance on the globe surface. Linear scan.
    pub fn check_collision(&self, position: Vec3, radius: f32) -> Option<&Rock> {
        let query = SphericalCoord::from_cartesian(position - self.center);
        self.rocks.iter().find(|rock| {
            let at = SphericalCoord::from_cartesian(rock.world_position - self.center);
            let distance = sphere_distance(query.phi, query.theta, at.phi, at.theta, self.radius);
            distance < radius + rock.collider_radius * COLLISION_QUERY_SCALE
        })
    }

    pub fn len(&self) -> usize {
        self.rocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rocks.is_empty()
    }
}

/// Cluster centres first, then members around each centre. The first cluster absorbs the
/// remainder when `count` does not divide evenly.
fn clustered_positions(
    rng: &mut XorShift,
    count: usize,
    clusters: u32,
    angular_radius: f32,
    radius: f32,
) -> Vec<(f32, f32)> {
    if count == 0 {
        return Vec::new();
    }
    let cluster_count = (clusters.max(1) as usize).min(count);
    let centres: Vec<SphericalCoord> = (0..cluster_count)
        .map(|_| SphericalCoord::from_cartesian(random_sphere_point_with(&mut *rng, 1.0)))
        .collect();

    let per_cluster = count / cluster_count;
    let remainder = count % cluster_count;
    let mut out = Vec::with_capacity(count);

    for (i, centre) in centres.iter().enumerate() {
        let members = per_cluster + if i == 0 { remainder } else { 0 };
        for _ in 0..members {
            let heading = rng.gen::<f32>() * TAU;
            // sqrt keeps the density roughly even across the disc
            let angle = angular_radius.max(0.0) * rng.gen::<f32>().sqrt();
            out.push(move_on_sphere(centre.phi, centre.theta, heading, angle * radius, radius));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clustered() -> RockOptions {
        RockOptions {
            seed: 1234,
            distribution: RockDistribution::Clustered {
                clusters: 3,
                angular_radius: 0.2,
            },
            ..Default::default()
        }
    }

    /// Same seed and options must produce identical fields (shared-world consistency).
    #[test]
    fn rocks_deterministic_same_seed() {
        for options in [RockOptions::default(), clustered()] {
            let a = RockField::generate(Vec3::ZERO, 50.0, 40, &options);
            let b = RockField::generate(Vec3::ZERO, 50.0, 40, &options);
            assert_eq!(a.rocks, b.rocks);
        }
    }

    #[test]
    fn rocks_different_seed_differ() {
        let a = RockField::generate(Vec3::ZERO, 50.0, 10, &RockOptions::default());
        let b = RockField::generate(
            Vec3::ZERO,
            50.0,
            10,
            &RockOptions {
                seed: 99,
                ..Default::default()
            },
        );
        assert_ne!(a.rocks, b.rocks);
    }

    #[test]
    fn rocks_sit_on_surface_with_derived_collider() {
        let field = RockField::generate(Vec3::new(0.0, 5.0, 0.0), 50.0, 25, &RockOptions::default());
        assert_eq!(field.len(), 25);
        for rock in &field.rocks {
            assert!((rock.world_position.distance(field.center) - 50.0).abs() < 1e-3);
            assert!((rock.collider_radius - rock.size * COLLIDER_SCALE).abs() < 1e-6);
            assert!(rock.size >= 0.5 && rock.size <= 2.0);
        }
    }

    #[test]
    fn visuals_come_from_position() {
        let field = RockField::generate(Vec3::ZERO, 50.0, 12, &clustered());
        for rock in &field.rocks {
            assert_eq!(rock.visual, RockVisual::from_position(rock.phi, rock.theta));
            assert!(rock.visual.roughness >= 0.7 && rock.visual.roughness <= 1.0);
        }
    }

    #[test]
    fn clustered_count_includes_remainder() {
        let field = RockField::generate(Vec3::ZERO, 50.0, 11, &clustered());
        assert_eq!(field.len(), 11);
        let more_clusters_than_rocks = RockOptions {
            distribution: RockDistribution::Clustered {
                clusters: 8,
                angular_radius: 0.1,
            },
            ..Default::default()
        };
        assert_eq!(RockField::generate(Vec3::ZERO, 50.0, 3, &more_clusters_than_rocks).len(), 3);
    }

    #[test]
    fn clustered_rocks_stay_near_a_centre() {
        let field = RockField::generate(Vec3::ZERO, 50.0, 30, &clustered());
        // 10 per cluster: consecutive members of one cluster are within twice the angular radius
        let first = &field.rocks[0];
        for rock in &field.rocks[1..10] {
            let d = sphere_distance(first.phi, first.theta, rock.phi, rock.theta, 1.0);
            assert!(d <= 0.4 + 1e-3, "angular distance {d}");
        }
    }

    #[test]
    fn collision_uses_shrunken_collider() {
        let mut field = RockField::empty(Vec3::ZERO, 50.0);
        let (phi, theta) = (std::f32::consts::FRAC_PI_2, 0.0);
        field.rocks.push(Rock {
            phi,
            theta,
            size: 1.0,
            collider_radius: 1.2,
            world_position: Vec3::new(50.0, 0.0, 0.0),
            visual: RockVisual::from_position(phi, theta),
        });

        // 1.2 * 0.9 = 1.08 reach plus query radius 0.5
        let near = spherical_to_cartesian(51.8, 1.5 / 50.0, phi);
        assert!(field.check_collision(near, 0.5).is_some());
        let far = spherical_to_cartesian(51.8, 1.7 / 50.0, phi);
        assert!(field.check_collision(far, 0.5).is_none());
    }

    #[test]
    fn collision_follows_world_position_drift() {
        let mut field = RockField::generate(Vec3::ZERO, 50.0, 1, &RockOptions::default());
        let moved = Vec3::new(0.0, 0.0, -50.0);
        field.rocks[0].world_position = moved;
        assert!(field.check_collision(moved, 0.1).is_some());
    }
}
