//! Bullet weapon: spawns projectiles, moves them, and resolves hits against billboards.

use engine_core::{Transform, Vec3};

use crate::config::ProjectileConfig;
use crate::destruction;
use crate::events::{EffectKind, GameEvent};
use crate::weapons::{AmmoState, CombatState, FireGate, Weapon, WeaponKind};

/// A bullet in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u64,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Simulation time (seconds) at spawn.
    pub created_at: f64,
}

pub struct ProjectileWeapon {
    pub gate: FireGate,
    /// Second gate in seconds, checked against the same last-shot time.
    min_shot_interval: f32,
    bullet_speed: f32,
    max_age: f64,
    muzzle_offset: Vec3,
    hit_radius: f32,
    damage_per_hit: i32,
    projectiles: Vec<Projectile>,
    next_id: u64,
    firing: bool,
}

impl ProjectileWeapon {
    pub fn new(config: &ProjectileConfig) -> Self {
        Self {
            gate: FireGate::new(config.max_ammo, config.fire_rate),
            min_shot_interval: config.min_shot_interval_ms as f32 / 1000.0,
            bullet_speed: config.bullet_speed,
            max_age: config.max_age_ms as f64 / 1000.0,
            muzzle_offset: Vec3::from_array(config.muzzle_offset),
            hit_radius: config.hit_radius,
            damage_per_hit: config.damage_per_hit,
            projectiles: Vec::new(),
            next_id: 0,
            firing: false,
        }
    }

    pub fn start_continuous_fire(&mut self) {
        self.firing = true;
    }

    pub fn stop_continuous_fire(&mut self) {
        self.firing = false;
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    fn interval_elapsed(&self, now: f64) -> bool {
        self.gate.elapsed_at_least(now, self.min_shot_interval)
    }
}

impl Weapon for ProjectileWeapon {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Projectile
    }

    fn fire(&mut self, now: f64, camera: Option<&Transform>, combat: &mut CombatState) -> bool {
        let Some(camera) = camera else {
            log::debug!("Projectile fire ignored: no camera");
            return false;
        };
        if !self.gate.is_ready(now) || !self.interval_elapsed(now) {
            return false;
        }
        self.gate.consume(now);

        self.next_id += 1;
        let projectile = Projectile {
            id: self.next_id,
            position: camera.local_to_world(self.muzzle_offset),
            velocity: camera.forward() * self.bullet_speed,
            created_at: now,
        };
        combat.events.push(GameEvent::ProjectileSpawned {
            id: projectile.id,
            position: projectile.position,
            velocity: projectile.velocity,
        });
        combat.events.push(GameEvent::AmmoChanged {
            weapon: WeaponKind::Projectile,
            ammo: self.gate.ammo,
        });
        self.projectiles.push(projectile);
        true
    }

    fn update(&mut self, dt: f32, now: f64, camera: Option<&Transform>, combat: &mut CombatState) {
        if self.firing {
            self.fire(now, camera, combat);
        }

        let in_flight = std::mem::take(&mut self.projectiles);
        for mut projectile in in_flight {
            projectile.position += projectile.velocity * dt;

            if let Some(target) = combat.registry.first_within(projectile.position, self.hit_radius) {
                combat.events.push(GameEvent::ProjectileRemoved { id: projectile.id });
                combat
                    .effects
                    .spawn(EffectKind::Impact, projectile.position, &mut combat.events);

                if let Some(hit) = combat.registry.apply_damage(target, self.damage_per_hit) {
                    log::debug!("Bullet {} hit {} ({} hp left)", projectile.id, hit.id, hit.health);
                    combat.events.push(GameEvent::BillboardDamaged {
                        id: hit.id.clone(),
                        health: hit.health,
                        transform: hit.transform,
                    });
                    if hit.destroyed {
                        destruction::begin(
                            &mut combat.registry,
                            &hit.id,
                            combat.globe.center,
                            combat.destruction_secs,
                            &mut combat.effects,
                            &mut combat.events,
                        );
                    }
                }
                continue;
            }

            if now - projectile.created_at >= self.max_age {
                combat.events.push(GameEvent::ProjectileRemoved { id: projectile.id });
                continue;
            }

            combat.events.push(GameEvent::ProjectileMoved {
                id: projectile.id,
                position: projectile.position,
            });
            self.projectiles.push(projectile);
        }
    }

    fn ammo_state(&self) -> AmmoState {
        AmmoState {
            kind: WeaponKind::Projectile,
            ammo: self.gate.ammo,
            max_ammo: self.gate.max_ammo,
        }
    }

    fn set_ammo(&mut self, ammo: u32) {
        self.gate.set_ammo(ammo);
    }
}
