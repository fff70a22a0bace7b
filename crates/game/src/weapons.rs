//! Weapon contract and the billboard placement weapon.

use engine_core::{surface_orientation, Transform};
use physics::Globe;
use serde::{Deserialize, Serialize};

use crate::config::{PlacementConfig, WeaponsConfig};
use crate::effects::EffectsManager;
use crate::events::{GameEvent, GameEvents};
use crate::projectile::ProjectileWeapon;
use crate::registry::{BillboardDesc, Category, PlacementRegistry};

/// The two weapons the player carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Places billboards on the surface.
    Placement,
    /// Fires bullets that damage billboards.
    Projectile,
}

/// Ammo counter as shown by the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoState {
    pub kind: WeaponKind,
    pub ammo: u32,
    pub max_ammo: u32,
}

/// Ammo plus fire-rate gate shared by both weapons.
#[derive(Debug, Clone)]
pub struct FireGate {
    pub ammo: u32,
    pub max_ammo: u32,
    /// Minimum seconds between successful shots.
    pub fire_rate: f32,
    last_fired: Option<f64>,
}

impl FireGate {
    pub fn new(max_ammo: u32, fire_rate: f32) -> Self {
        Self {
            ammo: max_ammo,
            max_ammo,
            fire_rate: fire_rate.max(0.0),
            last_fired: None,
        }
    }

    /// True if a shot at `now` would be allowed. Does not change state.
    pub fn is_ready(&self, now: f64) -> bool {
        self.ammo > 0 && self.elapsed_at_least(now, self.fire_rate)
    }

    /// Whether `interval` seconds have passed since the last shot. Compared in the
    /// interval's own precision so an exact interval counts as elapsed.
    pub fn elapsed_at_least(&self, now: f64, interval: f32) -> bool {
        self.last_fired.map_or(true, |t| (now - t) as f32 >= interval)
    }

    /// Spend one round. Call only after `is_ready` and any other precondition passed.
    pub fn consume(&mut self, now: f64) {
        self.ammo = self.ammo.saturating_sub(1);
        self.last_fired = Some(now);
    }

    pub fn set_ammo(&mut self, ammo: u32) {
        self.ammo = ammo.min(self.max_ammo);
    }
}

/// Everything a weapon touches when it fires or updates. Owned by the weapon manager, so the
/// billboard registry exists exactly once.
pub struct CombatState {
    pub globe: Globe,
    pub registry: PlacementRegistry,
    pub effects: EffectsManager,
    pub events: GameEvents,
    /// Toppling duration in seconds.
    pub destruction_secs: f32,
}

impl CombatState {
    pub fn new(globe: Globe, config: &WeaponsConfig) -> Self {
        Self {
            globe,
            registry: PlacementRegistry::new(),
            effects: EffectsManager::new(config.impact_effect_ms, config.explosion_effect_ms),
            events: GameEvents::new(),
            destruction_secs: config.destruction_ms as f32 / 1000.0,
        }
    }
}

/// Capability shared by every weapon.
pub trait Weapon {
    fn kind(&self) -> WeaponKind;

    /// Try to fire at simulation time `now` (seconds). Returns false, with no side effect, when
    /// out of ammo, inside the fire-rate window, or without a camera.
    fn fire(&mut self, now: f64, camera: Option<&Transform>, combat: &mut CombatState) -> bool;

    /// Per-tick update.
    fn update(&mut self, dt: f32, now: f64, camera: Option<&Transform>, combat: &mut CombatState);

    fn ammo_state(&self) -> AmmoState;

    /// Restore ammo, clamped to the magazine size.
    fn set_ammo(&mut self, ammo: u32);

    fn refill(&mut self) {
        let max = self.ammo_state().max_ammo;
        self.set_ammo(max);
    }
}

/// Closed set of weapons held by the manager.
pub enum WeaponSlot {
    Placement(PlacementWeapon),
    Projectile(ProjectileWeapon),
}

impl WeaponSlot {
    pub fn weapon(&self) -> &dyn Weapon {
        match self {
            WeaponSlot::Placement(w) => w,
            WeaponSlot::Projectile(w) => w,
        }
    }

    pub fn weapon_mut(&mut self) -> &mut dyn Weapon {
        match self {
            WeaponSlot::Placement(w) => w,
            WeaponSlot::Projectile(w) => w,
        }
    }

    pub fn as_projectile_mut(&mut self) -> Option<&mut ProjectileWeapon> {
        match self {
            WeaponSlot::Projectile(w) => Some(w),
            WeaponSlot::Placement(_) => None,
        }
    }
}

/// Puts a billboard where the camera looks.
pub struct PlacementWeapon {
    pub gate: FireGate,
    config: PlacementConfig,
}

impl PlacementWeapon {
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            gate: FireGate::new(config.max_ammo, config.fire_rate),
            config: config.clone(),
        }
    }

    /// Where a billboard would land for this camera: the aim ray's hit on the globe, or a
    /// point `fallback_distance` ahead projected onto the surface when the ray misses.
    pub fn aim_point(&self, camera: &Transform, globe: &Globe) -> engine_core::Vec3 {
        let origin = camera.position;
        let forward = camera.forward();
        let reach = origin.distance(globe.center) + globe.radius;
        match globe.raycast(origin, forward, reach) {
            Some(hit) => hit.point,
            None => globe.project_to_surface(origin + forward * self.config.fallback_distance),
        }
    }
}

impl Weapon for PlacementWeapon {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Placement
    }

    fn fire(&mut self, now: f64, camera: Option<&Transform>, combat: &mut CombatState) -> bool {
        let Some(camera) = camera else {
            log::debug!("Placement fire ignored: no camera");
            return false;
        };
        if !self.gate.is_ready(now) {
            return false;
        }

        let position = self.aim_point(camera, &combat.globe);
        let rotation = surface_orientation(position, combat.globe.center, Some(camera.position));
        let id = combat.registry.allocate_id("bb");
        let desc = BillboardDesc {
            id: id.clone(),
            category: Category::Player,
            position,
            rotation,
            text: self.config.text.clone(),
            color: self.config.color.clone(),
            size: self.config.billboard_size,
            health: self.config.health,
        };
        if let Err(e) = combat.registry.insert(desc) {
            log::warn!("Placement failed: {}", e);
            return false;
        }

        self.gate.consume(now);
        if let Some(view) = combat.registry.get(&id) {
            combat.events.push(GameEvent::BillboardPlaced {
                id: id.clone(),
                category: Category::Player,
                transform: view.transform,
                text: self.config.text.clone(),
                color: self.config.color.clone(),
                health: view.health.current,
            });
        }
        combat.events.push(GameEvent::AmmoChanged {
            weapon: WeaponKind::Placement,
            ammo: self.gate.ammo,
        });
        log::debug!("Placed {} at {:?}", id, position);
        true
    }

    fn update(&mut self, _dt: f32, _now: f64, _camera: Option<&Transform>, _combat: &mut CombatState) {}

    fn ammo_state(&self) -> AmmoState {
        AmmoState {
            kind: WeaponKind::Placement,
            ammo: self.gate.ammo,
            max_ammo: self.gate.max_ammo,
        }
    }

    fn set_ammo(&mut self, ammo: u32) {
        self.gate.set_ammo(ammo);
    }
}
