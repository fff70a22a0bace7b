//! Owns both weapons, the active-weapon cursor and the combat state they share.

use engine_core::Transform;
use physics::Globe;

use crate::bots::BillboardRegistrar;
use crate::config::WeaponsConfig;
use crate::destruction;
use crate::events::{GameEvent, GameEvents};
use crate::projectile::ProjectileWeapon;
use crate::registry::{BillboardDesc, BillboardView, Category, PlacementRegistry, RegisterError};
use crate::weapons::{AmmoState, CombatState, PlacementWeapon, Weapon, WeaponKind, WeaponSlot};

pub struct WeaponManager {
    weapons: Vec<WeaponSlot>,
    active: usize,
    combat: CombatState,
    /// Set once the weapon models are loaded; registration and firing wait for it.
    initialized: bool,
}

impl WeaponManager {
    pub fn new(config: &WeaponsConfig, globe: Globe) -> Self {
        Self {
            weapons: vec![
                WeaponSlot::Placement(PlacementWeapon::new(&config.placement)),
                WeaponSlot::Projectile(ProjectileWeapon::new(&config.projectile)),
            ],
            active: 0,
            combat: CombatState::new(globe, config),
            initialized: false,
        }
    }

    /// Tag every id this manager allocates with `client`.
    pub fn with_client_tag(mut self, client: impl Into<String>) -> Self {
        self.combat.registry = PlacementRegistry::with_client_tag(client);
        self
    }

    pub fn initialize(&mut self) {
        if !self.initialized {
            self.initialized = true;
            log::info!("Weapons ready ({} slots)", self.weapons.len());
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn active_kind(&self) -> WeaponKind {
        self.weapons[self.active].weapon().kind()
    }

    /// Only the active weapon's model is shown.
    pub fn is_model_visible(&self, kind: WeaponKind) -> bool {
        self.active_kind() == kind
    }

    /// Fire the active weapon once.
    pub fn fire(&mut self, now: f64, camera: Option<&Transform>) -> bool {
        if !self.initialized {
            log::debug!("Fire ignored: weapons not loaded");
            return false;
        }
        self.weapons[self.active].weapon_mut().fire(now, camera, &mut self.combat)
    }

    /// Cycle to the next weapon. Continuous fire is stopped first.
    pub fn switch_weapon(&mut self) -> WeaponKind {
        self.stop_continuous_fire();
        self.active = (self.active + 1) % self.weapons.len();
        let active = self.active_kind();
        self.combat.events.push(GameEvent::WeaponSwitched { active });
        log::debug!("Switched to {:?}", active);
        active
    }

    /// Hold-to-fire. Only the projectile weapon fires continuously.
    pub fn start_continuous_fire(&mut self) {
        if let Some(gun) = self.weapons[self.active].as_projectile_mut() {
            gun.start_continuous_fire();
        }
    }

    pub fn stop_continuous_fire(&mut self) {
        for slot in &mut self.weapons {
            if let Some(gun) = slot.as_projectile_mut() {
                gun.stop_continuous_fire();
            }
        }
    }

    pub fn is_firing(&self) -> bool {
        self.weapons.iter().any(|slot| match slot {
            WeaponSlot::Projectile(gun) => gun.is_firing(),
            WeaponSlot::Placement(_) => false,
        })
    }

    /// Per-tick update: bullets first, then toppling billboards, then effects.
    pub fn update(&mut self, dt: f32, now: f64, camera: Option<&Transform>) {
        if !self.initialized {
            return;
        }
        for slot in &mut self.weapons {
            slot.weapon_mut().update(dt, now, camera, &mut self.combat);
        }
        destruction::update(&mut self.combat.registry, dt, &mut self.combat.events);
        self.combat.effects.update(dt, &mut self.combat.events);
    }

    pub fn ammo_state(&self, kind: WeaponKind) -> Option<AmmoState> {
        self.weapons
            .iter()
            .map(WeaponSlot::weapon)
            .find(|w| w.kind() == kind)
            .map(|w| w.ammo_state())
    }

    pub fn active_ammo(&self) -> AmmoState {
        self.weapons[self.active].weapon().ammo_state()
    }

    /// Restore ammo from persisted state. Emits nothing.
    pub fn set_ammo(&mut self, kind: WeaponKind, ammo: u32) {
        if let Some(slot) = self.weapons.iter_mut().find(|s| s.weapon().kind() == kind) {
            slot.weapon_mut().set_ammo(ammo);
        }
    }

    pub fn refill(&mut self, kind: WeaponKind) {
        if let Some(slot) = self.weapons.iter_mut().find(|s| s.weapon().kind() == kind) {
            let weapon = slot.weapon_mut();
            weapon.refill();
            let ammo = weapon.ammo_state().ammo;
            self.combat.events.push(GameEvent::AmmoChanged { weapon: kind, ammo });
        }
    }

    /// Live billboards placed by the player.
    pub fn placement_count(&self) -> usize {
        self.combat.registry.count(Category::Player)
    }

    pub fn registry(&self) -> &PlacementRegistry {
        &self.combat.registry
    }

    pub fn globe(&self) -> &Globe {
        &self.combat.globe
    }

    pub fn projectiles_in_flight(&self) -> usize {
        self.weapons
            .iter()
            .map(|slot| match slot {
                WeaponSlot::Projectile(gun) => gun.projectiles().len(),
                WeaponSlot::Placement(_) => 0,
            })
            .sum()
    }

    /// Remove a billboard by id. Unknown ids are a no-op.
    pub fn remove_billboard(&mut self, id: &str) -> bool {
        match self.combat.registry.remove(id) {
            Some(category) => {
                self.combat.events.push(GameEvent::BillboardRemoved {
                    id: id.to_string(),
                    category,
                });
                true
            }
            None => false,
        }
    }

    /// Insert a billboard received from elsewhere. No placement event is emitted; one that
    /// arrives already dead starts toppling straight away.
    pub fn restore_billboard(&mut self, desc: BillboardDesc) -> Result<(), RegisterError> {
        let id = desc.id.clone();
        let dead = desc.health <= 0;
        self.combat.registry.insert(desc)?;
        if dead {
            self.combat.registry.set_health(&id, 0);
            self.begin_destruction(&id);
        }
        Ok(())
    }

    /// Overwrite health from elsewhere. Taking a standing billboard to zero starts its
    /// destruction; billboards already toppling are left alone.
    pub fn restore_health(&mut self, id: &str, health: i32) -> Option<BillboardView> {
        let before = self.combat.registry.get(id)?;
        if before.destroying {
            return None;
        }
        let view = self.combat.registry.set_health(id, health)?;
        if !before.health.is_dead() && view.health.is_dead() {
            self.begin_destruction(id);
            return self.combat.registry.get(id);
        }
        Some(view)
    }

    fn begin_destruction(&mut self, id: &str) -> bool {
        let combat = &mut self.combat;
        destruction::begin(
            &mut combat.registry,
            id,
            combat.globe.center,
            combat.destruction_secs,
            &mut combat.effects,
            &mut combat.events,
        )
    }

    /// Remove without emitting an event.
    pub fn forget_billboard(&mut self, id: &str) -> Option<Category> {
        self.combat.registry.remove(id)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.combat.events.drain().collect()
    }

    pub fn events(&self) -> &GameEvents {
        &self.combat.events
    }
}

impl BillboardRegistrar for WeaponManager {
    fn is_ready(&self) -> bool {
        self.initialized
    }

    fn register_billboard(&mut self, desc: BillboardDesc) -> Result<String, RegisterError> {
        if !self.initialized {
            return Err(RegisterError::NotReady);
        }
        let (id, category, text, color) = (desc.id.clone(), desc.category, desc.text.clone(), desc.color.clone());
        self.combat.registry.insert(desc)?;
        if let Some(view) = self.combat.registry.get(&id) {
            self.combat.events.push(GameEvent::BillboardPlaced {
                id: id.clone(),
                category,
                transform: view.transform,
                text,
                color,
                health: view.health.current,
            });
        }
        Ok(id)
    }

    fn bot_billboard_count(&self) -> usize {
        self.combat.registry.count(Category::Bot)
    }
}
