//! One play session: clock, globe, player, weapons, rocks and bots wired together.
//!
//! Collaborators are passed in explicitly. The host feeds input and the camera every tick,
//! then drains scene events and persistence records.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use engine_core::{Time, Transform, Vec3};
use input::InputState;
use physics::Globe;
use procgen::RockField;

use crate::bots::{BillboardRegistrar, BotController};
use crate::config::{BotConfig, ConfigError, GameConfig};
use crate::events::{dispatch_to_scene, GameEvent, Scene};
use crate::hud::HudSnapshot;
use crate::persist::{Outbox, PersistRecord};
use crate::player::SurfaceActor;
use crate::registry::{client_tag, Category};
use crate::weapon_manager::WeaponManager;
use crate::weapons::WeaponKind;

pub struct Game {
    pub config: GameConfig,
    time: Time,
    globe: Globe,
    pub player: SurfaceActor,
    weapons: WeaponManager,
    rocks: RockField,
    bots: BotController,
    /// Every billboard the session has heard about, by id.
    known: HashMap<String, Category>,
    outbox: Outbox,
    scene_events: Vec<GameEvent>,
}

impl Game {
    /// Build a session. The player starts on the equator at longitude 0.
    pub fn new(config: GameConfig, bot_config: Result<BotConfig, ConfigError>, seed: u64) -> Self {
        let globe = Globe::new(Vec3::ZERO, config.globe_radius);
        let rocks = RockField::generate(globe.center, globe.radius, config.rocks.count, &config.rocks.to_options());
        let player = SurfaceActor::new(&globe, 0.0, FRAC_PI_2, &config.player);
        let weapons = WeaponManager::new(&config.weapons, globe.clone()).with_client_tag(client_tag(seed));
        let mut bots = BotController::new(globe.clone(), seed);
        bots.initialize(bot_config);
        log::info!("Session ready: globe r={}, {} rocks", globe.radius, rocks.len());

        Self {
            config,
            time: Time::new(),
            globe,
            player,
            weapons,
            rocks,
            bots,
            known: HashMap::new(),
            outbox: Outbox::new(),
            scene_events: Vec::new(),
        }
    }

    /// Weapon models finished loading; firing and bot registration may start.
    pub fn on_assets_loaded(&mut self) {
        self.weapons.initialize();
    }

    /// Advance the whole simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32, input: &InputState, camera: Option<&Transform>) {
        self.time.advance(dt);
        let now = self.time.elapsed_seconds();

        let known_bots = self.known.values().filter(|c| **c == Category::Bot).count();
        self.bots.tick(dt, Some(&mut self.weapons), Some(known_bots));

        self.player.update(
            dt,
            &input.move_intent(),
            camera,
            Some(&self.globe),
            Some(&self.rocks),
        );

        if input.is_switch_pressed() {
            self.weapons.switch_weapon();
        }
        if input.is_fire_pressed() {
            self.weapons.fire(now, camera);
            if self.weapons.active_kind() == WeaponKind::Projectile {
                self.weapons.start_continuous_fire();
            }
        }
        if input.is_fire_released() {
            self.weapons.stop_continuous_fire();
        }

        self.weapons.update(dt, now, camera);
        self.fan_out();
    }

    fn fan_out(&mut self) {
        for event in self.weapons.drain_events() {
            match &event {
                GameEvent::BillboardPlaced { id, category, .. } => {
                    self.known.insert(id.clone(), *category);
                }
                GameEvent::BillboardRemoved { id, category } => {
                    self.known.remove(id);
                    if *category == Category::Bot {
                        self.bots.on_billboard_removed(id);
                    }
                }
                _ => {}
            }
            self.outbox.record(&event);
            self.scene_events.push(event);
        }
    }

    /// Apply a record produced by another client. Nothing is echoed back to the outbox.
    pub fn apply_remote(&mut self, record: &PersistRecord) {
        match record {
            PersistRecord::BillboardPlaced { .. } => {
                let Some(desc) = record.to_desc() else {
                    return;
                };
                let (id, category, text, color) = (desc.id.clone(), desc.category, desc.text.clone(), desc.color.clone());
                if let Err(e) = self.weapons.restore_billboard(desc) {
                    log::debug!("Remote placement ignored: {}", e);
                    return;
                }
                self.known.insert(id.clone(), category);
                if let Some(view) = self.weapons.registry().get(&id) {
                    self.scene_events.push(GameEvent::BillboardPlaced {
                        id,
                        category,
                        transform: view.transform,
                        text,
                        color,
                        health: view.health.current,
                    });
                }
            }
            PersistRecord::BillboardDamaged { id, health } => {
                if let Some(view) = self.weapons.restore_health(id, *health) {
                    self.scene_events.push(GameEvent::BillboardDamaged {
                        id: id.clone(),
                        health: view.health.current,
                        transform: view.transform,
                    });
                }
            }
            PersistRecord::BillboardRemoved { id } => {
                if let Some(category) = self.weapons.forget_billboard(id) {
                    self.known.remove(id);
                    if category == Category::Bot {
                        self.bots.on_billboard_removed(id);
                    }
                    self.scene_events.push(GameEvent::BillboardRemoved {
                        id: id.clone(),
                        category,
                    });
                }
            }
            PersistRecord::AmmoChanged { weapon, ammo } => self.weapons.set_ammo(*weapon, *ammo),
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        let ammo = self.weapons.active_ammo();
        HudSnapshot {
            active_weapon: ammo.kind,
            ammo: ammo.ammo,
            max_ammo: ammo.max_ammo,
            placements: self.weapons.placement_count(),
            bot_billboards: self.weapons.bot_billboard_count(),
            pending_bots: self.bots.pending_count(),
        }
    }

    /// Camera for the player's eyes.
    pub fn player_camera(&self, yaw: f32, pitch: f32) -> Transform {
        self.player.eye_transform(&self.globe, yaw, pitch)
    }

    pub fn drain_scene_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.scene_events)
    }

    /// Send pending scene events to a renderer.
    pub fn dispatch_scene(&mut self, scene: &mut dyn Scene) {
        let events = self.drain_scene_events();
        dispatch_to_scene(&events, scene);
    }

    pub fn drain_records(&mut self) -> Vec<PersistRecord> {
        self.outbox.drain()
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Stop the bot timers. The session can still tick.
    pub fn shutdown(&mut self) {
        self.bots.stop();
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn globe(&self) -> &Globe {
        &self.globe
    }

    pub fn rocks(&self) -> &RockField {
        &self.rocks
    }

    pub fn weapons(&self) -> &WeaponManager {
        &self.weapons
    }

    pub fn weapons_mut(&mut self) -> &mut WeaponManager {
        &mut self.weapons
    }

    pub fn bots(&self) -> &BotController {
        &self.bots
    }
}
