//! Bot population controller.
//!
//! Keeps the number of bot-placed billboards topped up to `max_count`. Spawns are incremental
//! (one now, then one per spawn interval) and billboards that cannot be registered yet wait in
//! a pending queue until the weapon subsystem is ready.

use std::collections::HashMap;

use engine_core::{random_sphere_point_with, surface_orientation, Countdown, IntervalTimer};
use physics::Globe;
use rand::prelude::*;

use crate::config::{BotConfig, ConfigError};
use crate::registry::{client_tag, BillboardDesc, Category, RegisterError};

/// Fresh ids tried for one billboard before it is given up on.
const MAX_ID_ATTEMPTS: usize = 4;

/// Where bot billboards get registered. Implemented by the weapon manager.
pub trait BillboardRegistrar {
    /// False until the subsystem can accept billboards.
    fn is_ready(&self) -> bool;
    fn register_billboard(&mut self, desc: BillboardDesc) -> Result<String, RegisterError>;
    /// Live bot billboards as the subsystem sees them.
    fn bot_billboard_count(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    Uninitialized,
    Maintaining,
    Stopped,
}

pub struct BotController {
    globe: Globe,
    config: BotConfig,
    state: BotState,
    rng: StdRng,
    /// Bot billboards this controller believes are alive, pending ones included.
    tracked: HashMap<String, BillboardDesc>,
    /// Created but not yet accepted by the registrar. Never dropped.
    pending: Vec<BillboardDesc>,
    check_timer: IntervalTimer,
    spawn_timer: IntervalTimer,
    spawns_remaining: usize,
    /// Debounced maintenance after a bot billboard disappears.
    recheck: Countdown,
    /// Per-session part of every id, so ids from different clients never meet.
    client: String,
    next_serial: u64,
}

impl BotController {
    pub fn new(globe: Globe, seed: u64) -> Self {
        let config = BotConfig::default();
        Self {
            globe,
            check_timer: IntervalTimer::from_millis(config.check_interval_ms),
            spawn_timer: IntervalTimer::from_millis(config.spawn_interval_ms),
            config,
            state: BotState::Uninitialized,
            rng: StdRng::seed_from_u64(seed),
            tracked: HashMap::new(),
            pending: Vec::new(),
            spawns_remaining: 0,
            recheck: Countdown::new(),
            client: client_tag(seed),
            next_serial: 0,
        }
    }

    /// Accept the loaded config (or fall back to defaults) and start maintaining. The first
    /// maintenance check runs on the next tick.
    pub fn initialize(&mut self, config: Result<BotConfig, ConfigError>) {
        if self.state != BotState::Uninitialized {
            log::debug!("Bot controller already initialized");
            return;
        }
        let config = match config {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Bot config unavailable ({}), using defaults", e);
                BotConfig::default()
            }
        }
        .validated();

        self.check_timer = IntervalTimer::from_millis(config.check_interval_ms);
        self.spawn_timer = IntervalTimer::from_millis(config.spawn_interval_ms);
        self.check_timer.start();
        self.recheck.restart(0.0);
        log::info!(
            "Bot controller started: max {} billboards, spawn every {} ms, check every {} ms",
            config.max_count,
            config.spawn_interval_ms,
            config.check_interval_ms
        );
        self.config = config;
        self.state = BotState::Maintaining;
    }

    /// Advance timers. `registrar` is `None` while the weapon subsystem does not exist yet;
    /// `game_count` is the bot billboard count from the game's own records, if it keeps any.
    pub fn tick(&mut self, dt: f32, mut registrar: Option<&mut dyn BillboardRegistrar>, game_count: Option<usize>) {
        if self.state != BotState::Maintaining {
            return;
        }

        self.process_pending(registrar.as_deref_mut());

        if self.check_timer.tick(dt) > 0 {
            self.maintain_billboards(registrar.as_deref_mut(), game_count);
        }
        if self.recheck.tick(dt) {
            self.maintain_billboards(registrar.as_deref_mut(), game_count);
        }

        for _ in 0..self.spawn_timer.tick(dt) {
            if self.spawns_remaining == 0 || self.current_count(registrar.as_deref(), game_count) >= self.config.max_count
            {
                self.stop_spawning();
                break;
            }
            self.spawn_bot_billboard(registrar.as_deref_mut());
            self.spawns_remaining -= 1;
            if self.spawns_remaining == 0 {
                self.stop_spawning();
            }
        }
    }

    /// Reconcile counts and start topping up if below target. A running spawn timer is left
    /// alone.
    pub fn maintain_billboards(
        &mut self,
        registrar: Option<&mut (dyn BillboardRegistrar + '_)>,
        game_count: Option<usize>,
    ) {
        if self.state != BotState::Maintaining {
            return;
        }
        let current = self.current_count(registrar.as_deref(), game_count);
        if current >= self.config.max_count {
            if self.spawn_timer.is_running() {
                self.stop_spawning();
            }
            return;
        }
        if self.spawn_timer.is_running() {
            return;
        }

        let needed = self.config.max_count - current;
        log::debug!("Bot billboards {}/{}, spawning {}", current, self.config.max_count, needed);
        self.spawn_bot_billboard(registrar);
        self.spawns_remaining = needed - 1;
        if self.spawns_remaining > 0 {
            self.spawn_timer.start();
        }
    }

    /// Tracked count against the independently observed counts. The larger one wins so a
    /// lagging source never causes over-spawning.
    fn current_count(&self, registrar: Option<&(dyn BillboardRegistrar + '_)>, game_count: Option<usize>) -> usize {
        let tracked = self.tracked.len();
        let observed = registrar
            .map(|r| r.bot_billboard_count())
            .into_iter()
            .chain(game_count)
            .max();
        match observed {
            Some(actual) if actual != tracked => {
                log::debug!("Bot count drift: tracked {}, observed {}", tracked, actual);
                tracked.max(actual)
            }
            _ => tracked,
        }
    }

    fn fresh_id(&mut self) -> String {
        self.next_serial += 1;
        format!("bot-{}-{}", self.client, self.next_serial)
    }

    /// Create one bot billboard at a random surface point and register it, or queue it.
    /// Returns the id it is tracked under, or `None` if no free id was found.
    pub fn spawn_bot_billboard(&mut self, registrar: Option<&mut (dyn BillboardRegistrar + '_)>) -> Option<String> {
        let id = self.fresh_id();
        let position = self.globe.center + random_sphere_point_with(&mut self.rng, self.globe.radius);
        let text = self.config.messages.choose(&mut self.rng).cloned().unwrap_or_default();
        let color = self.config.colors.choose(&mut self.rng).cloned().unwrap_or_default();

        let desc = BillboardDesc {
            id: id.clone(),
            category: Category::Bot,
            position,
            rotation: surface_orientation(position, self.globe.center, None),
            text,
            color,
            size: self.config.billboard_size,
            health: self.config.health,
        };
        self.tracked.insert(id.clone(), desc.clone());

        match registrar {
            Some(r) if r.is_ready() => self.register(r, desc),
            _ => {
                log::debug!("Weapons not ready, queueing {}", id);
                self.pending.push(desc);
                Some(id)
            }
        }
    }

    /// Register a tracked billboard. An id already held by another billboard is replaced by a
    /// fresh one and retried; `NotReady` puts it back in the queue.
    fn register(&mut self, registrar: &mut (dyn BillboardRegistrar + '_), mut desc: BillboardDesc) -> Option<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            match registrar.register_billboard(desc.clone()) {
                Ok(id) => {
                    log::debug!("Bot billboard {} placed", id);
                    return Some(id);
                }
                Err(RegisterError::NotReady) => {
                    let id = desc.id.clone();
                    self.pending.push(desc);
                    return Some(id);
                }
                Err(RegisterError::DuplicateId(taken)) => {
                    self.tracked.remove(&taken);
                    desc.id = self.fresh_id();
                    log::debug!("Bot billboard id {} already taken, retrying as {}", taken, desc.id);
                    self.tracked.insert(desc.id.clone(), desc.clone());
                }
            }
        }
        self.tracked.remove(&desc.id);
        log::warn!("Dropped a bot billboard after {} id collisions", MAX_ID_ATTEMPTS);
        None
    }

    /// Retry every queued billboard. Failures stay queued.
    pub fn process_pending(&mut self, registrar: Option<&mut (dyn BillboardRegistrar + '_)>) {
        if self.pending.is_empty() {
            return;
        }
        let Some(registrar) = registrar else {
            return;
        };
        if !registrar.is_ready() {
            return;
        }

        let queued = std::mem::take(&mut self.pending);
        let total = queued.len();
        for desc in queued {
            if !self.tracked.contains_key(&desc.id) {
                continue;
            }
            self.register(registrar, desc);
        }
        log::debug!("Flushed {} pending bot billboards, {} left", total - self.pending.len(), self.pending.len());
    }

    /// A billboard left the world. Bot billboards are forgotten and replaced after the
    /// re-check delay. Returns true if the id was a bot billboard.
    pub fn on_billboard_removed(&mut self, id: &str) -> bool {
        let was_tracked = self.tracked.remove(id).is_some();
        self.pending.retain(|d| d.id != id);
        if was_tracked && self.state == BotState::Maintaining {
            self.recheck.restart(self.config.recheck_delay_ms as f32 / 1000.0);
        }
        was_tracked
    }

    /// Stop all timers. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.state == BotState::Stopped {
            return;
        }
        self.check_timer.stop();
        self.stop_spawning();
        self.recheck.cancel();
        self.state = BotState::Stopped;
        log::info!("Bot controller stopped");
    }

    fn stop_spawning(&mut self) {
        self.spawn_timer.stop();
        self.spawns_remaining = 0;
    }

    pub fn state(&self) -> BotState {
        self.state
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_tracked(&self, id: &str) -> bool {
        self.tracked.contains_key(id)
    }

    pub fn is_spawning(&self) -> bool {
        self.spawn_timer.is_running()
    }
}
