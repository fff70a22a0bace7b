//! Game and bot configuration. Loaded from RON files at startup.
//!
//! Every field carries a default so partial files are valid; a missing or invalid file
//! falls back to the defaults with a warning.

use procgen::{RockDistribution, RockOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

fn read_ron<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_ron<T: Serialize>(path: &Path, value: &T) {
    match ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default()) {
        Ok(s) => {
            if let Err(e) = std::fs::write(path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
        Err(e) => log::warn!("Could not serialize config for {:?}: {}", path, e),
    }
}

fn config_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// ── Game config ─────────────────────────────────────────────────────────

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Radius of the globe in world units.
    #[serde(default = "default_globe_radius")]
    pub globe_radius: f32,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub weapons: WeaponsConfig,
    #[serde(default)]
    pub rocks: RocksConfig,
}

fn default_globe_radius() -> f32 {
    50.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            globe_radius: default_globe_radius(),
            player: PlayerConfig::default(),
            weapons: WeaponsConfig::default(),
            rocks: RocksConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_dir().join("config.ron");
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        read_ron(path)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        write_ron(&config_dir().join("config.ron"), self);
    }
}

/// Movement tuning for the surface actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Tangent-plane speed, units per second.
    pub speed: f32,
    /// Initial vertical velocity of a jump.
    pub jump_force: f32,
    /// Downward acceleration applied to the jump offset.
    pub gravity: f32,
    /// Eye height above the surface.
    pub stand_height: f32,
    /// Footprint radius used for rock blocking.
    pub collision_radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            jump_force: 5.0,
            gravity: 9.8,
            stand_height: 1.8,
            collision_radius: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub max_ammo: u32,
    /// Seconds between placements.
    pub fire_rate: f32,
    /// Distance ahead of the camera used when the aim ray misses the globe.
    pub fallback_distance: f32,
    pub billboard_size: f32,
    pub health: i32,
    pub text: String,
    pub color: String,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_ammo: 10,
            fire_rate: 0.5,
            fallback_distance: 10.0,
            billboard_size: 4.0,
            health: 100,
            text: "Hello Mars".to_string(),
            color: "#ffcc33".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub max_ammo: u32,
    /// Seconds between shots.
    pub fire_rate: f32,
    /// Extra millisecond gate on top of `fire_rate`.
    pub min_shot_interval_ms: u64,
    pub bullet_speed: f32,
    /// Bullets that hit nothing are dropped after this age.
    pub max_age_ms: u64,
    /// Spawn offset from the camera in camera space (right, up, back).
    pub muzzle_offset: [f32; 3],
    /// A bullet this close to a billboard counts as a hit.
    pub hit_radius: f32,
    pub damage_per_hit: i32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            max_ammo: 100,
            fire_rate: 0.1,
            min_shot_interval_ms: 100,
            bullet_speed: 60.0,
            max_age_ms: 5000,
            muzzle_offset: [0.25, -0.2, 0.0],
            hit_radius: 3.0,
            damage_per_hit: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponsConfig {
    pub placement: PlacementConfig,
    pub projectile: ProjectileConfig,
    /// Length of the toppling animation once a billboard reaches zero health.
    pub destruction_ms: u64,
    pub impact_effect_ms: u64,
    pub explosion_effect_ms: u64,
}

impl Default for WeaponsConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            projectile: ProjectileConfig::default(),
            destruction_ms: 1000,
            impact_effect_ms: 300,
            explosion_effect_ms: 1000,
        }
    }
}

/// RON-facing mirror of [`RockDistribution`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DistributionConfig {
    Uniform,
    Clustered { clusters: u32, angular_radius: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RocksConfig {
    pub seed: u64,
    pub count: usize,
    pub distribution: DistributionConfig,
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for RocksConfig {
    fn default() -> Self {
        let options = RockOptions::default();
        Self {
            seed: options.seed,
            count: 60,
            distribution: DistributionConfig::Clustered {
                clusters: 6,
                angular_radius: 0.25,
            },
            min_size: options.min_size,
            max_size: options.max_size,
        }
    }
}

impl RocksConfig {
    pub fn to_options(&self) -> RockOptions {
        RockOptions {
            seed: self.seed,
            distribution: match self.distribution {
                DistributionConfig::Uniform => RockDistribution::Uniform,
                DistributionConfig::Clustered { clusters, angular_radius } => {
                    RockDistribution::Clustered { clusters, angular_radius }
                }
            },
            min_size: self.min_size,
            max_size: self.max_size,
        }
    }
}

// ── Bot config ──────────────────────────────────────────────────────────

/// Bot population settings. Loaded from `bots.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Delay between incremental spawns while topping up.
    #[serde(default = "default_spawn_interval_ms")]
    pub spawn_interval_ms: u64,
    /// Target number of live bot billboards.
    #[serde(default = "default_max_count")]
    pub max_count: usize,
    /// Period of the recurring maintenance check.
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,
    /// Debounce before re-checking after a bot billboard disappears.
    #[serde(default = "default_recheck_delay_ms")]
    pub recheck_delay_ms: u64,
    #[serde(default = "default_messages")]
    pub messages: Vec<String>,
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
    #[serde(default = "default_billboard_size")]
    pub billboard_size: f32,
    #[serde(default = "default_health")]
    pub health: i32,
}

fn default_spawn_interval_ms() -> u64 {
    3000
}
fn default_max_count() -> usize {
    20
}
fn default_check_interval_ms() -> u64 {
    5000
}
fn default_recheck_delay_ms() -> u64 {
    1000
}
fn default_messages() -> Vec<String> {
    ["Greetings from Olympus Mons", "Visit Valles Marineris", "Red is the new blue", "Dust storm sale!"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_colors() -> Vec<String> {
    ["#ff5533", "#33aaff", "#66dd44", "#ffcc00", "#cc66ff"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_billboard_size() -> f32 {
    4.0
}
fn default_health() -> i32 {
    100
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: default_spawn_interval_ms(),
            max_count: default_max_count(),
            check_interval_ms: default_check_interval_ms(),
            recheck_delay_ms: default_recheck_delay_ms(),
            messages: default_messages(),
            colors: default_colors(),
            billboard_size: default_billboard_size(),
            health: default_health(),
        }
    }
}

impl BotConfig {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        read_ron(path)
    }

    /// Load `bots.ron` from the current directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_dir().join("bots.ron"))
    }

    pub fn save(&self, path: &Path) {
        write_ron(path, self);
    }

    /// Replace unusable values with defaults. Applied once when the config is accepted.
    pub fn validated(mut self) -> Self {
        if self.spawn_interval_ms == 0 {
            self.spawn_interval_ms = default_spawn_interval_ms();
        }
        if self.check_interval_ms == 0 {
            self.check_interval_ms = default_check_interval_ms();
        }
        if self.messages.is_empty() {
            self.messages = default_messages();
        }
        if self.colors.is_empty() {
            self.colors = default_colors();
        }
        if self.billboard_size <= 0.0 {
            self.billboard_size = default_billboard_size();
        }
        if self.health <= 0 {
            self.health = default_health();
        }
        self
    }
}
