//! Billboard wars on a small Mars: surface movement, weapons, destruction and bot population.

pub mod bots;
pub mod config;
pub mod destruction;
pub mod effects;
pub mod events;
pub mod hud;
pub mod persist;
pub mod player;
pub mod projectile;
pub mod registry;
pub mod session;
pub mod weapon_manager;
pub mod weapons;

pub use bots::{BillboardRegistrar, BotController, BotState};
pub use config::{BotConfig, ConfigError, GameConfig};
pub use events::{GameEvent, GameEvents, ObjectId, Scene, SceneObject};
pub use hud::HudSnapshot;
pub use persist::{Outbox, PersistRecord};
pub use player::{JumpPhase, SurfaceActor};
pub use registry::{client_tag, BillboardDesc, Category, PlacementRegistry, RegisterError};
pub use session::Game;
pub use weapon_manager::WeaponManager;
pub use weapons::{AmmoState, Weapon, WeaponKind};
