//! What the UI shows. The core only produces the snapshot; drawing it is the host's job.

use std::fmt;

use crate::weapons::WeaponKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudSnapshot {
    pub active_weapon: WeaponKind,
    pub ammo: u32,
    pub max_ammo: u32,
    /// Live billboards placed by the player.
    pub placements: usize,
    /// Live bot billboards in the registry.
    pub bot_billboards: usize,
    /// Bot billboards still waiting for the weapon subsystem.
    pub pending_bots: usize,
}

impl fmt::Display for HudSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weapon = match self.active_weapon {
            WeaponKind::Placement => "PLACER",
            WeaponKind::Projectile => "BLASTER",
        };
        write!(
            f,
            "{} {}/{} | placed {} | bots {} (+{} pending)",
            weapon, self.ammo, self.max_ammo, self.placements, self.bot_billboards, self.pending_bots
        )
    }
}
