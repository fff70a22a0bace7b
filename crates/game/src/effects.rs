//! Short-lived visual effects: bullet impacts and billboard explosions.
//!
//! Each effect is a plain state object advanced by the tick loop; the renderer only hears
//! about spawn and expiry through events.

use engine_core::{Lifetime, Vec3};

use crate::events::{EffectKind, GameEvent, GameEvents};

pub struct Effect {
    pub id: u64,
    pub kind: EffectKind,
    pub position: Vec3,
    pub lifetime: Lifetime,
}

pub struct EffectsManager {
    pub effects: Vec<Effect>,
    impact_duration: f32,
    explosion_duration: f32,
    next_id: u64,
}

impl EffectsManager {
    pub fn new(impact_ms: u64, explosion_ms: u64) -> Self {
        Self {
            effects: Vec::new(),
            impact_duration: impact_ms as f32 / 1000.0,
            explosion_duration: explosion_ms as f32 / 1000.0,
            next_id: 0,
        }
    }

    pub fn spawn(&mut self, kind: EffectKind, position: Vec3, events: &mut GameEvents) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        let duration = match kind {
            EffectKind::Impact => self.impact_duration,
            EffectKind::Explosion => self.explosion_duration,
        };
        self.effects.push(Effect {
            id,
            kind,
            position,
            lifetime: Lifetime::new(duration),
        });
        events.push(GameEvent::EffectSpawned { id, kind, position });
        id
    }

    pub fn update(&mut self, dt: f32, events: &mut GameEvents) {
        for effect in &mut self.effects {
            if effect.lifetime.update(dt) {
                events.push(GameEvent::EffectExpired { id: effect.id });
            }
        }
        self.effects.retain(|e| !e.lifetime.is_finished());
    }

    pub fn active(&self, kind: EffectKind) -> usize {
        self.effects.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_expire_after_duration() {
        let mut fx = EffectsManager::new(300, 1000);
        let mut events = GameEvents::new();
        fx.spawn(EffectKind::Impact, Vec3::ZERO, &mut events);
        fx.spawn(EffectKind::Explosion, Vec3::ONE, &mut events);
        fx.update(0.5, &mut events);
        assert_eq!(fx.active(EffectKind::Impact), 0);
        assert_eq!(fx.active(EffectKind::Explosion), 1);
        fx.update(0.5, &mut events);
        assert!(fx.effects.is_empty());
        let expired = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EffectExpired { .. }))
            .count();
        assert_eq!(expired, 2);
    }
}
