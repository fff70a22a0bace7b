//! Events the simulation emits for the scene, UI and persistence collaborators.
//!
//! The core never calls into a renderer directly: it queues [`GameEvent`]s and the host
//! drains them once per frame, optionally through a [`Scene`] implementation.

use engine_core::{Transform, Vec3};

use crate::registry::Category;
use crate::weapons::WeaponKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Bullet impact spark.
    Impact,
    /// Billboard reaching zero health.
    Explosion,
}

/// Scene object identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectId {
    Billboard(String),
    Projectile(u64),
    Effect(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BillboardPlaced {
        id: String,
        category: Category,
        transform: Transform,
        text: String,
        color: String,
        health: i32,
    },
    BillboardDamaged {
        id: String,
        health: i32,
        transform: Transform,
    },
    /// Health hit zero; the toppling animation starts.
    BillboardDestroyed {
        id: String,
        category: Category,
    },
    /// Per-tick transform while a billboard topples.
    BillboardMoved {
        id: String,
        transform: Transform,
    },
    /// The billboard is gone from the registry.
    BillboardRemoved {
        id: String,
        category: Category,
    },
    ProjectileSpawned {
        id: u64,
        position: Vec3,
        velocity: Vec3,
    },
    ProjectileMoved {
        id: u64,
        position: Vec3,
    },
    ProjectileRemoved {
        id: u64,
    },
    EffectSpawned {
        id: u64,
        kind: EffectKind,
        position: Vec3,
    },
    EffectExpired {
        id: u64,
    },
    AmmoChanged {
        weapon: WeaponKind,
        ammo: u32,
    },
    WeaponSwitched {
        active: WeaponKind,
    },
}

/// What the rendering side needs to create an object.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub transform: Transform,
}

/// Rendering collaborator.
pub trait Scene {
    fn add_object(&mut self, object: SceneObject);
    fn update_object(&mut self, id: &ObjectId, transform: Transform);
    fn remove_object(&mut self, id: &ObjectId);
}

/// Outgoing event queue.
#[derive(Debug, Default)]
pub struct GameEvents {
    events: Vec<GameEvent>,
}

impl GameEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameEvent> {
        self.events.iter()
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        self.events.extend(events);
    }
}

/// Forward scene-relevant events to a renderer. Events without a scene counterpart are skipped.
pub fn dispatch_to_scene<'a>(events: impl IntoIterator<Item = &'a GameEvent>, scene: &mut dyn Scene) {
    for event in events {
        match event {
            GameEvent::BillboardPlaced { id, transform, .. } => scene.add_object(SceneObject {
                id: ObjectId::Billboard(id.clone()),
                transform: *transform,
            }),
            GameEvent::BillboardDamaged { id, transform, .. } | GameEvent::BillboardMoved { id, transform } => {
                scene.update_object(&ObjectId::Billboard(id.clone()), *transform)
            }
            GameEvent::BillboardRemoved { id, .. } => scene.remove_object(&ObjectId::Billboard(id.clone())),
            GameEvent::ProjectileSpawned { id, position, .. } => scene.add_object(SceneObject {
                id: ObjectId::Projectile(*id),
                transform: Transform::from_position(*position),
            }),
            GameEvent::ProjectileMoved { id, position } => {
                scene.update_object(&ObjectId::Projectile(*id), Transform::from_position(*position))
            }
            GameEvent::ProjectileRemoved { id } => scene.remove_object(&ObjectId::Projectile(*id)),
            GameEvent::EffectSpawned { id, position, .. } => scene.add_object(SceneObject {
                id: ObjectId::Effect(*id),
                transform: Transform::from_position(*position),
            }),
            GameEvent::EffectExpired { id } => scene.remove_object(&ObjectId::Effect(*id)),
            GameEvent::BillboardDestroyed { .. } | GameEvent::AmmoChanged { .. } | GameEvent::WeaponSwitched { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapScene {
        objects: HashMap<ObjectId, Transform>,
    }

    impl Scene for MapScene {
        fn add_object(&mut self, object: SceneObject) {
            self.objects.insert(object.id, object.transform);
        }
        fn update_object(&mut self, id: &ObjectId, transform: Transform) {
            if let Some(t) = self.objects.get_mut(id) {
                *t = transform;
            }
        }
        fn remove_object(&mut self, id: &ObjectId) {
            self.objects.remove(id);
        }
    }

    #[test]
    fn scene_follows_object_lifecycle() {
        let mut events = GameEvents::new();
        events.push(GameEvent::ProjectileSpawned {
            id: 1,
            position: Vec3::ZERO,
            velocity: Vec3::X,
        });
        events.push(GameEvent::EffectSpawned {
            id: 2,
            kind: EffectKind::Impact,
            position: Vec3::ONE,
        });
        events.push(GameEvent::ProjectileMoved {
            id: 1,
            position: Vec3::X,
        });
        events.push(GameEvent::AmmoChanged {
            weapon: WeaponKind::Projectile,
            ammo: 3,
        });

        let mut scene = MapScene::default();
        dispatch_to_scene(events.iter(), &mut scene);
        assert_eq!(scene.objects.len(), 2);
        assert_eq!(scene.objects[&ObjectId::Projectile(1)].position, Vec3::X);

        dispatch_to_scene(&[GameEvent::ProjectileRemoved { id: 1 }], &mut scene);
        assert!(!scene.objects.contains_key(&ObjectId::Projectile(1)));
        assert_eq!(events.drain().count(), 4);
        assert!(events.is_empty());
    }
}
