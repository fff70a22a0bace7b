//! The single collection of live billboards.
//!
//! Placement, projectile collision, destruction and the bot controller all go through one
//! [`PlacementRegistry`] owned by the weapon manager; nobody else keeps a copy.

use std::collections::HashMap;

use engine_core::{Health, Quat, Transform, Vec3};
use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::destruction::Toppling;

/// Who placed a billboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Bot,
}

/// Identity and presentation of a billboard entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Billboard {
    pub id: String,
    pub category: Category,
    pub text: String,
    pub color: String,
    /// Full-health visual size; the rendered scale is this times the health fraction.
    pub size: f32,
}

/// Everything needed to create a billboard.
#[derive(Debug, Clone, PartialEq)]
pub struct BillboardDesc {
    pub id: String,
    pub category: Category,
    pub position: Vec3,
    pub rotation: Quat,
    pub text: String,
    pub color: String,
    pub size: f32,
    pub health: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("weapon subsystem is not ready")]
    NotReady,
    #[error("billboard {0} already exists")]
    DuplicateId(String),
}

/// Read-only snapshot of one billboard.
#[derive(Debug, Clone, PartialEq)]
pub struct BillboardView {
    pub id: String,
    pub category: Category,
    pub transform: Transform,
    pub health: Health,
    pub destroying: bool,
}

/// Result of a bullet landing on a billboard.
#[derive(Debug, Clone, PartialEq)]
pub struct HitOutcome {
    pub id: String,
    pub health: i32,
    pub transform: Transform,
    /// True only for the hit that took health to zero.
    pub destroyed: bool,
}

/// Id segment naming one client session. Sessions built from different seeds never hand out
/// the same billboard id.
pub fn client_tag(seed: u64) -> String {
    format!("{:x}", seed)
}

#[derive(Default)]
pub struct PlacementRegistry {
    world: World,
    index: HashMap<String, Entity>,
    client: String,
    next_serial: u64,
}

impl PlacementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose allocated ids carry `client`, e.g. `bb-<client>-1`.
    pub fn with_client_tag(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            ..Self::default()
        }
    }

    /// Fresh id with the given prefix, never colliding with a live billboard.
    pub fn allocate_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_serial += 1;
            let id = if self.client.is_empty() {
                format!("{}-{}", prefix, self.next_serial)
            } else {
                format!("{}-{}-{}", prefix, self.client, self.next_serial)
            };
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn insert(&mut self, desc: BillboardDesc) -> Result<Entity, RegisterError> {
        if self.index.contains_key(&desc.id) {
            return Err(RegisterError::DuplicateId(desc.id));
        }
        let health = Health::new(desc.health);
        let transform = Transform {
            position: desc.position,
            rotation: desc.rotation,
            scale: Vec3::splat(desc.size * health.fraction()),
        };
        let billboard = Billboard {
            id: desc.id.clone(),
            category: desc.category,
            text: desc.text,
            color: desc.color,
            size: desc.size,
        };
        let entity = self.world.spawn((transform, health, billboard));
        self.index.insert(desc.id, entity);
        Ok(entity)
    }

    /// Remove a billboard. Removing an unknown id is a no-op that returns `None`.
    pub fn remove(&mut self, id: &str) -> Option<Category> {
        let entity = self.index.remove(id)?;
        let category = self.world.get::<&Billboard>(entity).ok().map(|b| b.category);
        // index and world are kept in step, so a missing entity only means it is already gone
        let _ = self.world.despawn(entity);
        category
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn count(&self, category: Category) -> usize {
        self.world
            .query::<&Billboard>()
            .iter()
            .filter(|(_, b)| b.category == category)
            .count()
    }

    pub fn entity(&self, id: &str) -> Option<Entity> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<BillboardView> {
        let entity = self.entity(id)?;
        let mut query = self
            .world
            .query_one::<(&Billboard, &Transform, &Health, Option<&Toppling>)>(entity)
            .ok()?;
        let (billboard, transform, health, toppling) = query.get()?;
        Some(BillboardView {
            id: billboard.id.clone(),
            category: billboard.category,
            transform: *transform,
            health: *health,
            destroying: toppling.is_some(),
        })
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.index.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// First standing billboard within `radius` of `point`. Billboards already toppling
    /// are not targets.
    pub fn first_within(&self, point: Vec3, radius: f32) -> Option<Entity> {
        let radius_sq = radius * radius;
        self.world
            .query::<(&Transform, &Health, Option<&Toppling>)>()
            .iter()
            .find(|(_, (transform, health, toppling))| {
                toppling.is_none() && !health.is_dead() && transform.position.distance_squared(point) < radius_sq
            })
            .map(|(entity, _)| entity)
    }

    /// Apply one hit. Surviving billboards shrink with their health fraction; the killing
    /// hit leaves the scale for the destruction animation.
    pub fn apply_damage(&mut self, entity: Entity, amount: i32) -> Option<HitOutcome> {
        let (billboard, transform, health) = self
            .world
            .query_one_mut::<(&Billboard, &mut Transform, &mut Health)>(entity)
            .ok()?;
        let destroyed = health.take_damage(amount);
        if !health.is_dead() {
            transform.scale = Vec3::splat(billboard.size * health.fraction());
        }
        Some(HitOutcome {
            id: billboard.id.clone(),
            health: health.current,
            transform: *transform,
            destroyed,
        })
    }

    /// Overwrite health from an external source, clamped to `0..=max`. Scale follows while
    /// the billboard is alive.
    pub fn set_health(&mut self, id: &str, health: i32) -> Option<BillboardView> {
        let entity = self.entity(id)?;
        {
            let (billboard, transform, current) = self
                .world
                .query_one_mut::<(&Billboard, &mut Transform, &mut Health)>(entity)
                .ok()?;
            current.current = health.clamp(0, current.max);
            if !current.is_dead() {
                transform.scale = Vec3::splat(billboard.size * current.fraction());
            }
        }
        self.get(id)
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[cfg(test)]
pub(crate) fn test_desc(id: &str, category: Category, position: Vec3) -> BillboardDesc {
    BillboardDesc {
        id: id.to_string(),
        category,
        position,
        rotation: Quat::IDENTITY,
        text: "test".to_string(),
        color: "#ffffff".to_string(),
        size: 4.0,
        health: 100,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut reg = PlacementRegistry::new();
        reg.insert(test_desc("a", Category::Player, Vec3::X)).expect("first insert");
        let err = reg.insert(test_desc("a", Category::Bot, Vec3::Y)).unwrap_err();
        assert_eq!(err, RegisterError::DuplicateId("a".to_string()));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut reg = PlacementRegistry::new();
        reg.insert(test_desc("a", Category::Bot, Vec3::X)).expect("insert");
        assert_eq!(reg.remove("a"), Some(Category::Bot));
        assert_eq!(reg.remove("a"), None);
        assert_eq!(reg.remove("never"), None);
        assert!(reg.is_empty());
    }

    #[test]
    fn counts_by_category() {
        let mut reg = PlacementRegistry::new();
        reg.insert(test_desc("p", Category::Player, Vec3::X)).expect("insert");
        reg.insert(test_desc("b1", Category::Bot, Vec3::Y)).expect("insert");
        reg.insert(test_desc("b2", Category::Bot, Vec3::Z)).expect("insert");
        assert_eq!(reg.count(Category::Bot), 2);
        assert_eq!(reg.count(Category::Player), 1);
        assert_eq!(reg.ids(), vec!["b1", "b2", "p"]);
    }

    #[test]
    fn damage_rescales_until_death() {
        let mut reg = PlacementRegistry::new();
        let e = reg.insert(test_desc("a", Category::Player, Vec3::X)).expect("insert");
        let hit = reg.apply_damage(e, 40).expect("alive");
        assert_eq!(hit.health, 60);
        assert!(!hit.destroyed);
        assert!((hit.transform.scale.x - 4.0 * 0.6).abs() < 1e-5);

        let kill = reg.apply_damage(e, 100).expect("still registered");
        assert!(kill.destroyed);
        assert_eq!(kill.health, 0);
        assert!((kill.transform.scale.x - 4.0 * 0.6).abs() < 1e-5);

        let again = reg.apply_damage(e, 4).expect("still registered");
        assert!(!again.destroyed);
        assert_eq!(again.health, 0);
    }

    #[test]
    fn first_within_respects_radius_and_health() {
        let mut reg = PlacementRegistry::new();
        let e = reg.insert(test_desc("a", Category::Bot, Vec3::new(10.0, 0.0, 0.0))).expect("insert");
        assert_eq!(reg.first_within(Vec3::new(8.0, 0.0, 0.0), 3.0), Some(e));
        assert_eq!(reg.first_within(Vec3::new(6.0, 0.0, 0.0), 3.0), None);
        reg.apply_damage(e, 1000);
        assert_eq!(reg.first_within(Vec3::new(10.0, 0.0, 0.0), 3.0), None);
    }

    #[test]
    fn set_health_clamps_and_rescales() {
        let mut reg = PlacementRegistry::new();
        reg.insert(test_desc("a", Category::Bot, Vec3::X)).expect("insert");
        let view = reg.set_health("a", 50).expect("known");
        assert_eq!(view.health.current, 50);
        assert!((view.transform.scale.x - 2.0).abs() < 1e-5);
        assert_eq!(reg.set_health("a", 500).map(|v| v.health.current), Some(100));
        assert!(reg.set_health("missing", 10).is_none());
    }

    #[test]
    fn allocated_ids_are_unique() {
        let mut reg = PlacementRegistry::new();
        reg.insert(test_desc("bb-1", Category::Player, Vec3::X)).expect("insert");
        let id = reg.allocate_id("bb");
        assert_ne!(id, "bb-1");
        assert_ne!(reg.allocate_id("bb"), id);
    }

    #[test]
    fn client_tag_separates_sessions() {
        let mut a = PlacementRegistry::with_client_tag(client_tag(1));
        let mut b = PlacementRegistry::with_client_tag(client_tag(2));
        assert_eq!(a.allocate_id("bb"), "bb-1-1");
        assert_eq!(b.allocate_id("bb"), "bb-2-1");
    }
}
