//! Save-worthy state changes, handed to whatever persistence transport the host runs.

use engine_core::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::registry::{BillboardDesc, Category};
use crate::weapons::WeaponKind;

/// One state delta as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PersistRecord {
    AmmoChanged {
        weapon: WeaponKind,
        ammo: u32,
    },
    BillboardPlaced {
        id: String,
        category: Category,
        position: [f32; 3],
        rotation: [f32; 4],
        size: f32,
        text: String,
        color: String,
        health: i32,
    },
    BillboardDamaged {
        id: String,
        health: i32,
    },
    BillboardRemoved {
        id: String,
    },
}

impl PersistRecord {
    /// The record for an event, if the event changes persisted state.
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::AmmoChanged { weapon, ammo } => Some(PersistRecord::AmmoChanged {
                weapon: *weapon,
                ammo: *ammo,
            }),
            GameEvent::BillboardPlaced {
                id,
                category,
                transform,
                text,
                color,
                health,
            } => Some(PersistRecord::BillboardPlaced {
                id: id.clone(),
                category: *category,
                position: transform.position.to_array(),
                rotation: transform.rotation.to_array(),
                size: transform.scale.x,
                text: text.clone(),
                color: color.clone(),
                health: *health,
            }),
            GameEvent::BillboardDamaged { id, health, .. } => Some(PersistRecord::BillboardDamaged {
                id: id.clone(),
                health: *health,
            }),
            GameEvent::BillboardRemoved { id, .. } => Some(PersistRecord::BillboardRemoved { id: id.clone() }),
            _ => None,
        }
    }

    /// Billboard description for a placement record.
    pub fn to_desc(&self) -> Option<BillboardDesc> {
        match self {
            PersistRecord::BillboardPlaced {
                id,
                category,
                position,
                rotation,
                size,
                text,
                color,
                health,
            } => Some(BillboardDesc {
                id: id.clone(),
                category: *category,
                position: Vec3::from_array(*position),
                rotation: Quat::from_array(*rotation).normalize(),
                text: text.clone(),
                color: color.clone(),
                size: *size,
                health: *health,
            }),
            _ => None,
        }
    }
}

/// Records waiting for the transport.
#[derive(Debug, Default)]
pub struct Outbox {
    records: Vec<PersistRecord>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PersistRecord) {
        self.records.push(record);
    }

    /// Queue the record for `event`, if any. Returns true if something was queued.
    pub fn record(&mut self, event: &GameEvent) -> bool {
        match PersistRecord::from_event(event) {
            Some(record) => {
                self.records.push(record);
                true
            }
            None => false,
        }
    }

    pub fn drain(&mut self) -> Vec<PersistRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PersistRecord] {
        &self.records
    }

    /// Pending records as pretty RON.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(&self.records, ron::ser::PrettyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Transform;

    #[test]
    fn only_state_changes_are_recorded() {
        let mut outbox = Outbox::new();
        assert!(outbox.record(&GameEvent::AmmoChanged {
            weapon: WeaponKind::Placement,
            ammo: 9,
        }));
        assert!(!outbox.record(&GameEvent::ProjectileMoved {
            id: 1,
            position: Vec3::ZERO,
        }));
        assert!(outbox.record(&GameEvent::BillboardRemoved {
            id: "bb-1".to_string(),
            category: Category::Player,
        }));
        assert_eq!(outbox.len(), 2);
        assert_eq!(outbox.drain().len(), 2);
        assert!(outbox.is_empty());
    }

    #[test]
    fn placement_record_rebuilds_description() {
        let transform = Transform {
            position: Vec3::new(0.0, 50.0, 0.0),
            rotation: Quat::from_rotation_z(0.3),
            scale: Vec3::splat(4.0),
        };
        let record = PersistRecord::from_event(&GameEvent::BillboardPlaced {
            id: "bot-3".to_string(),
            category: Category::Bot,
            transform,
            text: "hi".to_string(),
            color: "#fff".to_string(),
            health: 100,
        })
        .expect("placement is persisted");

        let mut outbox = Outbox::new();
        outbox.push(record.clone());
        let text = outbox.to_ron().expect("serializable");
        let parsed: Vec<PersistRecord> = ron::from_str(&text).expect("parsable");
        assert_eq!(parsed, vec![record.clone()]);

        let desc = record.to_desc().expect("placement");
        assert_eq!(desc.id, "bot-3");
        assert_eq!(desc.size, 4.0);
        assert!(desc.rotation.angle_between(transform.rotation) < 1e-5);
    }
}
