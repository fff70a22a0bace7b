//! Billboard destruction: the one-second topple that follows a billboard reaching zero health.

use std::f32::consts::FRAC_PI_2;

use engine_core::{Lifetime, Quat, Transform, Vec3};

use crate::effects::EffectsManager;
use crate::events::{EffectKind, GameEvent, GameEvents};
use crate::registry::{Billboard, PlacementRegistry};

/// Toppling animation state attached to a billboard entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Toppling {
    pub lifetime: Lifetime,
    /// Rotation axis, perpendicular to the surface normal.
    pub axis: Vec3,
    /// Surface normal at the billboard's base.
    pub normal: Vec3,
    /// Transform when the billboard died.
    pub start: Transform,
    /// How far it sinks along the inverse normal by the end.
    pub sink_depth: f32,
}

impl Toppling {
    pub fn new(start: Transform, globe_center: Vec3, sink_depth: f32, duration: f32) -> Self {
        let normal = (start.position - globe_center).normalize_or_zero();
        let local_right = start.rotation * Vec3::X;
        let axis = (local_right - normal * local_right.dot(normal)).normalize_or_zero();
        let axis = if axis == Vec3::ZERO { normal.any_orthonormal_vector() } else { axis };
        Self {
            lifetime: Lifetime::new(duration),
            axis,
            normal,
            start,
            sink_depth,
        }
    }

    /// Transform at the current progress.
    pub fn sample(&self) -> Transform {
        let t = self.lifetime.progress();
        Transform {
            position: self.start.position - self.normal * (self.sink_depth * t),
            rotation: (Quat::from_axis_angle(self.axis, FRAC_PI_2 * t) * self.start.rotation).normalize(),
            scale: self.start.scale * (1.0 - t),
        }
    }
}

/// Start the destruction sequence for a billboard that just died: explosion, then topple.
/// Does nothing if the billboard is already toppling or gone.
pub fn begin(
    registry: &mut PlacementRegistry,
    id: &str,
    globe_center: Vec3,
    duration: f32,
    effects: &mut EffectsManager,
    events: &mut GameEvents,
) -> bool {
    let Some(entity) = registry.entity(id) else {
        return false;
    };
    if registry.world().get::<&Toppling>(entity).is_ok() {
        return false;
    }
    let Ok(mut query) = registry.world().query_one::<(&Transform, &Billboard)>(entity) else {
        return false;
    };
    let Some((transform, billboard)) = query.get() else {
        return false;
    };
    let (start, category, size) = (*transform, billboard.category, billboard.size);
    drop(query);

    effects.spawn(EffectKind::Explosion, start.position, events);
    let toppling = Toppling::new(start, globe_center, size * 0.5, duration);
    if registry.world_mut().insert_one(entity, toppling).is_err() {
        return false;
    }
    events.push(GameEvent::BillboardDestroyed {
        id: id.to_string(),
        category,
    });
    log::info!("Billboard {} destroyed", id);
    true
}

/// Advance every toppling billboard and remove the ones that finished.
pub fn update(registry: &mut PlacementRegistry, dt: f32, events: &mut GameEvents) {
    let mut finished = Vec::new();
    for (_, (toppling, transform, billboard)) in registry
        .world_mut()
        .query_mut::<(&mut Toppling, &mut Transform, &Billboard)>()
    {
        let done = toppling.lifetime.update(dt);
        *transform = toppling.sample();
        events.push(GameEvent::BillboardMoved {
            id: billboard.id.clone(),
            transform: *transform,
        });
        if done {
            finished.push(billboard.id.clone());
        }
    }

    for id in finished {
        if let Some(category) = registry.remove(&id) {
            events.push(GameEvent::BillboardRemoved { id, category });
        }
    }
}
