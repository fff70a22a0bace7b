//! Surface actor: walking and jumping on the outside of the globe.

use engine_core::{surface_orientation, Quat, SphericalCoord, Transform, Vec3};
use input::MoveIntent;
use physics::Globe;
use procgen::RockField;

use crate::config::PlayerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    Grounded,
    Jumping,
    Falling,
}

/// The player's body. Its distance from the globe center is always
/// `globe.radius + stand_height + jump_offset` after an update.
#[derive(Debug, Clone)]
pub struct SurfaceActor {
    pub position: Vec3,
    pub vertical_velocity: f32,
    /// Height above standing height, from jumping.
    pub jump_offset: f32,
    pub phase: JumpPhase,
    pub can_jump: bool,
    pub speed: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub stand_height: f32,
    pub collision_radius: f32,
    jump_was_held: bool,
}

impl SurfaceActor {
    /// Stand on the globe at longitude `theta`, colatitude `phi`.
    pub fn new(globe: &Globe, theta: f32, phi: f32, config: &PlayerConfig) -> Self {
        Self {
            position: globe.spherical_to_world(globe.radius + config.stand_height, theta, phi),
            vertical_velocity: 0.0,
            jump_offset: 0.0,
            phase: JumpPhase::Grounded,
            can_jump: true,
            speed: config.speed,
            jump_force: config.jump_force,
            gravity: config.gravity,
            stand_height: config.stand_height,
            collision_radius: config.collision_radius,
            jump_was_held: false,
        }
    }

    /// Advance one tick. Without a camera or globe this is a no-op and returns false.
    pub fn update(
        &mut self,
        dt: f32,
        intent: &MoveIntent,
        camera: Option<&Transform>,
        globe: Option<&Globe>,
        rocks: Option<&RockField>,
    ) -> bool {
        let (Some(camera), Some(globe)) = (camera, globe) else {
            log::debug!("Player update skipped: camera or globe missing");
            return false;
        };

        self.update_jump(dt, intent.jump);

        let up = globe.normal_at(self.position);
        let up = if up == Vec3::ZERO { Vec3::Y } else { up };

        let forward = camera.forward();
        let right = forward.cross(up).normalize_or_zero();
        let mut movement = Vec3::ZERO;
        if intent.forward {
            movement += forward;
        }
        if intent.backward {
            movement -= forward;
        }
        if intent.right {
            movement += right;
        }
        if intent.left {
            movement -= right;
        }

        let mut next = self.position;
        if movement.length_squared() > 0.0 {
            let step = movement.normalize() * self.speed * dt;
            let tangent = step - up * step.dot(up);
            let candidate = self.position + tangent;
            if self.blocked(candidate, globe, rocks) {
                log::trace!("Movement blocked by rock");
            } else {
                next = candidate;
            }
        }

        self.position = globe.project_to_shell(next, self.stand_height + self.jump_offset);
        true
    }

    fn update_jump(&mut self, dt: f32, jump_held: bool) {
        let rising_edge = jump_held && !self.jump_was_held;
        self.jump_was_held = jump_held;

        if rising_edge && self.phase == JumpPhase::Grounded && self.can_jump {
            self.vertical_velocity = self.jump_force;
            self.phase = JumpPhase::Jumping;
            self.can_jump = false;
        }

        if self.phase == JumpPhase::Grounded {
            return;
        }
        self.jump_offset += self.vertical_velocity * dt;
        self.vertical_velocity -= self.gravity * dt;
        if self.phase == JumpPhase::Jumping && self.vertical_velocity < 0.0 {
            self.phase = JumpPhase::Falling;
        }
        if self.jump_offset <= 0.0 {
            self.jump_offset = 0.0;
            self.vertical_velocity = 0.0;
            self.phase = JumpPhase::Grounded;
            self.can_jump = true;
        }
    }

    /// A move is rejected if it ends inside a rock the actor is not already overlapping.
    fn blocked(&self, candidate: Vec3, globe: &Globe, rocks: Option<&RockField>) -> bool {
        let Some(rocks) = rocks else {
            return false;
        };
        let feet = globe.project_to_surface(candidate);
        if rocks.check_collision(feet, self.collision_radius).is_none() {
            return false;
        }
        rocks
            .check_collision(globe.project_to_surface(self.position), self.collision_radius)
            .is_none()
    }

    pub fn shell_radius(&self, globe: &Globe) -> f32 {
        globe.radius + self.stand_height + self.jump_offset
    }

    pub fn spherical(&self, globe: &Globe) -> SphericalCoord {
        globe.world_to_spherical(self.position)
    }

    /// Eye camera at the actor's position. `yaw` turns about the local up axis and `pitch`
    /// tilts the view, positive upward.
    pub fn eye_transform(&self, globe: &Globe, yaw: f32, pitch: f32) -> Transform {
        let base = surface_orientation(self.position, globe.center, None);
        let rotation = (base * Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch)).normalize();
        Transform::from_position_rotation(self.position, rotation)
    }
}
