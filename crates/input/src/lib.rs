//! Action-level input state fed by whatever device layer the host wires up
//! (keyboard, touch joystick, scripted sessions).

use std::collections::HashSet;

/// Logical game actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    Jump,
    Fire,
    SwitchWeapon,
}

/// The four directional flags plus the jump flag, sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Held state; the movement model detects the rising edge itself.
    pub jump: bool,
}

impl MoveIntent {
    pub fn any_direction(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Actions currently held down.
    held: HashSet<Action>,
    /// Actions pressed this frame.
    pressed: HashSet<Action>,
    /// Actions released this frame.
    released: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    /// Register an action going down. Repeats while held do not re-trigger `is_pressed`.
    pub fn press(&mut self, action: Action) {
        if self.held.insert(action) {
            self.pressed.insert(action);
            log::trace!("{:?} pressed", action);
        }
    }

    pub fn release(&mut self, action: Action) {
        if self.held.remove(&action) {
            self.released.insert(action);
        }
    }

    /// Release everything (focus lost, joystick detached).
    pub fn release_all(&mut self) {
        let held: Vec<Action> = self.held.drain().collect();
        self.released.extend(held);
    }

    /// Check if an action is currently held.
    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action went down this frame.
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was released this frame.
    pub fn is_released(&self, action: Action) -> bool {
        self.released.contains(&action)
    }

    pub fn move_intent(&self) -> MoveIntent {
        MoveIntent {
            forward: self.is_held(Action::MoveForward),
            backward: self.is_held(Action::MoveBackward),
            left: self.is_held(Action::StrafeLeft),
            right: self.is_held(Action::StrafeRight),
            jump: self.is_held(Action::Jump),
        }
    }

    pub fn is_fire_held(&self) -> bool {
        self.is_held(Action::Fire)
    }

    pub fn is_fire_pressed(&self) -> bool {
        self.is_pressed(Action::Fire)
    }

    pub fn is_fire_released(&self) -> bool {
        self.is_released(Action::Fire)
    }

    pub fn is_switch_pressed(&self) -> bool {
        self.is_pressed(Action::SwitchWeapon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_edge_triggered() {
        let mut input = InputState::new();
        input.press(Action::Jump);
        assert!(input.is_pressed(Action::Jump));
        input.begin_frame();
        input.press(Action::Jump);
        assert!(!input.is_pressed(Action::Jump));
        assert!(input.is_held(Action::Jump));
        input.release(Action::Jump);
        assert!(input.is_released(Action::Jump));
        assert!(!input.is_held(Action::Jump));
    }

    #[test]
    fn move_intent_reflects_held_actions() {
        let mut input = InputState::new();
        input.press(Action::MoveForward);
        input.press(Action::StrafeLeft);
        let intent = input.move_intent();
        assert!(intent.forward && intent.left);
        assert!(!intent.backward && !intent.right && !intent.jump);
        assert!(intent.any_direction());
        input.release_all();
        assert!(!input.move_intent().any_direction());
        assert!(input.is_released(Action::MoveForward));
    }
}
