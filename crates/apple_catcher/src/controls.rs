use bevy::prelude::{GamepadButton, KeyCode, Reflect};
use leafwing_input_manager::prelude::*;

// Things the player can do with the basket
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum CatcherAction {
    MoveLeft,
    MoveRight,
}

pub fn create_input_map() -> InputMap<CatcherAction> {
    let mut input_map = InputMap::default();

    input_map.insert(CatcherAction::MoveLeft, KeyCode::ArrowLeft);
    input_map.insert(CatcherAction::MoveLeft, KeyCode::KeyA);
    input_map.insert(CatcherAction::MoveLeft, GamepadButton::DPadLeft);
    input_map.insert(CatcherAction::MoveRight, KeyCode::ArrowRight);
    input_map.insert(CatcherAction::MoveRight, KeyCode::KeyD);
    input_map.insert(CatcherAction::MoveRight, GamepadButton::DPadRight);

    input_map
}

/// Horizontal direction the basket is steered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steering {
    Left,
    Right,
    #[default]
    None,
}

impl Steering {
    /// Left wins when both directions are held.
    pub const fn from_held(left: bool, right: bool) -> Self {
        if left {
            Self::Left
        } else if right {
            Self::Right
        } else {
            Self::None
        }
    }

    pub fn from_action_state(action_state: &ActionState<CatcherAction>) -> Self {
        Self::from_held(
            action_state.pressed(&CatcherAction::MoveLeft),
            action_state.pressed(&CatcherAction::MoveRight),
        )
    }

    /// Steering toward a held pointer. Inside `dead_zone` of the basket center the basket stays.
    pub fn toward(pointer_x: f32, basket_x: f32, dead_zone: f32) -> Self {
        let offset = pointer_x - basket_x;
        Self::from_held(offset < -dead_zone, offset > dead_zone)
    }

    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
            Self::None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_has_priority() {
        assert_eq!(Steering::from_held(true, true), Steering::Left);
        assert_eq!(Steering::from_held(false, true), Steering::Right);
        assert_eq!(Steering::from_held(false, false), Steering::None);
    }

    #[test]
    fn pointer_steering_respects_the_dead_zone() {
        assert_eq!(Steering::toward(-100.0, 0.0, 5.0), Steering::Left);
        assert_eq!(Steering::toward(100.0, 0.0, 5.0), Steering::Right);
        assert_eq!(Steering::toward(3.0, 0.0, 5.0), Steering::None);
    }
}
