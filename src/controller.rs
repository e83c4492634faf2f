//! Input and event mapping
//!
//! The controller sits between the window and the model: key and mouse
//! actions accumulate here and are handed to the simulation once per tick
//! as a `TickInput`. In the other direction, model events are mapped to
//! sound effects.

use winit::keyboard::KeyCode;

use crate::audio::SoundEffect;
use crate::sim::{GameEvent, TickInput};

/// A user command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    StartStop,
    Pause,
    ToggleSound,
    LeftPressed,
    LeftReleased,
    RightPressed,
    RightReleased,
    /// Pointer position in playfield pixels
    MouseMoved(f32),
    Fire,
}

/// Keyboard bindings: Space start/stop, P pause, S sound, arrows move, Up fires
pub fn action_for_key(key: KeyCode, pressed: bool) -> Option<Action> {
    match (key, pressed) {
        (KeyCode::Space, true) => Some(Action::StartStop),
        (KeyCode::KeyP, true) => Some(Action::Pause),
        (KeyCode::KeyS, true) => Some(Action::ToggleSound),
        (KeyCode::ArrowUp, true) => Some(Action::Fire),
        (KeyCode::ArrowLeft, true) => Some(Action::LeftPressed),
        (KeyCode::ArrowLeft, false) => Some(Action::LeftReleased),
        (KeyCode::ArrowRight, true) => Some(Action::RightPressed),
        (KeyCode::ArrowRight, false) => Some(Action::RightReleased),
        _ => None,
    }
}

/// Sound played for a model event, if any
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::HitWall => Some(SoundEffect::WallHit),
        GameEvent::HitPaddle => Some(SoundEffect::PaddleHit),
        GameEvent::HitBrick { destroyed: true, .. } => Some(SoundEffect::BrickBreak),
        GameEvent::HitBrick { destroyed: false, .. } => Some(SoundEffect::BrickHit),
        GameEvent::LastBallLost { .. } => Some(SoundEffect::BallLost),
        GameEvent::PowerPillCaught { .. } => Some(SoundEffect::PillCatch),
        GameEvent::LaserFired => Some(SoundEffect::LaserShot),
        GameEvent::LevelComplete { .. } | GameEvent::LevelSkipped => Some(SoundEffect::LevelClear),
        GameEvent::NewBall => Some(SoundEffect::Launch),
        GameEvent::GameOver => Some(SoundEffect::GameOver),
        GameEvent::GameWon => Some(SoundEffect::GameWon),
        _ => None,
    }
}

/// Collects input between ticks
#[derive(Debug, Clone)]
pub struct Controller {
    left_held: bool,
    right_held: bool,
    start_stop: bool,
    pause: bool,
    fire: bool,
    mouse_x: Option<f32>,
    mouse_control: bool,
    sound_enabled: bool,
}

impl Controller {
    pub fn new(mouse_control: bool, sound_enabled: bool) -> Self {
        Self {
            left_held: false,
            right_held: false,
            start_stop: false,
            pause: false,
            fire: false,
            mouse_x: None,
            mouse_control,
            sound_enabled,
        }
    }

    pub fn handle(&mut self, action: Action) {
        match action {
            Action::StartStop => self.start_stop = true,
            Action::Pause => self.pause = true,
            Action::ToggleSound => self.sound_enabled = !self.sound_enabled,
            Action::LeftPressed => self.left_held = true,
            Action::LeftReleased => self.left_held = false,
            Action::RightPressed => self.right_held = true,
            Action::RightReleased => self.right_held = false,
            Action::MouseMoved(x) => {
                if self.mouse_control {
                    self.mouse_x = Some(x);
                }
            }
            Action::Fire => self.fire = true,
        }
    }

    /// Input for the next tick; one-shot commands are consumed
    pub fn take_input(&mut self) -> TickInput {
        TickInput {
            start_stop: std::mem::take(&mut self.start_stop),
            pause: std::mem::take(&mut self.pause),
            fire: std::mem::take(&mut self.fire),
            paddle_left: self.left_held,
            paddle_right: self.right_held,
            mouse_x: self.mouse_x.take(),
        }
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn mouse_control(&self) -> bool {
        self.mouse_control
    }

    /// Drop held keys, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.left_held = false;
        self.right_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BrickType, PowerType};

    #[test]
    fn test_one_shot_commands_consumed() {
        let mut controller = Controller::new(true, true);
        controller.handle(Action::StartStop);
        controller.handle(Action::Fire);

        let input = controller.take_input();
        assert!(input.start_stop && input.fire && !input.pause);

        let input = controller.take_input();
        assert!(!input.start_stop && !input.fire);
    }

    #[test]
    fn test_held_keys_persist_until_release() {
        let mut controller = Controller::new(true, true);
        controller.handle(Action::LeftPressed);
        assert!(controller.take_input().paddle_left);
        assert!(controller.take_input().paddle_left);
        controller.handle(Action::LeftReleased);
        assert!(!controller.take_input().paddle_left);

        controller.handle(Action::RightPressed);
        controller.release_all();
        assert!(!controller.take_input().paddle_right);
    }

    #[test]
    fn test_mouse_only_when_enabled() {
        let mut controller = Controller::new(true, true);
        controller.handle(Action::MouseMoved(120.0));
        assert_eq!(controller.take_input().mouse_x, Some(120.0));
        assert_eq!(controller.take_input().mouse_x, None);

        let mut controller = Controller::new(false, true);
        controller.handle(Action::MouseMoved(120.0));
        assert_eq!(controller.take_input().mouse_x, None);
    }

    #[test]
    fn test_sound_toggle() {
        let mut controller = Controller::new(true, true);
        controller.handle(Action::ToggleSound);
        assert!(!controller.sound_enabled());
        controller.handle(Action::ToggleSound);
        assert!(controller.sound_enabled());
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(action_for_key(KeyCode::Space, true), Some(Action::StartStop));
        assert_eq!(action_for_key(KeyCode::Space, false), None);
        assert_eq!(action_for_key(KeyCode::KeyP, true), Some(Action::Pause));
        assert_eq!(action_for_key(KeyCode::KeyS, true), Some(Action::ToggleSound));
        assert_eq!(
            action_for_key(KeyCode::ArrowLeft, false),
            Some(Action::LeftReleased)
        );
        assert_eq!(action_for_key(KeyCode::KeyQ, true), None);
    }

    #[test]
    fn test_event_sounds() {
        assert_eq!(sound_for(&GameEvent::HitWall), Some(SoundEffect::WallHit));
        assert_eq!(
            sound_for(&GameEvent::HitBrick {
                row: 0,
                col: 0,
                kind: BrickType::Silver,
                destroyed: false,
            }),
            Some(SoundEffect::BrickHit)
        );
        assert_eq!(
            sound_for(&GameEvent::PowerPillCaught {
                power: PowerType::Laser
            }),
            Some(SoundEffect::PillCatch)
        );
        assert_eq!(sound_for(&GameEvent::GameStart), None);
        // Only losing the final ball in play is audible
        assert_eq!(sound_for(&GameEvent::BallLost), None);
        assert_eq!(
            sound_for(&GameEvent::LastBallLost { lives_left: 2 }),
            Some(SoundEffect::BallLost)
        );
    }
}
