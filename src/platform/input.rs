//! Keyboard state
//!
//! Browsers deliver key presses as events; the simulation wants a level
//! snapshot per tick. `KeyState` keeps the held set and the pending one-shot
//! commands between frames.

use std::collections::HashSet;

use crate::sim::{Steer, Throttle, TickInput};

/// What a key does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Accelerate,
    Brake,
    Left,
    Right,
    Reset,
    Pause,
    Start,
    ToggleAutopilot,
}

impl Action {
    /// Map a `KeyboardEvent.key` value to an action
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Action::Accelerate),
            "ArrowDown" | "s" | "S" => Some(Action::Brake),
            "ArrowLeft" | "a" | "A" => Some(Action::Left),
            "ArrowRight" | "d" | "D" => Some(Action::Right),
            "r" | "R" => Some(Action::Reset),
            "Escape" => Some(Action::Pause),
            "Enter" => Some(Action::Start),
            "i" | "I" => Some(Action::ToggleAutopilot),
            _ => None,
        }
    }

    /// Actions that fire once per press instead of while held
    fn is_one_shot(self) -> bool {
        matches!(
            self,
            Action::Reset | Action::Pause | Action::Start | Action::ToggleAutopilot
        )
    }
}

/// Held keys plus one-shot commands waiting for the next tick
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<Action>,
    pending: TickInput,
    autopilot: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press. Returns false for keys the game ignores.
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(action) = Action::from_key(key) else {
            return false;
        };
        if action.is_one_shot() {
            // Auto-repeat keydown events must not re-fire
            if !self.held.insert(action) {
                return true;
            }
            match action {
                Action::Reset => self.pending.reset = true,
                Action::Pause => self.pending.pause = true,
                Action::Start => self.pending.start = true,
                Action::ToggleAutopilot => {
                    self.autopilot = !self.autopilot;
                    log::info!("Autopilot: {}", self.autopilot);
                }
                _ => {}
            }
        } else {
            self.held.insert(action);
        }
        true
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(action) = Action::from_key(key) {
            self.held.remove(&action);
        }
    }

    /// Window lost focus: nothing is held any more
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Queue a pause toggle from outside the keyboard (focus loss, menu button)
    pub fn request_pause(&mut self) {
        self.pending.pause = true;
    }

    /// Queue a session start from outside the keyboard
    pub fn request_start(&mut self) {
        self.pending.start = true;
    }

    #[inline]
    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Controls for the next frame; one-shot commands are handed over once
    pub fn take_input(&mut self) -> TickInput {
        let throttle = if self.is_held(Action::Accelerate) {
            Throttle::Accelerate
        } else if self.is_held(Action::Brake) {
            Throttle::Brake
        } else {
            Throttle::Coast
        };

        let steer = match (self.is_held(Action::Left), self.is_held(Action::Right)) {
            (true, false) => Steer::Left,
            (false, true) => Steer::Right,
            _ => Steer::Straight,
        };

        let one_shots = std::mem::take(&mut self.pending);
        TickInput {
            throttle,
            steer,
            reset: one_shots.reset,
            pause: one_shots.pause,
            start: one_shots.start,
            autopilot: self.autopilot,
        }
    }
}
