//! Speed button gesture classifier.
//!
//! Mirrors the enable button, with one extra gate: a press is only
//! accepted while the caller allows it (motors enabled).
//!
//! | State     | Condition                              | Next      | Gesture        |
//! |-----------|----------------------------------------|-----------|----------------|
//! | `Idle`    | pressed, press allowed, debounce ready | `Pressed` | `Press`        |
//! | `Pressed` | hold flag                              | `Held`    | `HoldStarted`  |
//! | `Pressed` | released, debounce ready               | `Idle`    | `Tap`          |
//! | `Held`    | released, debounce ready               | `Idle`    | `HoldReleased` |

use crate::app::ports::Button;
use crate::control::debounce::DebounceGate;
use crate::tick::{TickFlag, TickSource, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedButtonState {
    #[default]
    Idle,
    Pressed,
    Held,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedGesture {
    Press,
    /// Hold threshold reached: continuous increment starts.
    HoldStarted,
    /// Released before the hold threshold: one large step.
    Tap,
    /// Released after the hold threshold: continuous increment ends.
    HoldReleased,
}

pub struct SpeedButton {
    state: SpeedButtonState,
    gate: DebounceGate,
}

impl Default for SpeedButton {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeedButton {
    pub const fn new() -> Self {
        Self {
            state: SpeedButtonState::Idle,
            gate: DebounceGate::new(Button::Speed),
        }
    }

    pub fn state(&self) -> SpeedButtonState {
        self.state
    }

    /// Classify one sample.  `press_allowed` gates only the `Idle → Pressed`
    /// edge; a gesture already in progress always runs to its release.
    pub fn update(
        &mut self,
        pressed: bool,
        press_allowed: bool,
        ticks: &TickSource,
    ) -> Option<SpeedGesture> {
        self.gate.observe(pressed, ticks);

        match self.state {
            SpeedButtonState::Idle => {
                if pressed && press_allowed && self.gate.accept(ticks) {
                    ticks.arm(TimerId::HoldSpeed);
                    self.state = SpeedButtonState::Pressed;
                    return Some(SpeedGesture::Press);
                }
                None
            }

            SpeedButtonState::Pressed => {
                if ticks.take(TickFlag::HoldSpeed) {
                    self.state = SpeedButtonState::Held;
                    return Some(SpeedGesture::HoldStarted);
                }
                if !pressed && self.gate.accept(ticks) {
                    ticks.disarm(TimerId::HoldSpeed);
                    self.state = SpeedButtonState::Idle;
                    return Some(SpeedGesture::Tap);
                }
                None
            }

            SpeedButtonState::Held => {
                if !pressed && self.gate.accept(ticks) {
                    self.state = SpeedButtonState::Idle;
                    return Some(SpeedGesture::HoldReleased);
                }
                None
            }
        }
    }
}
