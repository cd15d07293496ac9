//! Enable/direction button gesture classifier.
//!
//! ## Transitions
//!
//! | State           | Condition                          | Next            | Gesture         |
//! |-----------------|------------------------------------|-----------------|-----------------|
//! | `Idle`          | pressed, debounce ready            | `Pressed`       | `Press`         |
//! | `Pressed`       | hold flag                          | `HeldConfirmed` | `HoldConfirmed` |
//! | `Pressed`       | released, debounce ready           | `Idle`          | `Tap`           |
//! | `HeldConfirmed` | released, debounce ready           | `Idle`          | `HoldReleased`  |
//!
//! Anything else leaves the state untouched.  The hold check runs before
//! the release check, so once the hold threshold is reached a release can
//! no longer count as a tap.  Whether `HoldReleased` flips the direction
//! is decided by the controller, which knows the motor state.

use crate::app::ports::Button;
use crate::control::debounce::DebounceGate;
use crate::tick::{TickFlag, TickSource, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnableButtonState {
    #[default]
    Idle,
    Pressed,
    HeldConfirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableGesture {
    /// Press accepted, hold timer started.
    Press,
    /// Hold threshold reached while pressed.
    HoldConfirmed,
    /// Released before the hold threshold: toggle motor enable.
    Tap,
    /// Released after the hold threshold: request a direction change.
    HoldReleased,
}

pub struct EnableButton {
    state: EnableButtonState,
    gate: DebounceGate,
}

impl Default for EnableButton {
    fn default() -> Self {
        Self::new()
    }
}

impl EnableButton {
    pub const fn new() -> Self {
        Self {
            state: EnableButtonState::Idle,
            gate: DebounceGate::new(Button::Enable),
        }
    }

    pub fn state(&self) -> EnableButtonState {
        self.state
    }

    /// Classify one sample of the button.  `pressed` is already
    /// polarity-corrected.
    pub fn update(&mut self, pressed: bool, ticks: &TickSource) -> Option<EnableGesture> {
        self.gate.observe(pressed, ticks);

        match self.state {
            EnableButtonState::Idle => {
                if pressed && self.gate.accept(ticks) {
                    ticks.arm(TimerId::HoldEnable);
                    self.state = EnableButtonState::Pressed;
                    return Some(EnableGesture::Press);
                }
                None
            }

            EnableButtonState::Pressed => {
                if ticks.take(TickFlag::HoldEnable) {
                    self.state = EnableButtonState::HeldConfirmed;
                    return Some(EnableGesture::HoldConfirmed);
                }
                if !pressed && self.gate.accept(ticks) {
                    ticks.disarm(TimerId::HoldEnable);
                    self.state = EnableButtonState::Idle;
                    return Some(EnableGesture::Tap);
                }
                None
            }

            EnableButtonState::HeldConfirmed => {
                if !pressed && self.gate.accept(ticks) {
                    self.state = EnableButtonState::Idle;
                    return Some(EnableGesture::HoldReleased);
                }
                None
            }
        }
    }
}
