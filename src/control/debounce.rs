//! Per-button debounce gate.
//!
//! The tick source runs one debounce window per button.  A change of the
//! raw level restarts that window, so the ready flag only rises once the
//! line has been stable for a whole window.  Accepting a transition
//! consumes the flag, which also enforces a minimum spacing between two
//! accepted transitions on the same button.

use crate::app::ports::Button;
use crate::tick::{TickFlag, TickSource, TimerId};

pub struct DebounceGate {
    timer: TimerId,
    ready: TickFlag,
    /// Last observed pressed/released level.
    level: bool,
}

impl DebounceGate {
    pub const fn new(button: Button) -> Self {
        let (timer, ready) = match button {
            Button::Enable => (TimerId::DebounceEnable, TickFlag::DebounceEnable),
            Button::Speed => (TimerId::DebounceSpeed, TickFlag::DebounceSpeed),
        };
        Self {
            timer,
            ready,
            level: false,
        }
    }

    /// Feed the current sample.  A level change restarts the window.
    pub fn observe(&mut self, pressed: bool, ticks: &TickSource) {
        if pressed != self.level {
            self.level = pressed;
            ticks.restart(self.timer);
        }
    }

    /// Whether a transition would be accepted right now.
    pub fn is_ready(&self, ticks: &TickSource) -> bool {
        ticks.is_set(self.ready)
    }

    /// Try to accept a transition; consumes the ready flag on success.
    pub fn accept(&self, ticks: &TickSource) -> bool {
        ticks.take(self.ready)
    }

    pub fn level(&self) -> bool {
        self.level
    }
}
