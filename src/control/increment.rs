//! Speed increment policy.
//!
//! Two flavours driven by the speed button:
//! - **tap**: one coarse step.  Overshooting the maximum wraps the duty
//!   back to the ramp target rather than clamping.
//! - **continuous**: while held, a fine step per increment-cadence flag,
//!   clamped at the maximum.  The increment-mode blink runs for as long as
//!   the mode is active.

use crate::config::DriveConfig;
use crate::tick::{TickSource, TimerId};

/// Outcome of a tap increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapOutcome {
    pub duty: u8,
    /// The step overshot the maximum and the duty fell back to the ramp target.
    pub wrapped: bool,
}

#[derive(Debug)]
pub struct IncrementPolicy {
    duty_max: u8,
    wrap_to: u8,
    tap_step: u8,
    hold_step: u8,
    continuous: bool,
}

impl IncrementPolicy {
    pub fn new(config: &DriveConfig) -> Self {
        Self {
            duty_max: config.duty_max,
            wrap_to: config.ramp_target,
            tap_step: config.tap_increment_step,
            hold_step: config.hold_increment_step,
            continuous: false,
        }
    }

    pub fn tap(&self, duty: u8) -> TapOutcome {
        let next = u16::from(duty) + u16::from(self.tap_step);
        match u8::try_from(next) {
            Ok(next) if next <= self.duty_max => TapOutcome {
                duty: next,
                wrapped: false,
            },
            _ => TapOutcome {
                duty: self.wrap_to,
                wrapped: true,
            },
        }
    }

    /// One continuous-mode step.  Returns `None` once the maximum is reached.
    pub fn continuous_step(&self, duty: u8) -> Option<u8> {
        let next = duty.saturating_add(self.hold_step).min(self.duty_max);
        (next != duty).then_some(next)
    }

    pub fn begin_continuous(&mut self, ticks: &TickSource) {
        self.continuous = true;
        ticks.arm(TimerId::IncrementBlink);
    }

    pub fn end_continuous(&mut self, ticks: &TickSource) {
        self.continuous = false;
        ticks.disarm(TimerId::IncrementBlink);
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }
}
