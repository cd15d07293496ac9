//! Soft-start / soft-stop ramp.
//!
//! Stepped once per ramp-cadence flag.  Enabled motors climb towards the
//! ramp target in `up_step` increments, disabled motors fall towards zero
//! in `down_step` decrements.  The two rates are deliberately asymmetric:
//! fast start, slow coast-down.
//!
//! A duty already above the target (after speed increments) is left
//! alone while enabled; the ramp never pulls a running motor down.

use crate::config::DriveConfig;
use crate::control::DriveState;

/// Result of a ramp step that changed the duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampStep {
    pub duty: u8,
    /// The ramp reached its end value (target or zero) on this step.
    pub settled: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RampPolicy {
    target: u8,
    up_step: u8,
    down_step: u8,
}

impl RampPolicy {
    pub fn new(config: &DriveConfig) -> Self {
        Self {
            target: config.ramp_target,
            up_step: config.ramp_up_step,
            down_step: config.ramp_down_step,
        }
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    /// Apply one ramp step.  Returns `None` when the duty is already at its
    /// end value.
    pub fn step(&self, state: &mut DriveState) -> Option<RampStep> {
        if state.motor_enabled {
            if state.duty >= self.target {
                return None;
            }
            state.duty = state.duty.saturating_add(self.up_step).min(self.target);
            Some(RampStep {
                duty: state.duty,
                settled: state.duty == self.target,
            })
        } else {
            if state.duty == 0 {
                return None;
            }
            state.duty = state.duty.saturating_sub(self.down_step);
            Some(RampStep {
                duty: state.duty,
                settled: state.duty == 0,
            })
        }
    }
}
