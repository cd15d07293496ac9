//! Control core — gesture classifiers, duty policies, direction sequencing.
//!
//! Every component here is a plain state machine stepped from the
//! cooperative loop.  Timing comes exclusively from [`TickSource`] flags;
//! nothing in this module blocks or waits.
//!
//! [`TickSource`]: crate::tick::TickSource

pub mod debounce;
pub mod direction;
pub mod enable_button;
pub mod increment;
pub mod indicator;
pub mod ramp;
pub mod speed_button;

use crate::app::ports::{PwmChannel, PwmOutput};

/// Motor enable flag and the duty cycle shared by both motors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriveState {
    pub motor_enabled: bool,
    pub duty: u8,
}

/// Write `duty` to both motors.  This is the only path to the PWM port,
/// so the two channels never disagree for longer than one call.
pub fn write_duty_pair(pwm: &mut impl PwmOutput, duty: u8) {
    pwm.set_duty(PwmChannel::A, duty);
    pwm.set_duty(PwmChannel::B, duty);
}
