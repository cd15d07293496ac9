//! Outbound drive events.
//!
//! The [`DriveController`](super::service::DriveController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Gestures the
//! core refuses are reported as [`IgnoredGesture`]s rather than silently
//! dropped, so every no-op path is observable in tests.

use crate::control::direction::Direction;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveEvent {
    /// Controller started; outputs hold their power-up values.
    Started,

    /// Tap on the enable button turned the motors on (soft start begins).
    MotorEnabled,
    /// Tap on the enable button turned the motors off (soft stop begins).
    MotorDisabled,
    /// Soft start or soft stop reached its end value.
    RampSettled { duty: u8 },

    /// Enable button held past its threshold; release will flip direction.
    DirectionSelectArmed,
    /// PWM forced to zero and the primary direction lines flipped.
    DirectionFlipStarted { to: Direction, saved_duty: u8 },
    /// Dead-time elapsed, secondary lines flipped and PWM restored.
    DirectionFlipCompleted { direction: Direction, duty: u8 },

    /// Single tap on the speed button applied.
    TapIncrement { from: u8, to: u8, wrapped: bool },
    /// Speed button held past its threshold.
    ContinuousIncrementStarted,
    /// Speed button released after continuous increment.
    ContinuousIncrementEnded { duty: u8 },

    /// A qualified gesture that the current state does not allow.
    GestureIgnored(IgnoredGesture),
}

/// Reasons a qualified gesture resolves to a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredGesture {
    /// Direction hold released while the motors are off.
    DirectionWhileDisabled,
    /// Direction hold released while a flip is still in its dead-time.
    DirectionWhileFlipping,
    /// Speed tap released after the motors were switched off.
    SpeedTapWhileDisabled,
    /// Speed tap while the duty cycle is still zero.
    SpeedTapWhileStopped,
    /// Speed tap while a direction flip holds PWM at zero.
    SpeedTapWhileFlipping,
}
