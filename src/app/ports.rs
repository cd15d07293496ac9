//! Port traits — the boundary between the control core and the board.
//!
//! ```text
//!   HalBoard / mock ──▶ Port trait ──▶ DriveController (domain)
//! ```
//!
//! Driven adapters (button lines, direction lines, LEDs, PWM channels,
//! event sinks) implement these traits.  The
//! [`DriveController`](super::service::DriveController) consumes them via
//! generics, so the control core never touches registers directly.
//!
//! Port methods are infallible on purpose: adapters log and count their
//! own HAL faults and the control loop keeps its last valid state.

// ───────────────────────────────────────────────────────────────
// Line identities
// ───────────────────────────────────────────────────────────────

/// The two operator buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Motor enable (tap) / direction change (hold).
    Enable,
    /// Speed increment (tap or hold).
    Speed,
}

/// Every digital output the core drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OutputLine {
    /// Slow blink while the controller runs.
    PowerLed = 0,
    /// Lit while a direction change is being selected.
    SelectLed = 1,
    /// Motor enable state; blinks during continuous increment.
    RunningLed = 2,
    /// Motor A primary direction input.
    In1 = 3,
    /// Motor A secondary direction input.
    In2 = 4,
    /// Motor B primary direction input.
    In3 = 5,
    /// Motor B secondary direction input.
    In4 = 6,
}

impl OutputLine {
    pub const COUNT: usize = 7;
}

/// PWM channels, one per motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PwmChannel {
    A = 0,
    B = 1,
}

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw button line sampling.
pub trait DigitalInput {
    /// Electrical level of the button line (`true` = high).
    /// Polarity is interpreted by the core from configuration.
    fn read_level(&mut self, button: Button) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Output ports (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Indicator and H-bridge direction lines.
pub trait DigitalOutput {
    fn write_line(&mut self, line: OutputLine, high: bool);
}

/// PWM duty per channel.  The core only ever writes both channels
/// back-to-back with the same value.
pub trait PwmOutput {
    fn set_duty(&mut self, channel: PwmChannel, duty: u8);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`DriveEvent`](super::events::DriveEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::DriveEvent);
}
