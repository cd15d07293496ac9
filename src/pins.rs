//! GPIO / peripheral pin assignments for the dual H-bridge drive board.
//!
//! Single source of truth — `main` builds every pin driver from this
//! module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Operator buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Button 1: tap toggles motor enable, hold selects a direction change.
pub const ENABLE_BUTTON_GPIO: i32 = 4;
/// Button 2: tap adds a coarse speed step, hold runs continuous increment.
pub const SPEED_BUTTON_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Indicator LEDs
// ---------------------------------------------------------------------------

/// Power LED, slow blink while the controller runs.
pub const POWER_LED_GPIO: i32 = 6;
/// Lit while a direction change is being selected.
pub const SELECT_LED_GPIO: i32 = 7;
/// Motor enable state; fast blink during continuous increment.
pub const RUNNING_LED_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// H-bridge direction inputs (L298N or equivalent)
// ---------------------------------------------------------------------------

pub const IN1_GPIO: i32 = 16;
pub const IN2_GPIO: i32 = 17;
pub const IN3_GPIO: i32 = 18;
pub const IN4_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// PWM (enable inputs ENA / ENB)
// ---------------------------------------------------------------------------

pub const PWM_A_GPIO: i32 = 1;
pub const PWM_B_GPIO: i32 = 2;

/// Output lines in [`OutputLine`](crate::app::ports::OutputLine) order.
pub const OUTPUT_LINE_GPIOS: [i32; 7] = [
    POWER_LED_GPIO,
    SELECT_LED_GPIO,
    RUNNING_LED_GPIO,
    IN1_GPIO,
    IN2_GPIO,
    IN3_GPIO,
    IN4_GPIO,
];

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
