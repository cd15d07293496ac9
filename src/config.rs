//! Drive configuration parameters.
//!
//! All tunable timing and duty parameters for the controller.  Every
//! timing value is expressed in ticks of the fixed tick period; the
//! defaults reproduce the reference board (1 ms tick, 8-bit PWM).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tick::TickThresholds;

/// Core drive configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveConfig {
    // --- Tick source ---
    /// Period of the tick event in microseconds.
    pub tick_period_us: u32,
    /// Ticks between toggles of the power LED.
    pub status_blink_ticks: u16,
    /// Stable-signal window before a button edge is trusted.
    pub debounce_ticks: u16,
    /// Ticks between soft-start / soft-stop steps.
    pub ramp_cadence_ticks: u16,
    /// Ticks between continuous-increment steps.
    pub increment_cadence_ticks: u16,
    /// Zero-duty window between the two direction half-flips.
    pub dead_time_ticks: u16,
    /// Hold time on the enable button that selects a direction change.
    pub enable_hold_ticks: u16,
    /// Hold time on the speed button that starts continuous increment.
    pub speed_hold_ticks: u16,
    /// Ticks between toggles of the running LED in increment mode.
    pub increment_blink_ticks: u16,

    // --- Duty cycle ---
    /// Full-scale PWM duty value.
    pub duty_max: u8,
    /// Soft-start target, also the wrap value of the tap increment.
    pub ramp_target: u8,
    /// Duty added per ramp step while starting.
    pub ramp_up_step: u8,
    /// Duty removed per ramp step while stopping.
    pub ramp_down_step: u8,
    /// Duty added by a single tap on the speed button.
    pub tap_increment_step: u8,
    /// Duty added per cadence tick while the speed button is held.
    pub hold_increment_step: u8,

    // --- PWM ---
    /// PWM carrier frequency (configured once at startup).
    pub pwm_frequency_hz: u32,

    // --- Buttons ---
    /// Buttons pull the line low when pressed.
    pub buttons_active_low: bool,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            // Tick source
            tick_period_us: 1_000, // 1 ms
            status_blink_ticks: 500,
            debounce_ticks: 20,
            ramp_cadence_ticks: 20,
            increment_cadence_ticks: 15,
            dead_time_ticks: 100,
            enable_hold_ticks: 1_500,
            speed_hold_ticks: 1_000,
            increment_blink_ticks: 200,

            // Duty cycle
            duty_max: 255,
            ramp_target: 100, // ~39 %
            ramp_up_step: 5,
            ramp_down_step: 1,
            tap_increment_step: 25, // ~10 %
            hold_increment_step: 1,

            // PWM
            pwm_frequency_hz: 2_000,

            // Buttons
            buttons_active_low: true,
        }
    }
}

impl DriveConfig {
    /// Check every field against its allowed range.
    ///
    /// Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.tick_period_us == 0 {
            return Err(Error::Config("tick_period_us must be non-zero"));
        }

        let timers = [
            (self.status_blink_ticks, "status_blink_ticks must be non-zero"),
            (self.debounce_ticks, "debounce_ticks must be non-zero"),
            (self.ramp_cadence_ticks, "ramp_cadence_ticks must be non-zero"),
            (self.increment_cadence_ticks, "increment_cadence_ticks must be non-zero"),
            (self.dead_time_ticks, "dead_time_ticks must be non-zero"),
            (self.enable_hold_ticks, "enable_hold_ticks must be non-zero"),
            (self.speed_hold_ticks, "speed_hold_ticks must be non-zero"),
            (self.increment_blink_ticks, "increment_blink_ticks must be non-zero"),
        ];
        if let Some((_, msg)) = timers.iter().find(|(ticks, _)| *ticks == 0) {
            return Err(Error::Config(*msg));
        }

        if self.debounce_ticks >= self.enable_hold_ticks
            || self.debounce_ticks >= self.speed_hold_ticks
        {
            return Err(Error::Config("debounce_ticks must be shorter than hold thresholds"));
        }

        if self.duty_max == 0 {
            return Err(Error::Config("duty_max must be non-zero"));
        }
        if self.ramp_target == 0 || self.ramp_target > self.duty_max {
            return Err(Error::Config("ramp_target must be in 1..=duty_max"));
        }

        let steps = [
            (self.ramp_up_step, "ramp_up_step must be non-zero"),
            (self.ramp_down_step, "ramp_down_step must be non-zero"),
            (self.tap_increment_step, "tap_increment_step must be non-zero"),
            (self.hold_increment_step, "hold_increment_step must be non-zero"),
        ];
        if let Some((_, msg)) = steps.iter().find(|(step, _)| *step == 0) {
            return Err(Error::Config(*msg));
        }

        if self.pwm_frequency_hz == 0 {
            return Err(Error::Config("pwm_frequency_hz must be non-zero"));
        }

        Ok(())
    }

    /// Timer thresholds for the [`TickSource`](crate::tick::TickSource).
    pub fn tick_thresholds(&self) -> TickThresholds {
        TickThresholds {
            status_blink: self.status_blink_ticks,
            debounce: self.debounce_ticks,
            ramp: self.ramp_cadence_ticks,
            increment: self.increment_cadence_ticks,
            dead_time: self.dead_time_ticks,
            enable_hold: self.enable_hold_ticks,
            speed_hold: self.speed_hold_ticks,
            increment_blink: self.increment_blink_ticks,
        }
    }
}
