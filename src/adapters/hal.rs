//! embedded-hal board adapter.
//!
//! Binds the port traits to `embedded-hal` 1.0 pins so the same adapter
//! serves ESP-IDF `PinDriver`/`LedcDriver` in firmware and plain mock pins
//! on the host.  This is the only module that touches pin drivers.
//!
//! HAL faults never reach the control core: each one is logged, counted
//! and remembered in [`HalBoard::last_error`].  A button that cannot be
//! read reports its released level.

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{Button, DigitalInput, DigitalOutput, OutputLine, PwmChannel, PwmOutput};
use crate::error::{ActuatorError, Error, InputError};

/// Concrete adapter over two button inputs, seven output lines and two
/// PWM channels.
pub struct HalBoard<I, O, P> {
    /// Indexed by [`Button`]: enable, speed.
    buttons: [I; 2],
    /// Indexed by [`OutputLine`].
    lines: [O; OutputLine::COUNT],
    /// Indexed by [`PwmChannel`].
    pwm: [P; 2],
    /// Electrical level of an unpressed button.
    released_level: bool,
    duty_max: u8,
    faults: u32,
    last_error: Option<Error>,
}

impl<I, O, P> HalBoard<I, O, P>
where
    I: InputPin,
    O: OutputPin,
    P: SetDutyCycle,
{
    /// `duty_max` is the core duty value that maps to 100 % on the
    /// channel; `buttons_active_low` selects the released level used
    /// when a read fails.
    pub fn new(
        buttons: [I; 2],
        lines: [O; OutputLine::COUNT],
        pwm: [P; 2],
        duty_max: u8,
        buttons_active_low: bool,
    ) -> Self {
        Self {
            buttons,
            lines,
            pwm,
            released_level: buttons_active_low,
            duty_max,
            faults: 0,
            last_error: None,
        }
    }

    /// Number of HAL faults seen since construction.
    pub fn fault_count(&self) -> u32 {
        self.faults
    }

    pub fn last_error(&self) -> Option<Error> {
        self.last_error
    }

    fn record(&mut self, err: Error) {
        self.faults = self.faults.saturating_add(1);
        self.last_error = Some(err);
    }
}

// ── DigitalInput ──────────────────────────────────────────────

impl<I, O, P> DigitalInput for HalBoard<I, O, P>
where
    I: InputPin,
    O: OutputPin,
    P: SetDutyCycle,
{
    fn read_level(&mut self, button: Button) -> bool {
        match self.buttons[button as usize].is_high() {
            Ok(level) => level,
            Err(e) => {
                warn!("{:?} button read failed: {:?}", button, e);
                self.record(InputError::GpioReadFailed.into());
                self.released_level
            }
        }
    }
}

// ── DigitalOutput ─────────────────────────────────────────────

impl<I, O, P> DigitalOutput for HalBoard<I, O, P>
where
    I: InputPin,
    O: OutputPin,
    P: SetDutyCycle,
{
    fn write_line(&mut self, line: OutputLine, high: bool) {
        if let Err(e) = self.lines[line as usize].set_state(PinState::from(high)) {
            warn!("{:?} write failed: {:?}", line, e);
            self.record(ActuatorError::GpioWriteFailed.into());
        }
    }
}

// ── PwmOutput ─────────────────────────────────────────────────

impl<I, O, P> PwmOutput for HalBoard<I, O, P>
where
    I: InputPin,
    O: OutputPin,
    P: SetDutyCycle,
{
    fn set_duty(&mut self, channel: PwmChannel, duty: u8) {
        let duty = duty.min(self.duty_max);
        let result =
            self.pwm[channel as usize].set_duty_cycle_fraction(u16::from(duty), u16::from(self.duty_max));
        if let Err(e) = result {
            warn!("PWM {:?} duty {} failed: {:?}", channel, duty, e);
            self.record(ActuatorError::PwmWriteFailed.into());
        }
    }
}
