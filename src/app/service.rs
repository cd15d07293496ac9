//! Drive controller — the hexagonal core.
//!
//! [`DriveController`] owns both gesture classifiers, the ramp and
//! increment policies, the direction sequencer and the status indicator.
//! All I/O flows through port traits injected at call sites, so the whole
//! controller runs against mock boards on the host.
//!
//! ```text
//!  DigitalInput ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                   │     DriveController      │
//! DigitalOutput ◀── │ buttons · ramp · flip ·  │
//!    PwmOutput  ◀── │ increment · indicator    │
//!                   └────────────▲─────────────┘
//!                                │ take()/arm()
//!                           TickSource
//! ```

use log::{debug, info};

use crate::config::DriveConfig;
use crate::control::direction::{BridgeLines, Direction, DirectionSequencer};
use crate::control::enable_button::{EnableButton, EnableButtonState, EnableGesture};
use crate::control::increment::IncrementPolicy;
use crate::control::indicator::{IndicatorState, StatusIndicator};
use crate::control::ramp::RampPolicy;
use crate::control::speed_button::{SpeedButton, SpeedButtonState, SpeedGesture};
use crate::control::{DriveState, write_duty_pair};
use crate::error::Result;
use crate::tick::{TickFlag, TickSource};

use super::events::{DriveEvent, IgnoredGesture};
use super::ports::{Button, DigitalInput, DigitalOutput, EventSink, PwmOutput};

/// Point-in-time view of the controller for tests and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveStatus {
    pub motor_enabled: bool,
    /// Commanded direction (switches at the start of a flip).
    pub direction: Direction,
    /// Duty the motors run at outside a flip.
    pub duty: u8,
    /// Duty currently on the PWM outputs (zero during a flip).
    pub applied_duty: u8,
    pub bridge: BridgeLines,
    pub flip_in_progress: bool,
    pub continuous_increment: bool,
    pub enable_button: EnableButtonState,
    pub speed_button: SpeedButtonState,
    pub indicators: IndicatorState,
}

// ───────────────────────────────────────────────────────────────
// DriveController
// ───────────────────────────────────────────────────────────────

pub struct DriveController<'t> {
    config: DriveConfig,
    ticks: &'t TickSource,
    state: DriveState,
    enable_button: EnableButton,
    speed_button: SpeedButton,
    ramp: RampPolicy,
    sequencer: DirectionSequencer,
    increment: IncrementPolicy,
    indicator: StatusIndicator,
}

impl<'t> DriveController<'t> {
    /// Validate `config` and load its thresholds into `ticks`.
    ///
    /// Resets the tick source, so build the controller before starting
    /// the periodic timer.
    pub fn new(config: DriveConfig, ticks: &'t TickSource) -> Result<Self> {
        config.validate()?;
        ticks.reconfigure(config.tick_thresholds());

        Ok(Self {
            ramp: RampPolicy::new(&config),
            increment: IncrementPolicy::new(&config),
            config,
            ticks,
            state: DriveState::default(),
            enable_button: EnableButton::new(),
            speed_button: SpeedButton::new(),
            sequencer: DirectionSequencer::new(),
            indicator: StatusIndicator::new(),
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every output to its power-up level: PWM zero, bridge
    /// forward, indicators off.
    pub fn start(
        &mut self,
        hw: &mut (impl DigitalOutput + PwmOutput),
        sink: &mut impl EventSink,
    ) {
        write_duty_pair(hw, 0);
        self.sequencer.lines().write(hw);
        let leds = self.derive_indicators();
        self.indicator.force(leds, hw);

        sink.emit(&DriveEvent::Started);
        info!(
            "DriveController started (ramp target {}, max {})",
            self.config.ramp_target, self.config.duty_max
        );
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one pass of the cooperative loop.
    ///
    /// Sub-steps run in a fixed order: enable button, ramp, direction
    /// sequencer, speed button, continuous increment, indicators.  Every
    /// timed action is gated by a consumed tick flag, so calling `poll`
    /// again without a new tick or input change does nothing.
    pub fn poll(
        &mut self,
        hw: &mut (impl DigitalInput + DigitalOutput + PwmOutput),
        sink: &mut impl EventSink,
    ) {
        // 1. Enable / direction button
        let pressed = self.is_pressed(hw, Button::Enable);
        if let Some(gesture) = self.enable_button.update(pressed, self.ticks) {
            self.on_enable_gesture(gesture, hw, sink);
        }

        // 2. Soft start / soft stop
        if self.ticks.take(TickFlag::RampStep) && !self.sequencer.is_flipping() {
            if let Some(step) = self.ramp.step(&mut self.state) {
                write_duty_pair(hw, step.duty);
                if step.settled {
                    debug!("ramp settled at {}", step.duty);
                    sink.emit(&DriveEvent::RampSettled { duty: step.duty });
                }
            }
        }

        // 3. Direction sequencer
        if let Some(duty) = self.sequencer.step(self.ticks, hw) {
            sink.emit(&DriveEvent::DirectionFlipCompleted {
                direction: self.sequencer.direction(),
                duty,
            });
        }

        // 4. Speed button
        let pressed = self.is_pressed(hw, Button::Speed);
        let allowed = self.state.motor_enabled;
        if let Some(gesture) = self.speed_button.update(pressed, allowed, self.ticks) {
            self.on_speed_gesture(gesture, hw, sink);
        }

        // 5. Continuous increment
        if self.ticks.take(TickFlag::IncrementStep) && self.can_increment_continuously() {
            if let Some(duty) = self.increment.continuous_step(self.state.duty) {
                self.state.duty = duty;
                write_duty_pair(hw, duty);
            }
        }

        // 6. Indicators
        let leds = self.derive_indicators();
        self.indicator.refresh(leds, hw);
    }

    // ── Gesture handling ──────────────────────────────────────

    fn on_enable_gesture(
        &mut self,
        gesture: EnableGesture,
        hw: &mut (impl DigitalOutput + PwmOutput),
        sink: &mut impl EventSink,
    ) {
        match gesture {
            EnableGesture::Press => {}
            EnableGesture::HoldConfirmed => sink.emit(&DriveEvent::DirectionSelectArmed),
            EnableGesture::Tap => {
                self.state.motor_enabled = !self.state.motor_enabled;
                if self.state.motor_enabled {
                    info!("motors enabled");
                    sink.emit(&DriveEvent::MotorEnabled);
                } else {
                    info!("motors disabled");
                    if self.increment.is_continuous() {
                        self.increment.end_continuous(self.ticks);
                        sink.emit(&DriveEvent::ContinuousIncrementEnded {
                            duty: self.state.duty,
                        });
                    }
                    sink.emit(&DriveEvent::MotorDisabled);
                }
            }
            EnableGesture::HoldReleased => {
                if !self.state.motor_enabled {
                    ignore(sink, IgnoredGesture::DirectionWhileDisabled);
                    return;
                }
                let saved_duty = self.state.duty;
                match self.sequencer.begin(saved_duty, self.ticks, hw) {
                    Some(to) => {
                        info!("direction flip -> {to:?}");
                        sink.emit(&DriveEvent::DirectionFlipStarted { to, saved_duty });
                    }
                    None => ignore(sink, IgnoredGesture::DirectionWhileFlipping),
                }
            }
        }
    }

    fn on_speed_gesture(
        &mut self,
        gesture: SpeedGesture,
        hw: &mut impl PwmOutput,
        sink: &mut impl EventSink,
    ) {
        match gesture {
            SpeedGesture::Press => {}
            SpeedGesture::HoldStarted => {
                if self.state.motor_enabled {
                    self.increment.begin_continuous(self.ticks);
                    sink.emit(&DriveEvent::ContinuousIncrementStarted);
                }
            }
            SpeedGesture::Tap => {
                let reason = if !self.state.motor_enabled {
                    Some(IgnoredGesture::SpeedTapWhileDisabled)
                } else if self.sequencer.is_flipping() {
                    Some(IgnoredGesture::SpeedTapWhileFlipping)
                } else if self.state.duty == 0 {
                    Some(IgnoredGesture::SpeedTapWhileStopped)
                } else {
                    None
                };
                if let Some(reason) = reason {
                    ignore(sink, reason);
                    return;
                }

                let from = self.state.duty;
                let outcome = self.increment.tap(from);
                self.state.duty = outcome.duty;
                write_duty_pair(hw, outcome.duty);
                sink.emit(&DriveEvent::TapIncrement {
                    from,
                    to: outcome.duty,
                    wrapped: outcome.wrapped,
                });
            }
            SpeedGesture::HoldReleased => {
                if self.increment.is_continuous() {
                    self.increment.end_continuous(self.ticks);
                    sink.emit(&DriveEvent::ContinuousIncrementEnded {
                        duty: self.state.duty,
                    });
                }
            }
        }
    }

    // ── Helpers ───────────────────────────────────────────────

    fn is_pressed(&self, hw: &mut impl DigitalInput, button: Button) -> bool {
        hw.read_level(button) != self.config.buttons_active_low
    }

    fn can_increment_continuously(&self) -> bool {
        self.increment.is_continuous()
            && self.state.motor_enabled
            && self.state.duty > 0
            && !self.sequencer.is_flipping()
    }

    fn derive_indicators(&self) -> IndicatorState {
        IndicatorState::derive(
            &self.ticks.snapshot(),
            self.state.motor_enabled,
            self.enable_button.state() == EnableButtonState::HeldConfirmed,
            self.increment.is_continuous(),
        )
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> DriveStatus {
        let flipping = self.sequencer.is_flipping();
        DriveStatus {
            motor_enabled: self.state.motor_enabled,
            direction: self.sequencer.direction(),
            duty: self.state.duty,
            applied_duty: if flipping { 0 } else { self.state.duty },
            bridge: self.sequencer.lines(),
            flip_in_progress: flipping,
            continuous_increment: self.increment.is_continuous(),
            enable_button: self.enable_button.state(),
            speed_button: self.speed_button.state(),
            indicators: self.indicator.shown(),
        }
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }
}

fn ignore(sink: &mut impl EventSink, reason: IgnoredGesture) {
    debug!("gesture ignored: {reason:?}");
    sink.emit(&DriveEvent::GestureIgnored(reason));
}
