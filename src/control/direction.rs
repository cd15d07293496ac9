//! Direction sequencer with dead-time.
//!
//! ## H-bridge truth table (per motor)
//!
//! | IN1/IN3 | IN2/IN4 | Rotation |
//! |---------|---------|----------|
//! | 1       | 0       | Forward  |
//! | 0       | 1       | Reverse  |
//!
//! ## Reversal sequence
//!
//! ```text
//!  begin()                         dead-time flag             step()
//!    │ save duty, PWM A/B = 0        │                          │
//!    │ toggle IN1 + IN3              │                          │
//!    │ restart dead-time window ────▶│ toggle IN2 + IN4 ───────▶│ PWM A/B = saved duty
//! ```
//!
//! The window is restarted at every `begin()`, so each reversal waits a
//! full dead-time regardless of where the free-running timer was.

use crate::app::ports::{DigitalOutput, OutputLine, PwmOutput};
use crate::control::write_duty_pair;
use crate::tick::{TickFlag, TickSource, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// Levels of the four H-bridge direction inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeLines {
    pub in1: bool,
    pub in2: bool,
    pub in3: bool,
    pub in4: bool,
}

impl BridgeLines {
    pub const fn for_direction(direction: Direction) -> Self {
        let forward = matches!(direction, Direction::Forward);
        Self {
            in1: forward,
            in2: !forward,
            in3: forward,
            in4: !forward,
        }
    }

    fn flip_primary(&mut self) {
        self.in1 = !self.in1;
        self.in3 = !self.in3;
    }

    fn flip_secondary(&mut self) {
        self.in2 = !self.in2;
        self.in4 = !self.in4;
    }

    fn write_primary(&self, out: &mut impl DigitalOutput) {
        out.write_line(OutputLine::In1, self.in1);
        out.write_line(OutputLine::In3, self.in3);
    }

    fn write_secondary(&self, out: &mut impl DigitalOutput) {
        out.write_line(OutputLine::In2, self.in2);
        out.write_line(OutputLine::In4, self.in4);
    }

    /// Drive all four lines.
    pub fn write(&self, out: &mut impl DigitalOutput) {
        self.write_primary(out);
        self.write_secondary(out);
    }
}

impl Default for BridgeLines {
    fn default() -> Self {
        Self::for_direction(Direction::Forward)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlipPhase {
    #[default]
    Idle,
    /// Primary lines flipped, PWM held at zero until the dead-time flag.
    DeadTime { saved_duty: u8 },
}

#[derive(Debug, Default)]
pub struct DirectionSequencer {
    direction: Direction,
    lines: BridgeLines,
    phase: FlipPhase,
}

impl DirectionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commanded direction.  Switches at `begin()`, before the lines finish.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn lines(&self) -> BridgeLines {
        self.lines
    }

    pub fn phase(&self) -> FlipPhase {
        self.phase
    }

    pub fn is_flipping(&self) -> bool {
        self.phase != FlipPhase::Idle
    }

    /// Start a reversal.  Returns the new direction, or `None` if a flip is
    /// already in progress.
    pub fn begin(
        &mut self,
        duty: u8,
        ticks: &TickSource,
        hw: &mut (impl DigitalOutput + PwmOutput),
    ) -> Option<Direction> {
        if self.is_flipping() {
            return None;
        }

        write_duty_pair(hw, 0);
        self.lines.flip_primary();
        self.lines.write_primary(hw);
        ticks.restart(TimerId::DeadTime);

        self.direction = self.direction.toggled();
        self.phase = FlipPhase::DeadTime { saved_duty: duty };
        Some(self.direction)
    }

    /// Finish a reversal once the dead-time has elapsed.  Returns the
    /// restored duty on completion.
    pub fn step(
        &mut self,
        ticks: &TickSource,
        hw: &mut (impl DigitalOutput + PwmOutput),
    ) -> Option<u8> {
        let FlipPhase::DeadTime { saved_duty } = self.phase else {
            return None;
        };
        if !ticks.take(TickFlag::DeadTimeElapsed) {
            return None;
        }

        self.lines.flip_secondary();
        self.lines.write_secondary(hw);
        self.phase = FlipPhase::Idle;
        write_duty_pair(hw, saved_duty);
        Some(saved_duty)
    }
}
