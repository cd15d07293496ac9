//! Status LEDs.
//!
//! Levels are derived from controller state and tick phases each poll;
//! a line is only written when its derived level differs from what was
//! last written.

use crate::app::ports::{DigitalOutput, OutputLine};
use crate::tick::TickSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorState {
    pub power: bool,
    pub select: bool,
    pub running: bool,
}

impl IndicatorState {
    pub fn derive(
        snapshot: &TickSnapshot,
        motor_enabled: bool,
        selecting: bool,
        continuous: bool,
    ) -> Self {
        Self {
            power: snapshot.power_phase,
            select: selecting,
            running: if continuous {
                snapshot.increment_phase
            } else {
                motor_enabled
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct StatusIndicator {
    shown: Option<IndicatorState>,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive all three lines unconditionally and remember them.
    pub fn force(&mut self, state: IndicatorState, out: &mut impl DigitalOutput) {
        out.write_line(OutputLine::PowerLed, state.power);
        out.write_line(OutputLine::SelectLed, state.select);
        out.write_line(OutputLine::RunningLed, state.running);
        self.shown = Some(state);
    }

    pub fn refresh(&mut self, next: IndicatorState, out: &mut impl DigitalOutput) {
        let Some(prev) = self.shown else {
            self.force(next, out);
            return;
        };
        if prev.power != next.power {
            out.write_line(OutputLine::PowerLed, next.power);
        }
        if prev.select != next.select {
            out.write_line(OutputLine::SelectLed, next.select);
        }
        if prev.running != next.running {
            out.write_line(OutputLine::RunningLed, next.running);
        }
        self.shown = Some(next);
    }

    pub fn shown(&self) -> IndicatorState {
        self.shown.unwrap_or_default()
    }
}
