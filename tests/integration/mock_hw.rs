//! Mock board and test rig for integration tests.
//!
//! Records every line and PWM write so tests can assert on the full
//! output history without touching real GPIO/LEDC registers.  The rig
//! drives one tick + one poll per step, like the firmware loop.

use hbridge_drive::app::events::DriveEvent;
use hbridge_drive::app::ports::{
    Button, DigitalInput, DigitalOutput, EventSink, OutputLine, PwmChannel, PwmOutput,
};
use hbridge_drive::app::service::{DriveController, DriveStatus};
use hbridge_drive::config::DriveConfig;
use hbridge_drive::control::direction::BridgeLines;
use hbridge_drive::tick::TickSource;

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCall {
    Line(OutputLine, bool),
    Duty(PwmChannel, u8),
}

// ── MockBoard ─────────────────────────────────────────────────

/// Active-low buttons: released lines read high.
pub struct MockBoard {
    pub levels: [bool; 2],
    pub lines: [bool; OutputLine::COUNT],
    pub duty: [u8; 2],
    pub calls: Vec<OutputCall>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            levels: [true, true],
            lines: [false; OutputLine::COUNT],
            duty: [0, 0],
            calls: Vec::new(),
        }
    }

    pub fn press(&mut self, button: Button) {
        self.levels[button as usize] = false;
    }

    pub fn release(&mut self, button: Button) {
        self.levels[button as usize] = true;
    }

    pub fn line(&self, line: OutputLine) -> bool {
        self.lines[line as usize]
    }

    pub fn bridge(&self) -> BridgeLines {
        BridgeLines {
            in1: self.line(OutputLine::In1),
            in2: self.line(OutputLine::In2),
            in3: self.line(OutputLine::In3),
            in4: self.line(OutputLine::In4),
        }
    }

    pub fn writes_to(&self, line: OutputLine) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                OutputCall::Line(l, high) if *l == line => Some(*high),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitalInput for MockBoard {
    fn read_level(&mut self, button: Button) -> bool {
        self.levels[button as usize]
    }
}

impl DigitalOutput for MockBoard {
    fn write_line(&mut self, line: OutputLine, high: bool) {
        self.lines[line as usize] = high;
        self.calls.push(OutputCall::Line(line, high));
    }
}

impl PwmOutput for MockBoard {
    fn set_duty(&mut self, channel: PwmChannel, duty: u8) {
        self.duty[channel as usize] = duty;
        self.calls.push(OutputCall::Duty(channel, duty));
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<DriveEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&DriveEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn contains(&self, event: &DriveEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &DriveEvent) {
        self.events.push(*event);
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// Press/release long enough to clear debounce, short of any hold.
pub const TAP_TICKS: u32 = 100;
/// Past the enable-button hold threshold (1500) plus debounce.
pub const ENABLE_HOLD_TICKS: u32 = 1_600;

pub struct Rig {
    pub ticks: &'static TickSource,
    pub ctl: DriveController<'static>,
    pub hw: MockBoard,
    pub sink: RecordingSink,
    /// PWM outputs after every step.
    pub duty_history: Vec<[u8; 2]>,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(DriveConfig::default())
    }

    pub fn with_config(config: DriveConfig) -> Self {
        let ticks: &'static TickSource = Box::leak(Box::new(TickSource::default()));
        let mut ctl = DriveController::new(config, ticks).expect("valid config");
        let mut hw = MockBoard::new();
        let mut sink = RecordingSink::default();
        ctl.start(&mut hw, &mut sink);
        Self {
            ticks,
            ctl,
            hw,
            sink,
            duty_history: Vec::new(),
        }
    }

    /// One tick followed by one poll.
    pub fn step(&mut self) {
        self.ticks.on_tick();
        self.ctl.poll(&mut self.hw, &mut self.sink);
        self.duty_history.push(self.hw.duty);
    }

    pub fn run(&mut self, n: u32) {
        for _ in 0..n {
            self.step();
        }
    }

    pub fn tap(&mut self, button: Button) {
        self.hw.press(button);
        self.run(TAP_TICKS);
        self.hw.release(button);
        self.run(TAP_TICKS);
    }

    pub fn hold(&mut self, button: Button, ticks: u32) {
        self.hw.press(button);
        self.run(ticks);
        self.hw.release(button);
        self.run(TAP_TICKS);
    }

    /// Tap the motors on and let the soft start settle.
    pub fn enable_and_settle(&mut self) {
        self.tap(Button::Enable);
        self.run(500);
        assert_eq!(self.status().duty, self.ctl.config().ramp_target);
    }

    pub fn status(&self) -> DriveStatus {
        self.ctl.status()
    }
}
