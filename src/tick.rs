//! Tick source — the single preemptive context of the drive.
//!
//! A fixed-period timer (1 ms on the reference board) calls
//! [`TickSource::on_tick`].  Each call advances every armed timer; a timer
//! that reaches its threshold resets to zero and either raises a one-shot
//! [`TickFlag`] or toggles an indicator phase.
//!
//! ```text
//! ┌──────────────┐  on_tick()   ┌─────────────────────────┐  take()/arm()  ┌──────────────┐
//! │ periodic     │─────────────▶│ TickState               │◀───────────────│ cooperative  │
//! │ timer (1 ms) │              │ counters · flags · LEDs │                │ control loop │
//! └──────────────┘              └─────────────────────────┘                └──────────────┘
//!                                (critical_section::Mutex)
//! ```
//!
//! The tick handler is the only writer of counters and flags; the control
//! loop only reads-and-clears flags and restarts/arms timers.  Every access
//! runs inside a critical section, so a flag read-and-clear can never be
//! split by a tick.

use core::cell::RefCell;

use critical_section::Mutex;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Timer thresholds, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickThresholds {
    pub status_blink: u16,
    pub debounce: u16,
    pub ramp: u16,
    pub increment: u16,
    pub dead_time: u16,
    pub enable_hold: u16,
    pub speed_hold: u16,
    pub increment_blink: u16,
}

impl TickThresholds {
    /// Reference board values at a 1 ms tick.
    pub const REFERENCE: Self = Self {
        status_blink: 500,
        debounce: 20,
        ramp: 20,
        increment: 15,
        dead_time: 100,
        enable_hold: 1_500,
        speed_hold: 1_000,
        increment_blink: 200,
    };
}

impl Default for TickThresholds {
    fn default() -> Self {
        Self::REFERENCE
    }
}

// ---------------------------------------------------------------------------
// Timers and flags
// ---------------------------------------------------------------------------

/// Every timer the tick source maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TimerId {
    StatusBlink = 0,
    DebounceEnable = 1,
    DebounceSpeed = 2,
    Ramp = 3,
    Increment = 4,
    DeadTime = 5,
    HoldEnable = 6,
    HoldSpeed = 7,
    IncrementBlink = 8,
}

impl TimerId {
    pub const COUNT: usize = 9;

    pub const ALL: [Self; Self::COUNT] = [
        Self::StatusBlink,
        Self::DebounceEnable,
        Self::DebounceSpeed,
        Self::Ramp,
        Self::Increment,
        Self::DeadTime,
        Self::HoldEnable,
        Self::HoldSpeed,
        Self::IncrementBlink,
    ];

    /// Bit of this timer in the armed mask.
    const fn bit(self) -> u16 {
        1 << self as u16
    }

    /// Flag raised when the timer fires, if it raises one.
    pub const fn flag(self) -> Option<TickFlag> {
        match self {
            Self::DebounceEnable => Some(TickFlag::DebounceEnable),
            Self::DebounceSpeed => Some(TickFlag::DebounceSpeed),
            Self::Ramp => Some(TickFlag::RampStep),
            Self::Increment => Some(TickFlag::IncrementStep),
            Self::DeadTime => Some(TickFlag::DeadTimeElapsed),
            Self::HoldEnable => Some(TickFlag::HoldEnable),
            Self::HoldSpeed => Some(TickFlag::HoldSpeed),
            Self::StatusBlink | Self::IncrementBlink => None,
        }
    }

    /// Hold timers fire once per arming; everything else repeats.
    const fn is_one_shot(self) -> bool {
        matches!(self, Self::HoldEnable | Self::HoldSpeed)
    }
}

/// Timers that count from power-up without being armed.
const FREE_RUNNING: u16 = TimerId::StatusBlink.bit()
    | TimerId::DebounceEnable.bit()
    | TimerId::DebounceSpeed.bit()
    | TimerId::Ramp.bit()
    | TimerId::Increment.bit()
    | TimerId::DeadTime.bit();

/// One-shot flags raised by the tick handler and cleared by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum TickFlag {
    /// Enable/direction button line has been stable for a debounce window.
    DebounceEnable = 0b000_0001,
    /// Speed button line has been stable for a debounce window.
    DebounceSpeed = 0b000_0010,
    /// Ramp cadence elapsed.
    RampStep = 0b000_0100,
    /// Continuous-increment cadence elapsed.
    IncrementStep = 0b000_1000,
    /// Direction dead-time elapsed.
    DeadTimeElapsed = 0b001_0000,
    /// Enable button held past its hold threshold.
    HoldEnable = 0b010_0000,
    /// Speed button held past its hold threshold.
    HoldSpeed = 0b100_0000,
}

impl TickFlag {
    /// Return the bitmask for this flag.
    pub const fn mask(self) -> u16 {
        self as u16
    }
}

/// Indicator phases and uptime, copied out of the shared region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSnapshot {
    /// Ticks since start (wraps).
    pub elapsed: u32,
    /// Slow status blink phase.
    pub power_phase: bool,
    /// Increment-mode blink phase (false while not armed).
    pub increment_phase: bool,
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

struct TickState {
    thresholds: TickThresholds,
    counts: [u16; TimerId::COUNT],
    armed: u16,
    flags: u16,
    power_phase: bool,
    increment_phase: bool,
    elapsed: u32,
}

impl TickState {
    const fn new(thresholds: TickThresholds) -> Self {
        Self {
            thresholds,
            counts: [0; TimerId::COUNT],
            armed: FREE_RUNNING,
            flags: 0,
            power_phase: false,
            increment_phase: false,
            elapsed: 0,
        }
    }

    fn threshold(&self, timer: TimerId) -> u16 {
        let t = &self.thresholds;
        match timer {
            TimerId::StatusBlink => t.status_blink,
            TimerId::DebounceEnable | TimerId::DebounceSpeed => t.debounce,
            TimerId::Ramp => t.ramp,
            TimerId::Increment => t.increment,
            TimerId::DeadTime => t.dead_time,
            TimerId::HoldEnable => t.enable_hold,
            TimerId::HoldSpeed => t.speed_hold,
            TimerId::IncrementBlink => t.increment_blink,
        }
    }

    fn advance(&mut self) {
        self.elapsed = self.elapsed.wrapping_add(1);

        for timer in TimerId::ALL {
            if self.armed & timer.bit() == 0 {
                continue;
            }
            let idx = timer as usize;
            self.counts[idx] = self.counts[idx].saturating_add(1);
            if self.counts[idx] >= self.threshold(timer) {
                self.counts[idx] = 0;
                self.fire(timer);
            }
        }
    }

    fn fire(&mut self, timer: TimerId) {
        match timer {
            TimerId::StatusBlink => self.power_phase = !self.power_phase,
            TimerId::IncrementBlink => self.increment_phase = !self.increment_phase,
            _ => {}
        }
        if let Some(flag) = timer.flag() {
            self.flags |= flag.mask();
        }
        if timer.is_one_shot() {
            self.armed &= !timer.bit();
        }
    }

    fn clear(&mut self, timer: TimerId) {
        self.counts[timer as usize] = 0;
        if let Some(flag) = timer.flag() {
            self.flags &= !flag.mask();
        }
    }
}

// ---------------------------------------------------------------------------
// Tick source
// ---------------------------------------------------------------------------

/// Interrupt-shared timer bank.
///
/// `const`-constructible so firmware can keep it in a `static` that the
/// timer callback reaches without allocation.
pub struct TickSource {
    shared: Mutex<RefCell<TickState>>,
}

impl TickSource {
    pub const fn new(thresholds: TickThresholds) -> Self {
        Self {
            shared: Mutex::new(RefCell::new(TickState::new(thresholds))),
        }
    }

    /// Replace the thresholds and reset every counter, flag and phase.
    /// Call once at startup, before the periodic timer is started.
    pub fn reconfigure(&self, thresholds: TickThresholds) {
        self.with(|s| *s = TickState::new(thresholds));
    }

    /// Tick handler.  Non-blocking: counter, flag and phase updates only.
    pub fn on_tick(&self) {
        self.with(TickState::advance);
    }

    /// Read and clear `flag` as one atomic step.
    pub fn take(&self, flag: TickFlag) -> bool {
        self.with(|s| {
            let set = s.flags & flag.mask() != 0;
            s.flags &= !flag.mask();
            set
        })
    }

    /// Read `flag` without clearing it.
    pub fn is_set(&self, flag: TickFlag) -> bool {
        self.with(|s| s.flags & flag.mask() != 0)
    }

    /// Zero `timer` and drop its pending flag, leaving it armed or not.
    pub fn restart(&self, timer: TimerId) {
        self.with(|s| s.clear(timer));
    }

    /// Start `timer` from zero.  Arming the increment blink lights its
    /// phase immediately.
    pub fn arm(&self, timer: TimerId) {
        self.with(|s| {
            s.clear(timer);
            s.armed |= timer.bit();
            if timer == TimerId::IncrementBlink {
                s.increment_phase = true;
            }
        });
    }

    /// Stop `timer`, zero it and drop its pending flag.
    pub fn disarm(&self, timer: TimerId) {
        self.with(|s| {
            s.clear(timer);
            s.armed &= !timer.bit();
            if timer == TimerId::IncrementBlink {
                s.increment_phase = false;
            }
        });
    }

    pub fn is_armed(&self, timer: TimerId) -> bool {
        self.with(|s| s.armed & timer.bit() != 0)
    }

    /// Ticks since start (wraps at `u32::MAX`).
    pub fn elapsed(&self) -> u32 {
        self.with(|s| s.elapsed)
    }

    pub fn snapshot(&self) -> TickSnapshot {
        self.with(|s| TickSnapshot {
            elapsed: s.elapsed,
            power_phase: s.power_phase,
            increment_phase: s.increment_phase,
        })
    }

    fn with<R>(&self, f: impl FnOnce(&mut TickState) -> R) -> R {
        critical_section::with(|cs| f(&mut self.shared.borrow_ref_mut(cs)))
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::new(TickThresholds::REFERENCE)
    }
}
