//! Fuzz target: `DriveConfig::validate`
//!
//! Builds a configuration from arbitrary bytes.  Anything `validate`
//! accepts must run a full enable / increment / disable cycle without
//! panicking and without exceeding its own duty maximum.
//!
//! cargo fuzz run fuzz_config

#![no_main]

use hbridge_drive::app::events::DriveEvent;
use hbridge_drive::app::ports::{
    Button, DigitalInput, DigitalOutput, EventSink, OutputLine, PwmChannel, PwmOutput,
};
use hbridge_drive::app::service::DriveController;
use hbridge_drive::config::DriveConfig;
use hbridge_drive::tick::TickSource;
use libfuzzer_sys::fuzz_target;

struct Board {
    levels: [bool; 2],
    duty: u8,
}

impl DigitalInput for Board {
    fn read_level(&mut self, button: Button) -> bool {
        self.levels[button as usize]
    }
}

impl DigitalOutput for Board {
    fn write_line(&mut self, _line: OutputLine, _high: bool) {}
}

impl PwmOutput for Board {
    fn set_duty(&mut self, _channel: PwmChannel, duty: u8) {
        self.duty = duty;
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &DriveEvent) {}
}

fn small(b: u8) -> u16 {
    u16::from(b) * 8
}

fuzz_target!(|data: &[u8]| {
    let Ok(b) = <[u8; 14]>::try_from(data.get(..14).unwrap_or_default()) else {
        return;
    };
    let config = DriveConfig {
        debounce_ticks: small(b[0]),
        ramp_cadence_ticks: small(b[1]),
        increment_cadence_ticks: small(b[2]),
        dead_time_ticks: small(b[3]),
        enable_hold_ticks: small(b[4]) * 4,
        speed_hold_ticks: small(b[5]) * 4,
        increment_blink_ticks: small(b[6]),
        duty_max: b[7],
        ramp_target: b[8],
        ramp_up_step: b[9],
        ramp_down_step: b[10],
        tap_increment_step: b[11],
        hold_increment_step: b[12],
        buttons_active_low: b[13] & 1 == 0,
        ..DriveConfig::default()
    };
    if config.validate().is_err() {
        return;
    }

    let duty_max = config.duty_max;
    let released = config.buttons_active_low;
    let ticks = TickSource::default();
    let mut ctl = DriveController::new(config, &ticks).unwrap();
    let mut hw = Board {
        levels: [released, released],
        duty: 0,
    };
    ctl.start(&mut hw, &mut Discard);

    // enable tap, speed hold, enable tap
    let script = [(0, 300), (2, 300), (1, 9_000), (2, 300), (0, 300), (2, 20_000)];
    for (press, n) in script {
        hw.levels = [released, released];
        if press < 2 {
            hw.levels[press] = !released;
        }
        for _ in 0..n {
            ticks.on_tick();
            ctl.poll(&mut hw, &mut Discard);
            assert!(hw.duty <= duty_max);
        }
    }
});
