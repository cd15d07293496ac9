//! Fuzz target: `DriveController::poll` under arbitrary button input.
//!
//! Each input byte is one segment: bit 0 = enable button pressed,
//! bit 1 = speed button pressed, bits 2..8 = segment length (scaled to
//! reach the hold thresholds).
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Both PWM channels always carry the same duty, never above max
//! - PWM is zero for the whole dead-time of a direction flip
//!
//! cargo fuzz run fuzz_button_input

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
    duty: [u8; 2],
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
    fn set_duty(&mut self, channel: PwmChannel, duty: u8) {
        self.duty[channel as usize] = duty;
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &DriveEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = DriveConfig::default();
    let duty_max = config.duty_max;
    let ticks = TickSource::default();
    let mut ctl = DriveController::new(config, &ticks).unwrap();
    let mut hw = Board {
        levels: [true, true],
        duty: [0, 0],
    };
    ctl.start(&mut hw, &mut Discard);

    for &byte in data.iter().take(64) {
        hw.levels = [byte & 0b01 == 0, byte & 0b10 == 0];
        let n = u32::from(byte >> 2) * 30 + 1;
        for _ in 0..n {
            ticks.on_tick();
            ctl.poll(&mut hw, &mut Discard);

            assert_eq!(hw.duty[0], hw.duty[1]);
            assert!(hw.duty[0] <= duty_max);
            if ctl.status().flip_in_progress {
                assert_eq!(hw.duty, [0, 0]);
            }
        }
    }
});
