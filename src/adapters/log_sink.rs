//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing drive events to the ESP-IDF logger
//! (UART / USB-CDC in production).  One pipe-separated line per event.

use log::info;

use crate::app::events::{DriveEvent, IgnoredGesture};
use crate::app::ports::EventSink;

/// Adapter that logs every [`DriveEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &DriveEvent) {
        match event {
            DriveEvent::Started => info!("START | outputs at power-up levels"),
            DriveEvent::MotorEnabled => info!("DRIVE | motor enabled"),
            DriveEvent::MotorDisabled => info!("DRIVE | motor disabled"),
            DriveEvent::RampSettled { duty } => info!("RAMP | settled at duty {}", duty),
            DriveEvent::DirectionSelectArmed => {
                info!("DIR | select armed, release to flip");
            }
            DriveEvent::DirectionFlipStarted { to, saved_duty } => {
                info!("DIR | flip started -> {:?} (saved duty {})", to, saved_duty);
            }
            DriveEvent::DirectionFlipCompleted { direction, duty } => {
                info!("DIR | flip complete, {:?} at duty {}", direction, duty);
            }
            DriveEvent::TapIncrement { from, to, wrapped } => {
                info!(
                    "SPEED | tap {} -> {}{}",
                    from,
                    to,
                    if *wrapped { " (wrapped)" } else { "" }
                );
            }
            DriveEvent::ContinuousIncrementStarted => info!("SPEED | continuous increment on"),
            DriveEvent::ContinuousIncrementEnded { duty } => {
                info!("SPEED | continuous increment off at duty {}", duty);
            }
            DriveEvent::GestureIgnored(reason) => {
                info!("IGNORED | {}", describe(*reason));
            }
        }
    }
}

fn describe(reason: IgnoredGesture) -> &'static str {
    match reason {
        IgnoredGesture::DirectionWhileDisabled => "direction change while motor disabled",
        IgnoredGesture::DirectionWhileFlipping => "direction change while flip in progress",
        IgnoredGesture::SpeedTapWhileDisabled => "speed tap while motor disabled",
        IgnoredGesture::SpeedTapWhileStopped => "speed tap at zero duty",
        IgnoredGesture::SpeedTapWhileFlipping => "speed tap while flip in progress",
    }
}
