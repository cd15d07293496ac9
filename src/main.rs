//! Dual H-bridge drive firmware — main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │   HalBoard (PinDriver · LedcDriver)      LogEventSink      │
//! │   DigitalInput · DigitalOutput · Pwm     EventSink         │
//! │                                                            │
//! │  ──────────────── Port Trait Boundary ───────────────      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │        DriveController (pure logic, polled)          │  │
//! │  └───────────────────────────▲──────────────────────────┘  │
//! │                              │ flags                       │
//! │          esp_timer (1 ms) ──▶ TickSource (static)          │
//! └────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver, Pull};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use hbridge_drive::adapters::hal::HalBoard;
use hbridge_drive::adapters::log_sink::LogEventSink;
use hbridge_drive::app::service::DriveController;
use hbridge_drive::config::DriveConfig;
use hbridge_drive::drivers::hw_timer;
use hbridge_drive::pins;
use hbridge_drive::tick::{TickSource, TickThresholds};

/// Shared with the esp_timer callback for the lifetime of the firmware.
static TICKS: TickSource = TickSource::new(TickThresholds::REFERENCE);

fn button(gpio: i32) -> Result<PinDriver<'static, AnyIOPin, Input>> {
    // SAFETY: every GPIO number in `pins` is claimed exactly once.
    let mut pin = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
    pin.set_pull(Pull::Up)?;
    Ok(pin)
}

fn output(gpio: i32) -> Result<PinDriver<'static, AnyOutputPin, Output>> {
    // SAFETY: every GPIO number in `pins` is claimed exactly once.
    let mut pin = PinDriver::output(unsafe { AnyOutputPin::new(gpio) })?;
    pin.set_low()?;
    Ok(pin)
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  hbridge-drive v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = DriveConfig::default();

    // ── 2. Pins ───────────────────────────────────────────────
    let peripherals = Peripherals::take()?;

    let buttons = [
        button(pins::ENABLE_BUTTON_GPIO)?,
        button(pins::SPEED_BUTTON_GPIO)?,
    ];
    let [power, select, running, in1, in2, in3, in4] = pins::OUTPUT_LINE_GPIOS;
    let lines = [
        output(power)?,
        output(select)?,
        output(running)?,
        output(in1)?,
        output(in2)?,
        output(in3)?,
        output(in4)?,
    ];

    // ── 3. PWM: one LEDC timer shared by both enable channels ──
    let timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::new()
            .frequency(Hertz(config.pwm_frequency_hz))
            .resolution(Resolution::Bits8),
    )?;
    // SAFETY: PWM GPIOs are not claimed anywhere else.
    let pwm = [
        LedcDriver::new(peripherals.ledc.channel0, &timer, unsafe {
            AnyOutputPin::new(pins::PWM_A_GPIO)
        })?,
        LedcDriver::new(peripherals.ledc.channel1, &timer, unsafe {
            AnyOutputPin::new(pins::PWM_B_GPIO)
        })?,
    ];
    info!(
        "PWM: {} Hz, {}-bit",
        config.pwm_frequency_hz,
        pins::PWM_RESOLUTION_BITS
    );

    let mut board = HalBoard::new(
        buttons,
        lines,
        pwm,
        config.duty_max,
        config.buttons_active_low,
    );
    let mut sink = LogEventSink::new();

    // ── 4. Controller, then ticks ─────────────────────────────
    let tick_period_us = config.tick_period_us;
    let mut controller = DriveController::new(config, &TICKS)?;
    controller.start(&mut board, &mut sink);
    let _tick_timer = hw_timer::start_tick_timer(&TICKS, tick_period_us)?;

    info!("System ready. Entering control loop.");

    // ── 5. Cooperative loop ───────────────────────────────────
    let mut reported_faults = 0;
    loop {
        controller.poll(&mut board, &mut sink);

        if board.fault_count() != reported_faults {
            reported_faults = board.fault_count();
            if let Some(e) = board.last_error() {
                warn!("HAL faults: {} (last: {})", reported_faults, e);
            }
        }

        // Yield so the idle task can feed the task watchdog.
        FreeRtos::delay_ms(1);
    }
}
