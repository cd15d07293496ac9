//! Direction reversal through a long press of the enable button.

use hbridge_drive::app::events::{DriveEvent, IgnoredGesture};
use hbridge_drive::app::ports::Button;
use hbridge_drive::control::direction::{BridgeLines, Direction};
use hbridge_drive::control::enable_button::EnableButtonState;

use crate::mock_hw::{ENABLE_HOLD_TICKS, Rig};

fn flips_started(rig: &Rig) -> usize {
    rig.sink
        .count(|e| matches!(e, DriveEvent::DirectionFlipStarted { .. }))
}

/// Longest run of consecutive all-zero PWM samples.
fn longest_zero_run(history: &[[u8; 2]]) -> usize {
    history
        .split(|d| *d != [0, 0])
        .map(<[[u8; 2]]>::len)
        .max()
        .unwrap_or(0)
}

#[test]
fn hold_release_while_enabled_reverses_once() {
    let mut rig = Rig::new();
    rig.enable_and_settle();
    let before = rig.duty_history.len();

    rig.hold(Button::Enable, ENABLE_HOLD_TICKS);
    rig.run(200);

    assert_eq!(flips_started(&rig), 1);
    assert!(rig.sink.contains(&DriveEvent::DirectionFlipStarted {
        to: Direction::Reverse,
        saved_duty: 100
    }));
    assert!(rig.sink.contains(&DriveEvent::DirectionFlipCompleted {
        direction: Direction::Reverse,
        duty: 100
    }));

    let status = rig.status();
    assert_eq!(status.direction, Direction::Reverse);
    assert!(!status.flip_in_progress);
    assert_eq!(rig.hw.bridge(), BridgeLines::for_direction(Direction::Reverse));
    assert_eq!(rig.hw.duty, [100, 100]);

    assert!(longest_zero_run(&rig.duty_history[before..]) >= 100);
}

#[test]
fn primary_lines_flip_before_secondary() {
    let mut rig = Rig::new();
    rig.enable_and_settle();

    rig.hw.press(Button::Enable);
    rig.run(ENABLE_HOLD_TICKS);
    rig.hw.release(Button::Enable);
    while !rig.status().flip_in_progress {
        rig.step();
    }

    // Dead-time: IN1/IN3 already reversed, IN2/IN4 still forward.
    assert_eq!(
        rig.hw.bridge(),
        BridgeLines {
            in1: false,
            in2: false,
            in3: false,
            in4: false,
        }
    );
    assert_eq!(rig.hw.duty, [0, 0]);
    assert_eq!(rig.status().applied_duty, 0);

    rig.run(100);
    assert_eq!(rig.hw.bridge(), BridgeLines::for_direction(Direction::Reverse));
}

#[test]
fn pwm_stays_zero_for_whole_dead_time() {
    let mut rig = Rig::new();
    rig.enable_and_settle();

    rig.hw.press(Button::Enable);
    rig.run(ENABLE_HOLD_TICKS);
    rig.hw.release(Button::Enable);
    while !rig.status().flip_in_progress {
        rig.step();
    }

    for _ in 0..99 {
        rig.step();
        assert_eq!(rig.hw.duty, [0, 0]);
        assert!(rig.status().flip_in_progress);
    }
    rig.step();
    assert_eq!(rig.hw.duty, [100, 100]);
}

#[test]
fn hold_release_while_disabled_is_a_no_op() {
    let mut rig = Rig::new();
    rig.hold(Button::Enable, ENABLE_HOLD_TICKS);
    rig.run(200);

    assert_eq!(flips_started(&rig), 0);
    assert_eq!(rig.status().direction, Direction::Forward);
    assert_eq!(rig.hw.bridge(), BridgeLines::for_direction(Direction::Forward));
    assert_eq!(rig.hw.duty, [0, 0]);
    assert_eq!(rig.status().enable_button, EnableButtonState::Idle);
    assert!(rig.sink.contains(&DriveEvent::GestureIgnored(
        IgnoredGesture::DirectionWhileDisabled
    )));

    // The button is not stuck: the next tap still enables.
    rig.tap(Button::Enable);
    assert!(rig.status().motor_enabled);
}

#[test]
fn two_reversals_restore_the_original_lines() {
    let mut rig = Rig::new();
    rig.enable_and_settle();
    let original = rig.hw.bridge();

    rig.hold(Button::Enable, ENABLE_HOLD_TICKS);
    rig.run(200);
    rig.hold(Button::Enable, ENABLE_HOLD_TICKS);
    rig.run(200);

    assert_eq!(flips_started(&rig), 2);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, DriveEvent::DirectionFlipCompleted { .. })),
        2
    );
    assert_eq!(rig.hw.bridge(), original);
    assert_eq!(rig.status().direction, Direction::Forward);
    assert_eq!(rig.hw.duty, [100, 100]);
}

#[test]
fn second_reversal_waits_a_full_dead_time() {
    let mut rig = Rig::new();
    rig.enable_and_settle();
    rig.hold(Button::Enable, ENABLE_HOLD_TICKS);
    rig.run(200);

    let before = rig.duty_history.len();
    rig.hold(Button::Enable, ENABLE_HOLD_TICKS);
    rig.run(200);
    assert!(longest_zero_run(&rig.duty_history[before..]) >= 100);
}

#[test]
fn disable_during_dead_time_ramps_down_after_restore() {
    let mut rig = Rig::new();
    rig.enable_and_settle();

    rig.hw.press(Button::Enable);
    rig.run(ENABLE_HOLD_TICKS);
    rig.hw.release(Button::Enable);
    while !rig.status().flip_in_progress {
        rig.step();
    }

    // A short tap fits inside the 100-tick dead-time.
    rig.hw.press(Button::Enable);
    rig.run(25);
    rig.hw.release(Button::Enable);
    rig.run(25);
    let status = rig.status();
    assert!(!status.motor_enabled);
    assert!(status.flip_in_progress);

    rig.run(100);
    assert!(!rig.status().flip_in_progress);
    rig.run(100 * 20 + 100);
    assert_eq!(rig.hw.duty, [0, 0]);
    assert_eq!(rig.hw.bridge(), BridgeLines::for_direction(Direction::Reverse));
}
