//! Motor enable tap, soft start / soft stop, indicators and polling
//! idempotence.

use hbridge_drive::app::events::{DriveEvent, IgnoredGesture};
use hbridge_drive::app::ports::{Button, OutputLine};
use hbridge_drive::control::direction::{BridgeLines, Direction};
use hbridge_drive::control::enable_button::EnableButtonState;

use crate::mock_hw::{ENABLE_HOLD_TICKS, OutputCall, Rig, TAP_TICKS};

/// Durations between consecutive changes of the PWM output.
fn change_gaps(history: &[[u8; 2]]) -> Vec<usize> {
    let changes: Vec<usize> = history
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0] != w[1])
        .map(|(i, _)| i + 1)
        .collect();
    changes.windows(2).map(|w| w[1] - w[0]).collect()
}

#[test]
fn power_up_outputs() {
    let rig = Rig::new();
    assert_eq!(rig.hw.duty, [0, 0]);
    assert_eq!(rig.hw.bridge(), BridgeLines::for_direction(Direction::Forward));
    assert!(!rig.hw.line(OutputLine::RunningLed));
    assert!(!rig.hw.line(OutputLine::SelectLed));
    assert_eq!(rig.sink.events, vec![DriveEvent::Started]);
}

#[test]
fn tap_enables_and_ramps_to_target_in_fixed_steps() {
    let mut rig = Rig::new();
    rig.tap(Button::Enable);
    assert!(rig.status().motor_enabled);
    assert!(rig.sink.contains(&DriveEvent::MotorEnabled));

    rig.run(500);
    assert_eq!(rig.hw.duty, [100, 100]);
    assert!(rig.sink.contains(&DriveEvent::RampSettled { duty: 100 }));

    let mut seen: Vec<u8> = rig.duty_history.iter().map(|d| d[0]).collect();
    seen.dedup();
    assert_eq!(seen, (0..=20).map(|i| i * 5).collect::<Vec<u8>>());
    assert!(change_gaps(&rig.duty_history).iter().all(|&g| g == 20));
}

#[test]
fn running_led_follows_enable() {
    let mut rig = Rig::new();
    rig.tap(Button::Enable);
    assert!(rig.hw.line(OutputLine::RunningLed));
    rig.tap(Button::Enable);
    assert!(!rig.hw.line(OutputLine::RunningLed));
}

#[test]
fn power_led_blinks_while_running() {
    let mut rig = Rig::new();
    rig.run(2_000);
    assert_eq!(
        rig.hw.writes_to(OutputLine::PowerLed),
        vec![false, true, false, true, false]
    );
}

#[test]
fn tap_disable_ramps_down_to_zero() {
    let mut rig = Rig::new();
    rig.enable_and_settle();

    let start = rig.duty_history.len();
    rig.tap(Button::Enable);
    assert!(!rig.status().motor_enabled);
    rig.run(100 * 20 + 100);

    assert_eq!(rig.hw.duty, [0, 0]);
    assert!(rig.sink.contains(&DriveEvent::MotorDisabled));
    assert!(rig.sink.contains(&DriveEvent::RampSettled { duty: 0 }));

    let tail = &rig.duty_history[start..];
    assert!(tail.windows(2).all(|w| w[1][0] <= w[0][0]));
    assert!(tail.windows(2).all(|w| w[0][0] - w[1][0] <= 1));
}

#[test]
fn re_enable_during_soft_stop_climbs_from_current_duty() {
    let mut rig = Rig::new();
    rig.enable_and_settle();
    rig.tap(Button::Enable);
    rig.run(400);
    let coasting = rig.status().duty;
    assert!(coasting > 0 && coasting < 100);

    rig.tap(Button::Enable);
    rig.run(500);
    assert_eq!(rig.status().duty, 100);
}

#[test]
fn select_led_lit_only_while_hold_confirmed() {
    let mut rig = Rig::new();
    rig.enable_and_settle();

    rig.hw.press(Button::Enable);
    rig.run(ENABLE_HOLD_TICKS);
    assert_eq!(rig.status().enable_button, EnableButtonState::HeldConfirmed);
    assert!(rig.hw.line(OutputLine::SelectLed));
    assert!(rig.sink.contains(&DriveEvent::DirectionSelectArmed));

    rig.hw.release(Button::Enable);
    rig.run(TAP_TICKS);
    assert!(!rig.hw.line(OutputLine::SelectLed));
}

#[test]
fn hold_does_not_toggle_enable() {
    let mut rig = Rig::new();
    rig.hold(Button::Enable, ENABLE_HOLD_TICKS);
    assert!(!rig.status().motor_enabled);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, DriveEvent::MotorEnabled | DriveEvent::MotorDisabled)),
        0
    );
    assert!(rig.sink.contains(&DriveEvent::GestureIgnored(
        IgnoredGesture::DirectionWhileDisabled
    )));
}

#[test]
fn polling_without_ticks_or_input_changes_is_idempotent() {
    let mut rig = Rig::new();
    rig.tap(Button::Enable);
    rig.run(37);

    let status = rig.status();
    let calls = rig.hw.calls.len();
    let events = rig.sink.events.len();
    for _ in 0..50 {
        rig.ctl.poll(&mut rig.hw, &mut rig.sink);
    }

    assert_eq!(rig.status(), status);
    assert_eq!(rig.hw.calls.len(), calls);
    assert_eq!(rig.sink.events.len(), events);
}

#[test]
fn pwm_writes_always_come_in_matched_pairs() {
    let mut rig = Rig::new();
    rig.enable_and_settle();
    rig.hold(Button::Enable, ENABLE_HOLD_TICKS);
    rig.run(200);
    rig.tap(Button::Enable);
    rig.run(500);

    let duties: Vec<_> = rig
        .hw
        .calls
        .iter()
        .filter_map(|c| match c {
            OutputCall::Duty(ch, d) => Some((*ch, *d)),
            OutputCall::Line(..) => None,
        })
        .collect();
    assert_eq!(duties.len() % 2, 0);
    for pair in duties.chunks(2) {
        assert_eq!(pair[0].1, pair[1].1);
        assert_ne!(pair[0].0, pair[1].0);
    }
}
