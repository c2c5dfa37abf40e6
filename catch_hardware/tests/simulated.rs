use std::time::Duration;

use catch_hardware::error::HwError;
use catch_hardware::util::wait_for_byte;
use catch_hardware::{FrameBuffer, LoggingBuzzer, ScriptedNavSwitch, SimulatedLink};
use catch_traits::{Buzzer, DotMatrix, NavEvent, NavSwitch, SerialLink, TextMode};
use rstest::rstest;

#[rstest]
#[case(7, 0)]
#[case(0, 5)]
#[case(200, 200)]
fn frame_buffer_rejects_cells_outside(#[case] row: u8, #[case] col: u8) {
    let mut fb = FrameBuffer::new(7, 5);
    let err = fb.set_cell(row, col, true).expect_err("out of bounds");
    assert!(matches!(
        err.downcast_ref::<HwError>(),
        Some(HwError::OutOfBounds { .. })
    ));
}

#[test]
fn clear_drops_cells_and_text() {
    let mut fb = FrameBuffer::new(7, 5);
    fb.set_text_mode(TextMode::Step).unwrap();
    fb.show_text("2").unwrap();
    fb.set_cell(3, 4, true).unwrap();
    fb.refresh().unwrap();
    assert_eq!(fb.text(), Some("2"));
    fb.clear().unwrap();
    fb.refresh().unwrap();
    assert_eq!(fb.text(), None);
    assert!(!fb.lit(3, 4));
    assert_eq!(fb.mode(), TextMode::Step);
    assert_eq!(fb.frames(), 2);
}

#[test]
fn scripted_nav_reports_due_events_once() {
    let mut nav = ScriptedNavSwitch::new([
        (10, NavEvent::Push),
        (0, NavEvent::West),
        (10, NavEvent::North),
    ]);
    let mut events = Vec::new();
    nav.poll(&mut events).unwrap();
    assert_eq!(events, vec![NavEvent::West]);

    events.clear();
    nav.advance_to(9);
    nav.poll(&mut events).unwrap();
    assert!(events.is_empty());

    nav.advance_to(25);
    nav.poll(&mut events).unwrap();
    assert_eq!(events, vec![NavEvent::Push, NavEvent::North]);
    assert_eq!(nav.remaining(), 0);
}

#[test]
fn link_preserves_order_and_peek() {
    let (mut a, mut b) = SimulatedLink::pair();
    for byte in [1, 2, 0xF0] {
        a.try_send(byte).unwrap();
    }
    assert_eq!(b.pending(), 3);
    assert!(b.byte_ready());
    assert!(b.byte_ready());
    assert_eq!(b.pending(), 3);
    let got: Vec<u8> = (0..3).map(|_| b.receive_byte().unwrap()).collect();
    assert_eq!(got, vec![1, 2, 0xF0]);
    let err = b.receive_byte().expect_err("empty");
    assert!(matches!(err.downcast_ref::<HwError>(), Some(HwError::NoByte)));
}

#[test]
fn dropped_peer_closes_the_link() {
    let (mut a, b) = SimulatedLink::pair();
    drop(b);
    let err = a.try_send(1).expect_err("peer gone");
    assert!(matches!(err.downcast_ref::<HwError>(), Some(HwError::LinkClosed)));
}

#[test]
fn link_works_across_threads() {
    let (mut a, mut b) = SimulatedLink::pair();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(3));
        a.try_send(4).unwrap();
        a
    });
    let byte = wait_for_byte(&mut b, Duration::from_millis(500), Duration::from_micros(200))
        .expect("byte within timeout");
    assert_eq!(byte, 4);
    let _a = handle.join().unwrap();
}

#[test]
fn wait_for_byte_times_out() {
    let (_a, mut b) = SimulatedLink::pair();
    let err = wait_for_byte(&mut b, Duration::from_millis(5), Duration::from_micros(200))
        .expect_err("expected timeout");
    match err {
        HwError::NoByte => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn buzzer_tracks_current_sequence() {
    let mut bz = LoggingBuzzer::default();
    bz.play_sequence("C").unwrap();
    assert_eq!(bz.current(), Some("C"));
    bz.play_sequence("").unwrap();
    assert_eq!(bz.current(), None);
    assert_eq!(bz.history(), &["C".to_string(), String::new()]);
}
