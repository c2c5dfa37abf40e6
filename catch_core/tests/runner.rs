use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use catch_core::mocks::{MockBoard, mock_pair};
use catch_core::{GameCfg, Outcome, RoundState, RunOptions, run_pair};
use catch_traits::{ManualClock, NavEvent};

/// Scripted round at the default task rates: `a` chooses medium, nudges
/// north and throws; `b` never moves and misses.
fn script(t: u64, a: &mut MockBoard, b: &mut MockBoard) {
    match t {
        0 => {
            a.nav_mut().push(NavEvent::Push);
            b.nav_mut().push(NavEvent::Push);
        }
        100 => a.nav_mut().push(NavEvent::West),
        200 => a.nav_mut().push(NavEvent::Push),
        300 => a.nav_mut().push(NavEvent::North),
        400 => a.nav_mut().push(NavEvent::Push),
        _ => {}
    }
}

#[test]
fn scripted_round_ends_with_a_winning() {
    let (mut a, mut b) = mock_pair(GameCfg::default(), GameCfg::default()).unwrap();
    let opts = RunOptions {
        max_ticks: 5_000,
        stop_when_over: true,
        ..RunOptions::default()
    };
    let report = run_pair(&mut a, &mut b, &opts, script).unwrap();
    assert!(report.ticks < 5_000);
    assert!(!report.interrupted);
    assert_eq!(a.session().state(), RoundState::Over);
    assert_eq!(a.session().outcome(), Some(Outcome::Win));
    assert_eq!(b.session().outcome(), Some(Outcome::Lose));
    assert_eq!(a.session().score(), 1);
}

#[test]
fn paced_run_follows_the_clock() {
    let (mut a, mut b) = mock_pair(GameCfg::default(), GameCfg::default()).unwrap();
    let clock = ManualClock::new();
    let opts = RunOptions {
        max_ticks: 250,
        pace: Some(Arc::new(clock.clone())),
        ..RunOptions::default()
    };
    let report = run_pair(&mut a, &mut b, &opts, |_, _, _| {}).unwrap();
    assert_eq!(report.ticks, 250);
    assert_eq!(report.late_ticks, 0);
    assert_eq!(clock.elapsed(), Duration::from_millis(250));
}

#[test]
fn shutdown_flag_stops_before_first_tick() {
    let (mut a, mut b) = mock_pair(GameCfg::default(), GameCfg::default()).unwrap();
    let opts = RunOptions {
        max_ticks: 1_000,
        shutdown: Some(Arc::new(AtomicBool::new(true))),
        ..RunOptions::default()
    };
    let report = run_pair(&mut a, &mut b, &opts, |_, _, _| {}).unwrap();
    assert!(report.interrupted);
    assert_eq!(report.ticks, 0);
    assert_eq!(a.tick(), 0);
}
