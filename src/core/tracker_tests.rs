// Author: Dustin Pilgrim
// License: MIT

use crate::core::action::Action;
use crate::core::error::Error;
use crate::core::events::Event;
use crate::core::state::TrackerState;
use crate::core::tracker::Tracker;

fn started(at: i64) -> TrackerState {
    let mut state = TrackerState::new();
    state.start(at);
    state
}

fn idle_since(at: i64) -> TrackerState {
    let mut state = TrackerState::new();
    state.start(at);
    // Drive a real transition rather than poking fields: a huge idle sample
    // clamps the idle mark to the interval start.
    let tracker = Tracker::new(0);
    let _ = tracker.handle_event(
        &mut state,
        Event::Tick {
            now: at + 1,
            idle_secs: i64::MAX / 2,
        },
    );
    assert_eq!(state.idled_at(), Some(at));
    state
}

#[test]
fn crossing_the_threshold_backdates_the_idle_start() {
    let tracker = Tracker::new(300);
    let mut state = started(1000);

    // Tick at T0 + W + 30 reporting idle = W + 10: idling actually began
    // 310s ago, i.e. at T0 + 20.
    let actions = tracker
        .handle_event(
            &mut state,
            Event::Tick {
                now: 1330,
                idle_secs: 310,
            },
        )
        .unwrap();

    assert_eq!(
        actions,
        vec![Action::AppendClosed {
            start: 1000,
            end: 1020,
        }]
    );
    assert!(state.is_idle());
    assert_eq!(state.idled_at(), Some(1020));
    assert_eq!(state.active_at(), None);
}

#[test]
fn oversized_idle_sample_clamps_to_interval_start() {
    let tracker = Tracker::new(300);
    let mut state = started(1000);

    // Sensor claims more idle time than the interval has existed.
    let actions = tracker
        .handle_event(
            &mut state,
            Event::Tick {
                now: 1400,
                idle_secs: 600,
            },
        )
        .unwrap();

    assert_eq!(
        actions,
        vec![Action::AppendClosed {
            start: 1000,
            end: 1000,
        }]
    );
    assert_eq!(state.idled_at(), Some(1000));
}

#[test]
fn idle_sample_at_threshold_is_not_a_transition() {
    let tracker = Tracker::new(300);
    let mut state = started(1000);

    let actions = tracker
        .handle_event(
            &mut state,
            Event::Tick {
                now: 1300,
                idle_secs: 300,
            },
        )
        .unwrap();

    assert!(actions.is_empty());
    assert!(state.is_active());
    assert_eq!(state.active_at(), Some(1000));
}

#[test]
fn resume_uses_the_detection_instant_not_a_backdate() {
    let tracker = Tracker::new(300);
    let mut state = idle_since(2000);

    // 100s have passed but the sensor only reports 40s of inactivity, so
    // input resumed somewhere in between.
    let actions = tracker
        .handle_event(
            &mut state,
            Event::Tick {
                now: 2100,
                idle_secs: 40,
            },
        )
        .unwrap();

    assert!(actions.is_empty());
    assert!(state.is_active());
    assert_eq!(state.active_at(), Some(2100));
    assert_eq!(state.idled_at(), None);
}

#[test]
fn stays_idle_while_the_sample_covers_the_whole_gap() {
    let tracker = Tracker::new(300);
    let mut state = idle_since(2000);

    let actions = tracker
        .handle_event(
            &mut state,
            Event::Tick {
                now: 2100,
                idle_secs: 150,
            },
        )
        .unwrap();

    assert!(actions.is_empty());
    assert!(state.is_idle());
    assert_eq!(state.idled_at(), Some(2000));
}

#[test]
fn stop_closes_the_open_interval_with_backdating() {
    let tracker = Tracker::new(300);
    let mut state = started(1000);

    let actions = tracker
        .handle_event(
            &mut state,
            Event::Stop {
                now: 1500,
                idle_secs: 100,
            },
        )
        .unwrap();

    assert_eq!(
        actions,
        vec![Action::AppendClosed {
            start: 1000,
            end: 1400,
        }]
    );
    assert!(state.is_idle());
}

#[test]
fn stop_while_idle_writes_nothing() {
    let tracker = Tracker::new(300);
    let mut state = idle_since(2000);

    let actions = tracker
        .handle_event(
            &mut state,
            Event::Stop {
                now: 2500,
                idle_secs: 10,
            },
        )
        .unwrap();

    assert!(actions.is_empty());
    assert!(state.is_idle());
}

#[test]
fn events_before_start_are_rejected() {
    let tracker = Tracker::new(300);
    let mut state = TrackerState::new();

    let err = tracker
        .handle_event(
            &mut state,
            Event::Tick {
                now: 1000,
                idle_secs: 0,
            },
        )
        .unwrap_err();

    assert_eq!(err, Error::NotStarted);
}

#[test]
fn consecutive_cycles_append_in_order() {
    let tracker = Tracker::new(60);
    let mut state = started(1000);

    // First cycle: active 1000..1100.
    let first = tracker
        .handle_event(
            &mut state,
            Event::Tick {
                now: 1200,
                idle_secs: 100,
            },
        )
        .unwrap();
    assert_eq!(
        first,
        vec![Action::AppendClosed {
            start: 1000,
            end: 1100,
        }]
    );

    // Activity resumes at 1400.
    let _ = tracker
        .handle_event(
            &mut state,
            Event::Tick {
                now: 1400,
                idle_secs: 30,
            },
        )
        .unwrap();
    assert_eq!(state.active_at(), Some(1400));

    // Second cycle closes later with a start not before the first's end.
    let second = tracker
        .handle_event(
            &mut state,
            Event::Tick {
                now: 1600,
                idle_secs: 70,
            },
        )
        .unwrap();
    assert_eq!(
        second,
        vec![Action::AppendClosed {
            start: 1400,
            end: 1530,
        }]
    );
}
