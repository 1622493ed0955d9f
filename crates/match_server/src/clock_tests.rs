use chess_core::{Color, Coord};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::events::ChannelNotifier;
use crate::matchmaking::{MatchOutcome, enqueue};
use crate::registry::Registry;

fn paired(limit_ms: u64) -> (Tables, MatchId) {
    let mut t = Tables::new(StdRng::seed_from_u64(5));
    enqueue(&mut t, crate::session::ConnId(1), "alice", 0, limit_ms);
    match enqueue(&mut t, crate::session::ConnId(2), "bob", 0, limit_ms) {
        MatchOutcome::Started(s) => (t, s.match_id),
        other => panic!("expected pairing, got {other:?}"),
    }
}

#[test]
fn manual_clock_moves_only_when_told() {
    let c = ManualClock::new(10);
    assert_eq!(c.now_ms(), 10);
    c.advance(90);
    assert_eq!(c.now_ms(), 100);
    c.set(5);
    assert_eq!(c.now_ms(), 5);
}

#[test]
fn system_clock_is_monotonic() {
    let c = SystemClock::new();
    let a = c.now_ms();
    let b = c.now_ms();
    assert!(b >= a);
}

#[test]
fn tick_charges_side_to_move_only() {
    let (mut t, id) = paired(10_000);
    assert!(tick(&mut t, 1_500, 100).is_empty());
    let m = t.get(&id).unwrap();
    assert_eq!(m.white_remaining_ms, 8_500);
    assert_eq!(m.black_remaining_ms, 10_000);
    assert_eq!(m.last_tick_ms, 1_500);
}

#[test]
fn tick_skips_recently_charged_matches() {
    let (mut t, id) = paired(10_000);
    tick(&mut t, 1_000, 100);
    tick(&mut t, 1_050, 100);
    let m = t.get(&id).unwrap();
    assert_eq!(m.white_remaining_ms, 9_000);
    assert_eq!(m.last_tick_ms, 1_000);

    // The skipped 50ms is charged on the next pass.
    tick(&mut t, 1_100, 100);
    assert_eq!(t.get(&id).unwrap().white_remaining_ms, 8_900);
}

#[test]
fn tick_follows_the_side_to_move() {
    let (mut t, id) = paired(10_000);
    tick(&mut t, 2_000, 100);
    {
        let m = t.get_mut(&id).unwrap();
        m.board
            .apply_move(Coord::parse("e2").unwrap(), Coord::parse("e4").unwrap());
        m.last_move_ms = 2_000;
    }
    tick(&mut t, 5_000, 100);
    let m = t.get(&id).unwrap();
    assert_eq!(m.white_remaining_ms, 8_000);
    assert_eq!(m.black_remaining_ms, 7_000);
}

#[test]
fn flag_fall_ends_match_for_the_opponent() {
    let (mut t, id) = paired(1_000);
    let ends = tick(&mut t, 1_200, 100);
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].match_id, id);
    assert_eq!(ends[0].termination, Termination::Timeout { winner: Color::Black });
    assert!(t.get(&id).is_none());

    // Nothing left to time out.
    assert!(tick(&mut t, 5_000, 100).is_empty());
}

#[test]
fn runner_delivers_timeouts_and_stops() {
    let store = Arc::new(Registry::with_seed(2));
    let clock = Arc::new(ManualClock::new(0));
    let (notifier, rx) = ChannelNotifier::new();

    store.with_lock(|t| {
        enqueue(t, crate::session::ConnId(1), "alice", 0, 500);
        enqueue(t, crate::session::ConnId(2), "bob", 0, 500);
    });
    clock.set(1_000);

    let runner = ClockRunner::spawn(
        Arc::clone(&store),
        clock.clone(),
        Arc::new(notifier),
        Duration::from_millis(5),
        100,
    )
    .unwrap();
    assert!(runner.is_running());

    let (_, first) = rx.recv_timeout(Duration::from_secs(5)).expect("game end event");
    let (_, second) = rx.recv_timeout(Duration::from_secs(5)).expect("game end event");
    runner.stop();

    for event in [first, second] {
        assert!(
            matches!(event, crate::events::ServerEvent::GameEnded { ref reason, .. } if reason == "timeout"),
            "{event:?}"
        );
    }
    assert_eq!(store.with_lock(|t| t.stats().active), 0);
}
