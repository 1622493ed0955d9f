mod common;

use std::time::Duration;

use chess_core::Color;
use match_server::{MoveOutcome, ServerConfig, ServerEvent, Side, Termination};

use common::{paired, paired_with};

fn fast_config() -> ServerConfig {
    ServerConfig {
        time_limit_secs: 1,
        tick_interval_ms: 5,
        ..ServerConfig::default()
    }
}

#[test]
fn clocks_only_run_for_the_side_to_move() {
    let t = paired();
    t.clock.set(10_000);
    t.service.tick();
    assert!(t.service.submit_move(t.white, "e2", "e4").is_accepted());

    t.clock.set(25_000);
    t.service.tick();
    let clock = t.service.snapshot(t.white).unwrap().clock;
    assert_eq!(clock.white_ms, 590_000);
    assert_eq!(clock.black_ms, 585_000);
}

#[test]
fn flag_fall_removes_the_match() {
    let t = paired_with(fast_config());
    t.clock.set(60_000);
    let ends = t.service.tick();
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].termination, Termination::Timeout { winner: Color::Black });
    assert!(t.service.snapshot(t.white).is_none());
}

#[test]
fn background_runner_flags_the_idle_player() {
    let t = paired_with(fast_config());
    let runner = t.service.start_clock().unwrap();

    assert!(t.service.submit_move(t.white, "d2", "d4").is_accepted());
    t.drain();
    t.clock.advance(1_500);

    let mut ended = Vec::new();
    while ended.len() < 2 {
        let (conn, event) = t
            .events
            .recv_timeout(Duration::from_secs(5))
            .expect("timeout event");
        if let ServerEvent::GameEnded { reason, winner, .. } = event {
            assert_eq!(reason, "timeout");
            assert_eq!(winner, Some(Side::White));
            ended.push(conn);
        }
    }
    runner.stop();

    ended.sort();
    let mut expected = vec![t.white, t.black];
    expected.sort();
    assert_eq!(ended, expected);
    assert_eq!(
        t.service.submit_move(t.black, "d7", "d5"),
        MoveOutcome::Rejected(match_server::RejectReason::NotInMatch)
    );
}
