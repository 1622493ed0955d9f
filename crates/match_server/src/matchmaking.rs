//! FIFO pairing of players waiting for an opponent.

use chess_core::Color;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::registry::Tables;
use crate::session::{ClockState, ConnId, Match, MatchId, Participant, WaitingEntry};

/// A freshly created match, as seen by the pairing code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchStart {
    pub match_id: MatchId,
    pub white: Participant,
    pub black: Participant,
    pub clock: ClockState,
}

impl MatchStart {
    pub fn participant(&self, c: Color) -> &Participant {
        match c {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn color_of(&self, conn: ConnId) -> Option<Color> {
        if self.white.conn == conn {
            Some(Color::White)
        } else if self.black.conn == conn {
            Some(Color::Black)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Waiting,
    Started(MatchStart),
    AlreadyQueued,
    AlreadyInMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    NotQueued,
}

fn new_match_id() -> MatchId {
    MatchId(format!("game_{}", Uuid::new_v4().simple()))
}

/// Pair `conn` with the oldest waiting player, or queue it.
pub fn enqueue(
    tables: &mut Tables,
    conn: ConnId,
    name: &str,
    now_ms: u64,
    time_limit_ms: u64,
) -> MatchOutcome {
    if tables.is_queued(conn) {
        return MatchOutcome::AlreadyQueued;
    }
    if tables.find_by_participant(conn).is_some() {
        return MatchOutcome::AlreadyInMatch;
    }

    let Some(opponent) = tables.pop_oldest_waiting() else {
        tables.push_waiting(WaitingEntry {
            conn,
            name: name.to_string(),
            enqueued_at_ms: now_ms,
        });
        info!(%conn, name, "waiting for opponent");
        return MatchOutcome::Waiting;
    };

    let newcomer = Participant {
        conn,
        name: name.to_string(),
    };
    let waiting = Participant {
        conn: opponent.conn,
        name: opponent.name,
    };
    let (white, black) = if tables.rng().gen_bool(0.5) {
        (newcomer, waiting)
    } else {
        (waiting, newcomer)
    };

    let m = Match::new(new_match_id(), white, black, now_ms, time_limit_ms);
    let start = MatchStart {
        match_id: m.id.clone(),
        white: m.white.clone(),
        black: m.black.clone(),
        clock: m.clock_state(),
    };
    info!(
        match_id = %start.match_id,
        white = %start.white.name,
        black = %start.black.name,
        waited_ms = now_ms.saturating_sub(opponent.enqueued_at_ms),
        "match started"
    );
    tables.insert(m);
    MatchOutcome::Started(start)
}

/// Withdraw a queued request. Players already paired are unaffected.
pub fn cancel(tables: &mut Tables, conn: ConnId) -> CancelOutcome {
    match tables.remove_waiting(conn) {
        Some(_) => {
            info!(%conn, "match request cancelled");
            CancelOutcome::Cancelled
        }
        None => CancelOutcome::NotQueued,
    }
}

#[cfg(test)]
#[path = "matchmaking_tests.rs"]
mod matchmaking_tests;
