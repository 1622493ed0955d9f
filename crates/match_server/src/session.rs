//! Session records owned by the registry: waiting entries, matches and the
//! way a match ended.

use std::fmt;

use chess_core::{Board, Color, Coord, GameResult};
use serde::Serialize;

/// Connection identifier handed to us by the protocol layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConnId(pub u64);

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MatchId(pub String);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Color as it appears on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl From<Color> for Side {
    fn from(c: Color) -> Self {
        match c {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub conn: ConnId,
    pub name: String,
}

/// A player who asked for a match and has not been paired yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaitingEntry {
    pub conn: ConnId,
    pub name: String,
    pub enqueued_at_ms: u64,
}

/// Terminal states of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Checkmate { winner: Color },
    Stalemate,
    FiftyMoveRule,
    Resignation { winner: Color },
    Timeout { winner: Color },
    Disconnect { winner: Color },
}

impl Termination {
    pub fn winner(self) -> Option<Color> {
        match self {
            Termination::Checkmate { winner }
            | Termination::Resignation { winner }
            | Termination::Timeout { winner }
            | Termination::Disconnect { winner } => Some(winner),
            Termination::Stalemate | Termination::FiftyMoveRule => None,
        }
    }

    pub fn result(self) -> GameResult {
        match self.winner() {
            Some(c) => GameResult::win_for(c),
            None => GameResult::Draw,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Termination::Checkmate { .. } => "checkmate",
            Termination::Stalemate => "stalemate",
            Termination::FiftyMoveRule => "fifty_move_rule",
            Termination::Resignation { .. } => "resignation",
            Termination::Timeout { .. } => "timeout",
            Termination::Disconnect { .. } => "disconnect",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub by: Color,
    pub from: Coord,
    pub to: Coord,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Clock counters as reported to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ClockState {
    pub white_ms: u64,
    pub black_ms: u64,
    pub time_limit_ms: u64,
    /// Side whose clock is running; `None` once the match is over.
    pub running: Option<Side>,
}

/// One live game between two paired connections.
#[derive(Clone, Debug)]
pub struct Match {
    pub id: MatchId,
    pub white: Participant,
    pub black: Participant,
    pub board: Board,
    pub time_limit_ms: u64,
    pub white_remaining_ms: u64,
    pub black_remaining_ms: u64,
    pub started_at_ms: u64,
    /// Last time the clock task charged elapsed time to this match.
    pub last_tick_ms: u64,
    /// Last accepted move; move handling never touches the counters.
    pub last_move_ms: u64,
    pub history: Vec<MoveRecord>,
    pub active: bool,
}

impl Match {
    pub fn new(
        id: MatchId,
        white: Participant,
        black: Participant,
        now_ms: u64,
        time_limit_ms: u64,
    ) -> Self {
        Self {
            id,
            white,
            black,
            board: Board::standard(),
            time_limit_ms,
            white_remaining_ms: time_limit_ms,
            black_remaining_ms: time_limit_ms,
            started_at_ms: now_ms,
            last_tick_ms: now_ms,
            last_move_ms: now_ms,
            history: Vec::new(),
            active: true,
        }
    }

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

    pub fn remaining_ms(&self, c: Color) -> u64 {
        match c {
            Color::White => self.white_remaining_ms,
            Color::Black => self.black_remaining_ms,
        }
    }

    pub fn remaining_mut(&mut self, c: Color) -> &mut u64 {
        match c {
            Color::White => &mut self.white_remaining_ms,
            Color::Black => &mut self.black_remaining_ms,
        }
    }

    pub fn clock_state(&self) -> ClockState {
        ClockState {
            white_ms: self.white_remaining_ms,
            black_ms: self.black_remaining_ms,
            time_limit_ms: self.time_limit_ms,
            running: self.active.then(|| self.board.side_to_move.into()),
        }
    }
}

/// Everything needed to tell the players how a match ended, captured at the
/// moment the match left the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameEnd {
    pub match_id: MatchId,
    pub termination: Termination,
    pub white: Participant,
    pub black: Participant,
    pub final_fen: String,
    pub moves: Vec<MoveRecord>,
}

impl GameEnd {
    pub fn result(&self) -> GameResult {
        self.termination.result()
    }

    pub fn participant(&self, c: Color) -> &Participant {
        match c {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// The side that lost, if the game was decisive.
    pub fn loser(&self) -> Option<&Participant> {
        self.termination.winner().map(|w| self.participant(w.other()))
    }

    /// Connections that should hear about the end. A disconnected player is
    /// no longer reachable.
    pub fn recipients(&self) -> Vec<ConnId> {
        match self.termination {
            Termination::Disconnect { winner } => vec![self.participant(winner).conn],
            _ => vec![self.white.conn, self.black.conn],
        }
    }
}
