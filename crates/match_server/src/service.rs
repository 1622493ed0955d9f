//! The request-facing side of the server.
//!
//! Each operation resolves its match from the connection id and does all of
//! its reading and writing inside one [`MatchStore::with_lock`] call.
//! Notifications are handed to the [`Notifier`] from inside that same
//! critical section, so the order players see events in matches the order
//! the state changed in.

use std::io;
use std::sync::Arc;

use chess_core::{AppliedMove, Color, Coord, GameStatus, evaluate};
use tracing::{debug, info};

use crate::clock::{self, Clock, ClockRunner, SystemClock};
use crate::config::ServerConfig;
use crate::error::{RejectReason, RequestError};
use crate::events::{Notifier, ServerEvent, broadcast_game_end, match_started_events};
use crate::matchmaking::{self, CancelOutcome, MatchOutcome};
use crate::registry::{DisconnectOutcome, MatchStore, Registry, RegistryStats, Tables};
use crate::session::{
    ClockState, ConnId, GameEnd, MatchId, MoveRecord, Participant, Termination,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Started {
    pub match_id: MatchId,
    pub color: Color,
    pub opponent: String,
    pub clock: ClockState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMatchOutcome {
    Waiting,
    Started(Started),
    Error(RequestError),
}

/// What an accepted move did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub match_id: MatchId,
    pub mover: Color,
    pub applied: AppliedMove,
    pub fen: String,
    /// The side now to move is in check.
    pub check: bool,
    pub clock: ClockState,
    pub white: Participant,
    pub black: Participant,
    /// Set when this move ended the game.
    pub ended: Option<GameEnd>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Accepted(MoveReport),
    Rejected(RejectReason),
}

impl MoveOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResignOutcome {
    Resigned { winner: Color },
    NotInMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Delivered,
    NotInMatch,
    Rejected(RequestError),
}

/// Read-only view of a player's current match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSnapshot {
    pub match_id: MatchId,
    pub color: Color,
    pub opponent: String,
    pub fen: String,
    pub side_to_move: Color,
    pub clock: ClockState,
    pub moves: Vec<String>,
}

pub struct MatchService<S: MatchStore = Registry> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    config: ServerConfig,
}

impl MatchService<Registry> {
    /// A service over a fresh registry and the system clock.
    pub fn new(config: ServerConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_parts(
            Arc::new(Registry::new()),
            Arc::new(SystemClock::new()),
            notifier,
            config,
        )
    }
}

impl<S: MatchStore> MatchService<S> {
    pub fn with_parts(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        config: ServerConfig,
    ) -> Self {
        Self {
            store,
            clock,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn request_match(&self, conn: ConnId, player_id: &str) -> RequestMatchOutcome {
        let name = player_id.trim();
        if name.is_empty() {
            return RequestMatchOutcome::Error(RequestError::MissingPlayerId);
        }
        let max = self.config.max_name_len;
        if name.chars().count() > max {
            return RequestMatchOutcome::Error(RequestError::PlayerIdTooLong { max });
        }

        let now = self.clock.now_ms();
        let limit = self.config.time_limit_ms();
        self.store.with_lock(|tables| {
            match matchmaking::enqueue(tables, conn, name, now, limit) {
                MatchOutcome::Waiting => RequestMatchOutcome::Waiting,
                MatchOutcome::AlreadyQueued => {
                    RequestMatchOutcome::Error(RequestError::AlreadyQueued)
                }
                MatchOutcome::AlreadyInMatch => {
                    RequestMatchOutcome::Error(RequestError::AlreadyInMatch)
                }
                MatchOutcome::Started(start) => {
                    for (to, event) in match_started_events(&start) {
                        self.notifier.notify(to, &event);
                    }
                    let color = if start.white.conn == conn {
                        Color::White
                    } else {
                        Color::Black
                    };
                    RequestMatchOutcome::Started(Started {
                        opponent: start.participant(color.other()).name.clone(),
                        match_id: start.match_id,
                        color,
                        clock: start.clock,
                    })
                }
            }
        })
    }

    pub fn cancel_match(&self, conn: ConnId) -> CancelOutcome {
        self.store.with_lock(|tables| matchmaking::cancel(tables, conn))
    }

    /// Validate and play `from`-`to` for the player on `conn`.
    pub fn submit_move(&self, conn: ConnId, from: &str, to: &str) -> MoveOutcome {
        let now = self.clock.now_ms();
        self.store.with_lock(|tables| match play_move(tables, conn, from, to, now) {
            Ok(report) => {
                let event = ServerEvent::MoveMade {
                    match_id: report.match_id.to_string(),
                    player: report.participant(report.mover).name.clone(),
                    from: report.applied.from.to_string(),
                    to: report.applied.to.to_string(),
                    fen: report.fen.clone(),
                    check: report.check,
                    clock: report.clock,
                };
                self.notifier.notify(report.white.conn, &event);
                self.notifier.notify(report.black.conn, &event);
                if let Some(end) = &report.ended {
                    broadcast_game_end(self.notifier.as_ref(), end);
                }
                MoveOutcome::Accepted(report)
            }
            Err(reason) => {
                debug!(%conn, from, to, %reason, "move rejected");
                MoveOutcome::Rejected(reason)
            }
        })
    }

    pub fn resign(&self, conn: ConnId) -> ResignOutcome {
        self.store.with_lock(|tables| {
            let Some((id, color)) = tables.locate(conn) else {
                return ResignOutcome::NotInMatch;
            };
            let winner = color.other();
            match tables.finish(&id, Termination::Resignation { winner }) {
                Some(end) => {
                    broadcast_game_end(self.notifier.as_ref(), &end);
                    ResignOutcome::Resigned { winner }
                }
                None => ResignOutcome::NotInMatch,
            }
        })
    }

    /// Forget `conn`. Its opponent, if any, wins.
    pub fn on_disconnect(&self, conn: ConnId) -> DisconnectOutcome {
        self.store.with_lock(|tables| {
            let outcome = tables.disconnect(conn);
            if let DisconnectOutcome::MatchEnded(end) = &outcome {
                broadcast_game_end(self.notifier.as_ref(), end);
            }
            outcome
        })
    }

    /// Relay a chat line to both participants of `conn`'s match.
    pub fn send_chat(&self, conn: ConnId, text: &str) -> ChatOutcome {
        let text = text.trim();
        if text.is_empty() {
            return ChatOutcome::Rejected(RequestError::EmptyMessage);
        }
        let max = self.config.max_chat_len;
        if text.chars().count() > max {
            return ChatOutcome::Rejected(RequestError::MessageTooLong { max });
        }

        self.store.with_lock(|tables| {
            let Some(m) = tables.find_by_participant(conn) else {
                return ChatOutcome::NotInMatch;
            };
            let Some(color) = m.color_of(conn) else {
                return ChatOutcome::NotInMatch;
            };
            let event = ServerEvent::Chat {
                match_id: m.id.to_string(),
                player: m.participant(color).name.clone(),
                message: text.to_string(),
            };
            self.notifier.notify(m.white.conn, &event);
            self.notifier.notify(m.black.conn, &event);
            ChatOutcome::Delivered
        })
    }

    pub fn snapshot(&self, conn: ConnId) -> Option<MatchSnapshot> {
        self.store.with_lock(|tables| {
            let m = tables.find_by_participant(conn)?;
            let color = m.color_of(conn)?;
            Some(MatchSnapshot {
                match_id: m.id.clone(),
                color,
                opponent: m.participant(color.other()).name.clone(),
                fen: m.board.to_fen(),
                side_to_move: m.board.side_to_move,
                clock: m.clock_state(),
                moves: m.history.iter().map(MoveRecord::to_string).collect(),
            })
        })
    }

    pub fn stats(&self) -> RegistryStats {
        self.store.with_lock(|tables| tables.stats())
    }

    pub fn log_status(&self) {
        let now = self.clock.now_ms();
        self.store.with_lock(|tables| tables.log_status(now));
    }

    /// One clock pass at the current time.
    pub fn tick(&self) -> Vec<GameEnd> {
        let now = self.clock.now_ms();
        let min = self.config.min_tick_ms;
        self.store.with_lock(|tables| {
            let ends = clock::tick(tables, now, min);
            for end in &ends {
                broadcast_game_end(self.notifier.as_ref(), end);
            }
            ends
        })
    }

    /// Spawn the background clock thread.
    pub fn start_clock(&self) -> io::Result<ClockRunner>
    where
        S: 'static,
    {
        info!(
            interval_ms = self.config.tick_interval_ms,
            time_limit_secs = self.config.time_limit_secs,
            "starting clock"
        );
        ClockRunner::spawn(
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
            Arc::clone(&self.notifier),
            self.config.tick_interval(),
            self.config.min_tick_ms,
        )
    }
}

impl MoveReport {
    pub fn participant(&self, c: Color) -> &Participant {
        match c {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

fn parse_square(s: &str) -> Result<Coord, RejectReason> {
    let s = s.trim();
    Coord::parse(s).ok_or_else(|| RejectReason::InvalidCoordinate(s.to_string()))
}

/// Resolve, check and apply one move against the locked tables.
fn play_move(
    tables: &mut Tables,
    conn: ConnId,
    from: &str,
    to: &str,
    now_ms: u64,
) -> Result<MoveReport, RejectReason> {
    let m = tables
        .find_by_participant_mut(conn)
        .ok_or(RejectReason::NotInMatch)?;
    let mover = m.color_of(conn).ok_or(RejectReason::NotInMatch)?;
    if m.board.side_to_move != mover {
        return Err(RejectReason::NotYourTurn);
    }

    let from = parse_square(from)?;
    let to = parse_square(to)?;
    let illegal = || RejectReason::IllegalMove {
        from: from.to_string(),
        to: to.to_string(),
    };
    if !m.board.is_legal(from, to) {
        return Err(illegal());
    }
    let applied = m.board.apply_move(from, to).ok_or_else(illegal)?;

    m.last_move_ms = now_ms;
    m.history.push(MoveRecord { by: mover, from, to });
    debug!(match_id = %m.id, mover = mover.name(), mv = %format!("{from}{to}"), "move applied");

    let termination = match evaluate(&m.board) {
        GameStatus::Ongoing => None,
        GameStatus::Checkmate { winner } => Some(Termination::Checkmate { winner }),
        GameStatus::Stalemate => Some(Termination::Stalemate),
        GameStatus::FiftyMoveRule => Some(Termination::FiftyMoveRule),
    };

    let mut report = MoveReport {
        match_id: m.id.clone(),
        mover,
        applied,
        fen: m.board.to_fen(),
        check: m.board.in_check(m.board.side_to_move),
        clock: m.clock_state(),
        white: m.white.clone(),
        black: m.black.clone(),
        ended: None,
    };
    if let Some(termination) = termination {
        report.ended = tables.finish(&report.match_id, termination);
        report.clock.running = None;
    }
    Ok(report)
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
