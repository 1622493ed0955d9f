//! Outbound notifications and the sink they are handed to.

use std::sync::mpsc::{self, Receiver, Sender};

use chess_core::Color;
use serde::Serialize;
use tracing::{info, warn};

use crate::matchmaking::MatchStart;
use crate::session::{ClockState, ConnId, GameEnd, Side};

/// A message for one connection. Serialized as internally tagged JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    MatchStarted {
        match_id: String,
        color: Side,
        opponent: String,
        clock: ClockState,
    },
    MoveMade {
        match_id: String,
        player: String,
        from: String,
        to: String,
        fen: String,
        check: bool,
        clock: ClockState,
    },
    GameEnded {
        match_id: String,
        reason: String,
        winner: Option<Side>,
        result: String,
        /// The player whose loss, resignation or departure ended the game.
        player: Option<String>,
        final_fen: String,
    },
    Chat {
        match_id: String,
        player: String,
        message: String,
    },
}

impl ServerEvent {
    pub fn game_ended(end: &GameEnd) -> Self {
        ServerEvent::GameEnded {
            match_id: end.match_id.to_string(),
            reason: end.termination.reason().to_string(),
            winner: end.termination.winner().map(Side::from),
            result: end.result().pgn_token().to_string(),
            player: end.loser().map(|p| p.name.clone()),
            final_fen: end.final_fen.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// The protocol layer's outbound side. Called while the registry lock is
/// held, so implementations must hand off and return.
pub trait Notifier: Send + Sync {
    fn notify(&self, conn: ConnId, event: &ServerEvent);
}

/// Forwards every event into an `mpsc` channel.
pub struct ChannelNotifier {
    tx: Sender<(ConnId, ServerEvent)>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, Receiver<(ConnId, ServerEvent)>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, conn: ConnId, event: &ServerEvent) {
        if self.tx.send((conn, event.clone())).is_err() {
            warn!(%conn, "event receiver dropped");
        }
    }
}

/// Writes each event as a JSON line through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, conn: ConnId, event: &ServerEvent) {
        match event.to_json() {
            Ok(json) => info!(%conn, event = %json, "notify"),
            Err(e) => warn!(%conn, error = %e, "unserializable event"),
        }
    }
}

/// Tell everyone still reachable how a match ended.
pub fn broadcast_game_end(notifier: &dyn Notifier, end: &GameEnd) {
    let event = ServerEvent::game_ended(end);
    for conn in end.recipients() {
        notifier.notify(conn, &event);
    }
}

/// One `MatchStarted` per participant, each with its own color.
pub fn match_started_events(start: &MatchStart) -> [(ConnId, ServerEvent); 2] {
    [Color::White, Color::Black].map(|color| {
        let opponent = start.participant(color.other());
        let event = ServerEvent::MatchStarted {
            match_id: start.match_id.to_string(),
            color: color.into(),
            opponent: opponent.name.clone(),
            clock: start.clock,
        };
        (start.participant(color).conn, event)
    })
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod events_tests;
