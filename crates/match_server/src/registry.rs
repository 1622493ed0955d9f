//! The match registry: every waiting player and live match, behind one lock.
//!
//! All state lives in [`Tables`]. Callers never hold a reference to a match
//! across lock acquisitions; they re-resolve by connection or match id inside
//! each [`MatchStore::with_lock`] call, so a match that ended in between is
//! simply not found.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use chess_core::Color;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::session::{ConnId, GameEnd, Match, MatchId, Termination, WaitingEntry};

/// Lock-protected server state.
pub struct Tables {
    waiting: VecDeque<WaitingEntry>,
    matches: HashMap<MatchId, Match>,
    by_conn: HashMap<ConnId, MatchId>,
    rng: StdRng,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectOutcome {
    QueueRemoved,
    MatchEnded(GameEnd),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryStats {
    pub waiting: usize,
    pub active: usize,
}

impl Tables {
    pub fn new(rng: StdRng) -> Self {
        Self {
            waiting: VecDeque::new(),
            matches: HashMap::new(),
            by_conn: HashMap::new(),
            rng,
        }
    }

    /// Queued players, oldest first.
    pub fn waiting(&self) -> impl Iterator<Item = &WaitingEntry> {
        self.waiting.iter()
    }

    pub fn is_queued(&self, conn: ConnId) -> bool {
        self.waiting().any(|w| w.conn == conn)
    }

    pub(crate) fn push_waiting(&mut self, entry: WaitingEntry) {
        self.waiting.push_back(entry);
    }

    pub(crate) fn pop_oldest_waiting(&mut self) -> Option<WaitingEntry> {
        self.waiting.pop_front()
    }

    pub(crate) fn remove_waiting(&mut self, conn: ConnId) -> Option<WaitingEntry> {
        let pos = self.waiting.iter().position(|w| w.conn == conn)?;
        self.waiting.remove(pos)
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Register a freshly paired match and index both participants.
    pub(crate) fn insert(&mut self, m: Match) {
        self.by_conn.insert(m.white.conn, m.id.clone());
        self.by_conn.insert(m.black.conn, m.id.clone());
        self.matches.insert(m.id.clone(), m);
    }

    /// The active match `conn` plays in.
    pub fn find_by_participant(&self, conn: ConnId) -> Option<&Match> {
        let id = self.by_conn.get(&conn)?;
        self.matches.get(id).filter(|m| m.active)
    }

    pub fn find_by_participant_mut(&mut self, conn: ConnId) -> Option<&mut Match> {
        let id = self.by_conn.get(&conn)?;
        self.matches.get_mut(id).filter(|m| m.active)
    }

    /// Id of `conn`'s active match and the color it plays.
    pub fn locate(&self, conn: ConnId) -> Option<(MatchId, Color)> {
        let m = self.find_by_participant(conn)?;
        Some((m.id.clone(), m.color_of(conn)?))
    }

    pub fn get(&self, id: &MatchId) -> Option<&Match> {
        self.matches.get(id)
    }

    pub fn get_mut(&mut self, id: &MatchId) -> Option<&mut Match> {
        self.matches.get_mut(id)
    }

    pub fn active_matches_mut(&mut self) -> impl Iterator<Item = &mut Match> {
        self.matches.values_mut().filter(|m| m.active)
    }

    /// Drop a match and its participant index entries.
    pub fn remove(&mut self, id: &MatchId) -> Option<Match> {
        let m = self.matches.remove(id)?;
        for conn in [m.white.conn, m.black.conn] {
            if self.by_conn.get(&conn) == Some(id) {
                self.by_conn.remove(&conn);
            }
        }
        Some(m)
    }

    /// Mark a match inactive and free its slot. Returns `None` if the match
    /// was already gone, so only the first of two racing terminations wins.
    pub fn finish(&mut self, id: &MatchId, termination: Termination) -> Option<GameEnd> {
        let mut m = self.remove(id)?;
        if !m.active {
            return None;
        }
        m.active = false;
        info!(
            match_id = %m.id,
            reason = termination.reason(),
            result = termination.result().pgn_token(),
            moves = m.history.len(),
            "match finished"
        );
        Some(GameEnd {
            match_id: m.id,
            termination,
            white: m.white,
            black: m.black,
            final_fen: m.board.to_fen(),
            moves: m.history,
        })
    }

    /// Drop every trace of `conn`: its queue entry, or the match it plays in,
    /// which the opponent then wins.
    pub fn disconnect(&mut self, conn: ConnId) -> DisconnectOutcome {
        if self.remove_waiting(conn).is_some() {
            debug!(%conn, "disconnected while waiting");
            return DisconnectOutcome::QueueRemoved;
        }
        let Some((id, color)) = self.locate(conn) else {
            return DisconnectOutcome::NotFound;
        };
        match self.finish(&id, Termination::Disconnect { winner: color.other() }) {
            Some(end) => DisconnectOutcome::MatchEnded(end),
            None => DisconnectOutcome::NotFound,
        }
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            waiting: self.waiting.len(),
            active: self.matches.values().filter(|m| m.active).count(),
        }
    }

    /// Dump the queue and match tables at info level.
    pub fn log_status(&self, now_ms: u64) {
        let stats = self.stats();
        info!(waiting = stats.waiting, active = stats.active, "registry status");
        for w in self.waiting() {
            info!(
                conn = %w.conn,
                name = %w.name,
                waited_ms = now_ms.saturating_sub(w.enqueued_at_ms),
                "waiting"
            );
        }
        for m in self.matches.values() {
            info!(
                match_id = %m.id,
                white = %m.white.name,
                black = %m.black.name,
                to_move = m.board.side_to_move.name(),
                white_ms = m.white_remaining_ms,
                black_ms = m.black_remaining_ms,
                moves = m.history.len(),
                "match"
            );
        }
    }
}

/// Lock-scoped access to [`Tables`]. Everything a request reads or writes
/// happens inside a single `with_lock` call.
pub trait MatchStore: Send + Sync {
    fn with_lock<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R;
}

/// The `Mutex`-backed store.
pub struct Registry {
    tables: Mutex<Tables>,
}

impl Registry {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic color assignment, for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            tables: Mutex::new(Tables::new(rng)),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchStore for Registry {
    fn with_lock<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        // A panic inside another critical section leaves the tables usable.
        let mut guard = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl<S: MatchStore> MatchStore for Arc<S> {
    fn with_lock<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        (**self).with_lock(f)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod registry_tests;
