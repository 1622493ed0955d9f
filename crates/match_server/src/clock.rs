//! Game clocks.
//!
//! Time is charged in one place only: [`tick`], run periodically by the
//! [`ClockRunner`] thread. It subtracts the time since the previous charge
//! from the side to move and ends the match on a flag fall. Accepted moves
//! merely stamp `last_move_ms`.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::events::{Notifier, broadcast_game_end};
use crate::registry::{MatchStore, Tables};
use crate::session::{GameEnd, MatchId, Termination};

/// Monotonic milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time since construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Charge elapsed time to every active match and finish those whose side to
/// move ran out. Matches charged less than `min_interval_ms` ago are skipped.
pub fn tick(tables: &mut Tables, now_ms: u64, min_interval_ms: u64) -> Vec<GameEnd> {
    let mut flagged: Vec<(MatchId, Termination)> = Vec::new();

    for m in tables.active_matches_mut() {
        let elapsed = now_ms.saturating_sub(m.last_tick_ms);
        if elapsed < min_interval_ms {
            continue;
        }
        m.last_tick_ms = now_ms;

        let side = m.board.side_to_move;
        let remaining = m.remaining_mut(side);
        *remaining = remaining.saturating_sub(elapsed);
        if *remaining == 0 {
            info!(match_id = %m.id, loser = side.name(), "flag fell");
            flagged.push((m.id.clone(), Termination::Timeout { winner: side.other() }));
        }
    }

    flagged
        .into_iter()
        .filter_map(|(id, termination)| tables.finish(&id, termination))
        .collect()
}

/// The background thread driving [`tick`].
pub struct ClockRunner {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ClockRunner {
    pub fn spawn<S>(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
        min_interval_ms: u64,
    ) -> io::Result<Self>
    where
        S: MatchStore + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("match-clock".to_string())
            .spawn(move || {
                debug!(?interval, "clock thread started");
                while !stop_flag.load(Ordering::Relaxed) {
                    thread::sleep(interval);
                    if stop_flag.load(Ordering::Relaxed) {
                        break;
                    }
                    let now = clock.now_ms();
                    store.with_lock(|tables| {
                        for end in tick(tables, now, min_interval_ms) {
                            broadcast_game_end(notifier.as_ref(), &end);
                        }
                    });
                }
                debug!("clock thread stopped");
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ClockRunner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod clock_tests;
