//! Session core of a two-player chess server.
//!
//! Players ask for a match, get paired first come first served, and then
//! submit moves that are checked against `chess_core` before being applied.
//! A single background thread runs the game clocks. Everything shared sits
//! behind one lock in the [`registry`], and every request does its work in a
//! single critical section.
//!
//! The network protocol is not part of this crate: callers hand in a
//! [`ConnId`] with each request and receive outbound traffic through a
//! [`Notifier`].

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod matchmaking;
pub mod registry;
pub mod service;
pub mod session;

pub use clock::{Clock, ClockRunner, ManualClock, SystemClock};
pub use config::ServerConfig;
pub use error::{ConfigError, RejectReason, RequestError};
pub use events::{ChannelNotifier, LogNotifier, Notifier, ServerEvent};
pub use matchmaking::{CancelOutcome, MatchOutcome, MatchStart};
pub use registry::{DisconnectOutcome, MatchStore, Registry, RegistryStats, Tables};
pub use service::{
    ChatOutcome, MatchService, MatchSnapshot, MoveOutcome, MoveReport, RequestMatchOutcome,
    ResignOutcome, Started,
};
pub use session::{ClockState, ConnId, GameEnd, Match, MatchId, Participant, Side, Termination};
