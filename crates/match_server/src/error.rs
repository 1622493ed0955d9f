use std::path::PathBuf;

use thiserror::Error;

/// Why a move request was turned down. The match is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("you are not in an active match")]
    NotInMatch,
    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),
    #[error("not your turn")]
    NotYourTurn,
    #[error("illegal move {from}{to}")]
    IllegalMove { from: String, to: String },
}

/// Malformed or out-of-place requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("missing player id")]
    MissingPlayerId,
    #[error("player id longer than {max} characters")]
    PlayerIdTooLong { max: usize },
    #[error("already waiting for an opponent")]
    AlreadyQueued,
    #[error("already playing a match")]
    AlreadyInMatch,
    #[error("empty chat message")]
    EmptyMessage,
    #[error("chat message longer than {max} characters")]
    MessageTooLong { max: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
