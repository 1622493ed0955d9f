//! Chess rules for the match server: board model, legality, move application
//! and game-end detection.
//!
//! The board is a plain `Copy` value. Legality is decided square by square
//! (`is_legal(board, from, to)`) rather than by generating move lists, which
//! is all the server needs to validate a client's request.

pub mod apply;
pub mod attacks;
pub mod board;
pub mod outcome;
pub mod perft;
pub mod rules;
pub mod types;

pub use apply::AppliedMove;
pub use attacks::{in_check, is_square_attacked};
pub use board::*;
pub use outcome::*;
pub use perft::perft;
pub use rules::{has_any_legal_move, is_legal, legal_destinations, legal_moves};
pub use types::*;
