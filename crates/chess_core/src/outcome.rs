//! Game-end detection.
//!
//! All checks look at the board from the point of view of `side_to_move`, so
//! they must be run on the post-move board.

use std::fmt;

use crate::board::Board;
use crate::rules::has_any_legal_move;
use crate::types::Color;

/// Half-moves without a pawn move or capture after which the game is drawn
/// (fifty full moves by each side).
pub const FIFTY_MOVE_THRESHOLD: u32 = 100;

pub fn is_checkmate(board: &Board) -> bool {
    board.in_check(board.side_to_move) && !has_any_legal_move(board)
}

pub fn is_stalemate(board: &Board) -> bool {
    !board.in_check(board.side_to_move) && !has_any_legal_move(board)
}

pub fn is_fifty_move_rule(board: &Board) -> bool {
    board.halfmove_clock >= FIFTY_MOVE_THRESHOLD
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    FiftyMoveRule,
}

/// Evaluate checkmate, stalemate and the fifty-move rule, in that order.
pub fn evaluate(board: &Board) -> GameStatus {
    let stm = board.side_to_move;
    if !has_any_legal_move(board) {
        return if board.in_check(stm) {
            GameStatus::Checkmate { winner: stm.other() }
        } else {
            GameStatus::Stalemate
        };
    }
    if is_fifty_move_rule(board) {
        return GameStatus::FiftyMoveRule;
    }
    GameStatus::Ongoing
}

/// Four-way result as written to game records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    Unknown,
}

impl GameResult {
    pub fn win_for(c: Color) -> Self {
        match c {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }

    pub fn pgn_token(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Unknown => "*",
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pgn_token())
    }
}

impl Board {
    pub fn is_checkmate(&self) -> bool {
        is_checkmate(self)
    }

    pub fn is_stalemate(&self) -> bool {
        is_stalemate(self)
    }

    pub fn is_fifty_move_rule(&self) -> bool {
        is_fifty_move_rule(self)
    }
}
