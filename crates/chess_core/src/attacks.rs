//! Attacked-square detection.
//!
//! Shared by check detection and castling safety. Every piece attacks with the
//! same offsets and rays it moves with, except pawns, which only attack the two
//! forward diagonals.

use crate::board::Board;
use crate::types::*;

/// Does the piece standing on `from` attack `target`?
pub fn piece_attacks(board: &Board, from: Coord, piece: Piece, target: Coord) -> bool {
    if !from.is_on_board() || !target.is_on_board() {
        return false;
    }
    let df = target.file - from.file;
    let dr = target.rank - from.rank;
    match piece.kind {
        PieceKind::Pawn => dr == piece.color.forward() && df.abs() == 1,
        PieceKind::Knight => KNIGHT_OFFSETS.contains(&(df, dr)),
        PieceKind::King => KING_OFFSETS.contains(&(df, dr)),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            ray_reaches(board, from, target, slider_dirs(piece.kind))
        }
    }
}

/// True when `to` lies on one of `dirs` from `from` with nothing in between.
pub(crate) fn ray_reaches(board: &Board, from: Coord, to: Coord, dirs: &[(i8, i8)]) -> bool {
    for &(df, dr) in dirs {
        let mut at = from.offset(df, dr);
        while at.is_on_board() {
            if at == to {
                return true;
            }
            if !board.is_empty(at) {
                break;
            }
            at = at.offset(df, dr);
        }
    }
    false
}

pub fn is_square_attacked(board: &Board, target: Coord, by: Color) -> bool {
    board
        .pieces(by)
        .any(|(from, pc)| piece_attacks(board, from, pc, target))
}

/// A side without a king on the board is never in check.
pub fn in_check(board: &Board, c: Color) -> bool {
    match board.king_coord(c) {
        Some(k) => is_square_attacked(board, k, c.other()),
        None => false,
    }
}

impl Board {
    pub fn is_square_attacked(&self, target: Coord, by: Color) -> bool {
        is_square_attacked(self, target, by)
    }

    pub fn in_check(&self, c: Color) -> bool {
        in_check(self, c)
    }
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
