//! Move legality.
//!
//! `is_legal` checks the shape of a move for the piece on `from`, then plays
//! it on a scratch copy of the board and rejects it if the mover's own king is
//! left attacked.

use crate::attacks::ray_reaches;
use crate::board::Board;
use crate::types::*;

pub fn is_legal(board: &Board, from: Coord, to: Coord) -> bool {
    if !from.is_on_board() || !to.is_on_board() || from == to {
        return false;
    }
    let mover = board.side_to_move;
    let piece = match board.piece_at(from) {
        Some(pc) if pc.color == mover => pc,
        _ => return false,
    };
    if let Some(target) = board.piece_at(to)
        && target.color == mover
    {
        return false;
    }

    let shape_ok = match piece.kind {
        PieceKind::Pawn => pawn_shape_ok(board, from, to, mover),
        PieceKind::Knight => KNIGHT_OFFSETS.contains(&(to.file - from.file, to.rank - from.rank)),
        PieceKind::King => king_shape_ok(board, from, to, mover),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            ray_reaches(board, from, to, slider_dirs(piece.kind))
        }
    };
    if !shape_ok {
        return false;
    }

    let mut scratch = *board;
    scratch.apply_move(from, to);
    !scratch.in_check(mover)
}

fn pawn_shape_ok(board: &Board, from: Coord, to: Coord, c: Color) -> bool {
    let dir = c.forward();
    let df = to.file - from.file;
    let dr = to.rank - from.rank;

    if df == 0 && dr == dir {
        return board.is_empty(to);
    }
    if df == 0 && dr == 2 * dir {
        return !board.square(from).has_moved
            && board.is_empty(from.offset(0, dir))
            && board.is_empty(to);
    }
    if df.abs() == 1 && dr == dir {
        return match board.piece_at(to) {
            Some(target) => target.color != c,
            None => board.en_passant == Some(to),
        };
    }
    false
}

fn king_shape_ok(board: &Board, from: Coord, to: Coord, c: Color) -> bool {
    let df = to.file - from.file;
    let dr = to.rank - from.rank;
    if KING_OFFSETS.contains(&(df, dr)) {
        return true;
    }
    if dr == 0 && df.abs() == 2 {
        return castle_ok(board, from, to, c);
    }
    false
}

/// Castling: right still held, king and rook on their home squares, every
/// square between them empty, and the king's start, transit and destination
/// squares not attacked.
fn castle_ok(board: &Board, from: Coord, to: Coord, c: Color) -> bool {
    let kingside = to.file > from.file;
    if !board.castling.get(c, kingside) {
        return false;
    }
    let home = c.home_rank();
    if from != Coord::new(4, home) {
        return false;
    }
    let rook_at = Coord::new(if kingside { 7 } else { 0 }, home);
    if board.piece_at(rook_at) != Some(Piece::new(c, PieceKind::Rook)) {
        return false;
    }

    let step = if kingside { 1 } else { -1 };
    let mut at = from.offset(step, 0);
    while at != rook_at {
        if !board.is_empty(at) {
            return false;
        }
        at = at.offset(step, 0);
    }

    let enemy = c.other();
    let mut at = from;
    loop {
        if board.is_square_attacked(at, enemy) {
            return false;
        }
        if at == to {
            break;
        }
        at = at.offset(step, 0);
    }
    true
}

/// Every square the piece on `from` may legally move to.
pub fn legal_destinations(board: &Board, from: Coord) -> Vec<Coord> {
    Coord::all().filter(|&to| is_legal(board, from, to)).collect()
}

/// All legal (from, to) pairs for the side to move.
pub fn legal_moves(board: &Board) -> Vec<(Coord, Coord)> {
    let mut out = Vec::with_capacity(64);
    for (from, _) in board.pieces(board.side_to_move) {
        for to in Coord::all() {
            if is_legal(board, from, to) {
                out.push((from, to));
            }
        }
    }
    out
}

pub fn has_any_legal_move(board: &Board) -> bool {
    board
        .pieces(board.side_to_move)
        .any(|(from, _)| Coord::all().any(|to| is_legal(board, from, to)))
}

impl Board {
    pub fn is_legal(&self, from: Coord, to: Coord) -> bool {
        is_legal(self, from, to)
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
