use crate::board::{Board, Square};
use crate::types::*;

/// What `apply_move` did, for logging and move notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppliedMove {
    pub from: Coord,
    pub to: Coord,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub castle: bool,
    pub en_passant: bool,
    pub promoted: bool,
}

impl Board {
    /// Play an already-validated move. Performs no legality check; callers must
    /// gate it with [`Board::is_legal`]. The only guard is that an empty `from`
    /// leaves the board untouched.
    pub fn apply_move(&mut self, from: Coord, to: Coord) -> Option<AppliedMove> {
        let moving = *self.square(from);
        let piece = moving.piece?;
        let mut captured = self.piece_at(to);

        // (1) fifty-move counter
        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        // (2) en passant removes the pawn behind the target square
        let en_passant = piece.kind == PieceKind::Pawn
            && captured.is_none()
            && from.file != to.file
            && self.en_passant == Some(to);
        if en_passant {
            let victim = Coord::new(to.file, from.rank);
            captured = self.piece_at(victim);
            self.clear(victim);
        }

        // (3) relocate
        *self.square_mut(to) = Square {
            piece: Some(piece),
            has_moved: true,
            promoted: moving.promoted,
        };
        self.clear(from);

        // (4) castling drags the rook along
        let castle = piece.kind == PieceKind::King && (to.file - from.file).abs() == 2;
        if castle {
            let kingside = to.file > from.file;
            let rook_from = Coord::new(if kingside { 7 } else { 0 }, from.rank);
            let rook_to = Coord::new(if kingside { to.file - 1 } else { to.file + 1 }, from.rank);
            let mut rook = *self.square(rook_from);
            rook.has_moved = true;
            *self.square_mut(rook_to) = rook;
            self.clear(rook_from);
        }

        // (5) castling rights
        match piece.kind {
            PieceKind::King => self.castling.revoke_all(piece.color),
            PieceKind::Rook if !moving.has_moved && from.rank == piece.color.home_rank() => {
                if from.file == 0 {
                    self.castling.revoke(piece.color, false);
                } else if from.file == 7 {
                    self.castling.revoke(piece.color, true);
                }
            }
            _ => {}
        }
        if let Some(victim) = captured
            && victim.kind == PieceKind::Rook
            && to.rank == victim.color.home_rank()
        {
            if to.file == 0 {
                self.castling.revoke(victim.color, false);
            } else if to.file == 7 {
                self.castling.revoke(victim.color, true);
            }
        }

        // (6) en passant target for the next half-move only
        self.en_passant = if piece.kind == PieceKind::Pawn && (to.rank - from.rank).abs() == 2 {
            Some(Coord::new(from.file, (from.rank + to.rank) / 2))
        } else {
            None
        };

        // (7) automatic queen promotion
        let promoted = piece.kind == PieceKind::Pawn && to.rank == piece.color.last_rank();
        if promoted {
            let sq = self.square_mut(to);
            sq.piece = Some(Piece::new(piece.color, PieceKind::Queen));
            sq.promoted = true;
        }

        // (8) hand the move over
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.other();

        Some(AppliedMove {
            from,
            to,
            piece,
            captured,
            castle,
            en_passant,
            promoted,
        })
    }
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod apply_tests;
