use std::fmt;

use crate::types::*;

/// One cell of the board. `piece == None` means empty (or captured).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Square {
    pub piece: Option<Piece>,
    /// Set once the piece standing here has moved at least once.
    pub has_moved: bool,
    /// Set on a queen that started life as a pawn.
    pub promoted: bool,
}

impl Square {
    pub const EMPTY: Square = Square {
        piece: None,
        has_moved: false,
        promoted: false,
    };

    pub fn with_piece(piece: Piece) -> Self {
        Square {
            piece: Some(piece),
            has_moved: false,
            promoted: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };
    pub const NONE: CastlingRights = CastlingRights {
        white_kingside: false,
        white_queenside: false,
        black_kingside: false,
        black_queenside: false,
    };

    pub fn get(&self, color: Color, kingside: bool) -> bool {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside,
            (Color::White, false) => self.white_queenside,
            (Color::Black, true) => self.black_kingside,
            (Color::Black, false) => self.black_queenside,
        }
    }

    /// Rights are only ever cleared, never granted back.
    pub fn revoke(&mut self, color: Color, kingside: bool) {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside = false,
            (Color::White, false) => self.white_queenside = false,
            (Color::Black, true) => self.black_kingside = false,
            (Color::Black, false) => self.black_queenside = false,
        }
    }

    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, true);
        self.revoke(color, false);
    }
}

/// Full match-wide board state. Deliberately `Copy` so legality checks can
/// simulate a move on a scratch copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    /// Indexed `[rank][file]`.
    pub squares: [[Square; 8]; 8],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    /// Square skipped by a pawn that double-stepped on the previous half-move.
    pub en_passant: Option<Coord>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FenError {
    MissingField(&'static str),
    BadPlacement(String),
    BadSideToMove(String),
    BadCastling(String),
    BadEnPassant(String),
    BadCounter(String),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::MissingField(field) => write!(f, "FEN is missing the {field} field"),
            FenError::BadPlacement(s) => write!(f, "invalid piece placement: {s}"),
            FenError::BadSideToMove(s) => write!(f, "invalid side to move: {s}"),
            FenError::BadCastling(s) => write!(f, "invalid castling field: {s}"),
            FenError::BadEnPassant(s) => write!(f, "invalid en passant square: {s}"),
            FenError::BadCounter(s) => write!(f, "invalid move counter: {s}"),
        }
    }
}

impl std::error::Error for FenError {}

pub const STANDARD_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// A board with no pieces at all.
    pub fn empty(side_to_move: Color) -> Self {
        Board {
            squares: [[Square::EMPTY; 8]; 8],
            side_to_move,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard opening position, white to move, all castling rights.
    pub fn standard() -> Self {
        let mut b = Board::empty(Color::White);
        b.castling = CastlingRights::ALL;

        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            let f = f as i8;
            b.put(Coord::new(f, 0), Piece::new(Color::White, kind));
            b.put(Coord::new(f, 1), Piece::new(Color::White, PieceKind::Pawn));
            b.put(Coord::new(f, 6), Piece::new(Color::Black, PieceKind::Pawn));
            b.put(Coord::new(f, 7), Piece::new(Color::Black, kind));
        }
        b
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut parts = fen.split_whitespace();
        let placement = parts.next().ok_or(FenError::MissingField("placement"))?;
        let stm = parts.next().ok_or(FenError::MissingField("side to move"))?;
        let castle = parts.next().ok_or(FenError::MissingField("castling"))?;
        let ep = parts.next().ok_or(FenError::MissingField("en passant"))?;
        let halfmove = parts.next().unwrap_or("0");
        let fullmove = parts.next().unwrap_or("1");

        let side_to_move = match stm {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::BadSideToMove(stm.to_string())),
        };
        let mut b = Board::empty(side_to_move);

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadPlacement(placement.to_string()));
        }
        for (idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - idx as i8; // FEN lists rank 8 first
            let mut file: i8 = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    // file <= 8 here, so the add cannot overflow
                    if !(1..=8).contains(&d) || file + d as i8 > 8 {
                        return Err(FenError::BadPlacement(rank_str.to_string()));
                    }
                    file += d as i8;
                } else {
                    let piece = Piece::from_fen_char(ch)
                        .ok_or_else(|| FenError::BadPlacement(rank_str.to_string()))?;
                    let at = Coord::new(file, rank);
                    if !at.is_on_board() {
                        return Err(FenError::BadPlacement(rank_str.to_string()));
                    }
                    b.put(at, piece);
                    // A pawn off its start rank must have moved already.
                    if piece.kind == PieceKind::Pawn
                        && rank != (piece.color.home_rank() + piece.color.forward())
                    {
                        b.square_mut(at).has_moved = true;
                    }
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::BadPlacement(rank_str.to_string()));
            }
        }

        if castle != "-" {
            for c in castle.chars() {
                match c {
                    'K' => b.castling.white_kingside = true,
                    'Q' => b.castling.white_queenside = true,
                    'k' => b.castling.black_kingside = true,
                    'q' => b.castling.black_queenside = true,
                    _ => return Err(FenError::BadCastling(castle.to_string())),
                }
            }
        }

        b.en_passant = if ep == "-" {
            None
        } else {
            let bad = || FenError::BadEnPassant(ep.to_string());
            let target = Coord::parse(ep).ok_or_else(bad)?;
            // The target sits behind a pawn of the side that just moved.
            let mover = side_to_move.other();
            let pawn_at = target.offset(0, mover.forward());
            if target.rank != mover.home_rank() + 2 * mover.forward()
                || b.piece_at(pawn_at) != Some(Piece::new(mover, PieceKind::Pawn))
            {
                return Err(bad());
            }
            Some(target)
        };

        b.halfmove_clock = halfmove
            .parse()
            .map_err(|_| FenError::BadCounter(halfmove.to_string()))?;
        b.fullmove_number = fullmove
            .parse()
            .map_err(|_| FenError::BadCounter(fullmove.to_string()))?;
        Ok(b)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8i8).rev() {
            let mut empty = 0;
            for file in 0..8i8 {
                match self.piece_at(Coord::new(file, rank)) {
                    Some(pc) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(pc.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        let c = &self.castling;
        let before = out.len();
        for (flag, ch) in [
            (c.white_kingside, 'K'),
            (c.white_queenside, 'Q'),
            (c.black_kingside, 'k'),
            (c.black_queenside, 'q'),
        ] {
            if flag {
                out.push(ch);
            }
        }
        if out.len() == before {
            out.push('-');
        }

        out.push(' ');
        match self.en_passant {
            Some(ep) => out.push_str(&ep.to_string()),
            None => out.push('-'),
        }
        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }

    /// Square at `at`. Panics when `at` is off the board.
    pub fn square(&self, at: Coord) -> &Square {
        &self.squares[at.rank as usize][at.file as usize]
    }

    pub fn square_mut(&mut self, at: Coord) -> &mut Square {
        &mut self.squares[at.rank as usize][at.file as usize]
    }

    /// Piece at `at`, `None` for empty or off-board squares.
    pub fn piece_at(&self, at: Coord) -> Option<Piece> {
        if !at.is_on_board() {
            return None;
        }
        self.square(at).piece
    }

    pub fn is_empty(&self, at: Coord) -> bool {
        self.piece_at(at).is_none()
    }

    /// Place a fresh, unmoved piece.
    pub fn put(&mut self, at: Coord, piece: Piece) {
        *self.square_mut(at) = Square::with_piece(piece);
    }

    pub fn clear(&mut self, at: Coord) {
        *self.square_mut(at) = Square::EMPTY;
    }

    pub fn king_coord(&self, c: Color) -> Option<Coord> {
        Coord::all().find(|&at| {
            self.piece_at(at) == Some(Piece::new(c, PieceKind::King))
        })
    }

    /// All live pieces of `c` with their squares.
    pub fn pieces(&self, c: Color) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::all().filter_map(move |at| match self.piece_at(at) {
            Some(pc) if pc.color == c => Some((at, pc)),
            _ => None,
        })
    }

    pub fn count_kind(&self, c: Color, kind: PieceKind) -> usize {
        self.pieces(c).filter(|(_, pc)| pc.kind == kind).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8i8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8i8 {
                let ch = self
                    .piece_at(Coord::new(file, rank))
                    .map(|p| p.to_fen_char())
                    .unwrap_or('.');
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
