use super::*;

fn c(s: &str) -> Coord {
    Coord::parse(s).unwrap()
}

fn play(board: &mut Board, from: &str, to: &str) -> AppliedMove {
    assert!(board.is_legal(c(from), c(to)), "{from}{to} should be legal");
    board.apply_move(c(from), c(to)).unwrap()
}

#[test]
fn test_simple_push_flips_side() {
    let mut b = Board::standard();
    let mv = play(&mut b, "e2", "e4");
    assert_eq!(mv.piece.kind, PieceKind::Pawn);
    assert_eq!(b.side_to_move, Color::Black);
    assert!(b.is_empty(c("e2")));
    assert!(b.square(c("e4")).has_moved);
    assert_eq!(b.en_passant, Some(c("e3")));
    assert_eq!(b.halfmove_clock, 0);
    assert_eq!(b.fullmove_number, 1);

    play(&mut b, "g8", "f6");
    assert_eq!(b.en_passant, None);
    assert_eq!(b.halfmove_clock, 1);
    assert_eq!(b.fullmove_number, 2);
}

#[test]
fn test_kingside_castle_moves_rook() {
    let mut b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let mv = play(&mut b, "e1", "g1");
    assert!(mv.castle);
    assert_eq!(b.piece_at(c("g1")), Some(Piece::new(Color::White, PieceKind::King)));
    assert_eq!(b.piece_at(c("f1")), Some(Piece::new(Color::White, PieceKind::Rook)));
    assert!(b.is_empty(c("h1")));
    assert!(!b.castling.white_kingside && !b.castling.white_queenside);
    assert!(b.castling.black_kingside && b.castling.black_queenside);
}

#[test]
fn test_queenside_castle_moves_rook() {
    let mut b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
    play(&mut b, "e8", "c8");
    assert_eq!(b.piece_at(c("c8")), Some(Piece::new(Color::Black, PieceKind::King)));
    assert_eq!(b.piece_at(c("d8")), Some(Piece::new(Color::Black, PieceKind::Rook)));
    assert!(b.is_empty(c("a8")));
}

#[test]
fn test_rook_move_revokes_one_side_for_good() {
    let mut b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut b, "h1", "h2");
    assert!(!b.castling.white_kingside);
    assert!(b.castling.white_queenside);
    play(&mut b, "a8", "a7");
    assert!(!b.castling.black_queenside);
    // Rook returns home: the right stays gone.
    play(&mut b, "h2", "h1");
    assert!(!b.castling.white_kingside);
}

#[test]
fn test_capturing_home_rook_revokes_right() {
    let mut b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut b, "a1", "a8");
    assert!(!b.castling.black_queenside);
    assert!(!b.castling.white_queenside);
    assert!(b.castling.black_kingside);
}

#[test]
fn test_en_passant_capture_removes_pawn() {
    let mut b = Board::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").unwrap();
    play(&mut b, "d7", "d5");
    assert_eq!(b.en_passant, Some(c("d6")));
    let mv = play(&mut b, "e5", "d6");
    assert!(mv.en_passant);
    assert_eq!(mv.captured, Some(Piece::new(Color::Black, PieceKind::Pawn)));
    assert!(b.is_empty(c("d5")));
    assert_eq!(b.piece_at(c("d6")), Some(Piece::new(Color::White, PieceKind::Pawn)));
}

#[test]
fn test_promotion_is_always_queen() {
    let mut b = Board::from_fen("7k/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let mv = play(&mut b, "a7", "a8");
    assert!(mv.promoted);
    let sq = b.square(c("a8"));
    assert_eq!(sq.piece, Some(Piece::new(Color::White, PieceKind::Queen)));
    assert!(sq.promoted);
}

#[test]
fn test_halfmove_clock_rules() {
    let mut b = Board::from_fen("4k3/8/8/8/8/2n5/4P3/R3K3 w - - 7 20").unwrap();
    play(&mut b, "a1", "a2");
    assert_eq!(b.halfmove_clock, 8);
    play(&mut b, "c3", "e2"); // capture
    assert_eq!(b.halfmove_clock, 0);
    play(&mut b, "e1", "e2"); // recapture
    assert_eq!(b.halfmove_clock, 0);
    play(&mut b, "e8", "d8");
    assert_eq!(b.halfmove_clock, 1);
}

#[test]
fn test_apply_on_empty_square_is_noop() {
    let mut b = Board::standard();
    assert!(b.apply_move(c("e4"), c("e5")).is_none());
    assert_eq!(b, Board::standard());
}
