//! Tests for game-end detection
//!
//! - Checkmate
//! - Stalemate
//! - Fifty-move rule

use chess_core::{
    Board, Color, Coord, GameResult, GameStatus, evaluate, has_any_legal_move, is_checkmate,
    is_fifty_move_rule, is_stalemate,
};

fn c(s: &str) -> Coord {
    Coord::parse(s).unwrap()
}

// =============================================================================
// Checkmate Tests
// =============================================================================

#[test]
fn test_fools_mate() {
    let mut b = Board::standard();
    for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
        assert!(b.is_legal(c(from), c(to)), "{from}{to} should be legal");
        b.apply_move(c(from), c(to));
    }
    assert!(is_checkmate(&b));
    assert!(!is_stalemate(&b));
    assert_eq!(evaluate(&b), GameStatus::Checkmate { winner: Color::Black });
}

#[test]
fn test_back_rank_mate() {
    let b = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
    assert!(is_checkmate(&b));
    assert_eq!(evaluate(&b), GameStatus::Checkmate { winner: Color::White });
}

#[test]
fn test_check_with_escape_is_not_mate() {
    let b = Board::from_fen("R5k1/5p1p/8/8/8/8/8/6K1 b - - 0 1").unwrap();
    assert!(b.in_check(Color::Black));
    assert!(!is_checkmate(&b));
    assert_eq!(evaluate(&b), GameStatus::Ongoing);
}

// =============================================================================
// Stalemate Tests
// =============================================================================

#[test]
fn test_stalemate_king_in_corner() {
    // Black king on a8, white queen on b6, white king on c7
    let b = Board::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(!has_any_legal_move(&b));
    assert!(!b.in_check(Color::Black), "Stalemate means king is not in check");
    assert!(is_stalemate(&b));
    assert!(!is_checkmate(&b));
    assert_eq!(evaluate(&b), GameStatus::Stalemate);
}

#[test]
fn test_stalemate_king_and_pawn_endgame() {
    let b = Board::from_fen("6k1/6P1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(is_stalemate(&b));
}

#[test]
fn test_mate_and_stalemate_exclusive() {
    for fen in [
        "k7/2K5/1Q6/8/8/8/8/8 b - - 0 1",
        "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ] {
        let b = Board::from_fen(fen).unwrap();
        assert!(!(is_checkmate(&b) && is_stalemate(&b)), "{fen}");
        if is_checkmate(&b) || is_stalemate(&b) {
            assert!(!has_any_legal_move(&b), "{fen}");
        }
    }
}

// =============================================================================
// Fifty-Move Rule Tests
// =============================================================================

#[test]
fn test_fifty_move_rule_at_100_halfmoves() {
    let b = Board::from_fen("8/8/8/4k3/8/4K3/8/8 w - - 100 60").unwrap();
    assert!(is_fifty_move_rule(&b), "halfmove_clock=100 should be a draw");
    assert_eq!(evaluate(&b), GameStatus::FiftyMoveRule);
}

#[test]
fn test_fifty_move_rule_at_99_halfmoves() {
    let b = Board::from_fen("8/8/8/4k3/8/4K3/8/8 w - - 99 60").unwrap();
    assert!(!is_fifty_move_rule(&b), "halfmove_clock=99 should not be a draw yet");
}

#[test]
fn test_fifty_move_rule_reached_by_quiet_move() {
    // Plenty of material on the board: the rule ignores it.
    let mut b = Board::from_fen("r3k3/8/8/8/8/8/8/R3K2Q w - - 99 60").unwrap();
    assert!(!is_fifty_move_rule(&b));
    b.apply_move(c("h1"), c("h2"));
    assert_eq!(b.halfmove_clock, 100);
    assert!(is_fifty_move_rule(&b));
}

#[test]
fn test_fifty_move_rule_reset_on_pawn_move() {
    let mut b = Board::from_fen("8/8/8/4k3/8/3K4/4P3/8 w - - 99 60").unwrap();
    assert!(b.is_legal(c("e2"), c("e3")));
    b.apply_move(c("e2"), c("e3"));
    assert_eq!(b.halfmove_clock, 0, "Halfmove clock should be 0 after pawn move");
    assert!(!is_fifty_move_rule(&b));
}

// =============================================================================
// Result tokens
// =============================================================================

#[test]
fn test_result_tokens() {
    assert_eq!(GameResult::WhiteWins.pgn_token(), "1-0");
    assert_eq!(GameResult::BlackWins.pgn_token(), "0-1");
    assert_eq!(GameResult::Draw.pgn_token(), "1/2-1/2");
    assert_eq!(GameResult::Unknown.pgn_token(), "*");
    assert_eq!(GameResult::win_for(Color::Black).winner(), Some(Color::Black));
}
