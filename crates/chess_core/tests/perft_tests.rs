use std::time::Instant;

use rayon::prelude::*;

use chess_core::{Board, perft};

const FULL_PERFT_ENV: &str = "FULL_PERFT";
const NODE_LIMIT: u64 = 10_000;

/// (FEN, [(depth, nodes)]) for depths where automatic queen promotion cannot
/// change the count.
const CASES: &[(&str, &[(u8, u64)])] = &[
    (
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        &[(1, 20), (2, 400), (3, 8_902)],
    ),
    (
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[(1, 48), (2, 2_039)],
    ),
    (
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        &[(1, 14), (2, 191), (3, 2_812)],
    ),
];

#[test]
fn perft_known_positions() {
    let full = std::env::var(FULL_PERFT_ENV).is_ok();

    CASES.par_iter().enumerate().for_each(|(idx, (fen, depths))| {
        let board = Board::from_fen(fen).expect("valid FEN");
        let case_start = Instant::now();

        for &(depth, expected) in depths.iter() {
            if !full && expected > NODE_LIMIT {
                eprintln!(
                    "Skipping depth {} for case {} (expected {} nodes) - set {}=1 to run all.",
                    depth,
                    idx + 1,
                    expected,
                    FULL_PERFT_ENV
                );
                continue;
            }
            let got = perft(&board, depth);
            assert!(
                got == expected,
                "Perft mismatch for FEN '{}' at depth {}: expected {}, got {}",
                fen,
                depth,
                expected,
                got
            );
        }

        println!(
            "Case {:03} done in {:.3?}",
            idx + 1,
            case_start.elapsed()
        );
    });
}

#[test]
fn perft_depth_zero_is_one() {
    assert_eq!(perft(&Board::standard(), 0), 1);
}
