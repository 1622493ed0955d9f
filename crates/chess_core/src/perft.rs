use crate::{board::Board, rules::legal_moves};

/// Pure perft node count.
/// Counts all legal positions from the current one down to `depth`.
pub fn perft(board: &Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for (from, to) in moves {
        let mut next = *board;
        next.apply_move(from, to);
        nodes += perft(&next, depth - 1);
    }
    nodes
}
