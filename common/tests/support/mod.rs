use std::collections::HashSet;

use common::games::tictactoe::{Board, Mark};

/// Every board reachable from the empty board by alternating play with X
/// first, including terminal boards.
pub fn reachable_boards() -> Vec<Board> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    visit(Board::new(), Mark::X, &mut seen, &mut order);
    order
}

fn visit(board: Board, to_move: Mark, seen: &mut HashSet<Board>, order: &mut Vec<Board>) {
    if !seen.insert(board) {
        return;
    }
    order.push(board);
    if board.game_state().is_terminal() {
        return;
    }
    for pos in board.available_moves() {
        let mut next = board.copy();
        next.place_at(pos, to_move);
        visit(next, to_move.opponent(), seen, order);
    }
}

#[allow(dead_code)]
pub fn side_to_move(board: &Board) -> Mark {
    if board.count(Mark::X) == board.count(Mark::O) {
        Mark::X
    } else {
        Mark::O
    }
}
