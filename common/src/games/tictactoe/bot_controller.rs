use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::types::{GameStatus, Mark, Position};

pub const WIN_SCORE: i32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Maximum search depth in plies; `None` searches to the end of the game.
    pub fn max_depth(&self) -> Option<u32> {
        match self {
            Difficulty::Easy => Some(1),
            Difficulty::Medium => Some(3),
            Difficulty::Hard => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pruning {
    AlphaBeta,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub position: Position,
    pub score: i32,
    pub nodes: u64,
}

struct SearchContext {
    pruning: Pruning,
    nodes: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AiPlayer {
    mark: Mark,
    max_depth: Option<u32>,
}

impl AiPlayer {
    pub fn new(mark: Mark, max_depth: Option<u32>) -> Self {
        Self { mark, max_depth }
    }

    pub fn with_difficulty(mark: Mark, difficulty: Difficulty) -> Self {
        Self::new(mark, difficulty.max_depth())
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn opponent(&self) -> Mark {
        self.mark.opponent()
    }

    pub fn max_depth(&self) -> Option<u32> {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u32>) {
        self.max_depth = max_depth;
    }

    pub fn choose_move(&self, board: &Board) -> Option<Position> {
        self.analyze(board, Pruning::AlphaBeta).map(|result| result.position)
    }

    /// Scores every legal move with a fresh window and keeps the first move
    /// with the strictly highest score, so ties resolve to row-major order.
    pub fn analyze(&self, board: &Board, pruning: Pruning) -> Option<SearchResult> {
        let mut ctx = SearchContext { pruning, nodes: 0 };
        let mut best: Option<(Position, i32)> = None;

        for pos in board.available_moves() {
            let mut next = board.copy();
            next.place_at(pos, self.mark);

            let score = self.minimax(&next, 1, false, i32::MIN, i32::MAX, &mut ctx);

            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((pos, score));
            }
        }

        best.map(|(position, score)| SearchResult {
            position,
            score,
            nodes: ctx.nodes,
        })
    }

    fn terminal_score(&self, board: &Board, depth: u32) -> Option<i32> {
        let depth = depth as i32;
        match board.game_state() {
            GameStatus::InProgress => None,
            GameStatus::Draw => Some(0),
            status => {
                if status.winner() == Some(self.mark) {
                    Some(WIN_SCORE - depth)
                } else {
                    Some(depth - WIN_SCORE)
                }
            }
        }
    }

    fn minimax(
        &self,
        board: &Board,
        depth: u32,
        is_maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
        ctx: &mut SearchContext,
    ) -> i32 {
        ctx.nodes += 1;

        if let Some(score) = self.terminal_score(board, depth) {
            return score;
        }

        if self.max_depth.is_some_and(|max_depth| depth >= max_depth) {
            return 0;
        }

        let mover = if is_maximizing { self.mark } else { self.opponent() };
        let mut best = if is_maximizing { i32::MIN } else { i32::MAX };

        for pos in board.available_moves() {
            let mut next = board.copy();
            next.place_at(pos, mover);
            let eval = self.minimax(&next, depth + 1, !is_maximizing, alpha, beta, ctx);

            if is_maximizing {
                best = best.max(eval);
                alpha = alpha.max(best);
            } else {
                best = best.min(eval);
                beta = beta.min(best);
            }

            if ctx.pruning == Pruning::AlphaBeta && beta <= alpha {
                break;
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takes_immediate_win_over_block() {
        let board = Board::from_rows(["XX ", "OO ", "   "]).unwrap();
        let ai = AiPlayer::new(Mark::O, None);
        let result = ai.analyze(&board, Pruning::AlphaBeta).unwrap();
        assert_eq!(result.position, Position::new(1, 2));
        assert_eq!(result.score, WIN_SCORE - 1);
    }

    #[test]
    fn test_blocks_when_no_win_available() {
        let board = Board::from_rows(["   ", " O ", "XX "]).unwrap();
        let ai = AiPlayer::new(Mark::O, None);
        assert_eq!(ai.choose_move(&board), Some(Position::new(2, 2)));
    }

    #[test]
    fn test_depth_one_misses_the_block() {
        let board = Board::from_rows(["   ", " O ", "XX "]).unwrap();
        let ai = AiPlayer::new(Mark::O, Some(1));
        assert_eq!(ai.choose_move(&board), Some(Position::new(0, 0)));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let board = Board::from_rows(["XOX", "XOO", "OXX"]).unwrap();
        let ai = AiPlayer::new(Mark::O, None);
        assert_eq!(ai.choose_move(&board), None);
    }

    #[test]
    fn test_choose_move_does_not_mutate_board() {
        let board = Board::from_rows(["X  ", "   ", "   "]).unwrap();
        let before = board;
        let ai = AiPlayer::new(Mark::O, None);
        ai.choose_move(&board);
        assert_eq!(board, before);
    }

    #[test]
    fn test_empty_board_is_a_draw_with_perfect_play() {
        let ai = AiPlayer::new(Mark::X, None);
        let result = ai.analyze(&Board::new(), Pruning::AlphaBeta).unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.position, Position::new(0, 0));
    }

    #[test]
    fn test_pruning_visits_fewer_nodes() {
        let ai = AiPlayer::new(Mark::X, None);
        let pruned = ai.analyze(&Board::new(), Pruning::AlphaBeta).unwrap();
        let full = ai.analyze(&Board::new(), Pruning::None).unwrap();
        assert_eq!(pruned.position, full.position);
        assert_eq!(pruned.score, full.score);
        assert!(pruned.nodes < full.nodes);
    }

    #[test]
    fn test_prefers_faster_win() {
        // O wins at (0,2) now, or later elsewhere; the immediate win scores higher.
        let board = Board::from_rows(["OO ", "XX ", "X  "]).unwrap();
        let ai = AiPlayer::new(Mark::O, None);
        let result = ai.analyze(&board, Pruning::AlphaBeta).unwrap();
        assert_eq!(result.position, Position::new(0, 2));
        assert_eq!(result.score, WIN_SCORE - 1);
    }

    #[test]
    fn test_difficulty_depths() {
        assert_eq!(Difficulty::Easy.max_depth(), Some(1));
        assert_eq!(Difficulty::Medium.max_depth(), Some(3));
        assert_eq!(Difficulty::Hard.max_depth(), None);
    }
}
