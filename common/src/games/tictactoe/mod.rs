mod board;
mod bot_controller;
mod controller;
mod score;
mod types;
mod win_detector;

pub use board::{AvailableMoves, Board};
pub use bot_controller::{AiPlayer, Difficulty, Pruning, SearchResult, WIN_SCORE};
pub use controller::TurnController;
pub use score::{HumanVsAiScore, HumanVsHumanScore, Score, Scoreboard};
pub use types::{BOARD_SIZE, GameMode, GameStatus, Mark, MoveError, Position, WinningLine};
pub use win_detector::{check_win, check_win_with_line};
