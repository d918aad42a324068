use super::board::Board;
use super::bot_controller::{AiPlayer, Difficulty};
use super::score::{Score, Scoreboard};
use super::types::{GameMode, GameStatus, Mark, MoveError, Position, WinningLine};

/// Session state shared by every front end: the live board, whose turn it
/// is, the AI opponent and both modes' tallies.
///
/// Not thread-safe; hosts that share it across tasks wrap it in a mutex.
#[derive(Clone, Debug)]
pub struct TurnController {
    board: Board,
    current_turn: Mark,
    mode: GameMode,
    human_mark: Mark,
    ai: AiPlayer,
    scoreboard: Scoreboard,
    finalized: bool,
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new(Mark::X, Difficulty::Hard.max_depth())
    }
}

impl TurnController {
    /// The AI always plays the mark the human does not.
    pub fn new(human_mark: Mark, ai_max_depth: Option<u32>) -> Self {
        Self {
            board: Board::new(),
            current_turn: Mark::X,
            mode: GameMode::HumanVsHuman,
            human_mark,
            ai: AiPlayer::new(human_mark.opponent(), ai_max_depth),
            scoreboard: Scoreboard::new(),
            finalized: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> Mark {
        self.current_turn
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn human_mark(&self) -> Mark {
        self.human_mark
    }

    pub fn ai_mark(&self) -> Mark {
        self.ai.mark()
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }

    pub fn set_ai_depth(&mut self, max_depth: Option<u32>) {
        self.ai.set_max_depth(max_depth);
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.set_ai_depth(difficulty.max_depth());
    }

    pub fn game_state(&self) -> GameStatus {
        self.board.game_state()
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        self.board.winning_line()
    }

    pub fn score(&self) -> Score {
        self.scoreboard.get(self.mode)
    }

    pub fn tally(&self, mode: GameMode) -> Score {
        self.scoreboard.get(mode)
    }

    pub fn is_human_turn(&self) -> bool {
        match self.mode {
            GameMode::HumanVsHuman => true,
            GameMode::HumanVsAi => self.current_turn == self.human_mark,
        }
    }

    pub fn is_ai_turn(&self) -> bool {
        self.mode == GameMode::HumanVsAi && self.current_turn == self.ai.mark()
    }

    /// Places the current player's mark. In human-vs-AI mode only the
    /// human's turn accepts moves.
    pub fn try_apply_move(&mut self, pos: Position) -> Result<(), MoveError> {
        if self.mode == GameMode::HumanVsAi && self.current_turn != self.human_mark {
            return Err(MoveError::NotYourTurn);
        }
        self.place_current(pos)
    }

    /// Signed coordinates so untrusted input can be passed straight through;
    /// negative or out-of-range values are rejected like any invalid move.
    pub fn apply_move(&mut self, row: i64, col: i64) -> bool {
        let Some(pos) = Position::from_signed(row, col) else {
            return false;
        };
        self.try_apply_move(pos).is_ok()
    }

    pub fn try_apply_ai_move(&mut self) -> Result<Position, MoveError> {
        if !self.is_ai_turn() {
            return Err(MoveError::NotYourTurn);
        }
        if self.game_state().is_terminal() {
            return Err(MoveError::RoundOver);
        }
        let pos = self.ai.choose_move(&self.board).ok_or(MoveError::NoLegalMoves)?;
        self.place_current(pos)?;
        Ok(pos)
    }

    pub fn apply_ai_move(&mut self) -> Option<Position> {
        self.try_apply_ai_move().ok()
    }

    /// Counts the round in the active mode's tally once it has ended.
    ///
    /// Returns true whenever the round is over. Repeated calls on the same
    /// finished round do not count it again.
    pub fn finalize_if_over(&mut self) -> bool {
        let status = self.game_state();
        if !status.is_terminal() {
            return false;
        }
        if !self.finalized {
            self.scoreboard.record(self.mode, status, self.human_mark);
            self.finalized = true;
        }
        true
    }

    pub fn reset_round(&mut self, starting_turn: Mark) {
        self.board.reset();
        self.current_turn = starting_turn;
        self.finalized = false;
    }

    /// Replaces the live round with an authoritative snapshot, e.g. the
    /// host's state in an online game. Tallies are untouched.
    pub fn load_position(&mut self, board: Board, turn: Mark) -> Result<(), String> {
        if !board.is_well_formed() {
            return Err(format!(
                "Snapshot has {} X and {} O marks",
                board.count(Mark::X),
                board.count(Mark::O)
            ));
        }
        self.board = board;
        self.current_turn = turn;
        self.finalized = false;
        Ok(())
    }

    fn place_current(&mut self, pos: Position) -> Result<(), MoveError> {
        if self.game_state().is_terminal() {
            return Err(MoveError::RoundOver);
        }
        if !pos.is_on_board() {
            return Err(MoveError::OutOfRange);
        }
        if !self.board.place_at(pos, self.current_turn) {
            return Err(MoveError::Occupied);
        }
        self.current_turn = self.current_turn.opponent();
        Ok(())
    }
}
