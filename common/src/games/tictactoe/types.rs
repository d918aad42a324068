use std::fmt;

use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(&self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }

    pub fn parse(s: &str) -> Option<Mark> {
        match s.trim() {
            "X" | "x" => Some(Mark::X),
            "O" | "o" => Some(Mark::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Converts untrusted signed coordinates (network input, user input) into a
    /// board position. Anything outside the grid yields `None`.
    pub fn from_signed(row: i64, col: i64) -> Option<Self> {
        let size = BOARD_SIZE as i64;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Self::new(row as usize, col as usize))
        } else {
            None
        }
    }

    pub fn is_on_board(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Draw,
    XWins,
    OWins,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        *self != GameStatus::InProgress
    }

    pub fn winner(&self) -> Option<Mark> {
        match self {
            GameStatus::XWins => Some(Mark::X),
            GameStatus::OWins => Some(Mark::O),
            GameStatus::InProgress | GameStatus::Draw => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::InProgress => "in progress",
            GameStatus::Draw => "draw",
            GameStatus::XWins => "X wins",
            GameStatus::OWins => "O wins",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningLine {
    pub mark: Mark,
    pub cells: [Position; BOARD_SIZE],
}

impl WinningLine {
    pub fn new(mark: Mark, cells: [Position; BOARD_SIZE]) -> Self {
        Self { mark, cells }
    }

    pub fn start(&self) -> Position {
        self.cells[0]
    }

    pub fn end(&self) -> Position {
        self.cells[BOARD_SIZE - 1]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    HumanVsHuman,
    HumanVsAi,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveError {
    OutOfRange,
    Occupied,
    NotYourTurn,
    RoundOver,
    NoLegalMoves,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MoveError::OutOfRange => "Position out of bounds",
            MoveError::Occupied => "Cell is already marked",
            MoveError::NotYourTurn => "Not your turn",
            MoveError::RoundOver => "Round is already over",
            MoveError::NoLegalMoves => "No legal moves left",
        };
        f.write_str(text)
    }
}

impl std::error::Error for MoveError {}
