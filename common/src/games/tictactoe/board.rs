use std::fmt;

use super::types::{BOARD_SIZE, GameStatus, Mark, Position, WinningLine};
use super::win_detector::{Grid, check_win, check_win_with_line};

/// The 3x3 grid. `Copy` so look-ahead search works on independent snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: Grid,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from three row strings, `X`/`O` for marks and any of
    /// ` `, `_` or `.` for empty cells.
    pub fn from_rows(rows: [&str; BOARD_SIZE]) -> Result<Self, String> {
        let mut board = Self::new();
        for (row, text) in rows.iter().enumerate() {
            let chars: Vec<char> = text.chars().collect();
            if chars.len() != BOARD_SIZE {
                return Err(format!("Row {} must have {} cells, got {}", row, BOARD_SIZE, chars.len()));
            }
            for (col, ch) in chars.into_iter().enumerate() {
                board.cells[row][col] = match ch {
                    'X' | 'x' => Some(Mark::X),
                    'O' | 'o' => Some(Mark::O),
                    ' ' | '_' | '.' => None,
                    other => return Err(format!("Unexpected cell '{}' at {}", other, Position::new(row, col))),
                };
            }
        }
        Ok(board)
    }

    /// Builds a board from the wire representation: three rows of `"X"`, `"O"`
    /// or `" "` strings.
    pub fn from_grid(grid: &[Vec<String>]) -> Result<Self, String> {
        if grid.len() != BOARD_SIZE {
            return Err(format!("Grid must have {} rows, got {}", BOARD_SIZE, grid.len()));
        }
        let mut board = Self::new();
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != BOARD_SIZE {
                return Err(format!("Grid row {} must have {} cells, got {}", row, BOARD_SIZE, cells.len()));
            }
            for (col, cell) in cells.iter().enumerate() {
                board.cells[row][col] = if cell.trim().is_empty() {
                    None
                } else {
                    Some(Mark::parse(cell).ok_or_else(|| format!("Unexpected cell value '{}'", cell))?)
                };
            }
        }
        Ok(board)
    }

    pub fn to_grid(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or(" ", |mark| mark.as_str()).to_string())
                    .collect()
            })
            .collect()
    }

    pub fn get(&self, pos: Position) -> Option<Mark> {
        if !pos.is_on_board() {
            return None;
        }
        self.cells[pos.row][pos.col]
    }

    pub fn place(&mut self, row: usize, col: usize, mark: Mark) -> bool {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return false;
        }
        if self.cells[row][col].is_some() {
            return false;
        }
        self.cells[row][col] = Some(mark);
        true
    }

    pub fn place_at(&mut self, pos: Position, mark: Mark) -> bool {
        self.place(pos.row, pos.col, mark)
    }

    pub fn reset(&mut self) {
        self.cells = [[None; BOARD_SIZE]; BOARD_SIZE];
    }

    /// Empty cells in row-major order. Call again to restart, or clone the
    /// iterator mid-way.
    pub fn available_moves(&self) -> AvailableMoves<'_> {
        AvailableMoves {
            cells: &self.cells,
            index: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|row| row.iter().all(|cell| cell.is_some()))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|row| row.iter().all(|cell| cell.is_none()))
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell == Some(mark))
            .count()
    }

    /// X moves first and the marks alternate, so X leads O by zero or one.
    pub fn is_well_formed(&self) -> bool {
        let x = self.count(Mark::X);
        let o = self.count(Mark::O);
        x == o || x == o + 1
    }

    pub fn winner(&self) -> Option<Mark> {
        check_win(&self.cells)
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        check_win_with_line(&self.cells)
    }

    pub fn game_state(&self) -> GameStatus {
        match self.winner() {
            Some(Mark::X) => GameStatus::XWins,
            Some(Mark::O) => GameStatus::OWins,
            None if self.is_full() => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }

    pub fn copy(&self) -> Board {
        *self
    }
}

#[derive(Clone, Debug)]
pub struct AvailableMoves<'a> {
    cells: &'a Grid,
    index: usize,
}

impl Iterator for AvailableMoves<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        while self.index < BOARD_SIZE * BOARD_SIZE {
            let pos = Position::new(self.index / BOARD_SIZE, self.index % BOARD_SIZE);
            self.index += 1;
            if self.cells[pos.row][pos.col].is_none() {
                return Some(pos);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(BOARD_SIZE * BOARD_SIZE - self.index))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
                writeln!(f, "{}", "-".repeat(BOARD_SIZE * 4 - 3))?;
            }
            let cells: Vec<&str> = row.iter().map(|cell| cell.map_or(" ", |m| m.as_str())).collect();
            write!(f, "{}", cells.join(" | "))?;
        }
        Ok(())
    }
}
