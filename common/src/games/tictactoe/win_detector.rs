use super::types::{BOARD_SIZE, Mark, Position, WinningLine};

pub type Grid = [[Option<Mark>; BOARD_SIZE]; BOARD_SIZE];

/// The eight winning lines in scan order: rows top to bottom, columns left to
/// right, main diagonal, anti-diagonal. Cells are `(row, col)`.
const LINES: [[(usize, usize); BOARD_SIZE]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

pub fn check_win(grid: &Grid) -> Option<Mark> {
    check_win_with_line(grid).map(|line| line.mark)
}

pub fn check_win_with_line(grid: &Grid) -> Option<WinningLine> {
    LINES.iter().find_map(|line| check_line(grid, line))
}

fn check_line(grid: &Grid, line: &[(usize, usize); BOARD_SIZE]) -> Option<WinningLine> {
    let (r0, c0) = line[0];
    let mark = grid[r0][c0]?;

    if line.iter().all(|&(r, c)| grid[r][c] == Some(mark)) {
        let cells = line.map(|(r, c)| Position::new(r, c));
        return Some(WinningLine::new(mark, cells));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: [&str; BOARD_SIZE]) -> Grid {
        let mut grid: Grid = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                grid[r][c] = Mark::parse(&ch.to_string());
            }
        }
        grid
    }

    #[test]
    fn test_empty_grid_has_no_winner() {
        let grid = grid_from(["   ", "   ", "   "]);
        assert_eq!(check_win(&grid), None);
    }

    #[test]
    fn test_column_win_reports_cells_top_to_bottom() {
        let grid = grid_from(["XO ", "XO ", "X  "]);
        let line = check_win_with_line(&grid).unwrap();
        assert_eq!(line.mark, Mark::X);
        assert_eq!(
            line.cells,
            [Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)]
        );
    }

    #[test]
    fn test_anti_diagonal_win() {
        let grid = grid_from(["XXO", " O ", "O X"]);
        let line = check_win_with_line(&grid).unwrap();
        assert_eq!(line.mark, Mark::O);
        assert_eq!(line.start(), Position::new(0, 2));
        assert_eq!(line.end(), Position::new(2, 0));
    }

    #[test]
    fn test_rows_are_scanned_before_columns() {
        let grid = grid_from(["XXX", "X  ", "X  "]);
        let line = check_win_with_line(&grid).unwrap();
        assert_eq!(line.cells[2], Position::new(0, 2));
    }
}
