use common::games::tictactoe::{
    BOARD_SIZE, Board, GameStatus, HumanVsAiScore, HumanVsHumanScore, Position, Score, WinningLine,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move { row: i64, col: i64 },
    NewRound,
    Help,
    Quit,
}

pub const HELP: &str = "Enter a move as `row col` (0-2), `n` for a new round, `h` for help, `q` to quit.";

/// Accepts `1 2`, `1,2` or `1, 2`. Coordinates are passed through unchecked
/// so the controller decides what is on the board.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Ok(Command::Quit),
        "n" | "new" | "restart" => return Ok(Command::NewRound),
        "h" | "help" | "?" => return Ok(Command::Help),
        _ => {}
    }

    let parts: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    let [row, col] = parts.as_slice() else {
        return Err(format!("Unrecognised input '{}'. {}", line, HELP));
    };
    let row = row.parse::<i64>().map_err(|_| format!("Invalid row '{}'", row))?;
    let col = col.parse::<i64>().map_err(|_| format!("Invalid column '{}'", col))?;
    Ok(Command::Move { row, col })
}

pub fn render_board(board: &Board) -> String {
    let mut out = String::from("    0   1   2\n");
    for row in 0..BOARD_SIZE {
        let cells: Vec<&str> = (0..BOARD_SIZE)
            .map(|col| board.get(Position::new(row, col)).map_or(" ", |mark| mark.as_str()))
            .collect();
        out.push_str(&format!("{}   {}\n", row, cells.join(" | ")));
        if row + 1 < BOARD_SIZE {
            out.push_str("   ---+---+---\n");
        }
    }
    out
}

pub fn render_score(score: &Score) -> String {
    match score {
        Score::HumanVsHuman(HumanVsHumanScore { x, o, draws }) => {
            format!("Score  X: {}  O: {}  Draws: {}", x, o, draws)
        }
        Score::HumanVsAi(HumanVsAiScore { human, ai, draws }) => {
            format!("Score  You: {}  AI: {}  Draws: {}", human, ai, draws)
        }
    }
}

pub fn render_outcome(status: GameStatus, line: Option<WinningLine>) -> String {
    match (status, line) {
        (GameStatus::Draw, _) => "Round over: draw.".to_string(),
        (status, Some(line)) if status.is_terminal() => format!(
            "Round over: {} wins ({} to {}).",
            line.mark,
            line.start(),
            line.end()
        ),
        (status, _) => format!("{}", status),
    }
}
