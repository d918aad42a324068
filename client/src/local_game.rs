use std::io::Write;

use common::games::tictactoe::{GameMode, Mark, MoveError, Position, TurnController};
use common::protocol::LineReader;
use tokio::io::AsyncRead;

use crate::console::{Command, HELP, parse_command, render_board, render_outcome, render_score};

fn io_error(e: std::io::Error) -> String {
    format!("Failed to write to terminal: {}", e)
}

fn draw<W: Write>(out: &mut W, controller: &TurnController) -> Result<(), String> {
    writeln!(out, "\n{}{}", render_board(controller.board()), render_score(&controller.score())).map_err(io_error)
}

fn prompt<W: Write>(out: &mut W, controller: &TurnController) -> Result<(), String> {
    let text = if controller.game_state().is_terminal() {
        "New round (n) or quit (q)? ".to_string()
    } else {
        match controller.mode() {
            GameMode::HumanVsHuman => format!("{} to move: ", controller.current_turn()),
            GameMode::HumanVsAi => format!("Your move ({}): ", controller.human_mark()),
        }
    };
    write!(out, "{}", text).map_err(io_error)?;
    out.flush().map_err(io_error)
}

/// Plays rounds at one terminal until the input ends or the player quits.
pub async fn run_local<R, W>(
    controller: &mut TurnController,
    input: &mut LineReader<R>,
    out: &mut W,
) -> Result<(), String>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", HELP).map_err(io_error)?;
    draw(out, controller)?;

    loop {
        if controller.finalize_if_over() {
            writeln!(out, "{}", render_outcome(controller.game_state(), controller.winning_line()))
                .map_err(io_error)?;
            writeln!(out, "{}", render_score(&controller.score())).map_err(io_error)?;
        } else if controller.is_ai_turn() {
            match controller.try_apply_ai_move() {
                Ok(pos) => writeln!(out, "AI ({}) plays {}", controller.ai_mark(), pos).map_err(io_error)?,
                Err(e) => writeln!(out, "AI could not move: {}", e).map_err(io_error)?,
            }
            draw(out, controller)?;
            continue;
        }

        prompt(out, controller)?;
        let Some(line) = input.next_line().await else {
            writeln!(out).map_err(io_error)?;
            return Ok(());
        };

        match parse_command(&line) {
            Ok(Command::Quit) => return Ok(()),
            Ok(Command::Help) => writeln!(out, "{}", HELP).map_err(io_error)?,
            Ok(Command::NewRound) => {
                controller.reset_round(Mark::X);
                draw(out, controller)?;
            }
            Ok(Command::Move { row, col }) => {
                let result = Position::from_signed(row, col)
                    .ok_or(MoveError::OutOfRange)
                    .and_then(|pos| controller.try_apply_move(pos));
                match result {
                    Ok(()) => draw(out, controller)?,
                    Err(e) => writeln!(out, "{}", e).map_err(io_error)?,
                }
            }
            Err(e) => writeln!(out, "{}", e).map_err(io_error)?,
        }
    }
}
