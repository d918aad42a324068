pub mod p2p;
pub mod relay;
pub mod session;

use std::io::Write;

use common::protocol::{DEFAULT_MAX_LINE_BYTES, LineReader, Message, write_message};
use common::{log, log_warn};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::console::{Command, HELP, parse_command, render_board, render_outcome, render_score};
use p2p::HostedPeer;
use session::{OnlineRole, OnlineSession};

fn io_error(e: std::io::Error) -> String {
    format!("Failed to write to terminal: {}", e)
}

async fn send_all<W: AsyncWrite + Unpin>(writer: &mut W, messages: &[Message]) -> Result<(), String> {
    for message in messages {
        write_message(writer, message)
            .await
            .map_err(|e| format!("Failed to send {}: {}", message.kind(), e))?;
    }
    Ok(())
}

fn draw<W: Write>(out: &mut W, session: &OnlineSession) -> Result<(), String> {
    let controller = session.controller();
    writeln!(out, "\n{}{}", render_board(controller.board()), render_score(&controller.score())).map_err(io_error)?;

    let status = controller.game_state();
    let text = if !session.is_paired() {
        "Waiting for the opponent...".to_string()
    } else if status.is_terminal() {
        let restart_hint = match session.role() {
            OnlineRole::Host => "n for a new round",
            OnlineRole::Joiner => "n to ask the host for a new round",
        };
        format!("{} ({})", render_outcome(status, controller.winning_line()), restart_hint)
    } else if session.is_local_turn() {
        format!("Your move ({}): ", session.local_mark())
    } else {
        format!("Opponent ({}) to move...", session.local_mark().opponent())
    };
    write!(out, "{}", text).map_err(io_error)?;
    out.flush().map_err(io_error)
}

/// Drives one online game until either side disconnects or the player quits.
pub async fn run_session<R, W, I, O>(
    mut session: OnlineSession,
    mut peer: LineReader<R>,
    mut writer: W,
    input: &mut LineReader<I>,
    out: &mut O,
) -> Result<(), String>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    I: AsyncRead + Unpin,
    O: Write,
{
    writeln!(out, "{}", HELP).map_err(io_error)?;
    if session.is_paired() {
        let greeting = session.on_connected();
        send_all(&mut writer, &greeting).await?;
    }
    draw(out, &session)?;

    loop {
        tokio::select! {
            message = peer.next_message() => {
                let Some(message) = message else {
                    writeln!(out, "\nOpponent disconnected.").map_err(io_error)?;
                    log!("Peer closed the connection");
                    return Ok(());
                };
                let reaction = session.on_remote(message)?;
                send_all(&mut writer, &reaction.replies).await?;
                if reaction.redraw {
                    draw(out, &session)?;
                }
            }
            line = input.next_line() => {
                let Some(line) = line else {
                    return Ok(());
                };
                match parse_command(&line) {
                    Ok(Command::Quit) => return Ok(()),
                    Ok(Command::Help) => writeln!(out, "{}", HELP).map_err(io_error)?,
                    Ok(Command::NewRound) => {
                        let messages = session.on_local_restart();
                        send_all(&mut writer, &messages).await?;
                        draw(out, &session)?;
                    }
                    Ok(Command::Move { row, col }) => match session.on_local_move(row, col) {
                        Ok(messages) => {
                            send_all(&mut writer, &messages).await?;
                            draw(out, &session)?;
                        }
                        Err(e) => {
                            log_warn!("Move rejected: {}", e);
                            writeln!(out, "{}", e).map_err(io_error)?;
                        }
                    },
                    Err(e) => writeln!(out, "{}", e).map_err(io_error)?,
                }
            }
        }
    }
}

/// Plays a hosted peer-to-peer game. Late arrivals are turned away until the
/// session ends.
pub async fn run_hosted<I, O>(hosted: HostedPeer, input: &mut LineReader<I>, out: &mut O) -> Result<(), String>
where
    I: AsyncRead + Unpin,
    O: Write,
{
    let HostedPeer { stream, gatekeeper } = hosted;
    let (read_half, write_half) = stream.into_split();
    let result = run_session(
        OnlineSession::new(OnlineRole::Host, true),
        LineReader::new(read_half, DEFAULT_MAX_LINE_BYTES),
        write_half,
        input,
        out,
    )
    .await;
    gatekeeper.abort();
    result
}
