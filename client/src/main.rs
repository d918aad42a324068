mod config;
mod console;
mod local_game;
mod online;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use common::config::Validate;
use common::games::tictactoe::{Difficulty, GameMode, Mark, TurnController};
use common::id_generator::generate_room_name;
use common::protocol::{DEFAULT_MAX_LINE_BYTES, LineReader};
use common::{RoomName, log, logger};
use tokio::io::Stdin;

use config::{ClientConfig, get_config_manager};
use local_game::run_local;
use online::p2p::{accept_one, bind_host, connect};
use online::relay::join_room;
use online::{run_hosted, run_session};
use online::session::{OnlineRole, OnlineSession};

const INPUT_LINE_LIMIT: usize = 256;

#[derive(Parser)]
#[command(name = "tictactoe")]
struct Cli {
    #[arg(long)]
    use_log_prefix: bool,

    /// Path to the YAML config; defaults to a file next to the executable
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Two players sharing this terminal
    Local,
    /// Play against the computer
    Ai {
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,
        #[arg(long, value_parser = parse_mark)]
        human_mark: Option<Mark>,
    },
    /// Host a game and wait for one opponent to join
    Host {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Join a hosted game at HOST:PORT
    Join { address: Option<String> },
    /// Meet an opponent in a relay room
    Relay {
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        room: Option<String>,
        /// Create a freshly named room to share with a friend
        #[arg(long, conflicts_with = "room")]
        new_room: bool,
    },
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    match value.to_ascii_lowercase().as_str() {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        other => Err(format!("Unknown difficulty '{}', expected easy, medium or hard", other)),
    }
}

fn parse_mark(value: &str) -> Result<Mark, String> {
    Mark::parse(value).ok_or_else(|| format!("Unknown mark '{}', expected X or O", value))
}

fn stdin_lines() -> LineReader<Stdin> {
    LineReader::new(tokio::io::stdin(), INPUT_LINE_LIMIT)
}

async fn play_online<R, W>(
    session: OnlineSession,
    reader: LineReader<R>,
    writer: W,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: tokio::io::AsyncRead + Unpin,
    W: tokio::io::AsyncWrite + Unpin,
{
    let mut input = stdin_lines();
    let mut out = std::io::stdout();
    run_session(session, reader, writer, &mut input, &mut out).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let prefix = if cli.use_log_prefix {
        Some("Client".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_manager = get_config_manager(cli.config.as_deref());
    let config: ClientConfig = config_manager.get_config()?;
    config.validate()?;
    let timeout = Duration::from_millis(config.network.connect_timeout_ms);

    match cli.command {
        Mode::Local => {
            let mut controller = TurnController::new(config.human_mark, config.difficulty.max_depth());
            run_local(&mut controller, &mut stdin_lines(), &mut std::io::stdout()).await?;
        }
        Mode::Ai {
            difficulty,
            human_mark,
        } => {
            let difficulty = difficulty.unwrap_or(config.difficulty);
            let human_mark = human_mark.unwrap_or(config.human_mark);
            // Remember the last choice for next time.
            if difficulty != config.difficulty || human_mark != config.human_mark {
                config_manager.update(|config| {
                    config.difficulty = difficulty;
                    config.human_mark = human_mark;
                })?;
            }

            log!("Playing as {} against {} AI", human_mark, difficulty);
            let mut controller = TurnController::new(human_mark, difficulty.max_depth());
            controller.set_mode(GameMode::HumanVsAi);
            run_local(&mut controller, &mut stdin_lines(), &mut std::io::stdout()).await?;
        }
        Mode::Host { port } => {
            let listener = bind_host(port.unwrap_or(config.network.port)).await?;
            let hosted = accept_one(listener).await?;
            run_hosted(hosted, &mut stdin_lines(), &mut std::io::stdout()).await?;
        }
        Mode::Join { address } => {
            let address = address.unwrap_or(config.network.join_address);
            let stream = connect(&address, timeout).await?;
            let (read_half, write_half) = stream.into_split();
            play_online(
                OnlineSession::new(OnlineRole::Joiner, true),
                LineReader::new(read_half, DEFAULT_MAX_LINE_BYTES),
                write_half,
            )
            .await?;
        }
        Mode::Relay {
            address,
            room,
            new_room,
        } => {
            let address = address.unwrap_or(config.network.relay_address);
            let room = match (room, new_room) {
                (Some(name), _) => RoomName::parse(&name)?,
                (None, true) => RoomName::parse(&generate_room_name())?,
                (None, false) => RoomName::default(),
            };
            println!("Room: {}", room);

            let connection = join_room(&address, &room, timeout).await?;
            // The relay has already told the second peer that the room is ready.
            let paired = connection.role == OnlineRole::Joiner;
            play_online(
                OnlineSession::new(connection.role, paired),
                connection.reader,
                connection.writer,
            )
            .await?;
        }
    }

    Ok(())
}
