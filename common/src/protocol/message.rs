use std::fmt;

use serde::{Deserialize, Serialize};

use crate::games::tictactoe::{Board, Mark, Position};
use crate::identifiers::PeerRole;

/// One line of the online protocol, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// From a host: the joiner's mark. From the relay: the peer's role.
    Hello {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        symbol: Option<Mark>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<PeerRole>,
    },
    Ready,
    Join {
        room: String,
    },
    Move {
        row: i64,
        col: i64,
    },
    Sync {
        grid: Vec<Vec<String>>,
        turn: Mark,
    },
    Restart,
    Error {
        message: String,
    },
}

impl Message {
    pub fn hello_symbol(symbol: Mark) -> Self {
        Message::Hello {
            symbol: Some(symbol),
            role: None,
        }
    }

    pub fn hello_role(role: PeerRole) -> Self {
        Message::Hello {
            symbol: None,
            role: Some(role),
        }
    }

    pub fn place(pos: Position) -> Self {
        Message::Move {
            row: pos.row as i64,
            col: pos.col as i64,
        }
    }

    pub fn sync(board: &Board, turn: Mark) -> Self {
        Message::Sync {
            grid: board.to_grid(),
            turn,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Message::Error {
            message: message.into(),
        }
    }

    /// Decodes the board carried by a `sync` message.
    pub fn sync_position(&self) -> Option<Result<(Board, Mark), String>> {
        match self {
            Message::Sync { grid, turn } => Some(Board::from_grid(grid).map(|board| (board, *turn))),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Message::Hello { .. } => "hello",
            Message::Ready => "ready",
            Message::Join { .. } => "join",
            Message::Move { .. } => "move",
            Message::Sync { .. } => "sync",
            Message::Restart => "restart",
            Message::Error { .. } => "error",
        }
    }
}

#[derive(Debug)]
pub enum ProtocolError {
    Empty,
    TooLong { len: usize, max: usize },
    Json(serde_json::Error),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Empty => write!(f, "Empty line"),
            ProtocolError::TooLong { len, max } => {
                write!(f, "Line of {} bytes exceeds limit of {}", len, max)
            }
            ProtocolError::Json(e) => write!(f, "Malformed message: {}", e),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(e: serde_json::Error) -> Self {
        ProtocolError::Json(e)
    }
}

/// Compact JSON followed by a newline.
pub fn encode(message: &Message) -> Result<String, ProtocolError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

pub fn decode(line: &str) -> Result<Message, ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::Empty);
    }
    Ok(serde_json::from_str(line)?)
}
