use common::games::tictactoe::{GameStatus, Mark, MoveError, Position, TurnController};
use common::protocol::Message;
use common::log_warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnlineRole {
    Host,
    Joiner,
}

impl OnlineRole {
    /// The host always plays X and moves first.
    pub fn local_mark(&self) -> Mark {
        match self {
            OnlineRole::Host => Mark::X,
            OnlineRole::Joiner => Mark::O,
        }
    }
}

/// What the network loop should do after a remote message.
#[derive(Debug, Default, PartialEq)]
pub struct Reaction {
    pub replies: Vec<Message>,
    pub redraw: bool,
}

impl Reaction {
    fn ignore() -> Self {
        Self::default()
    }

    fn redraw(replies: Vec<Message>) -> Self {
        Self {
            replies,
            redraw: true,
        }
    }
}

/// One side of an online game. The host owns the authoritative round; the
/// joiner only mirrors what the host syncs and forwards its own moves.
pub struct OnlineSession {
    role: OnlineRole,
    controller: TurnController,
    paired: bool,
}

impl OnlineSession {
    pub fn new(role: OnlineRole, paired: bool) -> Self {
        Self {
            role,
            controller: TurnController::default(),
            paired,
        }
    }

    pub fn role(&self) -> OnlineRole {
        self.role
    }

    pub fn local_mark(&self) -> Mark {
        self.role.local_mark()
    }

    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    pub fn is_paired(&self) -> bool {
        self.paired
    }

    pub fn is_local_turn(&self) -> bool {
        self.paired
            && self.controller.game_state() == GameStatus::InProgress
            && self.controller.current_turn() == self.local_mark()
    }

    fn sync(&self) -> Message {
        Message::sync(self.controller.board(), self.controller.current_turn())
    }

    /// Greeting sent by the host once the opponent is on the line.
    pub fn on_connected(&mut self) -> Vec<Message> {
        self.paired = true;
        match self.role {
            OnlineRole::Host => vec![Message::hello_symbol(Mark::O), self.sync()],
            OnlineRole::Joiner => Vec::new(),
        }
    }

    pub fn on_local_move(&mut self, row: i64, col: i64) -> Result<Vec<Message>, String> {
        if !self.paired {
            return Err("Waiting for the opponent".to_string());
        }
        if self.controller.game_state().is_terminal() {
            return Err(MoveError::RoundOver.to_string());
        }
        if self.controller.current_turn() != self.local_mark() {
            return Err(MoveError::NotYourTurn.to_string());
        }
        let pos = Position::from_signed(row, col).ok_or_else(|| MoveError::OutOfRange.to_string())?;

        match self.role {
            OnlineRole::Host => {
                self.controller.try_apply_move(pos).map_err(|e| e.to_string())?;
                self.controller.finalize_if_over();
                Ok(vec![self.sync()])
            }
            OnlineRole::Joiner => {
                if self.controller.board().get(pos).is_some() {
                    return Err(MoveError::Occupied.to_string());
                }
                Ok(vec![Message::place(pos)])
            }
        }
    }

    pub fn on_local_restart(&mut self) -> Vec<Message> {
        match self.role {
            OnlineRole::Host => {
                self.controller.reset_round(Mark::X);
                vec![Message::Restart, self.sync()]
            }
            OnlineRole::Joiner => vec![Message::Restart],
        }
    }

    /// An `error` from the relay ends the session.
    pub fn on_remote(&mut self, message: Message) -> Result<Reaction, String> {
        if let Message::Error { message } = message {
            return Err(message);
        }
        Ok(match self.role {
            OnlineRole::Host => self.host_on_remote(message),
            OnlineRole::Joiner => self.joiner_on_remote(message),
        })
    }

    fn host_on_remote(&mut self, message: Message) -> Reaction {
        match message {
            Message::Ready => Reaction::redraw(self.on_connected()),
            Message::Move { row, col } => {
                if self.controller.game_state().is_terminal() || self.controller.current_turn() != Mark::O {
                    return Reaction::ignore();
                }
                if !self.controller.apply_move(row, col) {
                    log_warn!("Ignoring invalid remote move ({}, {})", row, col);
                    return Reaction::ignore();
                }
                self.controller.finalize_if_over();
                Reaction::redraw(vec![self.sync()])
            }
            Message::Restart => {
                self.controller.reset_round(Mark::X);
                Reaction::redraw(vec![Message::Restart, self.sync()])
            }
            _ => Reaction::ignore(),
        }
    }

    fn joiner_on_remote(&mut self, message: Message) -> Reaction {
        match message {
            Message::Hello {
                symbol: Some(symbol), ..
            } => {
                if symbol != self.local_mark() {
                    log_warn!("Host assigned {} but joiners always play {}", symbol, self.local_mark());
                }
                self.paired = true;
                Reaction::redraw(Vec::new())
            }
            Message::Sync { .. } => {
                let Some(Ok((board, turn))) = message.sync_position() else {
                    log_warn!("Ignoring malformed sync");
                    return Reaction::ignore();
                };
                let was_over = self.controller.game_state().is_terminal();
                if let Err(e) = self.controller.load_position(board, turn) {
                    log_warn!("Ignoring sync: {}", e);
                    return Reaction::ignore();
                }
                self.paired = true;
                // Count each finished round once, on the sync that ends it.
                if !was_over {
                    self.controller.finalize_if_over();
                }
                Reaction::redraw(Vec::new())
            }
            Message::Restart => {
                self.controller.reset_round(Mark::X);
                Reaction::redraw(Vec::new())
            }
            _ => Reaction::ignore(),
        }
    }
}
