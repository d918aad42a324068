use super::types::{GameMode, GameStatus, Mark};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HumanVsHumanScore {
    pub x: u32,
    pub o: u32,
    pub draws: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HumanVsAiScore {
    pub human: u32,
    pub ai: u32,
    pub draws: u32,
}

/// A tally for one mode. Which counters exist depends on the mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Score {
    HumanVsHuman(HumanVsHumanScore),
    HumanVsAi(HumanVsAiScore),
}

impl Score {
    pub fn rounds(&self) -> u32 {
        match self {
            Score::HumanVsHuman(s) => s.x + s.o + s.draws,
            Score::HumanVsAi(s) => s.human + s.ai + s.draws,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    human_vs_human: HumanVsHumanScore,
    human_vs_ai: HumanVsAiScore,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, mode: GameMode) -> Score {
        match mode {
            GameMode::HumanVsHuman => Score::HumanVsHuman(self.human_vs_human),
            GameMode::HumanVsAi => Score::HumanVsAi(self.human_vs_ai),
        }
    }

    /// Counts a concluded round against `mode`'s tally only. In-progress
    /// states are ignored and return false.
    pub fn record(&mut self, mode: GameMode, status: GameStatus, human_mark: Mark) -> bool {
        if !status.is_terminal() {
            return false;
        }

        match mode {
            GameMode::HumanVsHuman => {
                let score = &mut self.human_vs_human;
                match status.winner() {
                    Some(Mark::X) => score.x += 1,
                    Some(Mark::O) => score.o += 1,
                    None => score.draws += 1,
                }
            }
            GameMode::HumanVsAi => {
                let score = &mut self.human_vs_ai;
                match status.winner() {
                    Some(mark) if mark == human_mark => score.human += 1,
                    Some(_) => score.ai += 1,
                    None => score.draws += 1,
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_only_into_matching_mode() {
        let mut board = Scoreboard::new();
        board.record(GameMode::HumanVsHuman, GameStatus::XWins, Mark::X);
        board.record(GameMode::HumanVsAi, GameStatus::Draw, Mark::X);

        assert_eq!(
            board.get(GameMode::HumanVsHuman),
            Score::HumanVsHuman(HumanVsHumanScore { x: 1, o: 0, draws: 0 })
        );
        assert_eq!(
            board.get(GameMode::HumanVsAi),
            Score::HumanVsAi(HumanVsAiScore { human: 0, ai: 0, draws: 1 })
        );
    }

    #[test]
    fn test_ai_wins_attributed_by_human_mark() {
        let mut board = Scoreboard::new();
        board.record(GameMode::HumanVsAi, GameStatus::XWins, Mark::O);
        board.record(GameMode::HumanVsAi, GameStatus::OWins, Mark::O);

        assert_eq!(
            board.get(GameMode::HumanVsAi),
            Score::HumanVsAi(HumanVsAiScore { human: 1, ai: 1, draws: 0 })
        );
    }

    #[test]
    fn test_in_progress_is_not_recorded() {
        let mut board = Scoreboard::new();
        assert!(!board.record(GameMode::HumanVsHuman, GameStatus::InProgress, Mark::X));
        assert_eq!(board.get(GameMode::HumanVsHuman).rounds(), 0);
    }
}
