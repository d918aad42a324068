mod support;

use common::games::tictactoe::{
    Board, Difficulty, GameMode, GameStatus, HumanVsAiScore, HumanVsHumanScore, Mark, Position,
    Score, TurnController,
};
use support::reachable_boards;

const X_WINS_ROUND: [(i64, i64); 5] = [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)];
const O_WINS_ROUND: [(i64, i64); 6] = [(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (1, 2)];
const DRAW_ROUND: [(i64, i64); 9] = [
    (0, 0), (0, 1), (0, 2),
    (1, 1), (1, 0), (1, 2),
    (2, 1), (2, 0), (2, 2),
];

fn play_round(controller: &mut TurnController, moves: &[(i64, i64)]) {
    for &(row, col) in moves {
        assert!(controller.apply_move(row, col));
    }
    assert!(controller.finalize_if_over());
    controller.reset_round(Mark::X);
}

#[test]
fn test_game_state_is_consistent_for_every_reachable_board() {
    for board in reachable_boards() {
        let state = board.game_state();
        match state {
            GameStatus::XWins => assert_eq!(board.winner(), Some(Mark::X)),
            GameStatus::OWins => assert_eq!(board.winner(), Some(Mark::O)),
            GameStatus::Draw => {
                assert!(board.is_full());
                assert_eq!(board.winner(), None);
            }
            GameStatus::InProgress => {
                assert!(!board.is_full());
                assert_eq!(board.winner(), None);
            }
        }
        assert_eq!(board.winning_line().map(|line| line.mark), board.winner());
        assert!(board.is_well_formed());
    }
}

#[test]
fn test_draw_round_is_draw() {
    let mut controller = TurnController::default();
    for &(row, col) in &DRAW_ROUND {
        assert!(controller.apply_move(row, col));
    }
    assert!(controller.board().is_full());
    assert_eq!(controller.game_state(), GameStatus::Draw);
    assert_eq!(controller.winning_line(), None);
}

#[test]
fn test_occupied_cell_move_leaves_board_unchanged() {
    let mut controller = TurnController::default();
    assert!(controller.apply_move(0, 0));
    let snapshot = *controller.board();
    assert!(!controller.apply_move(0, 0));
    assert_eq!(*controller.board(), snapshot);
    assert_eq!(controller.board().get(Position::new(0, 0)), Some(Mark::X));
}

#[test]
fn test_human_vs_human_tally_sums_to_rounds() {
    let mut controller = TurnController::default();
    let rounds: [&[(i64, i64)]; 3] = [&X_WINS_ROUND, &O_WINS_ROUND, &DRAW_ROUND];
    for i in 0..9 {
        play_round(&mut controller, rounds[i % rounds.len()]);
    }
    assert_eq!(
        controller.score(),
        Score::HumanVsHuman(HumanVsHumanScore { x: 3, o: 3, draws: 3 })
    );
    assert_eq!(controller.score().rounds(), 9);
}

#[test]
fn test_human_vs_ai_tally_sums_to_rounds() {
    let mut controller = TurnController::new(Mark::X, Difficulty::Easy.max_depth());
    controller.set_mode(GameMode::HumanVsAi);

    let rounds = 4;
    for _ in 0..rounds {
        while !controller.game_state().is_terminal() {
            if controller.is_ai_turn() {
                controller.apply_ai_move().unwrap();
            } else {
                let pos = controller.board().available_moves().last().unwrap();
                assert!(controller.apply_move(pos.row as i64, pos.col as i64));
            }
        }
        assert!(controller.finalize_if_over());
        controller.reset_round(Mark::X);
    }

    let Score::HumanVsAi(HumanVsAiScore { human, ai, draws }) = controller.score() else {
        panic!("expected the human-vs-AI tally");
    };
    assert_eq!(human + ai + draws, rounds);
    assert_eq!(controller.tally(GameMode::HumanVsHuman).rounds(), 0);
}

#[test]
fn test_hard_ai_holds_draw_after_corner_opening() {
    let mut controller = TurnController::default();
    controller.set_mode(GameMode::HumanVsAi);
    assert!(controller.apply_move(0, 0));
    assert_eq!(controller.apply_ai_move(), Some(Position::new(1, 1)));
}

#[test]
fn test_unlimited_ai_is_never_beaten_through_controller() {
    // A greedy human that always takes the first free cell.
    let mut controller = TurnController::default();
    controller.set_mode(GameMode::HumanVsAi);
    while !controller.game_state().is_terminal() {
        if controller.is_ai_turn() {
            controller.apply_ai_move().unwrap();
        } else {
            let pos = controller.board().available_moves().next().unwrap();
            controller.try_apply_move(pos).unwrap();
        }
    }
    assert_ne!(controller.game_state(), GameStatus::XWins);
}

#[test]
fn test_online_joiner_adopts_host_snapshot() {
    let mut host = TurnController::default();
    assert!(host.apply_move(1, 1));

    let mut joiner = TurnController::default();
    let grid = host.board().to_grid();
    joiner
        .load_position(Board::from_grid(&grid).unwrap(), host.current_turn())
        .unwrap();
    assert_eq!(joiner.board(), host.board());
    assert_eq!(joiner.current_turn(), Mark::O);
}
