//! Tests for stepping through recorded games.

use gomoku_engine::{
    BoardState, Dimensions, EngineError, GameRecord, Mark, ReplayController, Winner, decode,
};

fn scenario_record() -> GameRecord {
    GameRecord::from_json(r#"{"width":3,"height":3,"moves":[4,0,8,2],"winner":-1,"n_in_a_row":3}"#)
        .expect("Valid record")
}

fn gomoku_record() -> GameRecord {
    // Black builds a diagonal while white answers along the top edge.
    GameRecord::new(
        15,
        15,
        vec![112, 0, 128, 1, 144, 2, 160, 3, 176],
        Winner::Player(1),
        5,
    )
}

/// Board produced by applying the first `turn` moves to an empty board.
fn fresh_replay(record: &GameRecord, turn: usize) -> BoardState {
    let mut board = BoardState::new(record.dimensions().unwrap());
    for (i, &mv) in record.moves()[..turn].iter().enumerate() {
        board.apply_move(mv, i).unwrap();
    }
    board
}

#[test]
fn test_scenario_three_by_three() {
    let mut replay = ReplayController::load(scenario_record()).expect("Valid record");
    for _ in 0..4 {
        assert!(replay.next_turn().unwrap());
    }

    let board = replay.board();
    assert_eq!(board.get(1, 1), Some(Mark::X));
    assert_eq!(board.get(0, 0), Some(Mark::O));
    assert_eq!(board.get(2, 2), Some(Mark::X));
    assert_eq!(board.get(2, 0), Some(Mark::O));
    assert_eq!(board.occupied_count(), 4);

    assert!(!replay.next_turn().unwrap());
    assert_eq!(replay.turn(), 4);
    assert_eq!(replay.board().occupied_count(), 4);
}

#[test]
fn test_full_replay_marks_every_move_by_parity() {
    let record = gomoku_record();
    let mut replay = ReplayController::load(record.clone()).unwrap();
    while replay.next_turn().unwrap() {}

    let dims = record.dimensions().unwrap();
    for (i, &mv) in record.moves().iter().enumerate() {
        let (x, y) = decode(mv, dims.width());
        let expected = if i % 2 == 0 { Mark::X } else { Mark::O };
        assert_eq!(replay.board().get(x, y), Some(expected), "move {} at ({}, {})", i, x, y);
    }
    assert_eq!(replay.board().occupied_count(), record.moves().len());
    assert_eq!(replay.turn(), record.moves().len());
}

#[test]
fn test_prev_at_start_is_noop() {
    let mut replay = ReplayController::load(scenario_record()).unwrap();
    assert!(!replay.prev_turn().unwrap());
    assert_eq!(replay.turn(), 0);
    assert_eq!(replay.board().occupied_count(), 0);
}

#[test]
fn test_next_then_prev_round_trips_from_every_turn() {
    let record = gomoku_record();
    let mut replay = ReplayController::load(record.clone()).unwrap();

    for turn in 0..record.moves().len() {
        replay.jump_to(turn).unwrap();
        let board_before = replay.board().clone();

        replay.next_turn().unwrap();
        replay.prev_turn().unwrap();
        assert_eq!(replay.turn(), turn);
        assert_eq!(replay.board(), &board_before);
    }
}

#[test]
fn test_prev_then_next_round_trips_from_every_turn() {
    let record = gomoku_record();
    let mut replay = ReplayController::load(record.clone()).unwrap();

    for turn in 1..=record.moves().len() {
        replay.jump_to(turn).unwrap();
        let board_before = replay.board().clone();

        replay.prev_turn().unwrap();
        replay.next_turn().unwrap();
        assert_eq!(replay.turn(), turn);
        assert_eq!(replay.board(), &board_before);
    }
}

#[test]
fn test_jump_matches_fresh_replay() {
    let record = gomoku_record();
    let mut replay = ReplayController::load(record.clone()).unwrap();

    // Wander back and forth; every landing must equal a replay from zero.
    for target in [5, 2, 9, 0, 7, 7, 1, 8] {
        assert_eq!(replay.jump_to(target).unwrap(), target);
        assert_eq!(replay.board(), &fresh_replay(&record, target), "jump to {}", target);
    }
}

#[test]
fn test_empty_record() {
    let record = GameRecord::new(4, 4, vec![], Winner::None, 3);
    let mut replay = ReplayController::load(record).unwrap();
    assert!(replay.is_at_start());
    assert!(replay.is_at_end());
    assert!(!replay.next_turn().unwrap());
    assert_eq!(replay.board().dimensions(), Dimensions::new(4, 4).unwrap());
}

#[test]
fn test_huge_dimensions_abort_load() {
    for (width, height) in [(4_294_967_296_u64, 4_294_967_296_u64), (100_000, 100_000)] {
        let json = format!(
            r#"{{"width":{},"height":{},"moves":[],"winner":-1,"n_in_a_row":5}}"#,
            width, height
        );
        let record = GameRecord::from_json(&json).unwrap();
        assert!(
            matches!(ReplayController::load(record), Err(EngineError::InvalidRecord(_))),
            "{}x{}",
            width,
            height
        );
    }
}
