//! Tests for the replay/live façade.

mod common;

use common::{ScriptedAuthority, Verdict};
use gomoku_engine::{
    Dimensions, EngineError, GameRecord, Mark, ModeKind, MoveOutcome, MoveReply, TurnEngine, Winner,
};

fn record() -> GameRecord {
    GameRecord::new(3, 3, vec![4, 0, 8, 2], Winner::None, 3)
}

#[test]
fn test_idle_engine_rejects_navigation() {
    let mut engine = TurnEngine::new(ScriptedAuthority::new());
    assert_eq!(engine.mode(), ModeKind::Idle);
    assert_eq!(
        engine.next(),
        Err(EngineError::Mode {
            operation: "next",
            mode: ModeKind::Idle
        })
    );
    assert!(engine.board().is_none());
}

#[test]
fn test_replay_navigation() {
    let mut engine = TurnEngine::new(ScriptedAuthority::new());
    engine.load_record(record()).unwrap();
    assert_eq!(engine.mode(), ModeKind::Replay);

    assert!(engine.next().unwrap());
    assert!(engine.next().unwrap());
    assert_eq!(engine.turn(), 2);
    assert!(engine.prev().unwrap());
    assert_eq!(engine.turn(), 1);
    assert_eq!(engine.jump_to(10).unwrap(), 4);
    assert!(!engine.next().unwrap());
    assert_eq!(engine.total_turns(), 4);

    let board = engine.board().unwrap();
    assert_eq!(board.get(2, 0), Some(Mark::O));
}

#[tokio::test]
async fn test_play_rejected_in_replay_mode() {
    let mut engine = TurnEngine::new(ScriptedAuthority::new());
    engine.load_record(record()).unwrap();
    engine.next().unwrap();

    let result = engine.play(0, 1).await;
    assert_eq!(
        result,
        Err(EngineError::Mode {
            operation: "play",
            mode: ModeKind::Replay
        })
    );
    assert_eq!(engine.turn(), 1);
    assert!(engine.authority().submitted().is_empty());
}

#[tokio::test]
async fn test_navigation_rejected_in_live_mode() {
    let mut engine = TurnEngine::new(ScriptedAuthority::new());
    engine.start_live(Dimensions::new(3, 3).unwrap(), 3).await.unwrap();
    assert_eq!(engine.mode(), ModeKind::Live);

    engine.play(1, 1).await.unwrap();
    assert!(matches!(engine.prev(), Err(EngineError::Mode { operation: "prev", .. })));
    assert!(matches!(engine.next(), Err(EngineError::Mode { operation: "next", .. })));
    assert!(matches!(engine.jump_to(0), Err(EngineError::Mode { .. })));
    assert_eq!(engine.turn(), 1);
}

#[tokio::test]
async fn test_live_game_to_win() {
    let mut engine = TurnEngine::new(ScriptedAuthority::new());
    let id = engine.start_live(Dimensions::new(3, 3).unwrap(), 3).await.unwrap();
    assert_eq!(id, "game-1");

    engine.play(0, 0).await.unwrap();
    engine.play(0, 1).await.unwrap();
    engine.play(1, 0).await.unwrap();
    engine.play(1, 1).await.unwrap();
    engine
        .authority()
        .push(Verdict::Reply(MoveReply::new(Winner::Player(1), true, vec![0, 1, 2])));
    let outcome = engine.play(2, 0).await.unwrap();

    assert!(matches!(outcome, MoveOutcome::Won { winner: Winner::Player(1), .. }));
    assert_eq!(engine.winner(), Winner::Player(1));
    assert_eq!(engine.play(2, 2).await, Err(EngineError::SessionTerminated));
}

#[tokio::test]
async fn test_switching_modes_discards_previous_board() {
    let mut engine = TurnEngine::new(ScriptedAuthority::new());
    engine.start_live(Dimensions::new(3, 3).unwrap(), 3).await.unwrap();
    engine.play(2, 2).await.unwrap();

    engine.load_record(record()).unwrap();
    assert_eq!(engine.mode(), ModeKind::Replay);
    assert_eq!(engine.turn(), 0);
    assert_eq!(engine.board().unwrap().occupied_count(), 0);

    engine.start_live(Dimensions::new(5, 5).unwrap(), 4).await.unwrap();
    assert_eq!(engine.turn(), 0);
    assert_eq!(engine.board().unwrap().dimensions(), Dimensions::new(5, 5).unwrap());
}

#[test]
fn test_corrupt_record_keeps_previous_mode() {
    let mut engine = TurnEngine::new(ScriptedAuthority::new());
    engine.load_record(record()).unwrap();
    engine.next().unwrap();

    let corrupt = GameRecord::new(3, 3, vec![4, 4], Winner::None, 3);
    assert!(matches!(engine.load_record(corrupt), Err(EngineError::InvalidMove { .. })));
    assert_eq!(engine.mode(), ModeKind::Replay);
    assert_eq!(engine.turn(), 1);
}

#[tokio::test]
async fn test_failed_start_keeps_previous_mode() {
    let mut engine = TurnEngine::new(ScriptedAuthority::refusing_create());
    engine.load_record(record()).unwrap();

    let result = engine.start_live(Dimensions::new(3, 3).unwrap(), 3).await;
    assert!(matches!(result, Err(EngineError::SessionCreation(_))));
    assert_eq!(engine.mode(), ModeKind::Replay);

    engine.close();
    assert_eq!(engine.mode(), ModeKind::Idle);
}
