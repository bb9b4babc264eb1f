//! Scripted remote authority for session and engine tests.

#![allow(dead_code)]

use gomoku_engine::{Dimensions, MoveReply, NewGame, RemoteAuthority, RemoteError};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// What the authority does with the next submitted move.
#[derive(Debug, Clone)]
pub enum Verdict {
    Reply(MoveReply),
    Fail(RemoteError),
    Stall(Duration),
}

/// Authority that answers from a queue of verdicts.
///
/// An empty queue answers every move with an undecided reply.
#[derive(Debug, Default)]
pub struct ScriptedAuthority {
    verdicts: Mutex<VecDeque<Verdict>>,
    submitted: Mutex<Vec<(String, usize)>>,
    refuse_create: bool,
    board: Option<(Dimensions, usize)>,
}

impl ScriptedAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing_create() -> Self {
        Self {
            refuse_create: true,
            ..Self::default()
        }
    }

    /// Authority that reports its own board in the creation reply.
    pub fn with_board(dims: Dimensions, win_length: usize) -> Self {
        Self {
            board: Some((dims, win_length)),
            ..Self::default()
        }
    }

    pub fn push(&self, verdict: Verdict) {
        self.verdicts.lock().unwrap().push_back(verdict);
    }

    pub fn submitted(&self) -> Vec<(String, usize)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RemoteAuthority for ScriptedAuthority {
    async fn create_game(&self) -> Result<NewGame, RemoteError> {
        if self.refuse_create {
            return Err(RemoteError::Transport("connection refused".to_string()));
        }
        let created = NewGame::new("game-1");
        Ok(match self.board {
            Some((dims, win_length)) => created.with_board(dims, win_length),
            None => created,
        })
    }

    async fn submit_move(&self, game_id: &str, mv: usize) -> Result<MoveReply, RemoteError> {
        self.submitted.lock().unwrap().push((game_id.to_string(), mv));
        let verdict = self.verdicts.lock().unwrap().pop_front();
        match verdict {
            None => Ok(MoveReply::ongoing()),
            Some(Verdict::Reply(reply)) => Ok(reply),
            Some(Verdict::Fail(e)) => Err(e),
            Some(Verdict::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(MoveReply::ongoing())
            }
        }
    }
}
