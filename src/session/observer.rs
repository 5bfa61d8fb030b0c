//! Broadcast sinks.
//!
//! Observers are told about every committed session change together with
//! the snapshot taken right after it. They sit outside the mutation path:
//! a failing observer is logged and skipped, never rolled back.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::ActionKind;
use crate::rules::ActionOutcome;

use super::snapshot::GameSnapshot;

/// A committed session change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionUpdate {
    PlayerRegistered { name: String },
    GameStarted { players: Vec<String> },
    ActionPerformed {
        player: String,
        action: ActionKind,
        outcome: ActionOutcome,
    },
    GameReset,
}

#[derive(Debug, Error)]
#[error("broadcast failed: {0}")]
pub struct BroadcastError(pub String);

/// Receives session updates.
pub trait GameObserver: Send {
    fn notify(&mut self, update: &SessionUpdate, snapshot: &Arc<GameSnapshot>) -> Result<(), BroadcastError>;
}

/// Forwards updates over a channel, e.g. to a transport task.
pub struct ChannelObserver {
    tx: Sender<(SessionUpdate, Arc<GameSnapshot>)>,
}

impl ChannelObserver {
    #[must_use]
    pub fn new(tx: Sender<(SessionUpdate, Arc<GameSnapshot>)>) -> Self {
        Self { tx }
    }
}

impl GameObserver for ChannelObserver {
    fn notify(&mut self, update: &SessionUpdate, snapshot: &Arc<GameSnapshot>) -> Result<(), BroadcastError> {
        self.tx
            .send((update.clone(), Arc::clone(snapshot)))
            .map_err(|_| BroadcastError("receiver disconnected".to_string()))
    }
}

/// Writes a one-line summary of each update to the `log` facade.
#[derive(Debug, Default)]
pub struct LogObserver;

impl GameObserver for LogObserver {
    fn notify(&mut self, update: &SessionUpdate, snapshot: &Arc<GameSnapshot>) -> Result<(), BroadcastError> {
        match update {
            SessionUpdate::PlayerRegistered { name } => log::info!("{} joined", name),
            SessionUpdate::GameStarted { players } => log::info!("game started: {}", players.join(", ")),
            SessionUpdate::ActionPerformed { player, action, outcome } => {
                log::info!("[turn {}] {} {}: {}", snapshot.turn_number, player, action, outcome.message)
            }
            SessionUpdate::GameReset => log::info!("game reset"),
        }
        Ok(())
    }
}
