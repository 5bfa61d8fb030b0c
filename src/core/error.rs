//! Engine error kinds.
//!
//! Every rejection the dispatcher or session can produce. These are
//! returned as values; insolvency is not an error and goes through the
//! bankruptcy path instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned from the dispatcher and session commands.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum GameError {
    #[error("Not your turn. Current player: {current}")]
    NotYourTurn { current: String },

    #[error("Action {action} is not legal in phase {phase}")]
    InvalidPhase { action: String, phase: String },

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Player {0} not found")]
    UnknownPlayer(String),

    #[error("{0}")]
    InvalidPropertyAction(String),

    #[error("Not enough money. Need ${needed}, have ${available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("Game has already started")]
    GameAlreadyStarted,

    #[error("Player '{0}' is already registered")]
    DuplicatePlayer(String),

    #[error("Player name must not be empty")]
    EmptyPlayerName,

    #[error("Game is full ({max} players)")]
    TooManyPlayers { max: usize },

    #[error("Need at least {min} players, have {registered}")]
    NotEnoughPlayers { min: usize, registered: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GameError {
    /// Stable machine-readable name of the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::NotYourTurn { .. } => "not_your_turn",
            GameError::InvalidPhase { .. } => "invalid_phase",
            GameError::UnknownAction(_) => "unknown_action",
            GameError::UnknownPlayer(_) => "unknown_player",
            GameError::InvalidPropertyAction(_) => "invalid_property_action",
            GameError::InsufficientFunds { .. } => "insufficient_funds",
            GameError::GameAlreadyStarted => "game_already_started",
            GameError::DuplicatePlayer(_) => "duplicate_player",
            GameError::EmptyPlayerName => "empty_player_name",
            GameError::TooManyPlayers { .. } => "too_many_players",
            GameError::NotEnoughPlayers { .. } => "not_enough_players",
            GameError::InvalidConfig(_) => "invalid_config",
        }
    }

    pub(crate) fn property(msg: impl Into<String>) -> Self {
        GameError::InvalidPropertyAction(msg.into())
    }
}
