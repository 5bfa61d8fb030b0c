//! # monopoly-engine
//!
//! Authoritative rules engine for a turn-based property-trading board game
//! on the classic 40-tile board.
//!
//! ## Design Principles
//!
//! 1. **Explicit Phases**: `Phase` is a tagged variant with an exhaustive
//!    transition table. Action legality is a total `ActionKind × Phase`
//!    table, not scattered conditionals.
//!
//! 2. **Atomic Actions**: The dispatcher applies each action to a clone of
//!    the state and commits only on success. A rejected action leaves no
//!    trace.
//!
//! 3. **Session Objects**: There is no global game. A `GameSession` owns
//!    its state and is passed to whoever hosts it.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) state cloning via `im-rs`, which
//!   is what makes apply-then-commit cheap.
//!
//! - **Side Effects Outside the Core**: persistence and broadcasting are
//!   traits the session calls after a commit. Their failures are logged,
//!   never rolled back.
//!
//! ## Modules
//!
//! - `core`: players, state, phases, actions, dice, configuration, errors
//! - `board`: tile catalog and card decks
//! - `rules`: `RulesEngine` trait and the classic rules
//! - `session`: lobby/play lifecycle, snapshots, observers, persistence

pub mod board;
pub mod core;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    ActionKind, ActionParams, ActionRecord, DiceRoll, DiceSource, GameError, GameRng, GameState, Phase, Player,
    PlayerId, PropertyRecord, RulesConfig, ScriptedDice,
};

pub use crate::board::{Card, CardDeck, CardEffect, ColorGroup, DeckKind, Tile, TileKind, BOARD, BOARD_SIZE};

pub use crate::rules::{ActionOutcome, GameResult, MonopolyRules, RulesEngine};

pub use crate::session::{
    CommandResult, GameObserver, GameOutcome, GameSession, GameSnapshot, JsonFileStore, MemoryStore,
    PersistError, PersistenceGateway, PlayerStatus, PlayerView, PropertyView, SaveData, SessionUpdate,
    SharedSession,
};
