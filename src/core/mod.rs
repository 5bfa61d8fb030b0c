//! Core engine types: players, state, phases, actions, dice, configuration.
//!
//! Everything the rules engine reads or writes is defined here. The rules
//! themselves live in `rules`; the board data in `board`.

pub mod action;
pub mod config;
pub mod error;
pub mod event_log;
pub mod phase;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{ActionKind, ActionParams, ActionRecord};
pub use config::RulesConfig;
pub use error::GameError;
pub use event_log::EventLog;
pub use phase::Phase;
pub use player::{Player, PlayerId};
pub use rng::{DiceRoll, DiceSource, GameRng, ScriptedDice};
pub use state::{GameState, PropertyRecord};
