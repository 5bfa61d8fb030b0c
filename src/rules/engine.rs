//! Rules engine trait.
//!
//! The dispatcher contract: validate a `(player, action, params)` triple
//! against the current phase and turn, then apply it atomically.

use crate::core::{ActionKind, ActionParams, GameError, GameState, Phase, PlayerId, RulesConfig};

use super::outcome::ActionOutcome;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// The last solvent player.
    Winner(PlayerId),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: empty when the player cannot act
/// - `apply_action`: on `Err` the state must be left untouched
/// - `is_terminal`: `None` while the game continues
pub trait RulesEngine {
    /// Rule constants in force.
    fn config(&self) -> &RulesConfig;

    /// Actions `player` could submit right now.
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<ActionKind>;

    /// Validate and apply one action for the player named `player`.
    fn apply_action(
        &mut self,
        state: &mut GameState,
        player: &str,
        action: ActionKind,
        params: &ActionParams,
    ) -> Result<ActionOutcome, GameError>;

    /// Apply an action given by its wire name.
    fn apply(
        &mut self,
        state: &mut GameState,
        player: &str,
        action_name: &str,
        params: &ActionParams,
    ) -> Result<ActionOutcome, GameError> {
        let action: ActionKind = action_name.parse()?;
        self.apply_action(state, player, action, params)
    }

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        match state.phase() {
            Phase::GameOver { winner } => state.player_id(winner).map(GameResult::Winner),
            _ => None,
        }
    }
}
