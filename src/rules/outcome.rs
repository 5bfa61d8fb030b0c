//! Structured per-action result.

use serde::{Deserialize, Serialize};

/// What a successful action did.
///
/// `success` and `message` are always present; the remaining fields are
/// filled in by the actions they apply to and omitted from JSON otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dice: Option<[u8; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doubles: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_again: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_position: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub money: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escaped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_bail: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turns_remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub houses: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_player: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bankrupt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_over: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

impl ActionOutcome {
    /// A successful outcome with a message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ..Self::default()
        }
    }

    /// Whether the action ended the game.
    #[must_use]
    pub fn ended_game(&self) -> bool {
        self.game_over == Some(true)
    }
}
