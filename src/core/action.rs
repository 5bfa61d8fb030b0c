//! Action vocabulary.
//!
//! Actions arrive as `(player, action_name, params)` triples. The name is
//! parsed into an `ActionKind`; params carry the optional target tile for
//! property actions. `ActionKind::is_legal_in` is the exhaustive
//! action × phase legality table.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::phase::Phase;
use super::player::PlayerId;

/// Every action a player can submit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    RollDiceAndMove,
    BuyProperty,
    DeclinePurchase,
    EndTurn,
    PayJailBail,
    UseJailCard,
    RollForDoubles,
    BuildHouse,
    Mortgage,
    Unmortgage,
}

impl ActionKind {
    /// All actions in listing order.
    pub const ALL: [ActionKind; 10] = [
        ActionKind::RollDiceAndMove,
        ActionKind::BuyProperty,
        ActionKind::DeclinePurchase,
        ActionKind::EndTurn,
        ActionKind::PayJailBail,
        ActionKind::UseJailCard,
        ActionKind::RollForDoubles,
        ActionKind::BuildHouse,
        ActionKind::Mortgage,
        ActionKind::Unmortgage,
    ];

    /// Wire name of the action.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::RollDiceAndMove => "roll_dice_and_move",
            ActionKind::BuyProperty => "buy_property",
            ActionKind::DeclinePurchase => "decline_purchase",
            ActionKind::EndTurn => "end_turn",
            ActionKind::PayJailBail => "pay_jail_bail",
            ActionKind::UseJailCard => "use_jail_card",
            ActionKind::RollForDoubles => "roll_for_doubles",
            ActionKind::BuildHouse => "build_house",
            ActionKind::Mortgage => "mortgage",
            ActionKind::Unmortgage => "unmortgage",
        }
    }

    /// Whether this action may be attempted in `phase`.
    ///
    /// Property actions are legal whenever a turn is running; their own
    /// preconditions (ownership, monopoly, funds) are checked separately.
    #[must_use]
    pub fn is_legal_in(self, phase: &Phase) -> bool {
        use ActionKind::*;

        match phase {
            Phase::Lobby | Phase::GameOver { .. } => false,
            Phase::WaitingForRoll => matches!(self, RollDiceAndMove | BuildHouse | Mortgage | Unmortgage),
            Phase::WaitingForBuyDecision { .. } => matches!(
                self,
                BuyProperty | DeclinePurchase | BuildHouse | Mortgage | Unmortgage
            ),
            Phase::InJail => matches!(
                self,
                PayJailBail | UseJailCard | RollForDoubles | BuildHouse | Mortgage | Unmortgage
            ),
            Phase::TurnComplete => matches!(self, EndTurn | BuildHouse | Mortgage | Unmortgage),
        }
    }

    /// Actions that target a tile through `ActionParams::property_position`.
    #[must_use]
    pub fn needs_position(self) -> bool {
        matches!(self, ActionKind::BuildHouse | ActionKind::Mortgage | ActionKind::Unmortgage)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = GameError;

    /// Accepts the wire name, tolerating surrounding whitespace, spaces for
    /// underscores and a trailing annotation such as
    /// `"build_house (on positions: [1, 3])"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.split('(').next().unwrap_or_default().trim().replace(' ', "_");

        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == cleaned)
            .ok_or_else(|| GameError::UnknownAction(s.to_string()))
    }
}

/// Optional arguments accompanying an action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionParams {
    /// Target tile for `build_house`, `mortgage` and `unmortgage`.
    #[serde(alias = "position")]
    pub property_position: Option<u8>,
}

impl ActionParams {
    /// No parameters.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Target the tile at `position`.
    #[must_use]
    pub fn at(position: u8) -> Self {
        Self {
            property_position: Some(position),
        }
    }

    /// Decode params from a loosely-typed JSON object. `null` means none.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, GameError> {
        if value.is_null() {
            return Ok(Self::none());
        }
        serde_json::from_value(value.clone())
            .map_err(|e| GameError::property(format!("Invalid action params: {}", e)))
    }

    /// The target tile, or an error naming the action that needed it.
    pub fn require_position(&self, action: ActionKind) -> Result<u8, GameError> {
        self.property_position
            .ok_or_else(|| GameError::property(format!("{} requires property_position", action)))
    }
}

/// One applied action, in the order it was committed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: ActionKind,

    pub params: ActionParams,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Sequence number within the turn.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: ActionKind, params: ActionParams, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            params,
            turn,
            sequence,
        }
    }
}
