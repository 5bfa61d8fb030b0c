//! Turn phases and the transition table.
//!
//! `Phase` is the finite-state core: it says whose decision is pending and
//! which actions are currently legal. Every phase change in the engine goes
//! through `GameState::set_phase`, which checks the edge against
//! `Phase::can_transition_to`.
//!
//! ```text
//! lobby ──start──▶ waiting_for_roll ◀──────────────┐
//!                   │  │  │  ▲ (doubles)            │
//!        unowned ◀──┘  │  └─┘                       │
//!   waiting_for_buy    │ jail                       │
//!        │             ▼                            │
//!        │          in_jail ──release──────────────▶│
//!        ▼             │ failed roll                │
//!        ◀─────────────┘                            │
//!   turn_complete ──end_turn────────────────────────┘
//!        └──one player left──▶ game_over
//! ```

use serde::{Deserialize, Serialize};

/// Current phase of the game session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Players are registering; no turn is running.
    Lobby,
    /// The current player must roll.
    WaitingForRoll,
    /// The current player landed on the unowned tile at `position`.
    WaitingForBuyDecision { position: u8 },
    /// The current player is jailed and must pick a jail action.
    InJail,
    /// The current player's moves are resolved; only `end_turn` remains.
    TurnComplete,
    /// Exactly one solvent player remains.
    GameOver { winner: String },
}

impl Phase {
    /// Wire name of the phase.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Lobby => "lobby",
            Phase::WaitingForRoll => "waiting_for_roll",
            Phase::WaitingForBuyDecision { .. } => "waiting_for_buy_decision",
            Phase::InJail => "in_jail",
            Phase::TurnComplete => "turn_complete",
            Phase::GameOver { .. } => "game_over",
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver { .. })
    }

    /// A turn is running (neither lobby nor game over).
    #[must_use]
    pub fn is_in_play(&self) -> bool {
        !matches!(self, Phase::Lobby | Phase::GameOver { .. })
    }

    /// The transition table.
    ///
    /// `in_jail -> turn_complete` follows a failed release roll. The edge
    /// from the buy decision is a forced turn end after bankruptcy and is
    /// passed through inside a single dispatch.
    #[must_use]
    pub fn can_transition_to(&self, next: &Phase) -> bool {
        use Phase::*;

        match self {
            Lobby => matches!(next, Lobby | WaitingForRoll),
            WaitingForRoll => matches!(
                next,
                WaitingForRoll | WaitingForBuyDecision { .. } | InJail | TurnComplete
            ),
            WaitingForBuyDecision { .. } => matches!(next, TurnComplete),
            InJail => matches!(next, WaitingForRoll | InJail | TurnComplete),
            TurnComplete => matches!(next, WaitingForRoll | InJail | GameOver { .. }),
            GameOver { .. } => false,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
