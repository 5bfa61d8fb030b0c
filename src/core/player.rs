//! Player identification and the per-player ledger.
//!
//! ## PlayerId
//!
//! Index into the fixed turn order. Names are the external identity;
//! inside the engine players are addressed by `PlayerId`.
//!
//! ## Player
//!
//! Mutable economic and position state for one participant.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Position of a player in turn order (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use monopoly_engine::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Ledger entry for one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique display name.
    pub name: String,

    /// Cash on hand. Only transiently negative inside a dispatch.
    pub money: i64,

    /// Board position, always in 0..40.
    pub position: u8,

    pub in_jail: bool,

    /// Failed release rolls since entering jail.
    pub jail_turns: u32,

    /// Get-out-of-jail cards held.
    pub jail_cards: u32,

    /// Owned tile positions, in acquisition order.
    pub properties: SmallVec<[u8; 8]>,

    pub bankrupt: bool,
}

impl Player {
    /// A fresh player on GO with `money` in hand.
    pub fn new(name: impl Into<String>, money: i64) -> Self {
        Self {
            name: name.into(),
            money,
            position: 0,
            in_jail: false,
            jail_turns: 0,
            jail_cards: 0,
            properties: SmallVec::new(),
            bankrupt: false,
        }
    }

    #[must_use]
    pub fn owns(&self, position: u8) -> bool {
        self.properties.contains(&position)
    }

    /// Record ownership of `position` (no-op if already held).
    pub fn acquire(&mut self, position: u8) {
        if !self.owns(position) {
            self.properties.push(position);
        }
    }

    /// Drop ownership of `position`.
    pub fn release(&mut self, position: u8) {
        self.properties.retain(|&mut p| p != position);
    }

    #[must_use]
    pub fn can_afford(&self, amount: i64) -> bool {
        self.money >= amount
    }

    /// Still in the game.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.bankrupt
    }
}
