//! Read-only views of the game state.
//!
//! `GameSnapshot` is what observers receive and what `get_state` returns.
//! It is derived from `GameState` on demand and never fed back into the
//! engine.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::{self, ColorGroup, TileKind};
use crate::core::{ActionKind, GameState, Phase, Player, PlayerId};

/// Public view of one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub money: i64,
    pub position: u8,
    /// Name of the tile the player stands on.
    pub tile_name: String,
    pub in_jail: bool,
    pub jail_turns: u32,
    pub jail_cards: u32,
    /// Names of owned tiles, in acquisition order.
    pub properties: Vec<String>,
    pub property_positions: Vec<u8>,
    pub bankrupt: bool,
}

impl PlayerView {
    #[must_use]
    pub fn of(player: &Player) -> Self {
        Self {
            money: player.money,
            position: player.position,
            tile_name: board::tile(player.position).name.to_string(),
            in_jail: player.in_jail,
            jail_turns: player.jail_turns,
            jail_cards: player.jail_cards,
            properties: player
                .properties
                .iter()
                .map(|&pos| board::tile(pos).name.to_string())
                .collect(),
            property_positions: player.properties.to_vec(),
            bankrupt: player.bankrupt,
        }
    }
}

/// Point-in-time view of a whole session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Wire name of the phase.
    pub phase: String,
    /// `None` in the lobby.
    pub current_player: Option<String>,
    pub turn_number: u32,
    /// Registration order.
    pub turn_order: Vec<String>,
    pub players: FxHashMap<String, PlayerView>,
    pub last_dice: Option<[u8; 2]>,
    /// Most recent event log lines, oldest first.
    pub recent_messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_purchase: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

impl GameSnapshot {
    /// Capture `state`, keeping the last `messages` log lines.
    #[must_use]
    pub fn capture(state: &GameState, messages: usize) -> Self {
        let phase = state.phase();
        let current_player = match phase {
            Phase::Lobby => None,
            _ => state.current_player().map(|p| p.name.clone()),
        };
        let pending_purchase = match phase {
            Phase::WaitingForBuyDecision { position } => Some(*position),
            _ => None,
        };
        let winner = match phase {
            Phase::GameOver { winner } => Some(winner.clone()),
            _ => None,
        };

        Self {
            phase: phase.name().to_string(),
            current_player,
            turn_number: state.turn_number,
            turn_order: state.player_names(),
            players: state
                .players()
                .map(|(_, p)| (p.name.clone(), PlayerView::of(p)))
                .collect(),
            last_dice: state.last_dice.map(|d| d.as_pair()),
            recent_messages: state.event_log().recent(messages),
            pending_purchase,
            winner,
        }
    }

    /// View of the player named `name`.
    #[must_use]
    pub fn player(&self, name: &str) -> Option<&PlayerView> {
        self.players.get(name)
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == "game_over"
    }
}

/// A player's view plus what they can do right now.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub name: String,
    #[serde(flatten)]
    pub view: PlayerView,
    pub is_current_player: bool,
    pub available_actions: Vec<ActionKind>,
    /// Tiles where a house could be built now.
    pub buildable_positions: Vec<u8>,
}

/// Catalog data for one purchasable tile merged with its ownership record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PropertyView {
    pub position: u8,
    pub name: &'static str,
    pub kind: TileKind,
    pub color: Option<ColorGroup>,
    pub price: i64,
    pub mortgage_value: i64,
    pub house_cost: i64,
    pub rent: [i64; 6],
    pub owner: Option<String>,
    pub mortgaged: bool,
    pub houses: u8,
    /// Whether the owner holds the full color group.
    pub monopoly: bool,
}

impl PropertyView {
    /// `None` for positions that cannot be owned.
    #[must_use]
    pub fn of(state: &GameState, position: u8) -> Option<Self> {
        let record = state.property(position)?;
        let tile = board::tile(position);
        let monopoly = match (record.owner, tile.color) {
            (Some(owner), Some(group)) => state.has_monopoly(owner, group),
            _ => false,
        };

        Some(Self {
            position,
            name: tile.name,
            kind: tile.kind,
            color: tile.color,
            price: tile.price,
            mortgage_value: tile.mortgage_value,
            house_cost: tile.house_cost,
            rent: tile.rent,
            owner: record.owner.map(|id: PlayerId| state.player(id).name.clone()),
            mortgaged: record.mortgaged,
            houses: record.houses,
            monopoly,
        })
    }
}
