//! Game state: player ledger, property registry, phase and turn bookkeeping.
//!
//! ## GameState
//!
//! One authoritative state per session, mutated only by the rules engine.
//! Collections use `im` persistent structures so the dispatcher can clone
//! the whole state in O(1), apply an action to the clone and commit only
//! when the action succeeds.
//!
//! ## PropertyRecord
//!
//! Ownership, mortgage flag and house count for each purchasable tile.
//! Monopoly status is derived, never stored.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::action::{ActionKind, ActionParams, ActionRecord};
use super::event_log::EventLog;
use super::phase::Phase;
use super::player::{Player, PlayerId};
use super::rng::{DiceRoll, GameRng};
use crate::board::{self, CardDeck, ColorGroup, DeckKind, TileKind, BOARD_SIZE};

/// Actions kept by `GameState::new` unless overridden.
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

/// Mutable record for one purchasable tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub owner: Option<PlayerId>,
    pub mortgaged: bool,
    /// Houses built, 0-5 where 5 is a hotel. Streets only.
    pub houses: u8,
}

impl PropertyRecord {
    /// Back to the bank: unowned, unmortgaged, no houses.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Complete state of one game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase.
    phase: Phase,

    /// Players in turn order (registration order).
    players: Vector<Player>,

    /// One record per purchasable tile, keyed by position.
    properties: OrdMap<u8, PropertyRecord>,

    /// Whose turn it is.
    current: PlayerId,

    /// Turn counter, 1 on the first turn.
    pub turn_number: u32,

    /// Most recent roll, if any.
    pub last_dice: Option<DiceRoll>,

    /// Consecutive doubles rolled by the current player this turn.
    pub doubles_streak: u32,

    /// Observer-facing trace.
    log: EventLog,

    /// Most recent committed actions, oldest first.
    #[serde(default)]
    history: Vector<ActionRecord>,

    #[serde(default = "default_history_capacity")]
    history_capacity: usize,

    chance: CardDeck,
    community_chest: CardDeck,
}

impl GameState {
    /// A fresh lobby with no players.
    #[must_use]
    pub fn new(log_capacity: usize) -> Self {
        Self {
            phase: Phase::Lobby,
            players: Vector::new(),
            properties: board::purchasable_positions()
                .map(|pos| (pos, PropertyRecord::default()))
                .collect(),
            current: PlayerId::new(0),
            turn_number: 0,
            last_dice: None,
            doubles_streak: 0,
            log: EventLog::new(log_capacity),
            history: Vector::new(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            chance: CardDeck::new(DeckKind::Chance),
            community_chest: CardDeck::new(DeckKind::CommunityChest),
        }
    }

    // === Phase ===

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Move to `next` along an edge of the transition table.
    ///
    /// An edge outside the table is an engine bug: it is logged and
    /// trips a debug assertion.
    pub fn set_phase(&mut self, next: Phase) {
        if !self.phase.can_transition_to(&next) {
            log::error!("illegal phase transition {} -> {}", self.phase, next);
            debug_assert!(false, "illegal phase transition {} -> {}", self.phase, next);
        }
        self.phase = next;
    }

    /// Leave the lobby: decks are shuffled and the first registered player
    /// starts turn 1.
    pub fn begin(&mut self, rng: &mut GameRng) {
        self.chance = CardDeck::shuffled(DeckKind::Chance, rng);
        self.community_chest = CardDeck::shuffled(DeckKind::CommunityChest, rng);
        self.current = PlayerId::new(0);
        self.turn_number = 1;
        self.doubles_streak = 0;
        self.set_phase(Phase::WaitingForRoll);
    }

    // === Players ===

    /// Append a player to the turn order.
    pub fn add_player(&mut self, player: Player) -> PlayerId {
        let id = PlayerId::new(self.players.len() as u8);
        self.players.push_back(player);
        id
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Look a player up by name.
    #[must_use]
    pub fn player_id(&self, name: &str) -> Option<PlayerId> {
        self.players
            .iter()
            .position(|p| p.name == name)
            .map(|i| PlayerId::new(i as u8))
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    /// Iterate over `(PlayerId, &Player)` in turn order.
    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.players
            .iter()
            .enumerate()
            .map(|(i, p)| (PlayerId::new(i as u8), p))
    }

    #[must_use]
    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    #[must_use]
    pub fn current_player_id(&self) -> PlayerId {
        self.current
    }

    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current.index())
    }

    /// Non-bankrupt players in turn order.
    #[must_use]
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.players()
            .filter(|(_, p)| p.is_active())
            .map(|(id, _)| id)
            .collect()
    }

    /// Next non-bankrupt player after `from`, wrapping. `None` if nobody
    /// else is solvent.
    #[must_use]
    pub fn next_active_after(&self, from: PlayerId) -> Option<PlayerId> {
        let count = self.players.len();
        (1..=count)
            .map(|step| PlayerId::new(((from.index() + step) % count) as u8))
            .find(|&id| id != from && self.player(id).is_active())
    }

    /// Hand the turn to `next`. The doubles streak starts over.
    pub(crate) fn set_current(&mut self, next: PlayerId) {
        self.current = next;
        self.doubles_streak = 0;
    }

    // === Properties ===

    #[must_use]
    pub fn property(&self, position: u8) -> Option<&PropertyRecord> {
        self.properties.get(&position)
    }

    pub fn property_mut(&mut self, position: u8) -> Option<&mut PropertyRecord> {
        self.properties.get_mut(&position)
    }

    /// Iterate over `(position, record)` in board order.
    pub fn properties(&self) -> impl Iterator<Item = (u8, &PropertyRecord)> {
        self.properties.iter().map(|(&pos, rec)| (pos, rec))
    }

    #[must_use]
    pub fn owner_of(&self, position: u8) -> Option<PlayerId> {
        self.property(position).and_then(|rec| rec.owner)
    }

    /// Whether `player` owns every property in `group`.
    #[must_use]
    pub fn has_monopoly(&self, player: PlayerId, group: ColorGroup) -> bool {
        group
            .positions()
            .iter()
            .all(|&pos| self.owner_of(pos) == Some(player))
    }

    /// Number of tiles of `kind` held by `player`, mortgaged or not.
    #[must_use]
    pub fn count_owned(&self, player: PlayerId, kind: TileKind) -> usize {
        board::positions_of(kind)
            .filter(|&pos| self.owner_of(pos) == Some(player))
            .count()
    }

    // === Decks ===

    pub fn deck_mut(&mut self, kind: DeckKind) -> &mut CardDeck {
        match kind {
            DeckKind::Chance => &mut self.chance,
            DeckKind::CommunityChest => &mut self.community_chest,
        }
    }

    /// Replace a deck's draw order.
    pub fn set_deck(&mut self, deck: CardDeck) {
        let kind = deck.kind();
        *self.deck_mut(kind) = deck;
    }

    // === Event log ===

    /// Append a line to the event log.
    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::debug!("{}", line);
        self.log.push(line);
    }

    #[must_use]
    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    // === Action history ===

    /// Keep at most `capacity` actions in the history.
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self.trim_history();
        self
    }

    /// Record a committed action for `player` in the current turn.
    ///
    /// The oldest record is evicted past the history capacity.
    pub fn record(&mut self, player: PlayerId, action: ActionKind, params: ActionParams) {
        let turn = self.turn_number;
        let sequence = match self.history.last() {
            Some(last) if last.turn == turn => last.sequence + 1,
            _ => 0,
        };
        self.history
            .push_back(ActionRecord::new(player, action, params, turn, sequence));
        self.trim_history();
    }

    fn trim_history(&mut self) {
        while self.history.len() > self.history_capacity {
            self.history.pop_front();
        }
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    // === Invariants ===

    /// Check the structural invariants of the state.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (id, player) in self.players() {
            if player.position >= BOARD_SIZE {
                return Err(format!("{} is off the board at {}", player.name, player.position));
            }
            if player.money < 0 && !player.bankrupt {
                return Err(format!("{} has negative money without bankruptcy", player.name));
            }
            for &pos in &player.properties {
                if self.owner_of(pos) != Some(id) {
                    return Err(format!("{} lists {} but does not own it", player.name, pos));
                }
            }
        }

        for (pos, rec) in self.properties() {
            if let Some(owner) = rec.owner {
                if owner.index() >= self.players.len() || !self.player(owner).owns(pos) {
                    return Err(format!("tile {} owner is not in the ledger", pos));
                }
            }
            if rec.houses > 5 {
                return Err(format!("tile {} has {} houses", pos, rec.houses));
            }
            if rec.houses > 0 && rec.mortgaged {
                return Err(format!("tile {} is mortgaged with houses", pos));
            }
        }

        for group in ColorGroup::ALL {
            let counts: Vec<u8> = group
                .positions()
                .iter()
                .map(|&pos| self.property(pos).map_or(0, |r| r.houses))
                .collect();
            let min = counts.iter().copied().min().unwrap_or(0);
            let max = counts.iter().copied().max().unwrap_or(0);
            if max > min + 1 {
                return Err(format!("{} group violates even building", group.name()));
            }
        }

        if self.phase.is_in_play() {
            match self.current_player() {
                Some(p) if p.is_active() => {}
                _ => return Err("current player is missing or bankrupt".to_string()),
            }
        }

        Ok(())
    }
}
