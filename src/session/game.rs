//! One hosted game: lobby, play, reset.
//!
//! `GameSession` owns the authoritative `GameState` and the rules engine,
//! and is the only thing that hands the state to the dispatcher. After
//! each committed change it captures a snapshot, saves it and notifies
//! observers. Both side effects are best-effort: failures are logged and
//! the in-memory state stays authoritative.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::board::{self, BOARD_SIZE};
use crate::core::{ActionKind, ActionParams, GameError, GameState, Phase, Player, RulesConfig};
use crate::rules::{ActionOutcome, MonopolyRules, RulesEngine};

use super::observer::{GameObserver, SessionUpdate};
use super::persistence::{GameOutcome, GameStatus, PersistError, PersistenceGateway, SaveData};
use super::snapshot::{GameSnapshot, PlayerStatus, PlayerView, PropertyView};

/// Result of a mutating command.
#[derive(Clone, Debug, Serialize)]
pub struct CommandResult {
    pub outcome: ActionOutcome,
    pub snapshot: Arc<GameSnapshot>,
}

fn fresh_state(config: &RulesConfig) -> GameState {
    GameState::new(config.event_log_capacity).with_history_capacity(config.history_capacity)
}

fn new_game_id() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// A single game session.
pub struct GameSession {
    rules: MonopolyRules,
    state: GameState,
    game_id: String,
    store: Option<Box<dyn PersistenceGateway>>,
    observers: Vec<Box<dyn GameObserver>>,
}

impl GameSession {
    /// Empty lobby driven by `rules`.
    #[must_use]
    pub fn new(rules: MonopolyRules) -> Self {
        let state = fresh_state(rules.config());
        Self {
            rules,
            state,
            game_id: new_game_id(),
            store: None,
            observers: Vec::new(),
        }
    }

    /// Empty lobby with entropy-seeded dice.
    #[must_use]
    pub fn with_config(config: RulesConfig) -> Self {
        Self::new(MonopolyRules::new(config))
    }

    #[must_use]
    pub fn with_store(mut self, store: impl PersistenceGateway + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: impl GameObserver + 'static) -> Self {
        self.add_observer(observer);
        self
    }

    pub fn add_observer(&mut self, observer: impl GameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Resume the latest save in `store`, or start an empty lobby if there
    /// is none.
    pub fn restore(rules: MonopolyRules, store: impl PersistenceGateway + 'static) -> Result<Self, PersistError> {
        let saved = store.load_latest()?;
        let mut session = Self::new(rules).with_store(store);
        if let Some(data) = saved {
            log::info!(
                "restored game {} at turn {} ({})",
                data.game_id,
                data.state.turn_number,
                data.state.phase()
            );
            session.game_id = data.game_id;
            session.state = data.state;
        }
        Ok(session)
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        self.rules.config()
    }

    /// Mutable access to the rules engine, e.g. to reseed shuffles.
    pub fn rules_mut(&mut self) -> &mut MonopolyRules {
        &mut self.rules
    }

    // === Commands ===

    /// Add a player to the lobby.
    pub fn register_player(&mut self, name: &str) -> Result<CommandResult, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }
        if *self.state.phase() != Phase::Lobby {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.state.player_id(name).is_some() {
            return Err(GameError::DuplicatePlayer(name.to_string()));
        }
        let max = self.config().max_players;
        if self.state.player_count() >= max {
            return Err(GameError::TooManyPlayers { max });
        }

        let money = self.config().starting_money;
        self.state.add_player(Player::new(name, money));
        self.state.log(format!("{} joined the game", name));
        log::info!("registered player {}", name);

        let outcome = ActionOutcome::ok(format!("{} registered", name));
        let snapshot = self.commit(SessionUpdate::PlayerRegistered { name: name.to_string() });
        Ok(CommandResult { outcome, snapshot })
    }

    /// Leave the lobby. Turn order is registration order.
    pub fn start_game(&mut self) -> Result<CommandResult, GameError> {
        if *self.state.phase() != Phase::Lobby {
            return Err(GameError::GameAlreadyStarted);
        }
        let min = self.config().min_players;
        let registered = self.state.player_count();
        if registered < min {
            return Err(GameError::NotEnoughPlayers { min, registered });
        }

        self.state.begin(self.rules.rng_mut());
        self.game_id = new_game_id();
        let players = self.state.player_names();
        self.state.log(format!("Game started with players: {}", players.join(", ")));
        log::info!("game {} started with {} players", self.game_id, players.len());

        let mut outcome = ActionOutcome::ok("Game started");
        outcome.next_player = self.state.current_player().map(|p| p.name.clone());
        outcome.turn = Some(self.state.turn_number);
        let snapshot = self.commit(SessionUpdate::GameStarted { players });
        Ok(CommandResult { outcome, snapshot })
    }

    /// Submit an action by wire name.
    pub fn action(&mut self, player: &str, action: &str, params: &ActionParams) -> Result<CommandResult, GameError> {
        let kind: ActionKind = action.parse()?;
        let outcome = self.rules.apply_action(&mut self.state, player, kind, params)?;

        if outcome.ended_game() {
            self.record_outcome(GameStatus::Completed);
        }

        let snapshot = self.commit(SessionUpdate::ActionPerformed {
            player: player.to_string(),
            action: kind,
            outcome: outcome.clone(),
        });
        Ok(CommandResult { outcome, snapshot })
    }

    /// Submit an action with loosely-typed JSON params (`null` for none).
    pub fn action_json(
        &mut self,
        player: &str,
        action: &str,
        params: &serde_json::Value,
    ) -> Result<CommandResult, GameError> {
        // Name errors take precedence over param errors.
        action.parse::<ActionKind>()?;
        let params = ActionParams::from_json(params)?;
        self.action(player, action, &params)
    }

    /// Discard the current game and reopen the lobby.
    pub fn reset_game(&mut self) -> Arc<GameSnapshot> {
        let phase = self.state.phase();
        if phase.is_in_play() {
            self.record_outcome(GameStatus::Reset);
        }
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.clear_current() {
                log::warn!("failed to clear saved game {}: {}", self.game_id, e);
            }
        }

        log::info!("game {} reset", self.game_id);
        self.state = fresh_state(self.config());
        self.game_id = new_game_id();
        self.state.log("Game reset");
        self.broadcast_only(SessionUpdate::GameReset)
    }

    // === Queries ===

    /// Fresh snapshot of the current state.
    #[must_use]
    pub fn get_state(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state, self.config().snapshot_messages)
    }

    /// Actions `player` can submit now.
    pub fn legal_actions(&self, player: &str) -> Result<Vec<ActionKind>, GameError> {
        let id = self
            .state
            .player_id(player)
            .ok_or_else(|| GameError::UnknownPlayer(player.to_string()))?;
        Ok(self.rules.legal_actions(&self.state, id))
    }

    /// A player's view plus their options.
    pub fn player_status(&self, player: &str) -> Result<PlayerStatus, GameError> {
        let id = self
            .state
            .player_id(player)
            .ok_or_else(|| GameError::UnknownPlayer(player.to_string()))?;
        let is_current = self.state.phase().is_in_play() && self.state.current_player_id() == id;

        Ok(PlayerStatus {
            name: player.to_string(),
            view: PlayerView::of(self.state.player(id)),
            is_current_player: is_current,
            available_actions: self.rules.legal_actions(&self.state, id),
            buildable_positions: if is_current {
                self.rules.buildable_positions(&self.state, id)
            } else {
                Vec::new()
            },
        })
    }

    /// Catalog and ownership data for a purchasable tile.
    pub fn property_info(&self, position: u8) -> Result<PropertyView, GameError> {
        if position >= BOARD_SIZE {
            return Err(GameError::property(format!("Invalid position {}", position)));
        }
        PropertyView::of(&self.state, position)
            .ok_or_else(|| GameError::property(format!("{} is not a property", board::tile(position).name)))
    }

    // === Side effects ===

    fn commit(&mut self, update: SessionUpdate) -> Arc<GameSnapshot> {
        let snapshot = Arc::new(self.get_state());
        if let Some(store) = self.store.as_mut() {
            let data = SaveData::new(self.game_id.clone(), &self.state, (*snapshot).clone());
            if let Err(e) = store.save(&data) {
                log::warn!("failed to save game {}: {}", self.game_id, e);
            }
        }
        self.broadcast(&update, &snapshot);
        snapshot
    }

    fn broadcast_only(&mut self, update: SessionUpdate) -> Arc<GameSnapshot> {
        let snapshot = Arc::new(self.get_state());
        self.broadcast(&update, &snapshot);
        snapshot
    }

    fn broadcast(&mut self, update: &SessionUpdate, snapshot: &Arc<GameSnapshot>) {
        for observer in &mut self.observers {
            if let Err(e) = observer.notify(update, snapshot) {
                log::warn!("observer failed: {}", e);
            }
        }
    }

    fn record_outcome(&mut self, status: GameStatus) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let winner = match self.state.phase() {
            Phase::GameOver { winner } => Some(winner.clone()),
            _ => None,
        };
        let outcome = GameOutcome {
            game_id: self.game_id.clone(),
            timestamp: Utc::now(),
            total_turns: self.state.turn_number,
            winner,
            status,
            final_state: GameSnapshot::capture(&self.state, self.rules.config().snapshot_messages),
        };
        if let Err(e) = store.append_history(&outcome) {
            log::warn!("failed to record game {}: {}", self.game_id, e);
        }
    }
}
