//! The property-trading rules engine.
//!
//! ## Dispatch
//!
//! Every action is checked in a fixed order: game in play, player known,
//! player's turn, action legal in the phase, then the action's own
//! preconditions. The action runs against a clone of the state and is
//! committed only when it succeeds, so a rejected action leaves no trace.
//!
//! ## Phases
//!
//! Each handler sets the phase once, along an edge of the transition
//! table in `core::phase`. Ending a turn (voluntarily, after a failed
//! jail roll, or on bankruptcy) always goes through `TurnComplete`.

use crate::core::{
    ActionKind, ActionParams, DiceSource, GameError, GameRng, GameState, Phase, PlayerId, RulesConfig,
};

use super::economy;
use super::engine::RulesEngine;
use super::jail::{self, JailRoll};
use super::landing::{self, Resolution};
use super::outcome::ActionOutcome;

/// Rules engine for the classic 40-tile game.
pub struct MonopolyRules {
    config: RulesConfig,
    /// Movement and jail rolls.
    dice: Box<dyn DiceSource + Send>,
    /// Deck shuffles.
    rng: GameRng,
}

impl MonopolyRules {
    /// Engine with entropy-seeded dice and shuffles.
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self {
            config,
            dice: Box::new(GameRng::from_entropy()),
            rng: GameRng::from_entropy(),
        }
    }

    /// Fully reproducible engine.
    #[must_use]
    pub fn seeded(config: RulesConfig, seed: u64) -> Self {
        Self {
            config,
            dice: Box::new(GameRng::new(seed)),
            rng: GameRng::new(seed.wrapping_add(1)),
        }
    }

    /// Engine with an explicit dice source, e.g. `ScriptedDice`.
    #[must_use]
    pub fn with_dice(config: RulesConfig, dice: impl DiceSource + Send + 'static, rng: GameRng) -> Self {
        Self {
            config,
            dice: Box::new(dice),
            rng,
        }
    }

    /// Shuffle source, used when a game starts.
    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// Positions where `player` could build a house right now.
    #[must_use]
    pub fn buildable_positions(&self, state: &GameState, player: PlayerId) -> Vec<u8> {
        economy::buildable_positions(state, player)
    }

    // === Validation ===

    fn validate(&self, state: &GameState, player: &str, action: ActionKind) -> Result<PlayerId, GameError> {
        let phase = state.phase();
        let invalid_phase = || GameError::InvalidPhase {
            action: action.name().to_string(),
            phase: phase.name().to_string(),
        };

        if !phase.is_in_play() {
            return Err(invalid_phase());
        }

        let id = state
            .player_id(player)
            .ok_or_else(|| GameError::UnknownPlayer(player.to_string()))?;

        if id != state.current_player_id() {
            let current = state.current_player().map(|p| p.name.clone()).unwrap_or_default();
            return Err(GameError::NotYourTurn { current });
        }

        if !action.is_legal_in(phase) {
            return Err(invalid_phase());
        }

        Ok(id)
    }

    // === Handlers ===

    fn dispatch(
        &mut self,
        state: &mut GameState,
        player: PlayerId,
        action: ActionKind,
        params: &ActionParams,
    ) -> Result<ActionOutcome, GameError> {
        match action {
            ActionKind::RollDiceAndMove => Ok(self.roll_dice_and_move(state, player)),
            ActionKind::BuyProperty => self.buy_property(state, player),
            ActionKind::DeclinePurchase => Ok(decline_purchase(state, player)),
            ActionKind::EndTurn => Ok(end_turn(state)),
            ActionKind::PayJailBail => {
                let outcome = jail::pay_jail_bail(state, &self.config, player)?;
                state.set_phase(Phase::WaitingForRoll);
                Ok(outcome)
            }
            ActionKind::UseJailCard => {
                let outcome = jail::use_jail_card(state, player)?;
                state.set_phase(Phase::WaitingForRoll);
                Ok(outcome)
            }
            ActionKind::RollForDoubles => Ok(self.roll_for_doubles(state, player)),
            ActionKind::BuildHouse => {
                let position = params.require_position(action)?;
                economy::build_house(state, player, position)
            }
            ActionKind::Mortgage => {
                let position = params.require_position(action)?;
                economy::mortgage(state, player, position)
            }
            ActionKind::Unmortgage => {
                let position = params.require_position(action)?;
                economy::unmortgage(state, &self.config, player, position)
            }
        }
    }

    fn roll_dice_and_move(&mut self, state: &mut GameState, player: PlayerId) -> ActionOutcome {
        let roll = self.dice.roll();
        let (mut outcome, resolution) = landing::roll_and_move(state, &self.config, &mut self.rng, player, roll);

        match resolution {
            Resolution::Settled if roll.is_doubles() => {
                state.set_phase(Phase::WaitingForRoll);
                outcome.roll_again = Some(true);
            }
            Resolution::Settled => state.set_phase(Phase::TurnComplete),
            Resolution::PendingPurchase(position) => {
                state.set_phase(Phase::WaitingForBuyDecision { position });
            }
            Resolution::Jailed => state.set_phase(Phase::InJail),
            Resolution::Bankrupt => {
                outcome.bankrupt = Some(true);
                force_end_turn(state, &mut outcome);
            }
        }
        outcome
    }

    fn buy_property(&mut self, state: &mut GameState, player: PlayerId) -> Result<ActionOutcome, GameError> {
        let Phase::WaitingForBuyDecision { position } = *state.phase() else {
            return Err(GameError::property("No property is on offer"));
        };
        let outcome = economy::purchase(state, player, position)?;
        state.set_phase(Phase::TurnComplete);
        Ok(outcome)
    }

    fn roll_for_doubles(&mut self, state: &mut GameState, player: PlayerId) -> ActionOutcome {
        let roll = self.dice.roll();
        let (mut outcome, result) = jail::roll_for_doubles(state, &self.config, player, roll);

        match result {
            JailRoll::Escaped | JailRoll::BailPaid => state.set_phase(Phase::WaitingForRoll),
            // The player still submits `end_turn`.
            JailRoll::Stayed => state.set_phase(Phase::TurnComplete),
            JailRoll::Bankrupt => force_end_turn(state, &mut outcome),
        }
        outcome
    }
}

fn decline_purchase(state: &mut GameState, player: PlayerId) -> ActionOutcome {
    let name = state.player(player).name.clone();
    let tile = match state.phase() {
        Phase::WaitingForBuyDecision { position } => crate::board::tile(*position).name,
        _ => "the property",
    };
    state.log(format!("{} declined to buy {}", name, tile));
    state.set_phase(Phase::TurnComplete);

    let mut outcome = ActionOutcome::ok(format!("Declined to buy {}", tile));
    outcome.property = Some(tile.to_string());
    outcome
}

fn end_turn(state: &mut GameState) -> ActionOutcome {
    let mut outcome = ActionOutcome::ok("Turn ended");
    advance_turn(state, &mut outcome);
    if let Some(next) = &outcome.next_player {
        outcome.message = format!("Turn ended. It is now {}'s turn", next);
    }
    outcome
}

/// End the current turn after a bankruptcy.
fn force_end_turn(state: &mut GameState, outcome: &mut ActionOutcome) {
    state.set_phase(Phase::TurnComplete);
    advance_turn(state, outcome);
}

/// Pass the turn from `TurnComplete`, or finish the game when at most one
/// solvent player remains.
fn advance_turn(state: &mut GameState, outcome: &mut ActionOutcome) {
    let active = state.active_players();
    let current = state.current_player_id();

    if active.len() <= 1 {
        let winner_id = active.first().copied().unwrap_or(current);
        let winner = state.player(winner_id).name.clone();
        state.log(format!("Game over! {} wins", winner));
        log::info!("game over after {} turns, winner {}", state.turn_number, winner);
        state.set_phase(Phase::GameOver { winner: winner.clone() });
        outcome.game_over = Some(true);
        outcome.winner = Some(winner);
        return;
    }

    if let Some(next) = state.next_active_after(current) {
        state.set_current(next);
        state.turn_number += 1;
        let player = state.player(next);
        let name = player.name.clone();
        let jailed = player.in_jail;

        state.log(format!("Turn {}: {}'s turn", state.turn_number, name));
        state.set_phase(if jailed { Phase::InJail } else { Phase::WaitingForRoll });
        outcome.next_player = Some(name);
        outcome.turn = Some(state.turn_number);
    }
}

impl RulesEngine for MonopolyRules {
    fn config(&self) -> &RulesConfig {
        &self.config
    }

    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<ActionKind> {
        let phase = state.phase();
        if !phase.is_in_play() || player != state.current_player_id() || player.index() >= state.player_count() {
            return Vec::new();
        }
        let p = state.player(player);

        ActionKind::ALL
            .into_iter()
            .filter(|action| action.is_legal_in(phase))
            .filter(|action| match action {
                ActionKind::BuyProperty => match phase {
                    Phase::WaitingForBuyDecision { position } => {
                        p.can_afford(crate::board::tile(*position).price)
                    }
                    _ => false,
                },
                ActionKind::PayJailBail => p.can_afford(self.config.bail),
                ActionKind::UseJailCard => p.jail_cards > 0,
                ActionKind::BuildHouse => !economy::buildable_positions(state, player).is_empty(),
                ActionKind::Mortgage => p
                    .properties
                    .iter()
                    .filter_map(|&pos| state.property(pos))
                    .any(|r| !r.mortgaged && r.houses == 0),
                ActionKind::Unmortgage => p.properties.iter().any(|&pos| {
                    state.property(pos).is_some_and(|r| r.mortgaged)
                        && p.can_afford(self.config.unmortgage_cost(crate::board::tile(pos).mortgage_value))
                }),
                _ => true,
            })
            .collect()
    }

    fn apply_action(
        &mut self,
        state: &mut GameState,
        player: &str,
        action: ActionKind,
        params: &ActionParams,
    ) -> Result<ActionOutcome, GameError> {
        let id = self.validate(state, player, action)?;

        let mut next = state.clone();
        next.record(id, action, *params);
        let outcome = self.dispatch(&mut next, id, action, params)?;

        if let Err(violation) = next.check_invariants() {
            log::error!("invariant violated after {} by {}: {}", action, player, violation);
            debug_assert!(false, "invariant violated: {}", violation);
        }

        *state = next;
        log::debug!("{} performed {} -> {}", player, action, state.phase());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Player, ScriptedDice};

    fn started(rolls: Vec<(u8, u8)>) -> (MonopolyRules, GameState) {
        let mut rules = MonopolyRules::with_dice(RulesConfig::default(), ScriptedDice::new(rolls), GameRng::new(1));
        let mut state = GameState::new(50);
        state.add_player(Player::new("Alice", 1500));
        state.add_player(Player::new("Bob", 1500));
        state.begin(rules.rng_mut());
        (rules, state)
    }

    #[test]
    fn test_validation_order() {
        let (mut rules, mut state) = started(vec![]);

        let err = rules.apply(&mut state, "Alice", "fly", &ActionParams::none()).unwrap_err();
        assert_eq!(err.kind(), "unknown_action");

        let err = rules
            .apply_action(&mut state, "Carol", ActionKind::EndTurn, &ActionParams::none())
            .unwrap_err();
        assert_eq!(err, GameError::UnknownPlayer("Carol".into()));

        let err = rules
            .apply_action(&mut state, "Bob", ActionKind::EndTurn, &ActionParams::none())
            .unwrap_err();
        assert_eq!(err, GameError::NotYourTurn { current: "Alice".into() });

        let err = rules
            .apply_action(&mut state, "Alice", ActionKind::EndTurn, &ActionParams::none())
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_phase");
    }

    #[test]
    fn test_lobby_rejects_actions() {
        let mut rules = MonopolyRules::seeded(RulesConfig::default(), 3);
        let mut state = GameState::new(50);
        state.add_player(Player::new("Alice", 1500));

        let err = rules
            .apply_action(&mut state, "Alice", ActionKind::RollDiceAndMove, &ActionParams::none())
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidPhase { .. }));
    }

    #[test]
    fn test_roll_then_buy_then_end_turn() {
        let (mut rules, mut state) = started(vec![(2, 4)]);

        let outcome = rules
            .apply_action(&mut state, "Alice", ActionKind::RollDiceAndMove, &ActionParams::none())
            .unwrap();
        assert_eq!(outcome.new_position, Some(6));
        assert_eq!(state.phase(), &Phase::WaitingForBuyDecision { position: 6 });

        rules
            .apply_action(&mut state, "Alice", ActionKind::BuyProperty, &ActionParams::none())
            .unwrap();
        assert_eq!(state.phase(), &Phase::TurnComplete);
        assert_eq!(state.owner_of(6), Some(PlayerId::new(0)));

        let outcome = rules
            .apply_action(&mut state, "Alice", ActionKind::EndTurn, &ActionParams::none())
            .unwrap();
        assert_eq!(outcome.next_player.as_deref(), Some("Bob"));
        assert_eq!(outcome.turn, Some(2));
        assert_eq!(state.phase(), &Phase::WaitingForRoll);

        let actions: Vec<ActionKind> = state.history().iter().map(|r| r.action).collect();
        assert_eq!(
            actions,
            vec![ActionKind::RollDiceAndMove, ActionKind::BuyProperty, ActionKind::EndTurn]
        );
    }

    #[test]
    fn test_failed_action_leaves_state_untouched() {
        let (mut rules, mut state) = started(vec![(5, 6)]);
        state.player_mut(PlayerId::new(0)).money = 50;
        rules
            .apply_action(&mut state, "Alice", ActionKind::RollDiceAndMove, &ActionParams::none())
            .unwrap();
        let before = state.clone();

        let err = rules
            .apply_action(&mut state, "Alice", ActionKind::BuyProperty, &ActionParams::none())
            .unwrap_err();
        assert!(matches!(err, GameError::InsufficientFunds { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_doubles_grant_another_roll() {
        let (mut rules, mut state) = started(vec![(2, 2)]);
        let outcome = rules
            .apply_action(&mut state, "Alice", ActionKind::RollDiceAndMove, &ActionParams::none())
            .unwrap();
        assert_eq!(outcome.new_position, Some(4));
        assert_eq!(outcome.roll_again, Some(true));
        assert_eq!(state.phase(), &Phase::WaitingForRoll);
        assert_eq!(state.doubles_streak, 1);
    }

    #[test]
    fn test_legal_actions() {
        let (rules, state) = started(vec![]);
        let alice = PlayerId::new(0);
        assert_eq!(rules.legal_actions(&state, alice), vec![ActionKind::RollDiceAndMove]);
        assert!(rules.legal_actions(&state, PlayerId::new(1)).is_empty());
    }

    #[test]
    fn test_jailed_player_turn_starts_in_jail() {
        let (mut rules, mut state) = started(vec![(6, 4)]);
        let bob = PlayerId::new(1);
        jail::send_to_jail(&mut state, bob);

        rules
            .apply_action(&mut state, "Alice", ActionKind::RollDiceAndMove, &ActionParams::none())
            .unwrap();
        rules
            .apply_action(&mut state, "Alice", ActionKind::EndTurn, &ActionParams::none())
            .unwrap();
        assert_eq!(state.phase(), &Phase::InJail);
        assert_eq!(
            rules.legal_actions(&state, bob),
            vec![ActionKind::PayJailBail, ActionKind::RollForDoubles]
        );
    }
}
