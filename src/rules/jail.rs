//! Jail: entering, the three ways out, and the forced bail.

use crate::board::JAIL_POSITION;
use crate::core::{DiceRoll, GameError, GameState, PlayerId, RulesConfig};

use super::economy::{self, Creditor, Settlement};
use super::outcome::ActionOutcome;

/// Result of a release roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JailRoll {
    /// Rolled doubles and walked out.
    Escaped,
    /// Still inside; the turn is over.
    Stayed,
    /// Out of attempts; bail was charged and paid.
    BailPaid,
    /// Out of attempts and could not pay the bail.
    Bankrupt,
}

/// Move `player` to the jail tile. No salary is paid on the way.
pub fn send_to_jail(state: &mut GameState, player: PlayerId) {
    let p = state.player_mut(player);
    p.position = JAIL_POSITION;
    p.in_jail = true;
    p.jail_turns = 0;
    let line = format!("{} went to jail", p.name);
    state.doubles_streak = 0;
    state.log(line);
}

/// Clear the jail flags. The player stays on the jail tile.
pub fn release(state: &mut GameState, player: PlayerId) {
    let p = state.player_mut(player);
    p.in_jail = false;
    p.jail_turns = 0;
    state.doubles_streak = 0;
}

/// Pay the bail to leave jail.
pub fn pay_jail_bail(state: &mut GameState, config: &RulesConfig, player: PlayerId) -> Result<ActionOutcome, GameError> {
    let money = state.player(player).money;
    if money < config.bail {
        return Err(GameError::InsufficientFunds {
            needed: config.bail,
            available: money,
        });
    }

    state.player_mut(player).money -= config.bail;
    release(state, player);
    let name = state.player(player).name.clone();
    state.log(format!("{} paid ${} bail", name, config.bail));

    let mut outcome = ActionOutcome::ok(format!("Paid ${} bail, you are out of jail", config.bail));
    outcome.cost = Some(config.bail);
    outcome.money = Some(state.player(player).money);
    Ok(outcome)
}

/// Spend a get-out-of-jail card.
pub fn use_jail_card(state: &mut GameState, player: PlayerId) -> Result<ActionOutcome, GameError> {
    if state.player(player).jail_cards == 0 {
        return Err(GameError::property("No jail cards"));
    }

    state.player_mut(player).jail_cards -= 1;
    release(state, player);
    let name = state.player(player).name.clone();
    state.log(format!("{} used a Get Out of Jail Free card", name));
    Ok(ActionOutcome::ok("Used a Get Out of Jail Free card"))
}

/// Try to roll out of jail.
///
/// Doubles release the player. Otherwise the attempt is counted; on the
/// last allowed attempt the bail is charged as a mandatory payment.
pub fn roll_for_doubles(
    state: &mut GameState,
    config: &RulesConfig,
    player: PlayerId,
    roll: DiceRoll,
) -> (ActionOutcome, JailRoll) {
    let name = state.player(player).name.clone();
    state.last_dice = Some(roll);

    let mut outcome = ActionOutcome::ok(format!("Rolled {}", roll));
    outcome.dice = Some(roll.as_pair());
    outcome.doubles = Some(roll.is_doubles());

    if roll.is_doubles() {
        release(state, player);
        state.log(format!("{} rolled {} and escaped jail", name, roll));
        outcome.message = format!("Rolled {}: doubles, you are out of jail", roll);
        outcome.escaped = Some(true);
        return (outcome, JailRoll::Escaped);
    }

    outcome.escaped = Some(false);
    let attempts = {
        let p = state.player_mut(player);
        p.jail_turns += 1;
        p.jail_turns
    };

    if attempts < config.max_jail_turns {
        let remaining = config.max_jail_turns - attempts;
        state.log(format!("{} rolled {} and stays in jail", name, roll));
        outcome.message = format!("Rolled {}: no doubles, {} attempt(s) left", roll, remaining);
        outcome.turns_remaining = Some(remaining);
        return (outcome, JailRoll::Stayed);
    }

    outcome.forced_bail = Some(true);
    match economy::charge(state, player, config.bail, Creditor::Bank) {
        Settlement::Paid => {
            release(state, player);
            state.log(format!("{} paid ${} bail after {} attempts", name, config.bail, attempts));
            outcome.message = format!("Rolled {}: no doubles, paid ${} bail", roll, config.bail);
            outcome.cost = Some(config.bail);
            outcome.money = Some(state.player(player).money);
            (outcome, JailRoll::BailPaid)
        }
        Settlement::Bankrupt => {
            outcome.message = format!("Rolled {}: could not pay the ${} bail", roll, config.bail);
            outcome.bankrupt = Some(true);
            (outcome, JailRoll::Bankrupt)
        }
    }
}
