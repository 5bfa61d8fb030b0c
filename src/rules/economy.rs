//! Property and economy rules.
//!
//! Rent, purchases, building, mortgages and the bankruptcy path. These are
//! free functions over `GameState`; they never touch the phase; the
//! dispatcher decides what a payment outcome means for the turn.

use crate::board::{
    self, Tile, TileKind, BOARD_SIZE, RAILROAD_RENT, UTILITY_MULTIPLIER_BOTH, UTILITY_MULTIPLIER_SINGLE,
};
use crate::core::{GameError, GameState, PlayerId, RulesConfig};

use super::outcome::ActionOutcome;

/// Who a mandatory payment is owed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Creditor {
    Bank,
    Player(PlayerId),
}

/// How a mandatory payment was settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settlement {
    Paid,
    Bankrupt,
}

// === Rent ===

/// Rent owed for landing on `position` with a roll totalling `dice_total`.
///
/// Zero for unowned or mortgaged tiles and for tiles that cannot be owned.
#[must_use]
pub fn rent_due(state: &GameState, position: u8, dice_total: u8) -> i64 {
    let Some(record) = state.property(position) else {
        return 0;
    };
    let Some(owner) = record.owner else {
        return 0;
    };
    if record.mortgaged {
        return 0;
    }

    let tile = board::tile(position);
    match tile.kind {
        TileKind::Property => {
            let base = tile.rent[record.houses.min(5) as usize];
            let monopoly = tile.color.is_some_and(|group| state.has_monopoly(owner, group));
            if record.houses == 0 && monopoly {
                base * 2
            } else {
                base
            }
        }
        TileKind::Railroad => {
            let held = state.count_owned(owner, TileKind::Railroad).clamp(1, RAILROAD_RENT.len());
            RAILROAD_RENT[held - 1]
        }
        TileKind::Utility => {
            let multiplier = if state.count_owned(owner, TileKind::Utility) >= 2 {
                UTILITY_MULTIPLIER_BOTH
            } else {
                UTILITY_MULTIPLIER_SINGLE
            };
            i64::from(dice_total) * multiplier
        }
        _ => 0,
    }
}

// === Payments and bankruptcy ===

/// Collect a mandatory payment, bankrupting the debtor if they are short.
pub fn charge(state: &mut GameState, debtor: PlayerId, amount: i64, creditor: Creditor) -> Settlement {
    if amount <= 0 {
        return Settlement::Paid;
    }

    if state.player(debtor).can_afford(amount) {
        state.player_mut(debtor).money -= amount;
        if let Creditor::Player(to) = creditor {
            state.player_mut(to).money += amount;
        }
        Settlement::Paid
    } else {
        let debtor_ref = state.player(debtor);
        let line = format!("{} cannot pay ${} (has ${})", debtor_ref.name, amount, debtor_ref.money);
        state.log(line);
        declare_bankruptcy(state, debtor, creditor);
        Settlement::Bankrupt
    }
}

/// Settle an insolvent player.
///
/// A player creditor takes the remaining cash and every mortgaged tile
/// (still mortgaged). Everything else goes back to the bank unowned,
/// unmortgaged and without houses.
pub fn declare_bankruptcy(state: &mut GameState, debtor: PlayerId, creditor: Creditor) {
    let cash = state.player(debtor).money.max(0);
    if let Creditor::Player(to) = creditor {
        state.player_mut(to).money += cash;
    }

    let holdings: Vec<u8> = state.player(debtor).properties.to_vec();
    for pos in holdings {
        let mortgaged = state.property(pos).is_some_and(|r| r.mortgaged);
        match creditor {
            Creditor::Player(to) if mortgaged => {
                if let Some(record) = state.property_mut(pos) {
                    record.owner = Some(to);
                    record.houses = 0;
                }
                state.player_mut(to).acquire(pos);
            }
            _ => {
                if let Some(record) = state.property_mut(pos) {
                    record.reset();
                }
            }
        }
    }

    let player = state.player_mut(debtor);
    player.properties.clear();
    player.money = 0;
    player.bankrupt = true;
    player.in_jail = false;
    player.jail_turns = 0;

    let name = player.name.clone();
    match creditor {
        Creditor::Bank => state.log(format!("{} is BANKRUPT! Assets return to the bank", name)),
        Creditor::Player(to) => {
            let to_name = state.player(to).name.clone();
            state.log(format!("{} is BANKRUPT! Assets go to {}", name, to_name))
        }
    }
    log::info!("{} went bankrupt", name);
}

// === Ownership helpers ===

/// The tile at `position` if `player` owns it.
fn owned_tile(state: &GameState, player: PlayerId, position: u8) -> Result<&'static Tile, GameError> {
    if position >= BOARD_SIZE {
        return Err(GameError::property(format!("Invalid position {}", position)));
    }
    if state.owner_of(position) != Some(player) {
        return Err(GameError::property("You don't own this property"));
    }
    Ok(board::tile(position))
}

// === Purchase ===

/// Transfer the unowned tile at `position` to `player` for its price.
pub fn purchase(state: &mut GameState, player: PlayerId, position: u8) -> Result<ActionOutcome, GameError> {
    let tile = board::tile(position);
    if !tile.is_purchasable() || state.owner_of(position).is_some() {
        return Err(GameError::property(format!("{} is not for sale", tile.name)));
    }

    let buyer = state.player(player);
    if !buyer.can_afford(tile.price) {
        return Err(GameError::InsufficientFunds {
            needed: tile.price,
            available: buyer.money,
        });
    }

    let buyer = state.player_mut(player);
    buyer.money -= tile.price;
    buyer.acquire(position);
    let name = buyer.name.clone();
    let remaining = buyer.money;
    if let Some(record) = state.property_mut(position) {
        record.owner = Some(player);
    }
    state.log(format!("{} bought {} for ${}", name, tile.name, tile.price));

    let mut outcome = ActionOutcome::ok(format!("Bought {} for ${}", tile.name, tile.price));
    outcome.property = Some(tile.name.to_string());
    outcome.price = Some(tile.price);
    outcome.money = Some(remaining);
    Ok(outcome)
}

// === Building ===

/// Validate building one house on `position`, returning the tile.
pub fn check_build(state: &GameState, player: PlayerId, position: u8) -> Result<&'static Tile, GameError> {
    let tile = owned_tile(state, player, position)?;
    let Some(group) = tile.color else {
        return Err(GameError::property(format!("Cannot build on {}", tile.name)));
    };

    if !state.has_monopoly(player, group) {
        return Err(GameError::property(format!(
            "Cannot build without owning every {} property",
            group.name()
        )));
    }

    let records: Vec<_> = group
        .positions()
        .iter()
        .filter_map(|&pos| state.property(pos))
        .collect();

    if records.iter().any(|r| r.mortgaged) {
        return Err(GameError::property(format!(
            "Cannot build while a {} property is mortgaged",
            group.name()
        )));
    }

    let houses = state.property(position).map_or(0, |r| r.houses);
    if houses >= 5 {
        return Err(GameError::property(format!("{} already has a hotel", tile.name)));
    }

    let least = records.iter().map(|r| r.houses).min().unwrap_or(0);
    if houses > least {
        return Err(GameError::property(format!(
            "Even-build rule: develop the rest of the {} group first",
            group.name()
        )));
    }

    let money = state.player(player).money;
    if money < tile.house_cost {
        return Err(GameError::InsufficientFunds {
            needed: tile.house_cost,
            available: money,
        });
    }

    Ok(tile)
}

/// Positions where `player` could build a house right now.
#[must_use]
pub fn buildable_positions(state: &GameState, player: PlayerId) -> Vec<u8> {
    state
        .player(player)
        .properties
        .iter()
        .copied()
        .filter(|&pos| check_build(state, player, pos).is_ok())
        .collect()
}

/// Build one house (the fifth is a hotel) on `position`.
pub fn build_house(state: &mut GameState, player: PlayerId, position: u8) -> Result<ActionOutcome, GameError> {
    let tile = check_build(state, player, position)?;

    let owner = state.player_mut(player);
    owner.money -= tile.house_cost;
    let name = owner.name.clone();
    let remaining = owner.money;

    let mut houses = 0;
    if let Some(record) = state.property_mut(position) {
        record.houses += 1;
        houses = record.houses;
    }

    let building = if houses == 5 {
        "a hotel".to_string()
    } else {
        format!("{} house(s)", houses)
    };
    state.log(format!("{} built on {} - now has {}", name, tile.name, building));

    let mut outcome = ActionOutcome::ok(format!("Built on {}, now {}", tile.name, building));
    outcome.property = Some(tile.name.to_string());
    outcome.houses = Some(houses);
    outcome.cost = Some(tile.house_cost);
    outcome.money = Some(remaining);
    Ok(outcome)
}

// === Mortgages ===

/// Mortgage `position`, crediting its mortgage value.
pub fn mortgage(state: &mut GameState, player: PlayerId, position: u8) -> Result<ActionOutcome, GameError> {
    let tile = owned_tile(state, player, position)?;
    let record = state.property(position).copied().unwrap_or_default();

    if record.mortgaged {
        return Err(GameError::property(format!("{} is already mortgaged", tile.name)));
    }
    if record.houses > 0 {
        return Err(GameError::property(format!("Sell the houses on {} first", tile.name)));
    }

    if let Some(record) = state.property_mut(position) {
        record.mortgaged = true;
    }
    let owner = state.player_mut(player);
    owner.money += tile.mortgage_value;
    let name = owner.name.clone();
    let remaining = owner.money;
    state.log(format!("{} mortgaged {} for ${}", name, tile.name, tile.mortgage_value));

    let mut outcome = ActionOutcome::ok(format!("Mortgaged {} for ${}", tile.name, tile.mortgage_value));
    outcome.property = Some(tile.name.to_string());
    outcome.received = Some(tile.mortgage_value);
    outcome.money = Some(remaining);
    Ok(outcome)
}

/// Lift the mortgage on `position`, paying the value plus interest.
pub fn unmortgage(
    state: &mut GameState,
    config: &RulesConfig,
    player: PlayerId,
    position: u8,
) -> Result<ActionOutcome, GameError> {
    let tile = owned_tile(state, player, position)?;
    let mortgaged = state.property(position).is_some_and(|r| r.mortgaged);
    if !mortgaged {
        return Err(GameError::property(format!("{} is not mortgaged", tile.name)));
    }

    let cost = config.unmortgage_cost(tile.mortgage_value);
    let money = state.player(player).money;
    if money < cost {
        return Err(GameError::InsufficientFunds {
            needed: cost,
            available: money,
        });
    }

    if let Some(record) = state.property_mut(position) {
        record.mortgaged = false;
    }
    let owner = state.player_mut(player);
    owner.money -= cost;
    let name = owner.name.clone();
    let remaining = owner.money;
    state.log(format!("{} unmortgaged {} for ${}", name, tile.name, cost));

    let mut outcome = ActionOutcome::ok(format!("Unmortgaged {} for ${}", tile.name, cost));
    outcome.property = Some(tile.name.to_string());
    outcome.cost = Some(cost);
    outcome.money = Some(remaining);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Player;

    fn setup() -> (GameState, PlayerId, PlayerId) {
        let mut state = GameState::new(50);
        let alice = state.add_player(Player::new("Alice", 1500));
        let bob = state.add_player(Player::new("Bob", 1500));
        (state, alice, bob)
    }

    fn give(state: &mut GameState, player: PlayerId, positions: &[u8]) {
        for &pos in positions {
            state.property_mut(pos).unwrap().owner = Some(player);
            state.player_mut(player).acquire(pos);
        }
    }

    #[test]
    fn test_street_rent_and_monopoly_doubling() {
        let (mut state, alice, _) = setup();
        give(&mut state, alice, &[1]);
        assert_eq!(rent_due(&state, 1, 7), 2);

        give(&mut state, alice, &[3]);
        assert_eq!(rent_due(&state, 1, 7), 4);
        assert_eq!(rent_due(&state, 3, 7), 8);

        state.property_mut(1).unwrap().houses = 1;
        assert_eq!(rent_due(&state, 1, 7), 10, "houses use the schedule, not doubling");
    }

    #[test]
    fn test_railroad_rent_scales() {
        let (mut state, alice, _) = setup();
        let expected = [25, 50, 100, 200];
        for (i, pos) in [5u8, 15, 25, 35].into_iter().enumerate() {
            give(&mut state, alice, &[pos]);
            assert_eq!(rent_due(&state, 5, 7), expected[i]);
        }
    }

    #[test]
    fn test_utility_rent() {
        let (mut state, alice, _) = setup();
        give(&mut state, alice, &[12]);
        assert_eq!(rent_due(&state, 12, 9), 36);
        give(&mut state, alice, &[28]);
        assert_eq!(rent_due(&state, 12, 9), 90);
    }

    #[test]
    fn test_no_rent_when_mortgaged_or_unowned() {
        let (mut state, alice, _) = setup();
        assert_eq!(rent_due(&state, 39, 7), 0);
        give(&mut state, alice, &[39]);
        state.property_mut(39).unwrap().mortgaged = true;
        assert_eq!(rent_due(&state, 39, 7), 0);
        assert_eq!(rent_due(&state, 0, 7), 0);
    }

    #[test]
    fn test_charge_pays_creditor() {
        let (mut state, alice, bob) = setup();
        let result = charge(&mut state, alice, 100, Creditor::Player(bob));
        assert_eq!(result, Settlement::Paid);
        assert_eq!(state.player(alice).money, 1400);
        assert_eq!(state.player(bob).money, 1600);
    }

    #[test]
    fn test_bankruptcy_to_player() {
        let (mut state, alice, bob) = setup();
        give(&mut state, alice, &[1, 3, 5]);
        state.property_mut(5).unwrap().mortgaged = true;
        state.property_mut(1).unwrap().houses = 1;
        state.player_mut(alice).money = 40;

        let result = charge(&mut state, alice, 500, Creditor::Player(bob));
        assert_eq!(result, Settlement::Bankrupt);

        let a = state.player(alice);
        assert!(a.bankrupt);
        assert_eq!(a.money, 0);
        assert!(a.properties.is_empty());

        assert_eq!(state.player(bob).money, 1540);
        assert_eq!(state.owner_of(1), None);
        assert_eq!(state.property(1).unwrap().houses, 0);
        assert_eq!(state.owner_of(3), None);
        assert_eq!(state.owner_of(5), Some(bob));
        assert!(state.property(5).unwrap().mortgaged);
        assert!(state.player(bob).owns(5));
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_bankruptcy_to_bank_clears_mortgages() {
        let (mut state, alice, _) = setup();
        give(&mut state, alice, &[5]);
        state.property_mut(5).unwrap().mortgaged = true;
        state.player_mut(alice).money = 10;

        assert_eq!(charge(&mut state, alice, 200, Creditor::Bank), Settlement::Bankrupt);
        assert_eq!(state.property(5).copied().unwrap(), Default::default());
    }

    #[test]
    fn test_purchase() {
        let (mut state, alice, _) = setup();
        let outcome = purchase(&mut state, alice, 39).unwrap();
        assert_eq!(outcome.price, Some(400));
        assert_eq!(state.player(alice).money, 1100);
        assert_eq!(state.owner_of(39), Some(alice));

        assert!(purchase(&mut state, alice, 39).is_err(), "already owned");
        assert!(purchase(&mut state, alice, 0).is_err(), "not purchasable");
    }

    #[test]
    fn test_purchase_rejected_when_short() {
        let (mut state, alice, _) = setup();
        state.player_mut(alice).money = 399;
        let err = purchase(&mut state, alice, 39).unwrap_err();
        assert_eq!(err, GameError::InsufficientFunds { needed: 400, available: 399 });
        assert_eq!(state.owner_of(39), None);
    }

    #[test]
    fn test_build_requires_monopoly() {
        let (mut state, alice, _) = setup();
        give(&mut state, alice, &[6, 8]);
        assert!(check_build(&state, alice, 6).is_err());
        give(&mut state, alice, &[9]);
        assert!(check_build(&state, alice, 6).is_ok());
        assert!(check_build(&state, alice, 5).is_err(), "not owned");
    }

    #[test]
    fn test_even_build_rule() {
        let (mut state, alice, _) = setup();
        give(&mut state, alice, &[1, 3]);

        build_house(&mut state, alice, 1).unwrap();
        assert!(build_house(&mut state, alice, 1).is_err(), "second house before peers");
        assert_eq!(buildable_positions(&state, alice), vec![3]);

        build_house(&mut state, alice, 3).unwrap();
        let outcome = build_house(&mut state, alice, 1).unwrap();
        assert_eq!(outcome.houses, Some(2));
        assert_eq!(state.player(alice).money, 1500 - 150);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_build_up_to_hotel() {
        let (mut state, alice, _) = setup();
        give(&mut state, alice, &[37, 39]);
        state.player_mut(alice).money = 10_000;

        for _ in 0..5 {
            build_house(&mut state, alice, 37).unwrap();
            build_house(&mut state, alice, 39).unwrap();
        }
        assert_eq!(state.property(39).unwrap().houses, 5);
        assert_eq!(rent_due(&state, 39, 7), 2000);
        assert!(build_house(&mut state, alice, 39).is_err());
    }

    #[test]
    fn test_build_blocked_by_mortgage_and_funds() {
        let (mut state, alice, _) = setup();
        give(&mut state, alice, &[1, 3]);
        state.property_mut(3).unwrap().mortgaged = true;
        assert!(check_build(&state, alice, 1).is_err());

        state.property_mut(3).unwrap().mortgaged = false;
        state.player_mut(alice).money = 49;
        assert!(matches!(
            check_build(&state, alice, 1),
            Err(GameError::InsufficientFunds { needed: 50, .. })
        ));
    }

    #[test]
    fn test_mortgage_cycle() {
        let (mut state, alice, _) = setup();
        let config = RulesConfig::default();
        give(&mut state, alice, &[39]);

        let outcome = mortgage(&mut state, alice, 39).unwrap();
        assert_eq!(outcome.received, Some(200));
        assert_eq!(state.player(alice).money, 1700);
        assert!(mortgage(&mut state, alice, 39).is_err());

        let outcome = unmortgage(&mut state, &config, alice, 39).unwrap();
        assert_eq!(outcome.cost, Some(220));
        assert_eq!(state.player(alice).money, 1480);
        assert!(unmortgage(&mut state, &config, alice, 39).is_err());
    }

    #[test]
    fn test_mortgage_rejects_houses_and_strangers() {
        let (mut state, alice, bob) = setup();
        give(&mut state, alice, &[1, 3]);
        build_house(&mut state, alice, 1).unwrap();

        assert!(mortgage(&mut state, alice, 1).is_err());
        assert!(mortgage(&mut state, bob, 3).is_err());
        assert!(mortgage(&mut state, alice, 77).is_err());
    }
}
