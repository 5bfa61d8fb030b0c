//! Movement and tile resolution.
//!
//! `resolve_tile` applies everything that happens when a player comes to
//! rest on a tile (rent, tax, cards, go-to-jail) and reports a
//! `Resolution`. The dispatcher turns the resolution into a phase change,
//! so each roll sets the phase exactly once.

use crate::board::{self, CardEffect, DeckKind, TileKind, BOARD_SIZE};
use crate::core::{DiceRoll, GameRng, GameState, PlayerId, RulesConfig};

use super::economy::{self, Creditor, Settlement};
use super::jail;
use super::outcome::ActionOutcome;

/// Where a landing left the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing left to decide on this tile.
    Settled,
    /// Unowned purchasable tile at this position.
    PendingPurchase(u8),
    /// Sent to jail.
    Jailed,
    /// The player could not pay and is out of the game.
    Bankrupt,
}

// === Movement ===

fn collect_salary(state: &mut GameState, config: &RulesConfig, player: PlayerId) {
    let p = state.player_mut(player);
    p.money += config.go_salary;
    let line = format!("{} passed GO and collected ${}", p.name, config.go_salary);
    state.log(line);
}

/// Move forward `steps` tiles, paying salary when passing or landing on GO.
pub fn move_by(state: &mut GameState, config: &RulesConfig, player: PlayerId, steps: u8) -> u8 {
    let old = state.player(player).position;
    let total = u16::from(old) + u16::from(steps);
    let new = (total % u16::from(BOARD_SIZE)) as u8;
    state.player_mut(player).position = new;
    if total >= u16::from(BOARD_SIZE) {
        collect_salary(state, config, player);
    }
    new
}

/// Advance to `destination`, paying salary if the move wraps past GO.
pub fn move_to(state: &mut GameState, config: &RulesConfig, player: PlayerId, destination: u8) {
    let destination = destination % BOARD_SIZE;
    let old = state.player(player).position;
    state.player_mut(player).position = destination;
    if destination < old || destination == 0 {
        collect_salary(state, config, player);
    }
}

/// Move backwards. Never pays salary.
pub fn move_back(state: &mut GameState, player: PlayerId, spaces: u8) {
    let old = u16::from(state.player(player).position);
    let size = u16::from(BOARD_SIZE);
    let new = (old + size - u16::from(spaces) % size) % size;
    state.player_mut(player).position = new as u8;
}

// === Resolution ===

/// Apply the effect of the tile `player` is standing on.
pub fn resolve_tile(
    state: &mut GameState,
    config: &RulesConfig,
    rng: &mut GameRng,
    player: PlayerId,
    dice_total: u8,
    outcome: &mut ActionOutcome,
) -> Resolution {
    let position = state.player(player).position;
    let tile = board::tile(position);
    let name = state.player(player).name.clone();

    match tile.kind {
        TileKind::Go | TileKind::Jail | TileKind::FreeParking => Resolution::Settled,

        TileKind::Property | TileKind::Railroad | TileKind::Utility => match state.owner_of(position) {
            None => {
                outcome.price = Some(tile.price);
                Resolution::PendingPurchase(position)
            }
            Some(owner) if owner == player => Resolution::Settled,
            Some(owner) => {
                let rent = economy::rent_due(state, position, dice_total);
                let owner_name = state.player(owner).name.clone();
                if rent == 0 {
                    state.log(format!("{} is mortgaged, no rent owed to {}", tile.name, owner_name));
                    return Resolution::Settled;
                }
                outcome.rent = Some(rent);
                match economy::charge(state, player, rent, Creditor::Player(owner)) {
                    Settlement::Paid => {
                        state.log(format!("{} paid ${} rent to {}", name, rent, owner_name));
                        Resolution::Settled
                    }
                    Settlement::Bankrupt => Resolution::Bankrupt,
                }
            }
        },

        TileKind::Tax => match economy::charge(state, player, tile.tax, Creditor::Bank) {
            Settlement::Paid => {
                state.log(format!("{} paid ${} {}", name, tile.tax, tile.name));
                Resolution::Settled
            }
            Settlement::Bankrupt => Resolution::Bankrupt,
        },

        TileKind::Chance => draw_card(state, config, rng, player, DeckKind::Chance, dice_total, outcome),
        TileKind::CommunityChest => {
            draw_card(state, config, rng, player, DeckKind::CommunityChest, dice_total, outcome)
        }

        TileKind::GoToJail => {
            jail::send_to_jail(state, player);
            Resolution::Jailed
        }
    }
}

/// Draw from `kind` and apply the card.
pub fn draw_card(
    state: &mut GameState,
    config: &RulesConfig,
    rng: &mut GameRng,
    player: PlayerId,
    kind: DeckKind,
    dice_total: u8,
    outcome: &mut ActionOutcome,
) -> Resolution {
    let card = state.deck_mut(kind).draw(rng);
    let name = state.player(player).name.clone();
    state.log(format!("{} drew: {}", name, card.text));
    outcome.card = Some(card.text.clone());

    match card.effect {
        CardEffect::MoveTo { position } => {
            move_to(state, config, player, position);
            resolve_tile(state, config, rng, player, dice_total, outcome)
        }
        CardEffect::MoveBack { spaces } => {
            move_back(state, player, spaces);
            resolve_tile(state, config, rng, player, dice_total, outcome)
        }
        CardEffect::Money { amount } if amount >= 0 => {
            state.player_mut(player).money += amount;
            Resolution::Settled
        }
        CardEffect::Money { amount } => match economy::charge(state, player, -amount, Creditor::Bank) {
            Settlement::Paid => Resolution::Settled,
            Settlement::Bankrupt => Resolution::Bankrupt,
        },
        CardEffect::JailCard => {
            state.player_mut(player).jail_cards += 1;
            Resolution::Settled
        }
        CardEffect::GoToJail => {
            jail::send_to_jail(state, player);
            Resolution::Jailed
        }
    }
}

// === Rolling ===

/// Apply a movement roll for `player`.
///
/// Tracks the doubles streak; the streak limit sends the player to jail
/// without moving.
pub fn roll_and_move(
    state: &mut GameState,
    config: &RulesConfig,
    rng: &mut GameRng,
    player: PlayerId,
    roll: DiceRoll,
) -> (ActionOutcome, Resolution) {
    let name = state.player(player).name.clone();
    state.last_dice = Some(roll);
    state.log(format!("{} rolled {}", name, roll));

    let mut outcome = ActionOutcome::ok(format!("Rolled {}", roll));
    outcome.dice = Some(roll.as_pair());
    outcome.doubles = Some(roll.is_doubles());

    if roll.is_doubles() {
        state.doubles_streak += 1;
        if state.doubles_streak >= config.doubles_to_jail {
            state.log(format!("{} rolled {} doubles in a row", name, state.doubles_streak));
            jail::send_to_jail(state, player);
            outcome.message = format!("Rolled {}: doubles {} times, go to jail", roll, config.doubles_to_jail);
            outcome.new_position = Some(state.player(player).position);
            return (outcome, Resolution::Jailed);
        }
    } else {
        state.doubles_streak = 0;
    }

    let position = move_by(state, config, player, roll.total());
    let tile = board::tile(position);
    state.log(format!("{} landed on {}", name, tile.name));

    let resolution = resolve_tile(state, config, rng, player, roll.total(), &mut outcome);

    let final_position = state.player(player).position;
    outcome.new_position = Some(final_position);
    outcome.tile = Some(board::tile(final_position).name.to_string());
    outcome.money = Some(state.player(player).money);
    outcome.message = format!("Rolled {}, landed on {}", roll, board::tile(final_position).name);
    (outcome, resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Card, CardDeck, JAIL_POSITION};
    use crate::core::Player;

    fn setup() -> (GameState, RulesConfig, GameRng, PlayerId, PlayerId) {
        let mut state = GameState::new(50);
        let alice = state.add_player(Player::new("Alice", 1500));
        let bob = state.add_player(Player::new("Bob", 1500));
        (state, RulesConfig::default(), GameRng::new(5), alice, bob)
    }

    #[test]
    fn test_move_by_wraps_and_pays_salary() {
        let (mut state, config, _, alice, _) = setup();
        state.player_mut(alice).position = 38;
        assert_eq!(move_by(&mut state, &config, alice, 5), 3);
        assert_eq!(state.player(alice).money, 1700);
    }

    #[test]
    fn test_landing_on_go_pays_salary() {
        let (mut state, config, _, alice, _) = setup();
        state.player_mut(alice).position = 35;
        assert_eq!(move_by(&mut state, &config, alice, 5), 0);
        assert_eq!(state.player(alice).money, 1700);
    }

    #[test]
    fn test_move_to_salary_rules() {
        let (mut state, config, _, alice, _) = setup();
        state.player_mut(alice).position = 7;
        move_to(&mut state, &config, alice, 24);
        assert_eq!(state.player(alice).money, 1500);

        state.player_mut(alice).position = 36;
        move_to(&mut state, &config, alice, 5);
        assert_eq!(state.player(alice).money, 1700);
    }

    #[test]
    fn test_move_back_never_pays() {
        let (mut state, _, _, alice, _) = setup();
        state.player_mut(alice).position = 2;
        move_back(&mut state, alice, 3);
        assert_eq!(state.player(alice).position, 39);
        assert_eq!(state.player(alice).money, 1500);
    }

    #[test]
    fn test_unowned_tile_pending_purchase() {
        let (mut state, config, mut rng, alice, _) = setup();
        let (outcome, resolution) = roll_and_move(&mut state, &config, &mut rng, alice, DiceRoll::new(2, 4));
        assert_eq!(resolution, Resolution::PendingPurchase(6));
        assert_eq!(outcome.price, Some(100));
        assert_eq!(outcome.tile.as_deref(), Some("Oriental Avenue"));
    }

    #[test]
    fn test_rent_paid_to_owner() {
        let (mut state, config, mut rng, alice, bob) = setup();
        state.property_mut(6).unwrap().owner = Some(bob);
        state.player_mut(bob).acquire(6);

        let (outcome, resolution) = roll_and_move(&mut state, &config, &mut rng, alice, DiceRoll::new(2, 4));
        assert_eq!(resolution, Resolution::Settled);
        assert_eq!(outcome.rent, Some(6));
        assert_eq!(state.player(alice).money, 1494);
        assert_eq!(state.player(bob).money, 1506);
    }

    #[test]
    fn test_tax_tile() {
        let (mut state, config, mut rng, alice, _) = setup();
        let (_, resolution) = roll_and_move(&mut state, &config, &mut rng, alice, DiceRoll::new(1, 3));
        assert_eq!(resolution, Resolution::Settled);
        assert_eq!(state.player(alice).money, 1300);
    }

    #[test]
    fn test_go_to_jail_tile() {
        let (mut state, config, mut rng, alice, _) = setup();
        state.player_mut(alice).position = 25;
        let (_, resolution) = roll_and_move(&mut state, &config, &mut rng, alice, DiceRoll::new(1, 4));
        assert_eq!(resolution, Resolution::Jailed);
        let a = state.player(alice);
        assert!(a.in_jail);
        assert_eq!(a.position, JAIL_POSITION);
        assert_eq!(a.money, 1500, "no salary on the way to jail");
    }

    #[test]
    fn test_third_double_goes_to_jail_without_moving() {
        let (mut state, config, mut rng, alice, _) = setup();
        state.doubles_streak = 2;
        state.player_mut(alice).position = 5;
        let (outcome, resolution) = roll_and_move(&mut state, &config, &mut rng, alice, DiceRoll::new(3, 3));
        assert_eq!(resolution, Resolution::Jailed);
        assert_eq!(outcome.new_position, Some(JAIL_POSITION));
    }

    #[test]
    fn test_non_double_resets_streak() {
        let (mut state, config, mut rng, alice, _) = setup();
        state.doubles_streak = 2;
        roll_and_move(&mut state, &config, &mut rng, alice, DiceRoll::new(1, 2));
        assert_eq!(state.doubles_streak, 0);
    }

    #[test]
    fn test_card_money_and_jail_card() {
        let (mut state, config, mut rng, alice, _) = setup();
        state.set_deck(CardDeck::stacked(
            DeckKind::Chance,
            vec![
                Card::new("Bank pays you $50", CardEffect::Money { amount: 50 }),
                Card::new("Get Out of Jail Free", CardEffect::JailCard),
            ],
        ));

        let (outcome, resolution) = roll_and_move(&mut state, &config, &mut rng, alice, DiceRoll::new(3, 4));
        assert_eq!(resolution, Resolution::Settled);
        assert_eq!(outcome.card.as_deref(), Some("Bank pays you $50"));
        assert_eq!(state.player(alice).money, 1550);

        let mut outcome = ActionOutcome::default();
        draw_card(&mut state, &config, &mut rng, alice, DeckKind::Chance, 7, &mut outcome);
        assert_eq!(state.player(alice).jail_cards, 1);
    }

    #[test]
    fn test_card_move_back_resolves_new_tile() {
        let (mut state, config, mut rng, alice, _) = setup();
        state.set_deck(CardDeck::stacked(
            DeckKind::Chance,
            vec![Card::new("Go back 3 spaces", CardEffect::MoveBack { spaces: 3 })],
        ));

        let (outcome, resolution) = roll_and_move(&mut state, &config, &mut rng, alice, DiceRoll::new(3, 4));
        assert_eq!(resolution, Resolution::Settled);
        assert_eq!(outcome.new_position, Some(4));
        assert_eq!(state.player(alice).money, 1300, "income tax after moving back");
    }

    #[test]
    fn test_card_advance_to_go() {
        let (mut state, config, mut rng, alice, _) = setup();
        state.set_deck(CardDeck::stacked(
            DeckKind::CommunityChest,
            vec![Card::new("Advance to GO", CardEffect::MoveTo { position: 0 })],
        ));

        let (outcome, _) = roll_and_move(&mut state, &config, &mut rng, alice, DiceRoll::new(1, 1));
        assert_eq!(outcome.new_position, Some(0));
        assert_eq!(state.player(alice).money, 1700);
    }

    #[test]
    fn test_card_fine_can_bankrupt() {
        let (mut state, config, mut rng, alice, _) = setup();
        state.player_mut(alice).money = 10;
        state.set_deck(CardDeck::stacked(
            DeckKind::Chance,
            vec![Card::new("Speeding fine $15", CardEffect::Money { amount: -15 })],
        ));

        let (_, resolution) = roll_and_move(&mut state, &config, &mut rng, alice, DiceRoll::new(3, 4));
        assert_eq!(resolution, Resolution::Bankrupt);
        assert!(state.player(alice).bankrupt);
    }
}
