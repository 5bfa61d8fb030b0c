//! End-to-end game scenarios.
//!
//! Each test drives a game through the public API with scripted dice and,
//! where a card matters, a stacked deck.

use monopoly_engine::board::{Card, CardDeck, CardEffect, DeckKind, JAIL_POSITION};
use monopoly_engine::core::{
    ActionKind, ActionParams, GameRng, GameState, Phase, Player, PlayerId, RulesConfig, ScriptedDice,
};
use monopoly_engine::rules::{GameResult, MonopolyRules, RulesEngine};
use monopoly_engine::session::{GameSession, PersistenceGateway};

fn engine(rolls: Vec<(u8, u8)>) -> MonopolyRules {
    MonopolyRules::with_dice(RulesConfig::default(), ScriptedDice::new(rolls), GameRng::new(42))
}

fn started(rules: &mut MonopolyRules, names: &[&str]) -> GameState {
    let mut state = GameState::new(50);
    for name in names {
        state.add_player(Player::new(*name, 1500));
    }
    state.begin(rules.rng_mut());
    state
}

fn give(state: &mut GameState, player: PlayerId, positions: &[u8]) {
    for &pos in positions {
        state.property_mut(pos).unwrap().owner = Some(player);
        state.player_mut(player).acquire(pos);
    }
}

fn act(rules: &mut MonopolyRules, state: &mut GameState, player: &str, action: ActionKind) {
    rules
        .apply_action(state, player, action, &ActionParams::none())
        .unwrap_or_else(|e| panic!("{} {} failed: {}", player, action, e));
}

#[test]
fn test_start_game_scenario() {
    let mut game = GameSession::new(engine(vec![]));
    game.register_player("Alice").unwrap();
    game.register_player("Bob").unwrap();
    let result = game.start_game().unwrap();

    let snap = &result.snapshot;
    assert_eq!(snap.phase, "waiting_for_roll");
    assert_eq!(snap.current_player.as_deref(), Some("Alice"));
    assert_eq!(snap.turn_number, 1);
    assert_eq!(snap.turn_order, vec!["Alice", "Bob"]);
}

#[test]
fn test_chance_card_resolves_to_turn_complete() {
    let mut rules = engine(vec![(3, 4)]);
    let mut state = started(&mut rules, &["Alice", "Bob"]);
    state.set_deck(CardDeck::stacked(
        DeckKind::Chance,
        vec![Card::new("Bank pays you dividend of $150", CardEffect::Money { amount: 150 })],
    ));

    let outcome = rules
        .apply_action(&mut state, "Alice", ActionKind::RollDiceAndMove, &ActionParams::none())
        .unwrap();

    assert_eq!(outcome.new_position, Some(7));
    assert_eq!(outcome.card.as_deref(), Some("Bank pays you dividend of $150"));
    assert_eq!(state.phase(), &Phase::TurnComplete);
    assert_eq!(state.player(PlayerId::new(0)).money, 1650);
}

#[test]
fn test_chance_card_can_offer_a_purchase() {
    let mut rules = engine(vec![(3, 4)]);
    let mut state = started(&mut rules, &["Alice", "Bob"]);
    state.set_deck(CardDeck::stacked(
        DeckKind::Chance,
        vec![Card::new("Advance to Illinois Avenue", CardEffect::MoveTo { position: 24 })],
    ));

    act(&mut rules, &mut state, "Alice", ActionKind::RollDiceAndMove);
    assert_eq!(state.phase(), &Phase::WaitingForBuyDecision { position: 24 });
}

#[test]
fn test_three_doubles_go_to_jail() {
    let mut rules = engine(vec![(2, 2), (3, 3), (5, 5)]);
    let mut state = started(&mut rules, &["Alice", "Bob"]);
    let alice = PlayerId::new(0);

    // 4: Income Tax, 10: just visiting. Both settle, so the streak continues.
    let first = rules
        .apply_action(&mut state, "Alice", ActionKind::RollDiceAndMove, &ActionParams::none())
        .unwrap();
    assert_eq!(first.roll_again, Some(true));
    act(&mut rules, &mut state, "Alice", ActionKind::RollDiceAndMove);
    assert_eq!(state.player(alice).position, 10);
    assert_eq!(state.phase(), &Phase::WaitingForRoll);

    let third = rules
        .apply_action(&mut state, "Alice", ActionKind::RollDiceAndMove, &ActionParams::none())
        .unwrap();

    let a = state.player(alice);
    assert!(a.in_jail);
    assert_eq!(a.position, JAIL_POSITION, "no movement on the third double");
    assert_eq!(third.new_position, Some(JAIL_POSITION));
    assert_eq!(a.money, 1300);
    assert_eq!(state.phase(), &Phase::InJail);
    assert_eq!(state.current_player_id(), alice);
    assert_eq!(state.doubles_streak, 0);
}

#[test]
fn test_rent_bankruptcy_advances_turn() {
    let mut rules = engine(vec![(2, 2)]);
    let mut state = started(&mut rules, &["Alice", "Bob", "Carol"]);
    let (alice, bob) = (PlayerId::new(0), PlayerId::new(1));

    give(&mut state, bob, &[37, 39]);
    for pos in [37, 39] {
        state.property_mut(pos).unwrap().houses = 5;
    }
    give(&mut state, alice, &[1, 5]);
    state.property_mut(5).unwrap().mortgaged = true;
    state.player_mut(alice).money = 100;
    state.player_mut(alice).position = 35;

    let outcome = rules
        .apply_action(&mut state, "Alice", ActionKind::RollDiceAndMove, &ActionParams::none())
        .unwrap();

    assert_eq!(outcome.bankrupt, Some(true));
    assert_eq!(outcome.rent, Some(2000));

    let a = state.player(alice);
    assert!(a.bankrupt);
    assert_eq!(a.money, 0);
    assert!(a.properties.is_empty());
    assert_eq!(state.owner_of(1), None);
    assert_eq!(state.owner_of(5), Some(bob));
    assert!(state.property(5).unwrap().mortgaged);
    assert_eq!(state.player(bob).money, 1600);

    assert_eq!(state.current_player_id(), bob);
    assert_eq!(state.turn_number, 2);
    assert_eq!(state.phase(), &Phase::WaitingForRoll);
    assert!(rules.is_terminal(&state).is_none());
}

#[test]
fn test_last_bankruptcy_ends_game() {
    let mut rules = engine(vec![(1, 3)]);
    let mut state = started(&mut rules, &["Alice", "Bob"]);
    state.player_mut(PlayerId::new(0)).money = 150;

    let outcome = rules
        .apply_action(&mut state, "Alice", ActionKind::RollDiceAndMove, &ActionParams::none())
        .unwrap();

    assert!(outcome.ended_game());
    assert_eq!(outcome.winner.as_deref(), Some("Bob"));
    assert_eq!(state.phase(), &Phase::GameOver { winner: "Bob".into() });
    assert_eq!(rules.is_terminal(&state), Some(GameResult::Winner(PlayerId::new(1))));

    let err = rules
        .apply_action(&mut state, "Bob", ActionKind::RollDiceAndMove, &ActionParams::none())
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_phase");
}

#[test]
fn test_jail_round_trip() {
    let mut rules = engine(vec![(1, 4), (1, 2), (6, 4), (3, 3), (1, 2)]);
    let mut state = started(&mut rules, &["Alice", "Bob"]);
    let alice = PlayerId::new(0);
    state.player_mut(alice).position = 25;

    // 30: go to jail. Alice stays current, awaiting a jail action.
    act(&mut rules, &mut state, "Alice", ActionKind::RollDiceAndMove);
    assert_eq!(state.phase(), &Phase::InJail);
    assert_eq!(state.current_player_id(), alice);

    // A failed release roll completes her turn; she still ends it herself.
    let outcome = rules
        .apply_action(&mut state, "Alice", ActionKind::RollForDoubles, &ActionParams::none())
        .unwrap();
    assert_eq!(outcome.escaped, Some(false));
    assert_eq!(outcome.turns_remaining, Some(2));
    assert_eq!(outcome.next_player, None);
    assert_eq!(state.phase(), &Phase::TurnComplete);
    assert_eq!(state.current_player_id(), alice);
    assert!(state.player(alice).in_jail);
    assert_eq!(rules.legal_actions(&state, alice), vec![ActionKind::EndTurn]);

    let err = rules
        .apply_action(&mut state, "Bob", ActionKind::RollDiceAndMove, &ActionParams::none())
        .unwrap_err();
    assert_eq!(err.kind(), "not_your_turn");

    let outcome = rules
        .apply_action(&mut state, "Alice", ActionKind::EndTurn, &ActionParams::none())
        .unwrap();
    assert_eq!(outcome.next_player.as_deref(), Some("Bob"));
    assert_eq!(state.turn_number, 2);

    // Bob: 10, just visiting.
    act(&mut rules, &mut state, "Bob", ActionKind::RollDiceAndMove);
    assert_eq!(state.phase(), &Phase::TurnComplete);
    act(&mut rules, &mut state, "Bob", ActionKind::EndTurn);

    // Alice's turn starts in jail; doubles release her without moving.
    assert_eq!(state.phase(), &Phase::InJail);
    let outcome = rules
        .apply_action(&mut state, "Alice", ActionKind::RollForDoubles, &ActionParams::none())
        .unwrap();
    assert_eq!(outcome.escaped, Some(true));
    assert_eq!(state.phase(), &Phase::WaitingForRoll);
    assert_eq!(state.player(alice).position, JAIL_POSITION);

    // 13: States Avenue.
    act(&mut rules, &mut state, "Alice", ActionKind::RollDiceAndMove);
    act(&mut rules, &mut state, "Alice", ActionKind::BuyProperty);
    assert_eq!(state.owner_of(13), Some(alice));
    assert_eq!(state.player(alice).money, 1500 - 140);
    assert!(!state.player(alice).in_jail);
}

#[test]
fn test_session_game_to_completion_records_history() {
    use monopoly_engine::session::{GameStatus, MemoryStore};

    let config = RulesConfig::default().with_starting_money(150);
    let rules = MonopolyRules::with_dice(config, ScriptedDice::new(vec![(1, 3)]), GameRng::new(42));
    let store = MemoryStore::new();
    let mut game = GameSession::new(rules).with_store(store.clone());
    game.register_player("Alice").unwrap();
    game.register_player("Bob").unwrap();
    game.start_game().unwrap();

    // 4: Income Tax of 200 against 150 in hand.
    let result = game
        .action("Alice", "roll_dice_and_move", &ActionParams::none())
        .unwrap();
    assert!(result.outcome.ended_game());
    assert_eq!(result.snapshot.phase, "game_over");
    assert_eq!(result.snapshot.winner.as_deref(), Some("Bob"));
    assert!(result.snapshot.player("Alice").unwrap().bankrupt);

    let history = store.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, GameStatus::Completed);
    assert_eq!(history[0].winner.as_deref(), Some("Bob"));
    assert_eq!(history[0].game_id, game.game_id());

    let saved = store.load_latest().unwrap().unwrap();
    assert_eq!(saved.snapshot.phase, "game_over");
}
