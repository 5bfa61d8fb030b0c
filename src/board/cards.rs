//! Chance and community chest decks.
//!
//! Decks are shuffled when the game starts and rebuilt from the full card
//! list once exhausted. The draw order lives in `GameState`, so a restored
//! session keeps drawing from the same deck.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// What happens when a card is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardEffect {
    /// Advance to a fixed tile, collecting GO salary when passing it.
    MoveTo { position: u8 },
    /// Move backwards without collecting salary.
    MoveBack { spaces: u8 },
    /// Collect from (positive) or pay (negative) the bank.
    Money { amount: i64 },
    /// Keep a get-out-of-jail card.
    JailCard,
    /// Go directly to jail.
    GoToJail,
}

/// A card with its printed text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub text: String,
    pub effect: CardEffect,
}

impl Card {
    pub fn new(text: impl Into<String>, effect: CardEffect) -> Self {
        Self {
            text: text.into(),
            effect,
        }
    }
}

/// Which of the two decks a tile draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckKind {
    Chance,
    CommunityChest,
}

impl DeckKind {
    /// The full, unshuffled card list.
    #[must_use]
    pub fn cards(self) -> Vec<Card> {
        match self {
            DeckKind::Chance => chance_cards(),
            DeckKind::CommunityChest => community_chest_cards(),
        }
    }
}

fn chance_cards() -> Vec<Card> {
    use CardEffect::*;

    vec![
        Card::new("Advance to GO", MoveTo { position: 0 }),
        Card::new("Advance to Illinois Avenue", MoveTo { position: 24 }),
        Card::new("Advance to Boardwalk", MoveTo { position: 39 }),
        Card::new("Advance to Reading Railroad", MoveTo { position: 5 }),
        Card::new("Bank pays you dividend of $150", Money { amount: 150 }),
        Card::new("Speeding fine $15", Money { amount: -15 }),
        Card::new("Get Out of Jail Free", JailCard),
        Card::new("Go directly to Jail", GoToJail),
        Card::new("Bank pays you $50", Money { amount: 50 }),
        Card::new("Go back 3 spaces", MoveBack { spaces: 3 }),
    ]
}

fn community_chest_cards() -> Vec<Card> {
    use CardEffect::*;

    vec![
        Card::new("Advance to GO", MoveTo { position: 0 }),
        Card::new("Bank error in your favor, collect $200", Money { amount: 200 }),
        Card::new("Doctor's fees, pay $50", Money { amount: -50 }),
        Card::new("You inherit $100", Money { amount: 100 }),
        Card::new("Pay hospital fees $100", Money { amount: -100 }),
        Card::new("Get Out of Jail Free", JailCard),
        Card::new("Go to Jail", GoToJail),
        Card::new("Receive $25 consultancy fee", Money { amount: 25 }),
        Card::new("You won second prize in beauty contest, collect $10", Money { amount: 10 }),
        Card::new("Pay school fees $150", Money { amount: -150 }),
    ]
}

/// Draw pile for one deck kind. The next card is at the front.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDeck {
    kind: DeckKind,
    pile: Vector<Card>,
}

impl CardDeck {
    /// Full deck in printed order.
    #[must_use]
    pub fn new(kind: DeckKind) -> Self {
        Self {
            kind,
            pile: kind.cards().into_iter().collect(),
        }
    }

    /// Full deck in a random order.
    #[must_use]
    pub fn shuffled(kind: DeckKind, rng: &mut GameRng) -> Self {
        let mut cards = kind.cards();
        rng.shuffle(&mut cards);
        Self {
            kind,
            pile: cards.into_iter().collect(),
        }
    }

    /// A deck with an explicit draw order.
    #[must_use]
    pub fn stacked(kind: DeckKind, cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            kind,
            pile: cards.into_iter().collect(),
        }
    }

    /// Draw the top card, reshuffling a fresh deck when empty.
    pub fn draw(&mut self, rng: &mut GameRng) -> Card {
        if self.pile.is_empty() {
            *self = Self::shuffled(self.kind, rng);
        }
        // A fresh deck is never empty.
        self.pile.pop_front().unwrap_or_else(|| Card::new("Blank card", CardEffect::Money { amount: 0 }))
    }

    #[must_use]
    pub fn kind(&self) -> DeckKind {
        self.kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pile.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pile.is_empty()
    }
}
