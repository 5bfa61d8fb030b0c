//! Static board data: the tile catalog and the card decks.
//!
//! Nothing here is mutated during play except the draw order of a
//! `CardDeck`, which the game state owns.

pub mod cards;
pub mod tile;

pub use cards::{Card, CardDeck, CardEffect, DeckKind};
pub use tile::{
    positions_of, purchasable_positions, tile, ColorGroup, Tile, TileKind, BOARD, BOARD_SIZE,
    JAIL_POSITION, RAILROAD_RENT, UTILITY_MULTIPLIER_BOTH, UTILITY_MULTIPLIER_SINGLE,
};
