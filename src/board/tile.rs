//! The 40-tile board catalog.
//!
//! Immutable, total lookup from position to `Tile`. Prices, mortgage
//! values, house costs and rent schedules follow the classic board.

use serde::Serialize;

/// Number of tiles on the board.
pub const BOARD_SIZE: u8 = 40;

/// Railroad rent by number of railroads held by the owner (1-4).
pub const RAILROAD_RENT: [i64; 4] = [25, 50, 100, 200];

/// Utility rent multiplier when the owner holds one utility.
pub const UTILITY_MULTIPLIER_SINGLE: i64 = 4;

/// Utility rent multiplier when the owner holds both utilities.
pub const UTILITY_MULTIPLIER_BOTH: i64 = 10;

/// What a tile does when a player lands on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Go,
    Property,
    Railroad,
    Utility,
    Tax,
    Chance,
    CommunityChest,
    Jail,
    GoToJail,
    FreeParking,
}

impl TileKind {
    /// Tiles that can be owned.
    #[must_use]
    pub fn is_purchasable(self) -> bool {
        matches!(self, TileKind::Property | TileKind::Railroad | TileKind::Utility)
    }
}

/// Color groups of the street properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorGroup {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
}

impl ColorGroup {
    pub const ALL: [ColorGroup; 8] = [
        ColorGroup::Brown,
        ColorGroup::LightBlue,
        ColorGroup::Pink,
        ColorGroup::Orange,
        ColorGroup::Red,
        ColorGroup::Yellow,
        ColorGroup::Green,
        ColorGroup::DarkBlue,
    ];

    /// Board positions of every property in the group.
    #[must_use]
    pub fn positions(self) -> &'static [u8] {
        match self {
            ColorGroup::Brown => &[1, 3],
            ColorGroup::LightBlue => &[6, 8, 9],
            ColorGroup::Pink => &[11, 13, 14],
            ColorGroup::Orange => &[16, 18, 19],
            ColorGroup::Red => &[21, 23, 24],
            ColorGroup::Yellow => &[26, 27, 29],
            ColorGroup::Green => &[31, 32, 34],
            ColorGroup::DarkBlue => &[37, 39],
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ColorGroup::Brown => "brown",
            ColorGroup::LightBlue => "light_blue",
            ColorGroup::Pink => "pink",
            ColorGroup::Orange => "orange",
            ColorGroup::Red => "red",
            ColorGroup::Yellow => "yellow",
            ColorGroup::Green => "green",
            ColorGroup::DarkBlue => "dark_blue",
        }
    }
}

/// One board square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub position: u8,
    pub name: &'static str,
    pub kind: TileKind,
    /// Purchase price; 0 for tiles that cannot be owned.
    pub price: i64,
    pub mortgage_value: i64,
    pub house_cost: i64,
    pub color: Option<ColorGroup>,
    /// Rent by house count (index 5 is a hotel). Streets only.
    pub rent: [i64; 6],
    /// Amount charged by a tax tile.
    pub tax: i64,
}

impl Tile {
    const fn special(position: u8, name: &'static str, kind: TileKind) -> Self {
        Self {
            position,
            name,
            kind,
            price: 0,
            mortgage_value: 0,
            house_cost: 0,
            color: None,
            rent: [0; 6],
            tax: 0,
        }
    }

    const fn tax(position: u8, name: &'static str, amount: i64) -> Self {
        let mut tile = Self::special(position, name, TileKind::Tax);
        tile.tax = amount;
        tile
    }

    const fn street(
        position: u8,
        name: &'static str,
        price: i64,
        color: ColorGroup,
        house_cost: i64,
        rent: [i64; 6],
    ) -> Self {
        Self {
            position,
            name,
            kind: TileKind::Property,
            price,
            mortgage_value: price / 2,
            house_cost,
            color: Some(color),
            rent,
            tax: 0,
        }
    }

    const fn railroad(position: u8, name: &'static str) -> Self {
        let mut tile = Self::special(position, name, TileKind::Railroad);
        tile.price = 200;
        tile.mortgage_value = 100;
        tile
    }

    const fn utility(position: u8, name: &'static str) -> Self {
        let mut tile = Self::special(position, name, TileKind::Utility);
        tile.price = 150;
        tile.mortgage_value = 75;
        tile
    }

    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.kind.is_purchasable()
    }
}

use ColorGroup::*;
use TileKind::*;

/// The board, indexed by position.
pub static BOARD: [Tile; BOARD_SIZE as usize] = [
    Tile::special(0, "GO", Go),
    Tile::street(1, "Mediterranean Avenue", 60, Brown, 50, [2, 10, 30, 90, 160, 250]),
    Tile::special(2, "Community Chest", CommunityChest),
    Tile::street(3, "Baltic Avenue", 60, Brown, 50, [4, 20, 60, 180, 320, 450]),
    Tile::tax(4, "Income Tax", 200),
    Tile::railroad(5, "Reading Railroad"),
    Tile::street(6, "Oriental Avenue", 100, LightBlue, 50, [6, 30, 90, 270, 400, 550]),
    Tile::special(7, "Chance", Chance),
    Tile::street(8, "Vermont Avenue", 100, LightBlue, 50, [6, 30, 90, 270, 400, 550]),
    Tile::street(9, "Connecticut Avenue", 120, LightBlue, 50, [8, 40, 100, 300, 450, 600]),
    Tile::special(10, "Jail / Just Visiting", Jail),
    Tile::street(11, "St. Charles Place", 140, Pink, 100, [10, 50, 150, 450, 625, 750]),
    Tile::utility(12, "Electric Company"),
    Tile::street(13, "States Avenue", 140, Pink, 100, [10, 50, 150, 450, 625, 750]),
    Tile::street(14, "Virginia Avenue", 160, Pink, 100, [12, 60, 180, 500, 700, 900]),
    Tile::railroad(15, "Pennsylvania Railroad"),
    Tile::street(16, "St. James Place", 180, Orange, 100, [14, 70, 200, 550, 750, 950]),
    Tile::special(17, "Community Chest", CommunityChest),
    Tile::street(18, "Tennessee Avenue", 180, Orange, 100, [14, 70, 200, 550, 750, 950]),
    Tile::street(19, "New York Avenue", 200, Orange, 100, [16, 80, 220, 600, 800, 1000]),
    Tile::special(20, "Free Parking", FreeParking),
    Tile::street(21, "Kentucky Avenue", 220, Red, 150, [18, 90, 250, 700, 875, 1050]),
    Tile::special(22, "Chance", Chance),
    Tile::street(23, "Indiana Avenue", 220, Red, 150, [18, 90, 250, 700, 875, 1050]),
    Tile::street(24, "Illinois Avenue", 240, Red, 150, [20, 100, 300, 750, 925, 1100]),
    Tile::railroad(25, "B&O Railroad"),
    Tile::street(26, "Atlantic Avenue", 260, Yellow, 150, [22, 110, 330, 800, 975, 1150]),
    Tile::street(27, "Ventnor Avenue", 260, Yellow, 150, [22, 110, 330, 800, 975, 1150]),
    Tile::utility(28, "Water Works"),
    Tile::street(29, "Marvin Gardens", 280, Yellow, 150, [24, 120, 360, 850, 1025, 1200]),
    Tile::special(30, "Go To Jail", GoToJail),
    Tile::street(31, "Pacific Avenue", 300, Green, 200, [26, 130, 390, 900, 1100, 1275]),
    Tile::street(32, "North Carolina Avenue", 300, Green, 200, [26, 130, 390, 900, 1100, 1275]),
    Tile::special(33, "Community Chest", CommunityChest),
    Tile::street(34, "Pennsylvania Avenue", 320, Green, 200, [28, 150, 450, 1000, 1200, 1400]),
    Tile::railroad(35, "Short Line Railroad"),
    Tile::special(36, "Chance", Chance),
    Tile::street(37, "Park Place", 350, DarkBlue, 200, [35, 175, 500, 1100, 1300, 1500]),
    Tile::tax(38, "Luxury Tax", 100),
    Tile::street(39, "Boardwalk", 400, DarkBlue, 200, [50, 200, 600, 1400, 1700, 2000]),
];

/// Position of the jail tile.
pub const JAIL_POSITION: u8 = 10;

/// Look up a tile. Positions wrap, so the lookup is total.
#[must_use]
pub fn tile(position: u8) -> &'static Tile {
    &BOARD[(position % BOARD_SIZE) as usize]
}

/// Positions of every tile that can be owned.
pub fn purchasable_positions() -> impl Iterator<Item = u8> {
    BOARD.iter().filter(|t| t.is_purchasable()).map(|t| t.position)
}

/// Positions of every tile of `kind`.
pub fn positions_of(kind: TileKind) -> impl Iterator<Item = u8> {
    BOARD.iter().filter(move |t| t.kind == kind).map(|t| t.position)
}
