//! Game rules.
//!
//! `RulesEngine` is the dispatcher contract; `MonopolyRules` implements it
//! for the classic board. The rule families are split by concern:
//! - `economy`: rent, purchases, building, mortgages, bankruptcy
//! - `landing`: movement, tile effects, cards
//! - `jail`: entering and leaving jail
//!
//! Sessions call into `RulesEngine` and never mutate `GameState` directly.

pub mod economy;
pub mod engine;
pub mod jail;
pub mod landing;
pub mod monopoly;
pub mod outcome;

pub use economy::{Creditor, Settlement};
pub use engine::{GameResult, RulesEngine};
pub use jail::JailRoll;
pub use landing::Resolution;
pub use monopoly::MonopolyRules;
pub use outcome::ActionOutcome;
