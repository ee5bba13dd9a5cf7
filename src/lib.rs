//! An adjudicator core for the board game Diplomacy, compatible with the
//! [Diplomacy Adjudicator Test Cases](https://webdiplomacy.net/doc/DATC_v3_0.html).
//!
//! The crate decides order outcomes; it does not generate or rate orders.
//! Resolution is a deterministic fixed-point computation over monotone
//! status and strength bounds, with explicit fallbacks for convoy paradoxes
//! (Szykman variant: paradoxical convoyed moves fail without cutting or
//! dislodging) and circular movement (every move in the cycle succeeds).
//!
//! The one deliberate deviation from strict DATC is the webDip adjacent
//! convoy rule: a move ordered "via convoy" with no convoying fleet
//! adjacent to its source is adjudicated as a regular move.

pub mod error;
pub mod game;
pub mod geo;
pub mod judge;
pub mod order;
pub mod parser;
mod power;
mod season;
mod unit;
pub mod variant;

pub use crate::error::Error;
pub use crate::game::Game;
pub use crate::power::{Power, PowerId};
pub use crate::season::{Phase, Season, SeasonName};
pub use crate::unit::{Unit, UnitId};
pub use crate::variant::Variant;

/// Format trait for short naming of objects in orders.
pub trait ShortName {
    /// This method returns the short display name of the object.
    fn short_name(&self) -> std::borrow::Cow<'_, str>;
}
