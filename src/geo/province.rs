//! Provinces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a province; an index into the map's province arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProvinceId(pub(crate) u16);

impl ProvinceId {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// A region of the map. Immutable for the duration of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub id: ProvinceId,
    /// Unique full name; the primary identifier in order text.
    pub name: String,
    /// Three-letter abbreviation.
    pub short: String,
    pub supply_center: bool,
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}
