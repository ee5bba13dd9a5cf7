//! Player slots.

use crate::geo::ProvinceId;
use crate::ShortName;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identifier of a power; an index into the variant's power arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PowerId(pub(crate) u8);

impl PowerId {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// A player slot: a power can own units and supply centers and is the
/// addressee of adjustment orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Power {
    pub name: String,
    /// The genitive form of the name, used for display ("Austrian").
    pub genitive: String,
    /// The power's home centers; the only provinces where it may build.
    /// Constant for the duration of a game.
    pub home_centers: Vec<ProvinceId>,
}

impl ShortName for Power {
    fn short_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}
