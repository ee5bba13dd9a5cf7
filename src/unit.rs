//! Playing pieces.

use crate::geo::{ForceId, LocationId, Map, ProvinceId};
use crate::power::PowerId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Identifier of a unit, monotonic over the game's lifetime. Units removed
/// from the board never have their ids reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UnitId(pub(crate) u32);

/// A playing piece. Units compare by identity, not by attributes: two
/// fleets of the same power in the same place are still different units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub owner: PowerId,
    pub force: ForceId,
    pub location: LocationId,
}

impl Unit {
    pub fn new(id: UnitId, owner: PowerId, force: ForceId, location: LocationId) -> Self {
        Unit {
            id,
            owner,
            force,
            location,
        }
    }

    /// The province of the unit's current location.
    pub fn province(&self, map: &Map) -> ProvinceId {
        map.location(self.location).province
    }

    /// Whether the unit's location is adjacent to the given location.
    pub fn reaches(&self, map: &Map, target: LocationId) -> bool {
        map.location(self.location).reaches_location(target)
    }

    /// The key by which units (and their orders) sort canonically.
    pub fn sort_key(&self) -> (PowerId, UnitId) {
        (self.owner, self.id)
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
