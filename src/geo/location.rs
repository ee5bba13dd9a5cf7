//! Locations.

use crate::geo::{ForceId, GeographyId, Map, ProvinceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a location; an index into the map's location arena.
/// Invariant: the location at index `k` has id `k`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LocationId(pub(crate) u16);

impl LocationId {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// A (province, geography) pair: a place where a unit of one specific
/// force can stand. Adjacency is recorded per location, not per province,
/// because coastal provinces have multiple locations with distinct
/// neighborhoods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    /// Province name plus an optional coast specifier; not necessarily
    /// unique across forces.
    pub name: String,
    pub province: ProvinceId,
    pub geography: GeographyId,
    pub force: ForceId,
    pub connections: Vec<LocationId>,
}

impl Location {
    /// Whether this location is adjacent to the given location.
    pub fn reaches_location(&self, location: LocationId) -> bool {
        self.connections.contains(&location)
    }

    /// Whether this location is adjacent to any location of the given
    /// province.
    pub fn reaches_province(&self, map: &Map, province: ProvinceId) -> bool {
        self.connections
            .iter()
            .any(|&id| map.location(id).province == province)
    }

    /// Whether this location answers to the given name, either as its own
    /// name or as its province's name.
    pub fn named(&self, map: &Map, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || map.province(self.province).name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}
