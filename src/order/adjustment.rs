//! Build-phase adjustment orders.
//!
//! Invalid adjustment submissions are never errors: an unusable build is
//! postponed in place and an unusable disband falls back to a
//! deterministic default selection during resolution.

use crate::geo::{ForceId, LocationId, Map, ProvinceId};
use crate::power::PowerId;
use crate::unit::Unit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An order to add a new unit at one of the owner's home centers. A build
/// with no force or location is postponed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub id: u32,
    pub owner: PowerId,
    pub force: Option<ForceId>,
    pub location: Option<LocationId>,
    pub resolved: bool,
}

impl Build {
    pub fn new(id: u32, owner: PowerId) -> Self {
        Build {
            id,
            owner,
            force: None,
            location: None,
            resolved: false,
        }
    }

    pub fn set_target(&mut self, force: ForceId, location: LocationId) {
        self.force = Some(force);
        self.location = Some(location);
    }

    pub fn postpone(&mut self) {
        self.force = None;
        self.location = None;
    }

    pub fn province(&self, map: &Map) -> Option<ProvinceId> {
        self.location.map(|l| map.location(l).province)
    }
}

/// An order to remove one of the owner's units. A disband with no unit is
/// assigned one during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disband {
    pub id: u32,
    pub owner: PowerId,
    pub unit: Option<Unit>,
    pub resolved: bool,
}

impl Disband {
    pub fn new(id: u32, owner: PowerId) -> Self {
        Disband {
            id,
            owner,
            unit: None,
            resolved: false,
        }
    }

    pub fn postpone(&mut self) {
        self.unit = None;
    }
}

/// A numbered adjustment slot belonging to a power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustmentOrder {
    Build(Build),
    Disband(Disband),
}

impl AdjustmentOrder {
    pub fn id(&self) -> u32 {
        match self {
            AdjustmentOrder::Build(b) => b.id,
            AdjustmentOrder::Disband(d) => d.id,
        }
    }

    pub fn owner(&self) -> PowerId {
        match self {
            AdjustmentOrder::Build(b) => b.owner,
            AdjustmentOrder::Disband(d) => d.owner,
        }
    }

    pub fn resolved(&self) -> bool {
        match self {
            AdjustmentOrder::Build(b) => b.resolved,
            AdjustmentOrder::Disband(d) => d.resolved,
        }
    }

    /// Canonical textual form.
    pub fn display<'a>(
        &'a self,
        map: &'a Map,
        power_name: &'a str,
    ) -> AdjustmentDisplay<'a> {
        AdjustmentDisplay {
            order: self,
            map,
            power_name,
        }
    }
}

pub struct AdjustmentDisplay<'a> {
    order: &'a AdjustmentOrder,
    map: &'a Map,
    power_name: &'a str,
}

impl fmt::Display for AdjustmentDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.order {
            AdjustmentOrder::Build(b) => match (b.force, b.location) {
                (Some(force), Some(location)) => write!(
                    f,
                    "{} B {} {} {}",
                    self.power_name,
                    b.id,
                    &self.map.force(force).name[..1],
                    self.map.location(location).name
                ),
                _ => write!(f, "{} B {} postpone", self.power_name, b.id),
            },
            AdjustmentOrder::Disband(d) => match d.unit {
                Some(unit) => write!(
                    f,
                    "{} D {} {}",
                    self.power_name,
                    d.id,
                    self.map.province(self.map.location(unit.location).province).name
                ),
                _ => write!(f, "{} D {} postpone", self.power_name, d.id),
            },
        }
    }
}
