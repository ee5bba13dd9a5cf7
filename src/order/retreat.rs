//! Orders for dislodged units.

use crate::geo::{LocationId, Map, ProvinceId};
use crate::order::Flag;
use crate::unit::Unit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// What a dislodged unit attempts: a move to an allowed location, or a
/// disband. The default is a disband until the player orders otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetreatAction {
    Disband,
    Move {
        target: LocationId,
        target_province: ProvinceId,
    },
}

/// A retreat obligation for a dislodged unit.
///
/// The unit disbands either because it was ordered to, or because its
/// retreat move failed for any reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retreat {
    pub id: u32,
    pub unit: Unit,
    pub province: ProvinceId,
    /// Provinces this unit may not retreat into.
    pub forbidden: BTreeSet<ProvinceId>,
    pub action: RetreatAction,
    /// Whether the given order is legal.
    pub legal: Flag,
    /// Whether the unit will disband.
    pub disbands: Flag,
}

impl Retreat {
    pub fn new(id: u32, unit: Unit, province: ProvinceId, forbidden: BTreeSet<ProvinceId>) -> Self {
        Retreat {
            id,
            unit,
            province,
            forbidden,
            action: RetreatAction::Disband,
            legal: Flag::default(),
            disbands: Flag::default(),
        }
    }

    /// Replaces the action and reopens resolution.
    pub fn set_action(&mut self, action: RetreatAction) {
        self.action = action;
        self.legal = Flag::default();
        self.disbands = Flag::default();
    }

    pub fn resolved(&self) -> bool {
        self.legal.decided() && self.disbands.decided()
    }

    /// Canonical textual form.
    pub fn display<'a>(&'a self, map: &'a Map) -> RetreatDisplay<'a> {
        RetreatDisplay { retreat: self, map }
    }
}

pub struct RetreatDisplay<'a> {
    retreat: &'a Retreat,
    map: &'a Map,
}

impl fmt::Display for RetreatDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let retreat = self.retreat;
        let force = &self.map.force(retreat.unit.force).name[..1];
        let province = &self.map.province(retreat.province).name;
        match retreat.action {
            RetreatAction::Disband => write!(f, "{force} {province} disbands"),
            RetreatAction::Move { target, .. } => {
                write!(
                    f,
                    "{force} {province} R {}",
                    self.map.location(target).name
                )?;
                match retreat.disbands.get() {
                    Some(true) => write!(f, " (fails)"),
                    Some(false) => write!(f, " (succeeds)"),
                    None => Ok(()),
                }
            }
        }
    }
}
