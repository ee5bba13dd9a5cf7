//! The model for orders issued to units, together with the resolution
//! state each order carries while the fixed point is being computed.

use crate::geo::{LocationId, Map, ProvinceId};
use crate::unit::Unit;
use from_variants::FromVariants;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

mod adjustment;
mod collection;
mod retreat;
mod status;

pub use self::adjustment::{AdjustmentOrder, Build, Disband};
pub use self::collection::{BuildOrders, DiplomacyOrders, RetreatOrders};
pub use self::retreat::{Retreat, RetreatAction};
pub use self::status::{Bounds, Flag, MoveStrength, OrderStatus};

/// The kinds of order the adjudicator understands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum OrderKind {
    Hold,
    Move,
    Support,
    Convoy,
    Retreat,
    Build,
    Disband,
}

impl OrderKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "hold" => OrderKind::Hold,
            "move" => OrderKind::Move,
            "support" => OrderKind::Support,
            "convoy" => OrderKind::Convoy,
            "retreat" => OrderKind::Retreat,
            "build" => OrderKind::Build,
            "disband" => OrderKind::Disband,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            OrderKind::Hold => "Hold",
            OrderKind::Move => "Move",
            OrderKind::Support => "Support",
            OrderKind::Convoy => "Convoy",
            OrderKind::Retreat => "Retreat",
            OrderKind::Build => "Build",
            OrderKind::Disband => "Disband",
        }
    }

    /// Sort key for fixed-point iteration. Orders whose resolution tends
    /// to unblock others come first; correctness does not depend on this,
    /// only speed.
    pub(crate) fn relevance(self) -> u8 {
        match self {
            OrderKind::Convoy => 0,
            OrderKind::Move => 1,
            OrderKind::Support => 2,
            _ => 3,
        }
    }
}

/// A hold: the unit remains in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldOrder {
    pub unit: Unit,
    pub province: ProvinceId,
    pub bounds: Bounds,
}

impl HoldOrder {
    pub fn new(unit: Unit, province: ProvinceId, max_hold: u8) -> Self {
        HoldOrder {
            unit,
            province,
            bounds: Bounds::new(max_hold),
        }
    }

    pub fn resolved(&self) -> bool {
        self.bounds.status_resolved() && self.bounds.hold_resolved()
    }
}

/// A move: the unit attempts to change location, directly or via convoy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOrder {
    pub unit: Unit,
    pub province: ProvinceId,
    pub target: LocationId,
    pub target_province: ProvinceId,
    pub convoy: bool,
    pub bounds: Bounds,
    pub min_move: MoveStrength,
    pub max_move: MoveStrength,
    /// Whether the move cuts a support in its target province.
    pub cutting: Flag,
    /// Whether the move dislodges the unit in its target province.
    pub dislodging: Flag,
    /// Whether the move fails to take place.
    pub failed: Flag,
}

impl MoveOrder {
    pub fn new(
        unit: Unit,
        province: ProvinceId,
        target: LocationId,
        target_province: ProvinceId,
        convoy: bool,
        max_strength: u8,
    ) -> Self {
        // A moving unit defends with strength exactly 1; supports to hold
        // cannot legally assist it.
        let bounds = Bounds::new(1);
        MoveOrder {
            unit,
            province,
            target,
            target_province,
            convoy,
            bounds,
            min_move: MoveStrength::new(1),
            max_move: MoveStrength::new(max_strength),
            cutting: Flag::default(),
            dislodging: Flag::default(),
            failed: Flag::default(),
        }
    }

    /// Whether the move will take place.
    pub fn moves(&self) -> bool {
        self.bounds.min_status() == OrderStatus::Valid && self.failed.is_false()
    }

    pub fn strengths_resolved(&self) -> bool {
        self.min_move == self.max_move
    }

    pub fn resolved(&self) -> bool {
        self.bounds.status_resolved()
            && self.strengths_resolved()
            && self.cutting.decided()
            && self.dislodging.decided()
            && self.failed.decided()
    }

    /// Closes out a move that cannot be carried out at all.
    pub(crate) fn set_illegal(&mut self) {
        self.bounds.lower_max_status(OrderStatus::Illegal);
        self.cutting.set(false);
        self.dislodging.set(false);
        self.failed.set(true);
        let min = self.min_move.clone();
        self.max_move.collapse_to(&min);
    }
}

/// The order a support aids: holding a unit in place, or helping it move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportedOrder {
    Hold {
        unit: Unit,
        province: ProvinceId,
    },
    Move {
        unit: Unit,
        province: ProvinceId,
        target: LocationId,
        target_province: ProvinceId,
    },
}

impl SupportedOrder {
    pub fn unit(&self) -> &Unit {
        match self {
            SupportedOrder::Hold { unit, .. } | SupportedOrder::Move { unit, .. } => unit,
        }
    }

    pub fn province(&self) -> ProvinceId {
        match self {
            SupportedOrder::Hold { province, .. } | SupportedOrder::Move { province, .. } => {
                *province
            }
        }
    }
}

/// A support: the unit remains in place and aids another order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportOrder {
    pub unit: Unit,
    pub province: ProvinceId,
    pub object: SupportedOrder,
    pub bounds: Bounds,
}

impl SupportOrder {
    pub fn new(unit: Unit, province: ProvinceId, object: SupportedOrder, max_hold: u8) -> Self {
        SupportOrder {
            unit,
            province,
            object,
            bounds: Bounds::new(max_hold),
        }
    }

    pub fn resolved(&self) -> bool {
        self.bounds.status_resolved() && self.bounds.hold_resolved()
    }

    /// Whether this support aids a move into the given province.
    pub fn supports_move_on(&self, province: ProvinceId) -> bool {
        matches!(
            self.object,
            SupportedOrder::Move { target_province, .. } if target_province == province
        )
    }
}

/// The army move a convoying fleet is trying to carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvoyedMove {
    pub unit: Unit,
    pub province: ProvinceId,
    pub target: LocationId,
    pub target_province: ProvinceId,
}

/// A convoy: the fleet remains in place and carries an army across water.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvoyOrder {
    pub unit: Unit,
    pub province: ProvinceId,
    pub object: ConvoyedMove,
    pub bounds: Bounds,
}

impl ConvoyOrder {
    pub fn new(unit: Unit, province: ProvinceId, object: ConvoyedMove, max_hold: u8) -> Self {
        ConvoyOrder {
            unit,
            province,
            object,
            bounds: Bounds::new(max_hold),
        }
    }

    pub fn resolved(&self) -> bool {
        self.bounds.status_resolved() && self.bounds.hold_resolved()
    }
}

/// An order issued during a Diplomacy phase, with its resolution state.
#[derive(Debug, Clone, PartialEq, Eq, FromVariants, Serialize, Deserialize)]
pub enum Order {
    Hold(HoldOrder),
    Move(MoveOrder),
    Support(SupportOrder),
    Convoy(ConvoyOrder),
}

impl Order {
    pub fn kind(&self) -> OrderKind {
        match self {
            Order::Hold(_) => OrderKind::Hold,
            Order::Move(_) => OrderKind::Move,
            Order::Support(_) => OrderKind::Support,
            Order::Convoy(_) => OrderKind::Convoy,
        }
    }

    pub fn unit(&self) -> &Unit {
        match self {
            Order::Hold(o) => &o.unit,
            Order::Move(o) => &o.unit,
            Order::Support(o) => &o.unit,
            Order::Convoy(o) => &o.unit,
        }
    }

    /// The province of the ordered unit at the start of the phase.
    pub fn province(&self) -> ProvinceId {
        match self {
            Order::Hold(o) => o.province,
            Order::Move(o) => o.province,
            Order::Support(o) => o.province,
            Order::Convoy(o) => o.province,
        }
    }

    pub fn bounds(&self) -> &Bounds {
        match self {
            Order::Hold(o) => &o.bounds,
            Order::Move(o) => &o.bounds,
            Order::Support(o) => &o.bounds,
            Order::Convoy(o) => &o.bounds,
        }
    }

    pub fn bounds_mut(&mut self) -> &mut Bounds {
        match self {
            Order::Hold(o) => &mut o.bounds,
            Order::Move(o) => &mut o.bounds,
            Order::Support(o) => &mut o.bounds,
            Order::Convoy(o) => &mut o.bounds,
        }
    }

    pub fn resolved(&self) -> bool {
        match self {
            Order::Hold(o) => o.resolved(),
            Order::Move(o) => o.resolved(),
            Order::Support(o) => o.resolved(),
            Order::Convoy(o) => o.resolved(),
        }
    }

    /// Whether the order is a successful move.
    pub fn moves(&self) -> bool {
        match self {
            Order::Move(o) => o.moves(),
            _ => false,
        }
    }

    pub fn as_move(&self) -> Option<&MoveOrder> {
        match self {
            Order::Move(o) => Some(o),
            _ => None,
        }
    }

    /// The provinces this resolved order blocks against retreats: where
    /// the unit ends up, plus the site of any standoff it took part in.
    pub fn blocks(&self, out: &mut BTreeSet<ProvinceId>) {
        match self {
            Order::Move(m) => {
                if m.bounds.max_status() < OrderStatus::Valid {
                    out.insert(m.province);
                } else if m.failed.is_false() {
                    out.insert(m.target_province);
                } else {
                    out.insert(m.province);
                    out.insert(m.target_province);
                }
            }
            _ => {
                out.insert(self.province());
            }
        }
    }

    /// Canonical textual form, resolvable against the given map.
    pub fn display<'a>(&'a self, map: &'a Map) -> OrderDisplay<'a> {
        OrderDisplay { order: self, map }
    }
}

/// Adapter rendering an order in the canonical order grammar, with a
/// resolution suffix once the outcome is known. The suffix is parseable
/// noise on replay: the parser ignores words it does not recognize.
pub struct OrderDisplay<'a> {
    order: &'a Order,
    map: &'a Map,
}

impl OrderDisplay<'_> {
    fn outcome(&self) -> Option<bool> {
        match self.order {
            Order::Hold(_) => None,
            Order::Move(o) => o.failed.get().map(|failed| !failed),
            Order::Support(o) if o.bounds.status_resolved() => {
                Some(o.bounds.min_status() == OrderStatus::Valid)
            }
            Order::Convoy(o) if o.bounds.status_resolved() => {
                Some(o.bounds.min_status() == OrderStatus::Valid)
            }
            _ => None,
        }
    }
}

impl fmt::Display for OrderDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let map = self.map;
        let force = |unit: &Unit| map.force(unit.force).name[..1].to_uppercase();
        let province = |id: ProvinceId| &map.province(id).name;
        let location = |id: LocationId| &map.location(id).name;

        match self.order {
            Order::Hold(o) => {
                write!(f, "{} {} H", force(&o.unit), province(o.province))?;
            }
            Order::Move(o) => {
                write!(
                    f,
                    "{} {} - {}",
                    force(&o.unit),
                    province(o.province),
                    location(o.target)
                )?;
                if o.convoy {
                    write!(f, " via Convoy")?;
                }
            }
            Order::Support(o) => match &o.object {
                SupportedOrder::Hold { unit, province: p } => write!(
                    f,
                    "{} {} S {} {} H",
                    force(&o.unit),
                    province(o.province),
                    force(unit),
                    province(*p)
                )?,
                SupportedOrder::Move {
                    unit,
                    province: p,
                    target,
                    ..
                } => write!(
                    f,
                    "{} {} S {} {} - {}",
                    force(&o.unit),
                    province(o.province),
                    force(unit),
                    province(*p),
                    location(*target)
                )?,
            },
            Order::Convoy(o) => write!(
                f,
                "{} {} C {} {} - {}",
                force(&o.unit),
                province(o.province),
                force(&o.object.unit),
                province(o.object.province),
                location(o.object.target)
            )?,
        }

        match self.outcome() {
            Some(true) => write!(f, " (succeeds)"),
            Some(false) => write!(f, " (fails)"),
            None => Ok(()),
        }
    }
}
