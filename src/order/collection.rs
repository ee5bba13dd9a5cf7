//! Phase-scoped order containers.
//!
//! A collection is the sole shared structure during resolution: it is
//! never restructured inside a pass, only the orders' own bounds change.

use crate::geo::{Map, ProvinceId};
use crate::order::{
    AdjustmentOrder, Build, ConvoyOrder, Disband, HoldOrder, MoveOrder, Order, Retreat,
    SupportOrder, SupportedOrder,
};
use crate::power::PowerId;
use crate::unit::{Unit, UnitId};
use std::collections::{BTreeMap, BTreeSet};

/// The orders of a Diplomacy phase, one per unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiplomacyOrders {
    orders: Vec<Order>,
    /// Upper bound used to initialize fresh strength and hold ceilings:
    /// one more than the number of units on the board.
    max_strength: u8,
}

impl DiplomacyOrders {
    /// A collection holding one Hold order per unit.
    pub fn new(units: &[Unit], map: &Map) -> Self {
        let max_strength = (units.len() as u8).saturating_add(1);
        DiplomacyOrders {
            orders: units
                .iter()
                .map(|&unit| {
                    Order::Hold(HoldOrder::new(unit, unit.province(map), max_strength))
                })
                .collect(),
            max_strength,
        }
    }

    /// The ceiling used when constructing orders for this phase.
    pub fn max_strength(&self) -> u8 {
        self.max_strength
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// The order of the unit currently in the given province.
    pub fn order_in(&self, province: ProvinceId) -> Option<&Order> {
        self.orders.iter().find(|o| o.province() == province)
    }

    /// The order of the given unit.
    pub fn order_of(&self, unit: UnitId) -> Option<&Order> {
        self.orders.iter().find(|o| o.unit().id == unit)
    }

    /// Installs an order, displacing any previous order of the same unit.
    pub fn replace(&mut self, order: Order) {
        self.remove_unit(order.unit().id);
        self.orders.push(order);
    }

    /// Removes the order belonging to a specific unit.
    pub fn remove_unit(&mut self, unit: UnitId) {
        self.orders.retain(|o| o.unit().id != unit);
    }

    /// The supports aiding a move between the given provinces. Aid is
    /// decided by object equivalence: same source and target province.
    pub fn supports_of_move(
        &self,
        province: ProvinceId,
        target_province: ProvinceId,
    ) -> impl Iterator<Item = &SupportOrder> {
        self.orders.iter().filter_map(move |entry| match entry {
            Order::Support(s)
                if matches!(
                    s.object,
                    SupportedOrder::Move {
                        province: p,
                        target_province: t,
                        ..
                    } if p == province && t == target_province
                ) =>
            {
                Some(s)
            }
            _ => None,
        })
    }

    /// The supports aiding the non-moving order in the given province.
    pub fn supports_of_stay(&self, province: ProvinceId) -> impl Iterator<Item = &SupportOrder> {
        self.orders.iter().filter_map(move |entry| match entry {
            Order::Support(s)
                if matches!(s.object, SupportedOrder::Hold { province: p, .. } if p == province) =>
            {
                Some(s)
            }
            _ => None,
        })
    }

    /// The convoys carrying a move between the given provinces.
    pub fn convoys_of_move(
        &self,
        province: ProvinceId,
        target_province: ProvinceId,
    ) -> impl Iterator<Item = &ConvoyOrder> {
        self.orders.iter().filter_map(move |entry| match entry {
            Order::Convoy(c)
                if c.object.province == province
                    && c.object.target_province == target_province =>
            {
                Some(c)
            }
            _ => None,
        })
    }

    /// The `failed` outcomes of every move into the given province.
    pub fn all_moves_to(&self, province: ProvinceId) -> Vec<Option<bool>> {
        self.orders
            .iter()
            .filter_map(|o| match o {
                Order::Move(m) if m.target_province == province => Some(m.failed.get()),
                _ => None,
            })
            .collect()
    }

    /// The moves into the given province, other than `except`.
    pub fn moves_to<'a>(
        &'a self,
        province: ProvinceId,
        except: &'a MoveOrder,
    ) -> impl Iterator<Item = &'a MoveOrder> {
        self.orders.iter().filter_map(move |o| match o {
            Order::Move(m)
                if m.target_province == province && m.unit.id != except.unit.id =>
            {
                Some(m)
            }
            _ => None,
        })
    }

    /// The provinces no retreat may choose after this phase resolved.
    pub fn blocks(&self) -> BTreeSet<ProvinceId> {
        let mut blocked = BTreeSet::new();
        for order in &self.orders {
            order.blocks(&mut blocked);
        }
        blocked
    }

    pub fn unresolved_count(&self) -> usize {
        self.orders.iter().filter(|o| !o.resolved()).count()
    }

    /// Sorts so that orders whose resolution unblocks others come first.
    pub fn sort_by_relevance(&mut self) {
        self.orders
            .sort_by_key(|o| (o.kind().relevance(), o.unit().sort_key()));
    }

    pub(crate) fn get(&self, index: usize) -> &Order {
        &self.orders[index]
    }

    pub(crate) fn set(&mut self, index: usize, order: Order) {
        self.orders[index] = order;
    }

    pub(crate) fn orders_mut(&mut self) -> &mut Vec<Order> {
        &mut self.orders
    }
}

/// The orders of a Retreats phase, one per dislodged unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetreatOrders {
    orders: Vec<Retreat>,
}

impl RetreatOrders {
    /// Derives the retreat obligations from a resolved Diplomacy phase:
    /// the occupant of every province successfully moved into is dislodged
    /// unless it moved away itself. The dislodger's source province is
    /// additionally forbidden to its victim, except for convoyed attacks.
    pub fn from_diplomacy(diplomacy: &DiplomacyOrders) -> Self {
        let blocked = diplomacy.blocks();
        let mut orders = Vec::new();
        let mut next_id = 1;

        for order in diplomacy.iter() {
            if !order.moves() {
                continue;
            }
            let attack = order.as_move().expect("successful moves are moves");

            let object = match diplomacy.order_in(attack.target_province) {
                Some(object) if !object.moves() => object,
                _ => continue,
            };

            let mut forbidden = blocked.clone();
            if !attack.convoy {
                forbidden.insert(attack.province);
            }

            orders.push(Retreat::new(
                next_id,
                *object.unit(),
                object.province(),
                forbidden,
            ));
            next_id += 1;
        }

        RetreatOrders { orders }
    }

    /// A collection from explicit retreat obligations.
    pub fn from_retreats(orders: Vec<Retreat>) -> Self {
        RetreatOrders { orders }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Retreat> {
        self.orders.iter()
    }

    /// The retreat of the unit dislodged from the given province.
    pub fn order_in(&self, province: ProvinceId) -> Option<&Retreat> {
        self.orders.iter().find(|r| r.province == province)
    }

    pub fn order_in_mut(&mut self, province: ProvinceId) -> Option<&mut Retreat> {
        self.orders.iter_mut().find(|r| r.province == province)
    }

    pub fn unresolved_count(&self) -> usize {
        self.orders.iter().filter(|r| !r.resolved()).count()
    }

    pub(crate) fn get(&self, index: usize) -> &Retreat {
        &self.orders[index]
    }

    pub(crate) fn set(&mut self, index: usize, retreat: Retreat) {
        self.orders[index] = retreat;
    }
}

/// The orders of a Builds phase: per-power build or disband slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOrders {
    orders: Vec<AdjustmentOrder>,
}

impl BuildOrders {
    /// Creates the adjustment slots each power is owed. A power with more
    /// centers than units gets builds, capped by its open home centers; a
    /// power with fewer gets disbands.
    pub fn from_quotas(
        supply_centers: &BTreeMap<PowerId, BTreeSet<ProvinceId>>,
        open_home_centers: &BTreeMap<PowerId, usize>,
        unit_counts: &BTreeMap<PowerId, usize>,
    ) -> Self {
        let mut orders = Vec::new();
        for (&power, centers) in supply_centers {
            let units = unit_counts.get(&power).copied().unwrap_or(0);
            let open = open_home_centers.get(&power).copied().unwrap_or(0);

            if centers.len() > units {
                let count = (centers.len() - units).min(open);
                for id in 1..=count {
                    orders.push(AdjustmentOrder::Build(Build::new(id as u32, power)));
                }
            } else if centers.len() < units {
                for id in 1..=(units - centers.len()) {
                    orders.push(AdjustmentOrder::Disband(Disband::new(id as u32, power)));
                }
            }
        }
        BuildOrders { orders }
    }

    /// A collection from explicit adjustment slots.
    pub fn from_adjustments(orders: Vec<AdjustmentOrder>) -> Self {
        BuildOrders { orders }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdjustmentOrder> {
        self.orders.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AdjustmentOrder> {
        self.orders.iter_mut()
    }

    /// The numbered adjustment slot of a power, as referenced by build and
    /// disband order text.
    pub fn adjustment_order(&self, id: u32, power: PowerId) -> Option<&AdjustmentOrder> {
        self.orders
            .iter()
            .find(|o| o.id() == id && o.owner() == power)
    }

    pub fn adjustment_order_mut(
        &mut self,
        id: u32,
        power: PowerId,
    ) -> Option<&mut AdjustmentOrder> {
        self.orders
            .iter_mut()
            .find(|o| o.id() == id && o.owner() == power)
    }

    pub fn unresolved_count(&self) -> usize {
        self.orders.iter().filter(|o| !o.resolved()).count()
    }
}
