//! Resolution of convoy orders: legality of the carried move, and whether
//! the convoying fleet is dislodged.

use crate::geo::Map;
use crate::judge::compute_hold_strength;
use crate::order::{ConvoyOrder, DiplomacyOrders, OrderKind, OrderStatus};

impl ConvoyOrder {
    /// One tightening step for a convoy order.
    pub(crate) fn resolve(&mut self, map: &Map, orders: &DiplomacyOrders) {
        compute_hold_strength(&mut self.bounds, self.province, orders);

        if self.bounds.min_status() == OrderStatus::Illegal {
            self.legalize(map, orders);
        }
        if self.bounds.min_status() > OrderStatus::Illegal
            && self.bounds.min_status() < OrderStatus::Valid
        {
            match self.dislodged(orders) {
                Some(true) => self.bounds.lower_max_status(OrderStatus::Broken),
                Some(false) => self.bounds.raise_min_status(OrderStatus::Valid),
                None => {}
            }
        }
    }

    /// A convoy is legal only if the unit it names is a convoyable force
    /// actually ordered to move to the convoy's declared target. A legal
    /// convoy starts out as merely broken.
    fn legalize(&mut self, map: &Map, orders: &DiplomacyOrders) {
        let legal = match orders.order_of(self.object.unit.id) {
            Some(convoyed) => {
                map.force(convoyed.unit().force).may_receive(OrderKind::Convoy)
                    && match convoyed.as_move() {
                        Some(m) => m.target == self.object.target,
                        None => false,
                    }
            }
            None => false,
        };
        if legal {
            self.bounds.raise_min_status(OrderStatus::Broken);
        } else {
            self.bounds.lower_max_status(OrderStatus::Illegal);
        }
    }

    /// Whether the fleet is dislodged: some move into its province
    /// succeeds. Undecided while any such move is unresolved.
    fn dislodged(&self, orders: &DiplomacyOrders) -> Option<bool> {
        let results = orders.all_moves_to(self.province);
        if results.iter().any(Option::is_none) {
            return None;
        }
        Some(results.iter().any(|r| *r == Some(false)))
    }
}
