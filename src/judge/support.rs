//! Resolution of support orders: legality of the supported object, and
//! whether the support is cut by an attack.

use crate::geo::{Map, ProvinceId};
use crate::judge::compute_hold_strength;
use crate::order::{DiplomacyOrders, Order, OrderStatus, SupportOrder, SupportedOrder};

impl SupportOrder {
    /// One tightening step for a support order.
    pub(crate) fn resolve(&mut self, map: &Map, orders: &DiplomacyOrders) {
        compute_hold_strength(&mut self.bounds, self.province, orders);

        if self.bounds.min_status() == OrderStatus::Illegal {
            self.legalize(map, orders);
        }
        if self.bounds.min_status() > OrderStatus::Illegal {
            self.resolve_attacked(orders);
            self.resolve_left_alone(orders);
        }
    }

    /// Legality. A support-to-hold requires the supported unit to stay and
    /// the supporter to reach its province; a support-to-move requires the
    /// supported unit to actually move and the supporter to reach the
    /// move's target province. A legal support starts out as merely cut.
    fn legalize(&mut self, map: &Map, orders: &DiplomacyOrders) {
        let relevant = match orders.order_of(self.object.unit().id) {
            Some(order) => order,
            None => {
                self.bounds.lower_max_status(OrderStatus::Illegal);
                return;
            }
        };

        let reached: Vec<ProvinceId> = map
            .location(self.unit.location)
            .connections
            .iter()
            .map(|&id| map.location(id).province)
            .collect();

        let legal = match &self.object {
            SupportedOrder::Hold { .. } => {
                relevant.as_move().is_none() && reached.contains(&relevant.province())
            }
            SupportedOrder::Move { .. } => match relevant.as_move() {
                Some(m) => reached.contains(&m.target_province),
                None => false,
            },
        };

        if legal {
            self.bounds.raise_min_status(OrderStatus::Cut);
        } else {
            self.bounds.lower_max_status(OrderStatus::Illegal);
        }
    }

    /// A foreign move that definitely cuts into this province caps the
    /// support at cut.
    fn resolve_attacked(&mut self, orders: &DiplomacyOrders) {
        let attacked = orders.iter().any(|order| match order {
            Order::Move(m) => {
                m.cutting.is_true()
                    && m.unit.owner != self.unit.owner
                    && m.target_province == self.province
            }
            _ => false,
        });
        if attacked {
            self.bounds.lower_max_status(OrderStatus::Cut);
        }
    }

    /// With no foreign move still possibly cutting into this province, the
    /// support is valid.
    fn resolve_left_alone(&mut self, orders: &DiplomacyOrders) {
        let threatened = orders.iter().any(|order| match order {
            Order::Move(m) => {
                !m.cutting.is_false()
                    && m.unit.owner != self.unit.owner
                    && m.target_province == self.province
            }
            _ => false,
        });
        if !threatened {
            self.bounds.raise_min_status(OrderStatus::Valid);
        }
    }
}
