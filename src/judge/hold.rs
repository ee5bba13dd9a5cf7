//! Resolution of hold orders. A hold is always valid; only its hold
//! strength takes time to pin down.

use crate::judge::compute_hold_strength;
use crate::order::{DiplomacyOrders, HoldOrder, OrderStatus};

impl HoldOrder {
    pub(crate) fn resolve(&mut self, orders: &DiplomacyOrders) {
        self.bounds.raise_min_status(OrderStatus::Valid);
        compute_hold_strength(&mut self.bounds, self.province, orders);
    }
}
