//! The logic that adjudicates each phase.
//!
//! The Diplomacy resolver is a fixed-point computation: every order's
//! `resolve` routine is a pure function of the current bounds of all
//! orders and only ever tightens its own bounds, so the result is
//! invariant under the visiting order. The resolvers here never raise;
//! unresolved leftovers are the sequencer's problem.

mod attack;
pub mod build;
mod convoy;
pub mod diplomacy;
mod hold;
pub mod retreat;
mod support;

use crate::order::{Bounds, DiplomacyOrders, OrderStatus};
use crate::geo::ProvinceId;

/// Tightens the hold-strength bounds of the order standing in `province`
/// from the statuses of the supports aiding it: one plus the certainly
/// valid supports from below, one plus the possibly valid supports from
/// above.
pub(crate) fn compute_hold_strength(
    bounds: &mut Bounds,
    province: ProvinceId,
    orders: &DiplomacyOrders,
) {
    if bounds.hold_resolved() {
        return;
    }
    let mut possible = 0u8;
    let mut known = 0u8;
    for support in orders.supports_of_stay(province) {
        if support.bounds.max_status() == OrderStatus::Valid {
            possible += 1;
        }
        if support.bounds.min_status() == OrderStatus::Valid {
            known += 1;
        }
    }
    bounds.lower_max_hold(1 + possible);
    bounds.raise_min_hold(1 + known);
}
