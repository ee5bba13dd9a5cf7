//! The Diplomacy-phase fixed point.
//!
//! Orders are swept repeatedly; each sweep clones an unresolved order,
//! lets it tighten its own bounds against the collection, and writes it
//! back. A sweep that resolves nothing new means the remaining orders are
//! locked in a paradox or a cycle, handled by two explicit fallbacks:
//!
//! * Paradox (Szykman variant): every unresolved convoyed move neither
//!   cuts nor dislodges; its status keeps tightening and ends in failure.
//! * Circular movement: every remaining unresolved move succeeds.
//!
//! One extra sweep after the circular fallback lets orders that depended
//! on the cycle settle.

use crate::geo::Map;
use crate::order::{DiplomacyOrders, Order};
use crate::variant::Variant;
use log::{debug, trace};

/// Runs the fixed point to completion. Any order left unresolved
/// afterwards indicates a bug or a malformed variant; the sequencer turns
/// that into an adjudication error.
pub fn resolve(variant: &Variant, orders: &mut DiplomacyOrders) {
    orders.sort_by_relevance();
    adjacent_convoy_adjustment(variant.map(), orders);

    for pass in 1..=3u8 {
        loop {
            let before = orders.unresolved_count();
            if before == 0 {
                return;
            }
            sweep(variant, orders);
            let after = orders.unresolved_count();
            trace!("resolution sweep: {before} -> {after} unresolved");
            if after == 0 || after == before {
                break;
            }
        }
        if orders.unresolved_count() == 0 {
            return;
        }
        match pass {
            1 => paradox_fallback(orders),
            2 => circular_fallback(orders),
            _ => {}
        }
    }
}

fn sweep(variant: &Variant, orders: &mut DiplomacyOrders) {
    for index in 0..orders.len() {
        if orders.get(index).resolved() {
            continue;
        }
        let mut order = orders.get(index).clone();
        match &mut order {
            Order::Hold(o) => o.resolve(orders),
            Order::Move(o) => o.resolve(variant, orders),
            Order::Support(o) => o.resolve(variant.map(), orders),
            Order::Convoy(o) => o.resolve(variant.map(), orders),
        }
        orders.set(index, order);
    }
}

/// The webDip adjacent-convoy rule, the one deviation from strict DATC: a
/// move ordered via convoy with no convoying fleet adjacent to its source
/// is demoted to a regular move before resolution starts.
fn adjacent_convoy_adjustment(map: &Map, orders: &mut DiplomacyOrders) {
    let demote: Vec<usize> = (0..orders.len())
        .filter(|&index| match orders.get(index) {
            Order::Move(m) if m.convoy => !orders
                .convoys_of_move(m.province, m.target_province)
                .any(|c| map.reaches_province(c.unit.location, m.province)),
            _ => false,
        })
        .collect();

    for index in demote {
        let mut order = orders.get(index).clone();
        if let Order::Move(m) = &mut order {
            debug!(
                "demoting convoyed move without adjacent convoy in province {:?}",
                m.province
            );
            m.convoy = false;
        }
        orders.set(index, order);
    }
}

/// Convoy paradoxes resolve against the convoyed moves: they do not cut
/// support and do not dislodge. Their status bounds stay open for further
/// tightening, which ends with the moves failing.
fn paradox_fallback(orders: &mut DiplomacyOrders) {
    debug!("applying convoy-paradox fallback");
    for order in orders.orders_mut() {
        if let Order::Move(m) = order {
            if !m.resolved() && m.convoy {
                m.cutting.set(false);
                m.dislodging.set(false);
            }
        }
    }
}

/// Circular movement resolves in favor of the cycle: every unresolved
/// move succeeds, cutting and dislodging nothing.
fn circular_fallback(orders: &mut DiplomacyOrders) {
    debug!("applying circular-movement fallback");
    for order in orders.orders_mut() {
        if let Order::Move(m) = order {
            if !m.resolved() {
                m.cutting.set(false);
                m.dislodging.set(false);
                m.failed.set(false);
                let max = m.bounds.max_status();
                m.bounds.raise_min_status(max);
                let min = m.min_move.clone();
                m.max_move.collapse_to(&min);
            }
        }
    }
}
