//! The Retreats-phase resolver: legal destinations and bounces between
//! retreating units.

use crate::geo::Map;
use crate::order::{Retreat, RetreatAction, RetreatOrders};

/// Iterates until every retreat has decided both its legality and whether
/// the unit disbands. Retreats only wait on each other, so a stalled sweep
/// means every remaining order is symmetric-bounced; those cannot occur
/// because a legal flag is always decidable, but the loop is bounded
/// regardless.
pub fn resolve(map: &Map, orders: &mut RetreatOrders) {
    loop {
        let before = orders.unresolved_count();
        if before == 0 {
            return;
        }
        for index in 0..orders.len() {
            if orders.get(index).resolved() {
                continue;
            }
            let mut retreat = orders.get(index).clone();
            resolve_one(&mut retreat, map, orders);
            orders.set(index, retreat);
        }
        let after = orders.unresolved_count();
        if after == 0 || after == before {
            return;
        }
    }
}

fn resolve_one(retreat: &mut Retreat, map: &Map, orders: &RetreatOrders) {
    let (target, target_province) = match retreat.action {
        // Disband orders are immediate.
        RetreatAction::Disband => {
            retreat.legal.set(true);
            retreat.disbands.set(true);
            return;
        }
        RetreatAction::Move {
            target,
            target_province,
        } => (target, target_province),
    };

    if !retreat.legal.is_true()
        && (retreat.forbidden.contains(&target_province) || !retreat.unit.reaches(map, target))
    {
        retreat.legal.set(false);
        retreat.disbands.set(true);
        return;
    }
    retreat.legal.set(true);

    // The retreat succeeds only if every other retreat to the same
    // province is illegal; one other legal retreat means a bounce, and
    // bounced retreats disband.
    let legals: Vec<Option<bool>> = orders
        .iter()
        .filter(|other| other.unit.id != retreat.unit.id)
        .filter_map(|other| match other.action {
            RetreatAction::Move {
                target_province: other_target,
                ..
            } if other_target == target_province => Some(other.legal.get()),
            _ => None,
        })
        .collect();

    if legals.iter().any(|l| *l == Some(true)) {
        retreat.disbands.set(true);
    } else if legals.iter().all(|l| l.is_some()) {
        retreat.disbands.set(false);
    }
    // Otherwise some competitor's legality is still open.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LocationRef;
    use crate::unit::{Unit, UnitId};
    use crate::variant::classic;
    use std::collections::BTreeSet;

    fn retreat_for(id: u32, power: &str, province: &str) -> Retreat {
        let variant = classic();
        let map = variant.map();
        let force = map.force_id("Army").unwrap();
        let location = map
            .locate(force, LocationRef::Named(province), None, None, false)
            .unwrap()
            .unwrap();
        let unit = Unit::new(
            UnitId(id),
            variant.power_named(power).unwrap(),
            force,
            location,
        );
        Retreat::new(id, unit, map.location(location).province, BTreeSet::new())
    }

    fn move_action(force_province: &str, target: &str) -> RetreatAction {
        let map = classic().map();
        let force = map.force_id("Army").unwrap();
        let origin = map
            .locate(force, LocationRef::Named(force_province), None, None, false)
            .unwrap()
            .unwrap();
        let target = map
            .locate(force, LocationRef::Named(target), Some(origin), None, false)
            .unwrap()
            .unwrap();
        RetreatAction::Move {
            target,
            target_province: map.location(target).province,
        }
    }

    #[test]
    fn default_disband_resolves_immediately() {
        let map = classic().map();
        let mut orders = RetreatOrders::from_retreats(vec![retreat_for(1, "Austria", "Vienna")]);
        resolve(map, &mut orders);
        let retreat = orders.iter().next().unwrap();
        assert!(retreat.legal.is_true());
        assert!(retreat.disbands.is_true());
    }

    #[test]
    fn competing_retreats_to_the_same_province_both_disband() {
        let map = classic().map();
        let mut vie = retreat_for(1, "Austria", "Vienna");
        vie.set_action(move_action("Vienna", "Bohemia"));
        let mut mun = retreat_for(2, "Germany", "Munich");
        mun.set_action(move_action("Munich", "Bohemia"));
        let mut orders = RetreatOrders::from_retreats(vec![vie, mun]);
        resolve(map, &mut orders);
        for retreat in orders.iter() {
            assert!(retreat.legal.is_true());
            assert!(retreat.disbands.is_true());
        }
    }

    #[test]
    fn forbidden_target_disbands_and_unblocks_competitor() {
        let map = classic().map();
        let mut vie = retreat_for(1, "Austria", "Vienna");
        vie.set_action(move_action("Vienna", "Bohemia"));
        let mut mun = retreat_for(2, "Germany", "Munich");
        mun.set_action(move_action("Munich", "Bohemia"));
        mun.forbidden
            .insert(map.province_named("Bohemia").unwrap().id);

        let mut orders = RetreatOrders::from_retreats(vec![vie, mun]);
        resolve(map, &mut orders);

        let vie = orders
            .order_in(map.province_named("Vienna").unwrap().id)
            .unwrap();
        assert!(vie.disbands.is_false());
        let mun = orders
            .order_in(map.province_named("Munich").unwrap().id)
            .unwrap();
        assert!(mun.legal.is_false() && mun.disbands.is_true());
    }
}
