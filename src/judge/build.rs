//! The Builds-phase resolver.
//!
//! Adjustment resolution is not iterative. For each power, builds are
//! paired against its open home centers; a build that pairs with nothing
//! is silently postponed. Disbands that name no usable unit fall back to
//! the power's lowest-id unit not already claimed, so an under-specified
//! submission still removes the owed number of units deterministically.

use crate::geo::{Map, ProvinceId};
use crate::order::{AdjustmentOrder, BuildOrders};
use crate::power::PowerId;
use crate::unit::{Unit, UnitId};
use std::collections::{BTreeMap, BTreeSet};

pub fn resolve(
    orders: &mut BuildOrders,
    map: &Map,
    units: &[Unit],
    supply_centers: &BTreeMap<PowerId, BTreeSet<ProvinceId>>,
    home_centers: &BTreeMap<PowerId, BTreeSet<ProvinceId>>,
) {
    let occupied: BTreeSet<ProvinceId> = units.iter().map(|u| u.province(map)).collect();

    let powers: BTreeSet<PowerId> = orders.iter().map(|o| o.owner()).collect();
    for &power in &powers {
        resolve_builds(orders, map, power, supply_centers, home_centers, &occupied);
        resolve_disbands(orders, power, units);
    }
}

/// Walks the power's open home centers in province-id order, pairing each
/// with the first valid build order that targets it. Unpaired builds are
/// postponed in place.
fn resolve_builds(
    orders: &mut BuildOrders,
    map: &Map,
    power: PowerId,
    supply_centers: &BTreeMap<PowerId, BTreeSet<ProvinceId>>,
    home_centers: &BTreeMap<PowerId, BTreeSet<ProvinceId>>,
    occupied: &BTreeSet<ProvinceId>,
) {
    let owned = supply_centers.get(&power);
    let open: Vec<ProvinceId> = home_centers
        .get(&power)
        .map(|homes| {
            homes
                .iter()
                .copied()
                .filter(|center| {
                    owned.is_some_and(|owned| owned.contains(center))
                        && !occupied.contains(center)
                })
                .collect()
        })
        .unwrap_or_default();

    let mut paired: BTreeSet<u32> = BTreeSet::new();
    for center in open {
        let candidate = orders
            .iter()
            .filter_map(|order| match order {
                AdjustmentOrder::Build(b) if b.owner == power && !paired.contains(&b.id) => {
                    match (b.force, b.location) {
                        (Some(force), Some(location))
                            if map.location(location).province == center
                                && map.location(location).force == force =>
                        {
                            Some(b.id)
                        }
                        _ => None,
                    }
                }
                _ => None,
            })
            .min();
        if let Some(id) = candidate {
            paired.insert(id);
        }
    }

    for order in orders.iter_mut() {
        if let AdjustmentOrder::Build(b) = order {
            if b.owner == power {
                if !paired.contains(&b.id) {
                    b.postpone();
                }
                b.resolved = true;
            }
        }
    }
}

/// Honors explicit disbands in slot order, then fills every unmatched slot
/// with the power's lowest-id unit not already claimed.
fn resolve_disbands(orders: &mut BuildOrders, power: PowerId, units: &[Unit]) {
    let mut slots: Vec<u32> = orders
        .iter()
        .filter_map(|order| match order {
            AdjustmentOrder::Disband(d) if d.owner == power => Some(d.id),
            _ => None,
        })
        .collect();
    slots.sort_unstable();

    let mut claimed: BTreeSet<UnitId> = BTreeSet::new();
    for id in slots {
        let named = match orders.adjustment_order(id, power) {
            Some(AdjustmentOrder::Disband(d)) => d.unit,
            _ => continue,
        };

        let valid = named.filter(|unit| {
            unit.owner == power
                && !claimed.contains(&unit.id)
                && units.iter().any(|u| u.id == unit.id)
        });

        let chosen = valid.or_else(|| {
            units
                .iter()
                .filter(|u| u.owner == power && !claimed.contains(&u.id))
                .min_by_key(|u| u.id)
                .copied()
        });

        if let Some(AdjustmentOrder::Disband(d)) = orders.adjustment_order_mut(id, power) {
            if let Some(unit) = chosen {
                claimed.insert(unit.id);
                d.unit = Some(unit);
            }
            d.resolved = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LocationRef;
    use crate::order::{Build, Disband};
    use crate::variant::classic;

    fn power(name: &str) -> PowerId {
        classic().power_named(name).unwrap()
    }

    fn army_unit(id: u32, owner: &str, province: &str) -> Unit {
        let map = classic().map();
        let force = map.force_id("Army").unwrap();
        let location = map
            .locate(force, LocationRef::Named(province), None, None, false)
            .unwrap()
            .unwrap();
        Unit::new(UnitId(id), power(owner), force, location)
    }

    fn centers(power: PowerId, names: &[&str]) -> BTreeMap<PowerId, BTreeSet<ProvinceId>> {
        let map = classic().map();
        let mut out = BTreeMap::new();
        out.insert(
            power,
            names
                .iter()
                .map(|n| map.province_named(n).unwrap().id)
                .collect(),
        );
        out
    }

    #[test]
    fn build_to_occupied_home_center_is_postponed() {
        let map = classic().map();
        let austria = power("Austria");
        let vienna_unit = army_unit(1, "Austria", "Vienna");
        let force = map.force_id("Army").unwrap();
        let vienna = map
            .locate(force, LocationRef::Named("Vienna"), None, None, false)
            .unwrap()
            .unwrap();

        let mut build = Build::new(1, austria);
        build.set_target(force, vienna);
        let mut orders = BuildOrders::from_adjustments(vec![AdjustmentOrder::Build(build)]);

        let scs = centers(austria, &["Vienna", "Budapest"]);
        let homes = centers(austria, &["Vienna", "Budapest", "Trieste"]);
        resolve(&mut orders, map, &[vienna_unit], &scs, &homes);

        match orders.iter().next().unwrap() {
            AdjustmentOrder::Build(b) => {
                assert!(b.resolved);
                assert!(b.location.is_none(), "occupied home center must postpone");
            }
            _ => unreachable!(),
        };
    }

    #[test]
    fn unnamed_disband_picks_the_lowest_unit_id() {
        let map = classic().map();
        let austria = power("Austria");
        let units = [
            army_unit(7, "Austria", "Vienna"),
            army_unit(3, "Austria", "Budapest"),
        ];
        let mut orders =
            BuildOrders::from_adjustments(vec![AdjustmentOrder::Disband(Disband::new(1, austria))]);

        let scs = centers(austria, &["Vienna"]);
        let homes = centers(austria, &["Vienna"]);
        resolve(&mut orders, map, &units, &scs, &homes);

        match orders.iter().next().unwrap() {
            AdjustmentOrder::Disband(d) => {
                assert_eq!(d.unit.unwrap().id, UnitId(3));
            }
            _ => unreachable!(),
        };
    }

    #[test]
    fn duplicate_disband_targets_fall_back_deterministically() {
        let map = classic().map();
        let austria = power("Austria");
        let vie = army_unit(1, "Austria", "Vienna");
        let bud = army_unit(2, "Austria", "Budapest");

        let mut first = Disband::new(1, austria);
        first.unit = Some(vie);
        let mut second = Disband::new(2, austria);
        second.unit = Some(vie);
        let mut orders = BuildOrders::from_adjustments(vec![
            AdjustmentOrder::Disband(first),
            AdjustmentOrder::Disband(second),
        ]);

        let scs = centers(austria, &[]);
        let homes = centers(austria, &["Vienna"]);
        resolve(&mut orders, map, &[vie, bud], &scs, &homes);

        let disbanded: Vec<UnitId> = orders
            .iter()
            .filter_map(|o| match o {
                AdjustmentOrder::Disband(d) => d.unit.map(|u| u.id),
                _ => None,
            })
            .collect();
        assert_eq!(disbanded, vec![UnitId(1), UnitId(2)]);
    }
}
