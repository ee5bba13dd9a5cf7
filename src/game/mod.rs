//! The mutable game: season ticker, live units, ownership, the current
//! phase's orders, the archives, and the sequencer that drives a turn.

mod archive;

pub use self::archive::{OrderArchive, PositionArchive, PositionRecord, UnitRecord};

use crate::error::Error;
use crate::geo::{LocationRef, Map, ProvinceId};
use crate::judge;
use crate::order::{
    AdjustmentOrder, BuildOrders, DiplomacyOrders, HoldOrder, Order, Retreat, RetreatOrders,
};
use crate::parser;
use crate::power::PowerId;
use crate::season::{Phase, Season};
use crate::unit::{Unit, UnitId};
use crate::variant::Variant;
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

/// The order collection of the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOrders {
    /// Pregame or postgame: no orders are expected.
    None,
    Diplomacy(DiplomacyOrders),
    Retreats(RetreatOrders),
    Builds(BuildOrders),
}

impl PhaseOrders {
    pub fn is_empty(&self) -> bool {
        match self {
            PhaseOrders::None => true,
            PhaseOrders::Diplomacy(d) => d.is_empty(),
            PhaseOrders::Retreats(r) => r.is_empty(),
            PhaseOrders::Builds(b) => b.is_empty(),
        }
    }
}

/// A game in progress. Given identical inputs, every operation on a game
/// is deterministic, including the archives it accumulates.
pub struct Game<'a> {
    variant: &'a Variant,
    season: Season,
    units: Vec<Unit>,
    next_unit_id: u32,
    supply_centers: BTreeMap<PowerId, BTreeSet<ProvinceId>>,
    home_centers: BTreeMap<PowerId, BTreeSet<ProvinceId>>,
    orders: PhaseOrders,
    position_archive: PositionArchive,
    order_archive: OrderArchive,
    winner: Option<PowerId>,
}

impl<'a> Game<'a> {
    /// A pregame board: starting units placed, every power owning exactly
    /// its home centers.
    pub fn new(variant: &'a Variant) -> Self {
        let mut game = Game {
            variant,
            season: Season::new(variant.starting_year()),
            units: Vec::new(),
            next_unit_id: 1,
            supply_centers: BTreeMap::new(),
            home_centers: BTreeMap::new(),
            orders: PhaseOrders::None,
            position_archive: PositionArchive::new(),
            order_archive: OrderArchive::new(),
            winner: None,
        };
        game.place_starting_pieces();
        game
    }

    /// Restores the starting position: pregame season, starting units,
    /// home-center ownership, empty archives.
    pub fn reset(&mut self) {
        self.season.reset(self.variant.starting_year());
        self.units.clear();
        self.next_unit_id = 1;
        self.orders = PhaseOrders::None;
        self.position_archive.reset();
        self.order_archive.reset();
        self.winner = None;
        self.place_starting_pieces();
    }

    fn place_starting_pieces(&mut self) {
        self.supply_centers.clear();
        self.home_centers.clear();
        for id in self.variant.power_ids() {
            let homes: BTreeSet<ProvinceId> =
                self.variant.power(id).home_centers.iter().copied().collect();
            self.supply_centers.insert(id, homes.clone());
            self.home_centers.insert(id, homes);
        }
        for start in self.variant.starting_positions() {
            let id = UnitId(self.next_unit_id);
            self.next_unit_id += 1;
            self.units
                .push(Unit::new(id, start.power, start.force, start.location));
        }
    }

    /// Moves from Pregame into the first Spring Diplomacy, seeds the
    /// default Hold orders, and archives the starting position.
    pub fn start(&mut self) -> Result<(), Error> {
        if self.season.phase() != Phase::Pregame {
            return Err(Error::game("the game has already started"));
        }
        self.season.progress(1)?;
        self.orders = PhaseOrders::Diplomacy(DiplomacyOrders::new(&self.units, self.map()));
        self.archive_position();
        Ok(())
    }

    pub fn variant(&self) -> &'a Variant {
        self.variant
    }

    pub fn map(&self) -> &'a Map {
        self.variant.map()
    }

    pub fn season(&self) -> &Season {
        &self.season
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn winner(&self) -> Option<PowerId> {
        self.winner
    }

    pub fn orders(&self) -> &PhaseOrders {
        &self.orders
    }

    pub(crate) fn orders_mut(&mut self) -> &mut PhaseOrders {
        &mut self.orders
    }

    pub fn supply_centers(&self, power: PowerId) -> &BTreeSet<ProvinceId> {
        &self.supply_centers[&power]
    }

    pub fn home_centers(&self, power: PowerId) -> &BTreeSet<ProvinceId> {
        &self.home_centers[&power]
    }

    pub fn position_archive(&self) -> &PositionArchive {
        &self.position_archive
    }

    pub fn order_archive(&self) -> &OrderArchive {
        &self.order_archive
    }

    // ---- parser-facing query surface -------------------------------------

    /// The unit currently in the given province.
    pub fn unit_in(&self, province: ProvinceId) -> Option<&Unit> {
        let map = self.map();
        self.units.iter().find(|u| u.province(map) == province)
    }

    /// The diplomacy order of the unit in the given province.
    pub fn order_in(&self, province: ProvinceId) -> Option<&Order> {
        match &self.orders {
            PhaseOrders::Diplomacy(d) => d.order_in(province),
            _ => None,
        }
    }

    /// The retreat of the unit dislodged from the given province.
    pub fn retreat_in(&self, province: ProvinceId) -> Option<&Retreat> {
        match &self.orders {
            PhaseOrders::Retreats(r) => r.order_in(province),
            _ => None,
        }
    }

    /// The numbered adjustment slot of a power.
    pub fn adjustment_order(&self, id: u32, power: PowerId) -> Option<&AdjustmentOrder> {
        match &self.orders {
            PhaseOrders::Builds(b) => b.adjustment_order(id, power),
            _ => None,
        }
    }

    /// Locates on the map; see [`Map::locate`].
    pub fn locate(
        &self,
        force: crate::geo::ForceId,
        identifier: LocationRef,
        origin: Option<crate::geo::LocationId>,
        specifier: Option<&str>,
        either: bool,
    ) -> Result<Option<crate::geo::LocationId>, Error> {
        self.map().locate(force, identifier, origin, specifier, either)
    }

    // ---- manual board edits ----------------------------------------------

    /// Places a new unit, for scenario construction. Only legal during a
    /// Diplomacy phase; the unit is given a default Hold order.
    pub fn add_unit(&mut self, force: &str, power: &str, location: &str) -> Result<(), Error> {
        let map = self.map();
        let force = map
            .force_id(force)
            .ok_or_else(|| Error::game(format!("unknown force {force}")))?;
        let power = self
            .variant
            .power_named(power)
            .ok_or_else(|| Error::game(format!("unknown power {power}")))?;
        let location = map
            .locate(force, LocationRef::Named(location), None, None, true)?
            .ok_or_else(|| Error::game(format!("no {location} location for that force")))?;

        let province = map.location(location).province;
        if self.unit_in(province).is_some() {
            return Err(Error::game(format!(
                "province {} is already occupied",
                map.province(province).name
            )));
        }

        let unit = Unit::new(UnitId(self.next_unit_id), power, force, location);
        match &mut self.orders {
            PhaseOrders::Diplomacy(orders) => {
                let max = orders.max_strength();
                orders.replace(Order::Hold(HoldOrder::new(unit, province, max)));
            }
            _ => return Err(Error::game("units can only be added during a Diplomacy phase")),
        }
        self.next_unit_id += 1;
        self.units.push(unit);
        Ok(())
    }

    /// Removes the unit in the named province, along with its order.
    pub fn remove_unit(&mut self, province: &str) -> Result<(), Error> {
        let map = self.map();
        let province = map
            .province_named(province)
            .ok_or_else(|| Error::game(format!("unknown province {province}")))?
            .id;
        let unit = *self
            .unit_in(province)
            .ok_or_else(|| Error::game("no unit in that province"))?;

        match &mut self.orders {
            PhaseOrders::Diplomacy(orders) => orders.remove_unit(unit.id),
            _ => {
                return Err(Error::game(
                    "units can only be removed during a Diplomacy phase",
                ))
            }
        }
        self.units.retain(|u| u.id != unit.id);
        Ok(())
    }

    /// Parses an order string against the current phase and installs it.
    pub fn order(&mut self, text: &str) -> Result<(), Error> {
        parser::submit(self, text)
    }

    // ---- the sequencer ---------------------------------------------------

    /// Adjudicates the current phase: resolve, archive the orders, execute
    /// their effects, advance the season, construct the next phase's
    /// orders, archive the new position, and check the win condition.
    ///
    /// With `hold` unset, phases that require no orders (quiet Retreats
    /// and Builds) are adjudicated through automatically.
    pub fn adjudicate(&mut self, hold: bool) -> Result<(), Error> {
        if self.winner.is_some() {
            return Err(Error::game("the game has concluded"));
        }

        match &mut self.orders {
            PhaseOrders::Diplomacy(orders) => {
                judge::diplomacy::resolve(self.variant, orders);
                let unresolved = orders.unresolved_count();
                if unresolved > 0 {
                    return Err(Error::adjudication(format!(
                        "{unresolved} diplomacy orders left unresolved"
                    )));
                }
            }
            PhaseOrders::Retreats(orders) => {
                judge::retreat::resolve(self.variant.map(), orders);
                let unresolved = orders.unresolved_count();
                if unresolved > 0 {
                    return Err(Error::adjudication(format!(
                        "{unresolved} retreats left unresolved"
                    )));
                }
            }
            PhaseOrders::Builds(orders) => {
                judge::build::resolve(
                    orders,
                    self.variant.map(),
                    &self.units,
                    &self.supply_centers,
                    &self.home_centers,
                );
            }
            PhaseOrders::None => {
                return Err(Error::game("the current phase expects no orders"))
            }
        }

        self.archive_orders();

        let resolved = std::mem::replace(&mut self.orders, PhaseOrders::None);
        match &resolved {
            PhaseOrders::Diplomacy(orders) => self.execute_diplomacy(orders),
            PhaseOrders::Retreats(orders) => self.execute_retreats(orders),
            PhaseOrders::Builds(orders) => self.execute_builds(orders),
            PhaseOrders::None => unreachable!("resolved phase cannot be empty"),
        }

        self.season.progress(1)?;
        debug!("entering {}", self.season);

        self.orders = match self.season.phase() {
            Phase::Diplomacy => {
                PhaseOrders::Diplomacy(DiplomacyOrders::new(&self.units, self.map()))
            }
            Phase::Retreats => match &resolved {
                PhaseOrders::Diplomacy(orders) => {
                    PhaseOrders::Retreats(RetreatOrders::from_diplomacy(orders))
                }
                _ => unreachable!("Retreats always follows Diplomacy"),
            },
            Phase::Builds => {
                self.adjust_supply_centers();
                PhaseOrders::Builds(self.build_quotas())
            }
            _ => PhaseOrders::None,
        };

        self.archive_position();
        self.check_winner();

        if !hold && self.winner.is_none() {
            let skip = matches!(
                &self.orders,
                PhaseOrders::Retreats(_) | PhaseOrders::Builds(_)
            ) && self.orders.is_empty();
            if skip {
                return self.adjudicate(hold);
            }
        }
        Ok(())
    }

    /// Undoes adjudications back to the most recent Diplomacy phase
    /// boundary, restoring units, ownership, and the phase's submitted
    /// orders from the archives.
    pub fn rollback(&mut self) -> Result<(), Error> {
        let archived_orders;
        loop {
            if self.position_archive.len() < 2 {
                return Err(Error::game("nothing to roll back"));
            }
            self.position_archive.rollback();
            // Order entries trail position entries by one, so the entry
            // popped here belongs to the phase of the new last position.
            let popped = self.order_archive.rollback();
            self.season.rollback(1)?;
            let phase = &self.position_archive.last().expect("length checked").phase;
            if phase == "Diplomacy" {
                archived_orders = popped;
                break;
            }
        }
        self.winner = None;
        self.restore_archived_position(archived_orders)
    }

    // ---- internals -------------------------------------------------------

    fn execute_diplomacy(&mut self, orders: &DiplomacyOrders) {
        for order in orders.iter() {
            if let Some(attack) = order.as_move() {
                if attack.moves() {
                    if let Some(unit) = self.units.iter_mut().find(|u| u.id == attack.unit.id) {
                        unit.location = attack.target;
                    }
                }
            }
        }
    }

    fn execute_retreats(&mut self, orders: &RetreatOrders) {
        for retreat in orders.iter() {
            match retreat.action {
                crate::order::RetreatAction::Move { target, .. }
                    if retreat.disbands.is_false() =>
                {
                    if let Some(unit) = self.units.iter_mut().find(|u| u.id == retreat.unit.id) {
                        unit.location = target;
                    }
                }
                _ => {
                    self.units.retain(|u| u.id != retreat.unit.id);
                }
            }
        }
    }

    fn execute_builds(&mut self, orders: &BuildOrders) {
        for order in orders.iter() {
            match order {
                AdjustmentOrder::Build(build) => {
                    if let (Some(force), Some(location)) = (build.force, build.location) {
                        let unit =
                            Unit::new(UnitId(self.next_unit_id), build.owner, force, location);
                        self.next_unit_id += 1;
                        self.units.push(unit);
                    }
                }
                AdjustmentOrder::Disband(disband) => {
                    if let Some(unit) = disband.unit {
                        self.units.retain(|u| u.id != unit.id);
                    }
                }
            }
        }
    }

    /// A power gains a supply center iff one of its units occupies it at
    /// the end of a Fall turn; ownership transfers from the previous
    /// holder.
    fn adjust_supply_centers(&mut self) {
        let map = self.map();
        for unit in &self.units {
            let province = unit.province(map);
            if !map.province(province).supply_center {
                continue;
            }
            for centers in self.supply_centers.values_mut() {
                centers.remove(&province);
            }
            self.supply_centers
                .get_mut(&unit.owner)
                .expect("every power has a center set")
                .insert(province);
        }
    }

    fn build_quotas(&self) -> BuildOrders {
        let map = self.map();
        let occupied: BTreeSet<ProvinceId> =
            self.units.iter().map(|u| u.province(map)).collect();

        let mut unit_counts: BTreeMap<PowerId, usize> = BTreeMap::new();
        for unit in &self.units {
            *unit_counts.entry(unit.owner).or_default() += 1;
        }

        let open_home_centers: BTreeMap<PowerId, usize> = self
            .home_centers
            .iter()
            .map(|(&power, homes)| {
                let owned = &self.supply_centers[&power];
                let open = homes
                    .iter()
                    .filter(|c| owned.contains(c) && !occupied.contains(c))
                    .count();
                (power, open)
            })
            .collect();

        BuildOrders::from_quotas(&self.supply_centers, &open_home_centers, &unit_counts)
    }

    fn archive_orders(&mut self) {
        let map = self.map();
        let entry: Vec<String> = match &self.orders {
            PhaseOrders::Diplomacy(orders) => {
                orders.iter().map(|o| o.display(map).to_string()).collect()
            }
            PhaseOrders::Retreats(orders) => {
                orders.iter().map(|r| r.display(map).to_string()).collect()
            }
            PhaseOrders::Builds(orders) => orders
                .iter()
                .map(|o| {
                    o.display(map, &self.variant.power(o.owner()).name)
                        .to_string()
                })
                .collect(),
            PhaseOrders::None => Vec::new(),
        };
        self.order_archive.enter(entry);
    }

    fn archive_position(&mut self) {
        let map = self.map();
        let units = self
            .units
            .iter()
            .map(|u| UnitRecord {
                force: map.force(u.force).name.clone(),
                owner: self.variant.power(u.owner).name.clone(),
                location: u.location.index() as u16,
            })
            .collect();
        let centers = self
            .supply_centers
            .iter()
            .map(|(&power, centers)| {
                (
                    self.variant.power(power).name.clone(),
                    centers
                        .iter()
                        .map(|&c| map.province(c).name.clone())
                        .collect(),
                )
            })
            .collect();
        self.position_archive.enter(PositionRecord {
            season: self.season.name().to_string(),
            phase: self.season.phase().to_string(),
            year: self.season.year(),
            units,
            centers,
        });
    }

    fn check_winner(&mut self) {
        let threshold = self.variant.win_condition();
        for power in self.variant.power_ids() {
            if self.supply_centers[&power].len() >= threshold {
                info!(
                    "{} owns {} supply centers and wins",
                    self.variant.power(power).name,
                    self.supply_centers[&power].len()
                );
                self.winner = Some(power);
                self.season.conclude();
                self.orders = PhaseOrders::None;
                return;
            }
        }
    }

    fn restore_archived_position(
        &mut self,
        archived_orders: Option<Vec<String>>,
    ) -> Result<(), Error> {
        let record = self
            .position_archive
            .last()
            .ok_or_else(|| Error::game("empty position archive"))?
            .clone();
        let map = self.map();

        self.units.clear();
        for unit in &record.units {
            let force = map
                .force_id(&unit.force)
                .ok_or_else(|| Error::game(format!("archived unknown force {}", unit.force)))?;
            let power = self
                .variant
                .power_named(&unit.owner)
                .ok_or_else(|| Error::game(format!("archived unknown power {}", unit.owner)))?;
            if usize::from(unit.location) >= map.locations().len() {
                return Err(Error::game(format!(
                    "archived unknown location id {}",
                    unit.location
                )));
            }
            let id = UnitId(self.next_unit_id);
            self.next_unit_id += 1;
            self.units.push(Unit::new(
                id,
                power,
                force,
                crate::geo::LocationId(unit.location),
            ));
        }

        for centers in self.supply_centers.values_mut() {
            centers.clear();
        }
        for (power, centers) in &record.centers {
            let power = self
                .variant
                .power_named(power)
                .ok_or_else(|| Error::game(format!("archived unknown power {power}")))?;
            let set = self
                .supply_centers
                .get_mut(&power)
                .expect("every power has a center set");
            for name in centers {
                let province = map
                    .province_named(name)
                    .ok_or_else(|| Error::game(format!("archived unknown province {name}")))?;
                set.insert(province.id);
            }
        }

        self.orders = PhaseOrders::Diplomacy(DiplomacyOrders::new(&self.units, map));

        // Re-seed the phase from its archived order strings. The stored
        // resolution suffixes are inert noise to the parser.
        if let Some(lines) = archived_orders {
            for line in &lines {
                self.order(line)?;
            }
        }
        Ok(())
    }
}
