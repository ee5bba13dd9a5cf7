//! The game map: arenas of forces, geographies, provinces, and locations,
//! plus the adjacency and lookup queries the resolver and parser consume.

use crate::error::Error;
use crate::geo::{Force, ForceId, Geography, GeographyId, Location, LocationId, Province, ProvinceId};
use crate::order::OrderKind;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identifies a location by id or by (location or province) name. An id
/// overrides every other `locate` filter.
#[derive(Debug, Clone, Copy)]
pub enum LocationRef<'a> {
    Id(LocationId),
    Named(&'a str),
}

impl From<LocationId> for LocationRef<'_> {
    fn from(id: LocationId) -> Self {
        LocationRef::Id(id)
    }
}

impl<'a> From<&'a str> for LocationRef<'a> {
    fn from(name: &'a str) -> Self {
        LocationRef::Named(name)
    }
}

/// An immutable game map. All arenas are indexed by their id types; the
/// location at index `k` has id `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    name: String,
    orders: Vec<OrderKind>,
    forces: Vec<Force>,
    geographies: Vec<Geography>,
    provinces: Vec<Province>,
    locations: Vec<Location>,
    supply_centers: Vec<ProvinceId>,
}

impl Map {
    /// Loads a map from its JSON document, validating id contiguity and
    /// every cross reference.
    pub fn from_json_str(doc: &str) -> Result<Map, Error> {
        let raw: RawMap = serde_json::from_str(doc)
            .map_err(|e| Error::map(format!("malformed map document: {e}")))?;
        raw.build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Order kinds available on this map.
    pub fn orders(&self) -> &[OrderKind] {
        &self.orders
    }

    pub fn forces(&self) -> &[Force] {
        &self.forces
    }

    pub fn geographies(&self) -> &[Geography] {
        &self.geographies
    }

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// The provinces flagged as supply centers.
    pub fn supply_centers(&self) -> &[ProvinceId] {
        &self.supply_centers
    }

    pub fn force(&self, id: ForceId) -> &Force {
        &self.forces[id.index()]
    }

    pub fn geography(&self, id: GeographyId) -> &Geography {
        &self.geographies[id.index()]
    }

    pub fn province(&self, id: ProvinceId) -> &Province {
        &self.provinces[id.index()]
    }

    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.index()]
    }

    pub fn force_named(&self, name: &str) -> Option<&Force> {
        self.forces.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// The id of the force with the given name.
    pub fn force_id(&self, name: &str) -> Option<ForceId> {
        self.forces
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
            .map(|i| ForceId(i as u8))
    }

    pub fn geography_named(&self, name: &str) -> Option<&Geography> {
        self.geographies
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    pub fn province_named(&self, name: &str) -> Option<&Province> {
        self.provinces
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Short-form to full-name province abbreviations.
    pub fn abbreviations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.provinces
            .iter()
            .map(|p| (p.short.as_str(), p.name.as_str()))
    }

    /// All locations attached to a province.
    pub fn locations_of(&self, province: ProvinceId) -> impl Iterator<Item = &Location> {
        self.locations
            .iter()
            .filter(move |l| l.province == province)
    }

    /// Whether location `a` is adjacent to location `b`.
    pub fn reaches_location(&self, a: LocationId, b: LocationId) -> bool {
        self.location(a).reaches_location(b)
    }

    /// Whether location `a` is adjacent to any location of province `p`.
    pub fn reaches_province(&self, a: LocationId, p: ProvinceId) -> bool {
        self.location(a).reaches_province(self, p)
    }

    /// Whether some location in the list is adjacent to the province.
    pub fn one_adjacent(&self, locations: &[LocationId], province: ProvinceId) -> bool {
        locations
            .iter()
            .any(|&id| self.reaches_province(id, province))
    }

    /// Whether a chain of locations drawn from `via` links the source
    /// province to the target province. Used to look for convoy routes.
    ///
    /// Returns false even when source and target are adjacent: a convoy
    /// demands at least one intermediate convoying fleet. The algorithm is
    /// iterative frontier expansion and never materializes a path; the
    /// frontier only grows and is bounded by `via`, so it terminates.
    pub fn has_path(&self, source: ProvinceId, target: ProvinceId, via: &[LocationId]) -> bool {
        let mut reached: Vec<LocationId> = via
            .iter()
            .copied()
            .filter(|&id| self.reaches_province(id, source))
            .collect();
        let mut arrived = self.one_adjacent(&reached, target);
        let mut frontier = reached.clone();

        while !arrived && !frontier.is_empty() {
            let ids: BTreeSet<LocationId> = frontier
                .iter()
                .flat_map(|&id| self.location(id).connections.iter().copied())
                .collect();
            frontier = via
                .iter()
                .copied()
                .filter(|id| ids.contains(id) && !reached.contains(id))
                .collect();
            arrived = self.one_adjacent(&frontier, target);
            reached.extend(frontier.iter().copied());
        }

        arrived
    }

    /// Returns a location identified by partial data.
    ///
    /// An id identifier overrides all other filters. A name identifier
    /// matches locations by location or province name and by force; the
    /// `origin` and `specifier` filters are applied only while more than
    /// one candidate remains. An ambiguous result is an error unless
    /// `either` is set, in which case the first candidate wins.
    pub fn locate(
        &self,
        force: ForceId,
        identifier: LocationRef,
        origin: Option<LocationId>,
        specifier: Option<&str>,
        either: bool,
    ) -> Result<Option<LocationId>, Error> {
        let name = match identifier {
            LocationRef::Id(id) => {
                if id.index() >= self.locations.len() {
                    return Err(Error::map(format!("no location with id {}", id.0)));
                }
                return Ok(Some(id));
            }
            LocationRef::Named(name) => name,
        };

        let mut candidates: Vec<&Location> = self
            .locations
            .iter()
            .filter(|l| l.named(self, name) && l.force == force)
            .collect();

        if candidates.len() > 1 {
            if let Some(origin) = origin {
                candidates.retain(|l| l.connections.contains(&origin));
            }
        }

        if candidates.len() > 1 {
            if let Some(specifier) = specifier {
                candidates.retain(|l| {
                    l.name
                        .eq_ignore_ascii_case(&format!("{name} {specifier}"))
                });
            }
        }

        if candidates.len() > 1 && !either {
            return Err(Error::map(format!(
                "there are at least two locations in {name} matching the given criteria",
            )));
        }

        Ok(candidates.first().map(|l| l.id))
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Deserialize)]
struct RawMap {
    name: String,
    orders: Vec<String>,
    forces: BTreeMap<String, RawForce>,
    geographies: BTreeMap<String, RawGeography>,
    provinces: BTreeMap<String, RawProvince>,
    locations: BTreeMap<String, RawLocation>,
}

#[derive(Deserialize)]
struct RawForce {
    #[serde(rename = "may receive")]
    may_receive: Vec<String>,
    specifiers: Vec<String>,
    #[serde(rename = "short forms")]
    short_forms: Vec<String>,
}

#[derive(Deserialize)]
struct RawGeography {
    unit: String,
    orders: Vec<String>,
}

#[derive(Deserialize)]
struct RawProvince {
    name: String,
    short: String,
    supply_center: bool,
}

#[derive(Deserialize)]
struct RawLocation {
    name: String,
    connections: Vec<u16>,
    geography: String,
}

fn order_kind(name: &str) -> Result<OrderKind, Error> {
    OrderKind::from_name(name).ok_or_else(|| Error::map(format!("unknown order kind {name}")))
}

/// Collects an id-keyed JSON object into an id-ordered vector, checking
/// that ids are contiguous from zero.
fn dense<T>(entries: BTreeMap<String, T>, what: &str) -> Result<Vec<T>, Error> {
    let mut keyed = entries
        .into_iter()
        .map(|(k, v)| {
            k.parse::<usize>()
                .map(|id| (id, v))
                .map_err(|_| Error::map(format!("non-numeric {what} id {k}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by_key(|(id, _)| *id);
    for (index, (id, _)) in keyed.iter().enumerate() {
        if *id != index {
            return Err(Error::map(format!(
                "{what} ids are not contiguous from 0 (found {id} at index {index})",
            )));
        }
    }
    Ok(keyed.into_iter().map(|(_, v)| v).collect())
}

impl RawMap {
    fn build(self) -> Result<Map, Error> {
        let orders = self
            .orders
            .iter()
            .map(|o| order_kind(o))
            .collect::<Result<Vec<_>, _>>()?;

        let forces: Vec<Force> = self
            .forces
            .into_iter()
            .map(|(name, raw)| {
                if raw.short_forms.len() != raw.specifiers.len() {
                    return Err(Error::map(format!(
                        "force {name} has mismatched specifier short forms",
                    )));
                }
                Ok(Force {
                    name,
                    may_receive: raw
                        .may_receive
                        .iter()
                        .map(|o| order_kind(o))
                        .collect::<Result<Vec<_>, _>>()?,
                    specifiers: raw.specifiers,
                    short_forms: raw.short_forms,
                })
            })
            .collect::<Result<_, _>>()?;

        let force_id = |name: &str| -> Result<ForceId, Error> {
            forces
                .iter()
                .position(|f| f.name == name)
                .map(|i| ForceId(i as u8))
                .ok_or_else(|| Error::map(format!("unknown force {name}")))
        };

        let geographies: Vec<Geography> = self
            .geographies
            .into_iter()
            .map(|(name, raw)| {
                Ok(Geography {
                    name,
                    force: force_id(&raw.unit)?,
                    orders: raw
                        .orders
                        .iter()
                        .map(|o| order_kind(o))
                        .collect::<Result<Vec<_>, _>>()?,
                })
            })
            .collect::<Result<_, _>>()?;

        let provinces: Vec<Province> = dense(self.provinces, "province")?
            .into_iter()
            .enumerate()
            .map(|(id, raw)| Province {
                id: ProvinceId(id as u16),
                name: raw.name,
                short: raw.short,
                supply_center: raw.supply_center,
            })
            .collect();

        let location_count = self.locations.len();
        let locations: Vec<Location> = dense(self.locations, "location")?
            .into_iter()
            .enumerate()
            .map(|(id, raw)| {
                let geography_id = geographies
                    .iter()
                    .position(|g| g.name == raw.geography)
                    .map(|i| GeographyId(i as u8))
                    .ok_or_else(|| Error::map(format!("unknown geography {}", raw.geography)))?;
                let force = geographies[geography_id.index()].force;

                // The province is the location name stripped of any coast
                // specifier the force allows.
                let mut province_name = raw.name.as_str();
                for specifier in &forces[force.index()].specifiers {
                    if let Some(stripped) = province_name.strip_suffix(specifier.as_str()) {
                        province_name = stripped.trim_end();
                        break;
                    }
                }
                let province = provinces
                    .iter()
                    .find(|p| p.name == province_name)
                    .map(|p| p.id)
                    .ok_or_else(|| {
                        Error::map(format!("location {} names no known province", raw.name))
                    })?;

                let connections = raw
                    .connections
                    .into_iter()
                    .map(|c| {
                        if usize::from(c) < location_count {
                            Ok(LocationId(c))
                        } else {
                            Err(Error::map(format!(
                                "location {} connects to unknown id {c}",
                                raw.name
                            )))
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Location {
                    id: LocationId(id as u16),
                    name: raw.name,
                    province,
                    geography: geography_id,
                    force,
                    connections,
                })
            })
            .collect::<Result<_, _>>()?;

        let supply_centers = provinces
            .iter()
            .filter(|p| p.supply_center)
            .map(|p| p.id)
            .collect();

        Ok(Map {
            name: self.name,
            orders,
            forces,
            geographies,
            provinces,
            locations,
            supply_centers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant;

    fn classic() -> &'static Map {
        variant::classic().map()
    }

    fn fleet(map: &Map) -> ForceId {
        map.force_id("Fleet").unwrap()
    }

    fn loc(map: &Map, name: &str) -> LocationId {
        map.locations()
            .iter()
            .find(|l| l.name == name)
            .unwrap_or_else(|| panic!("no location named {name}"))
            .id
    }

    #[test]
    fn classic_map_loads() {
        let map = classic();
        assert_eq!(map.provinces().len(), 75);
        assert_eq!(map.locations().len(), 120);
        assert_eq!(map.supply_centers().len(), 34);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let map = classic();
        for location in map.locations() {
            for &other in &location.connections {
                assert!(
                    map.location(other).reaches_location(location.id),
                    "{} -> {} is one-way",
                    location.name,
                    map.location(other).name
                );
            }
        }
    }

    #[test]
    fn locate_disambiguates_by_specifier() {
        let map = classic();
        let fleet = fleet(map);
        let found = map
            .locate(fleet, "Spain".into(), None, Some("(south coast)"), false)
            .unwrap()
            .unwrap();
        assert_eq!(map.location(found).name, "Spain (south coast)");
    }

    #[test]
    fn locate_ambiguity_is_an_error() {
        let map = classic();
        let fleet = fleet(map);
        assert!(map.locate(fleet, "Spain".into(), None, None, false).is_err());
        assert!(map
            .locate(fleet, "Spain".into(), None, None, true)
            .unwrap()
            .is_some());
    }

    #[test]
    fn has_path_needs_an_intermediate_fleet() {
        let map = classic();
        let lon = map.province_named("London").unwrap().id;
        let bel = map.province_named("Belgium").unwrap().id;
        let nth = loc(map, "North Sea");
        let eng = loc(map, "English Channel");

        assert!(map.has_path(lon, bel, &[nth]));
        assert!(map.has_path(lon, bel, &[eng]));
        // Adjacent provinces alone are not a convoy route.
        let pic = map.province_named("Picardy").unwrap().id;
        assert!(!map.has_path(bel, pic, &[]));
    }

    #[test]
    fn has_path_chains_through_the_via_set() {
        let map = classic();
        let lon = map.province_named("London").unwrap().id;
        let tun = map.province_named("Tunis").unwrap().id;
        let route = [
            loc(map, "English Channel"),
            loc(map, "Mid-Atlantic Ocean"),
            loc(map, "Western Mediterranean"),
        ];
        assert!(map.has_path(lon, tun, &route));
        let broken = [loc(map, "English Channel"), loc(map, "Western Mediterranean")];
        assert!(!map.has_path(lon, tun, &broken));
    }
}
