//! Game variants: the powers, their homes, the starting position, and the
//! win condition, bound to the map they are played on.

use crate::error::Error;
use crate::geo::{ForceId, LocationId, Map, ProvinceId};
use crate::power::{Power, PowerId};
use lazy_static::lazy_static;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// One unit of the starting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartingPosition {
    pub force: ForceId,
    pub power: PowerId,
    pub location: LocationId,
}

/// An immutable game variant. Owns its map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    name: String,
    map: Map,
    starting_year: i32,
    win_condition: usize,
    powers: Vec<Power>,
    starting_positions: Vec<StartingPosition>,
}

impl Variant {
    /// Loads a variant from its JSON document and the JSON document of the
    /// map it names.
    pub fn from_json_strs(variant_doc: &str, map_doc: &str) -> Result<Variant, Error> {
        let raw: RawVariant = serde_json::from_str(variant_doc)
            .map_err(|e| Error::map(format!("malformed variant document: {e}")))?;
        let map = Map::from_json_str(map_doc)?;
        if !map.name().eq_ignore_ascii_case(&raw.map) {
            return Err(Error::map(format!(
                "variant {} names map {}, got {}",
                raw.name,
                raw.map,
                map.name()
            )));
        }
        raw.build(map)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn starting_year(&self) -> i32 {
        self.starting_year
    }

    /// Supply centers needed for a solo win.
    pub fn win_condition(&self) -> usize {
        self.win_condition
    }

    pub fn powers(&self) -> &[Power] {
        &self.powers
    }

    pub fn power(&self, id: PowerId) -> &Power {
        &self.powers[id.index()]
    }

    pub fn power_ids(&self) -> impl Iterator<Item = PowerId> {
        (0..self.powers.len() as u8).map(PowerId)
    }

    pub fn power_named(&self, name: &str) -> Option<PowerId> {
        self.powers
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
            .map(|i| PowerId(i as u8))
    }

    pub fn starting_positions(&self) -> &[StartingPosition] {
        &self.starting_positions
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Deserialize)]
struct RawVariant {
    name: String,
    map: String,
    #[serde(rename = "starting year")]
    starting_year: i32,
    #[serde(rename = "win condition")]
    win_condition: usize,
    powers: BTreeMap<String, RawPower>,
    #[serde(rename = "starting positions")]
    starting_positions: Vec<RawStart>,
}

#[derive(Deserialize)]
struct RawPower {
    genitive: String,
    #[serde(rename = "home centers")]
    home_centers: Vec<String>,
}

#[derive(Deserialize)]
struct RawStart {
    force: String,
    power: String,
    location: String,
}

impl RawVariant {
    fn build(self, map: Map) -> Result<Variant, Error> {
        let province_id = |name: &str| -> Result<ProvinceId, Error> {
            map.province_named(name)
                .map(|p| p.id)
                .ok_or_else(|| Error::map(format!("unknown province {name}")))
        };

        let powers: Vec<Power> = self
            .powers
            .into_iter()
            .map(|(name, raw)| {
                Ok(Power {
                    name,
                    genitive: raw.genitive,
                    home_centers: raw
                        .home_centers
                        .iter()
                        .map(|c| province_id(c))
                        .collect::<Result<Vec<_>, _>>()?,
                })
            })
            .collect::<Result<_, _>>()?;

        let starting_positions = self
            .starting_positions
            .into_iter()
            .map(|raw| {
                let force = map
                    .force_id(&raw.force)
                    .ok_or_else(|| Error::map(format!("unknown force {}", raw.force)))?;
                let power = powers
                    .iter()
                    .position(|p| p.name == raw.power)
                    .map(|i| PowerId(i as u8))
                    .ok_or_else(|| Error::map(format!("unknown power {}", raw.power)))?;
                // Starting locations are given by full location name, which
                // carries any coast specifier.
                let location = map
                    .locations()
                    .iter()
                    .find(|l| l.name == raw.location && l.force == force)
                    .map(|l| l.id)
                    .ok_or_else(|| {
                        Error::map(format!(
                            "no {} location named {}",
                            raw.force, raw.location
                        ))
                    })?;
                Ok(StartingPosition {
                    force,
                    power,
                    location,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Variant {
            name: self.name,
            map,
            starting_year: self.starting_year,
            win_condition: self.win_condition,
            powers,
            starting_positions,
        })
    }
}

lazy_static! {
    static ref CLASSIC: Variant = Variant::from_json_strs(
        include_str!("../assets/classic_variant.json"),
        include_str!("../assets/classic.json"),
    )
    .expect("the embedded classic variant should be consistent");
}

/// The classic seven-power variant on the standard map.
pub fn classic() -> &'static Variant {
    &CLASSIC
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_variant_loads() {
        let variant = classic();
        assert_eq!(variant.powers().len(), 7);
        assert_eq!(variant.starting_positions().len(), 22);
        assert_eq!(variant.win_condition(), 18);
        assert_eq!(variant.starting_year(), 1901);
    }

    #[test]
    fn home_centers_are_supply_centers() {
        let variant = classic();
        for power in variant.powers() {
            for &center in &power.home_centers {
                assert!(variant.map().province(center).supply_center);
            }
        }
    }

    #[test]
    fn russia_starts_with_four_units() {
        let variant = classic();
        let russia = variant.power_named("Russia").unwrap();
        let count = variant
            .starting_positions()
            .iter()
            .filter(|s| s.power == russia)
            .count();
        assert_eq!(count, 4);
    }
}
