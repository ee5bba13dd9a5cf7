//! Append-only archives of positions and order sets.
//!
//! A position record carries enough to reconstruct the unit list and the
//! ownership map by name lookup; an order record is the sorted list of
//! stringified orders of one resolved phase, sufficient to replay the
//! phase to the same deterministic outcome.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One unit of an archived position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub force: String,
    pub owner: String,
    /// Location id on the map the game is played on.
    pub location: u16,
}

/// An archived board position at the start of one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub season: String,
    pub phase: String,
    pub year: i32,
    pub units: Vec<UnitRecord>,
    /// Supply-center province names per power name.
    pub centers: BTreeMap<String, Vec<String>>,
}

/// The archive of positions, one entry per phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionArchive {
    entries: Vec<PositionRecord>,
}

/// The archive of order sets, one sorted entry per adjudicated phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderArchive {
    entries: Vec<Vec<String>>,
}

impl PositionArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn enter(&mut self, record: PositionRecord) {
        self.entries.push(record);
    }

    /// The `k`-th archived position.
    pub fn loc(&self, k: usize) -> Option<&PositionRecord> {
        self.entries.get(k)
    }

    pub fn last(&self) -> Option<&PositionRecord> {
        self.entries.last()
    }

    /// Drops the most recent entry.
    pub fn rollback(&mut self) -> Option<PositionRecord> {
        self.entries.pop()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.entries).expect("position records always serialize")
    }

    pub fn from_json(doc: &str) -> Result<Self, Error> {
        Ok(PositionArchive {
            entries: serde_json::from_str(doc)
                .map_err(|e| Error::game(format!("malformed position archive: {e}")))?,
        })
    }
}

impl OrderArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Archives one phase's orders, sorted into canonical text order.
    pub fn enter(&mut self, mut orders: Vec<String>) {
        orders.sort();
        self.entries.push(orders);
    }

    /// The `k`-th archived order set.
    pub fn loc(&self, k: usize) -> Option<&[String]> {
        self.entries.get(k).map(Vec::as_slice)
    }

    pub fn last(&self) -> Option<&[String]> {
        self.entries.last().map(Vec::as_slice)
    }

    /// Drops the most recent entry.
    pub fn rollback(&mut self) -> Option<Vec<String>> {
        self.entries.pop()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[String]> {
        self.entries.iter().map(Vec::as_slice)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.entries).expect("order records always serialize")
    }

    pub fn from_json(doc: &str) -> Result<Self, Error> {
        Ok(OrderArchive {
            entries: serde_json::from_str(doc)
                .map_err(|e| Error::game(format!("malformed order archive: {e}")))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_entries_are_sorted() {
        let mut archive = OrderArchive::new();
        archive.enter(vec!["b".into(), "a".into()]);
        assert_eq!(archive.loc(0).unwrap(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn position_archive_round_trips_through_json() {
        let mut archive = PositionArchive::new();
        let mut centers = BTreeMap::new();
        centers.insert("Austria".to_string(), vec!["Vienna".to_string()]);
        archive.enter(PositionRecord {
            season: "Spring".into(),
            phase: "Diplomacy".into(),
            year: 1901,
            units: vec![UnitRecord {
                force: "Army".into(),
                owner: "Austria".into(),
                location: 3,
            }],
            centers,
        });

        let parsed = PositionArchive::from_json(&archive.to_json()).unwrap();
        assert_eq!(parsed, archive);
    }
}
