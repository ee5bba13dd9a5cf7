//! Resolution state primitives: the order-status lattice, monotone bound
//! pairs, write-once tri-valued flags, and per-power move-strength tables.
//!
//! Monotonicity is enforced in the setters themselves: a write that would
//! loosen a bound is silently clamped, never an error. This is what makes
//! a resolution pass order-independent.

use crate::power::PowerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The totally ordered status of an order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum OrderStatus {
    Illegal,
    Broken,
    Cut,
    NoEffect,
    Valid,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            OrderStatus::Illegal => "illegal",
            OrderStatus::Broken => "broken",
            OrderStatus::Cut => "cut",
            OrderStatus::NoEffect => "no effect",
            OrderStatus::Valid => "valid",
        })
    }
}

/// The status and hold-strength bounds every diplomacy-phase order carries.
/// `min_status` and `min_hold` only ever increase; `max_status` and
/// `max_hold` only ever decrease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    min_status: OrderStatus,
    max_status: OrderStatus,
    min_hold: u8,
    max_hold: u8,
}

impl Bounds {
    /// Fresh bounds: status anywhere between illegal and valid, hold
    /// strength anywhere between 1 and the given ceiling.
    pub fn new(max_hold: u8) -> Self {
        Bounds {
            min_status: OrderStatus::Illegal,
            max_status: OrderStatus::Valid,
            min_hold: 1,
            max_hold,
        }
    }

    pub fn min_status(&self) -> OrderStatus {
        self.min_status
    }

    pub fn max_status(&self) -> OrderStatus {
        self.max_status
    }

    pub fn min_hold(&self) -> u8 {
        self.min_hold
    }

    pub fn max_hold(&self) -> u8 {
        self.max_hold
    }

    /// Raises the status floor. Clamped to the current ceiling.
    pub fn raise_min_status(&mut self, status: OrderStatus) {
        if self.max_status < status {
            self.min_status = self.max_status;
        } else if self.min_status < status {
            self.min_status = status;
        }
    }

    /// Lowers the status ceiling. Clamped to the current floor.
    pub fn lower_max_status(&mut self, status: OrderStatus) {
        if self.min_status > status {
            self.max_status = self.min_status;
        } else if self.max_status > status {
            self.max_status = status;
        }
    }

    pub fn raise_min_hold(&mut self, strength: u8) {
        self.min_hold = self.min_hold.max(strength).min(self.max_hold);
    }

    pub fn lower_max_hold(&mut self, strength: u8) {
        self.max_hold = self.max_hold.min(strength).max(self.min_hold);
    }

    pub fn status_resolved(&self) -> bool {
        self.min_status == self.max_status
    }

    pub fn hold_resolved(&self) -> bool {
        self.min_hold == self.max_hold
    }
}

/// A tri-valued flag that is decided at most once; later writes are
/// ignored. Undecided is the bottom value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag(Option<bool>);

impl Flag {
    pub fn set(&mut self, value: bool) {
        if self.0.is_none() {
            self.0 = Some(value);
        }
    }

    /// Decides the flag from an optionally known value.
    pub fn set_known(&mut self, value: Option<bool>) {
        if let Some(value) = value {
            self.set(value);
        }
    }

    pub fn get(self) -> Option<bool> {
        self.0
    }

    pub fn decided(self) -> bool {
        self.0.is_some()
    }

    pub fn is_true(self) -> bool {
        self.0 == Some(true)
    }

    pub fn is_false(self) -> bool {
        self.0 == Some(false)
    }
}

/// A move-strength table: the base entry counts every valid support, and
/// the per-power entries discount supports contributed by that power. The
/// discounted entries implement the rule that a unit may not dislodge, or
/// be supported in dislodging, a unit of the same power.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStrength {
    base: u8,
    by_power: BTreeMap<PowerId, u8>,
}

impl MoveStrength {
    pub fn new(base: u8) -> Self {
        MoveStrength {
            base,
            by_power: BTreeMap::new(),
        }
    }

    /// The strength discounting supports by `except`, or the full strength
    /// when no power is excluded.
    pub fn get(&self, except: Option<PowerId>) -> u8 {
        match except {
            Some(power) => self.by_power.get(&power).copied().unwrap_or(self.base),
            None => self.base,
        }
    }

    /// Raises entries toward the given values; a lower write is ignored.
    pub fn raise_to(&mut self, base: u8, by_power: impl Iterator<Item = (PowerId, u8)>) {
        self.base = self.base.max(base);
        for (power, strength) in by_power {
            let entry = self.by_power.entry(power).or_insert(strength);
            *entry = (*entry).max(strength);
        }
    }

    /// Lowers entries toward the given values; a higher write is ignored.
    pub fn lower_to(&mut self, base: u8, by_power: impl Iterator<Item = (PowerId, u8)>) {
        self.base = self.base.min(base);
        for (power, strength) in by_power {
            let entry = self.by_power.entry(power).or_insert(strength);
            *entry = (*entry).min(strength);
        }
    }

    /// Collapses the table onto another, ending the tightening. Used when
    /// an order leaves play (an illegal move) or a fallback closes it.
    pub fn collapse_to(&mut self, other: &MoveStrength) {
        *self = other.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ordering() {
        use OrderStatus::*;
        assert!(Illegal < Broken && Broken < Cut && Cut < NoEffect && NoEffect < Valid);
    }

    #[test]
    fn bounds_clamp_instead_of_loosening() {
        let mut bounds = Bounds::new(5);
        bounds.raise_min_status(OrderStatus::Cut);
        bounds.raise_min_status(OrderStatus::Broken);
        assert_eq!(bounds.min_status(), OrderStatus::Cut);

        bounds.lower_max_status(OrderStatus::Broken);
        assert_eq!(bounds.max_status(), OrderStatus::Cut);
        assert!(bounds.status_resolved());

        bounds.raise_min_hold(3);
        bounds.raise_min_hold(2);
        assert_eq!(bounds.min_hold(), 3);
        bounds.lower_max_hold(2);
        assert_eq!(bounds.max_hold(), 3);
    }

    #[test]
    fn flags_are_write_once() {
        let mut flag = Flag::default();
        assert!(!flag.decided());
        flag.set_known(None);
        assert!(!flag.decided());
        flag.set(true);
        flag.set(false);
        assert!(flag.is_true());
    }

    #[test]
    fn strength_discounts_by_power() {
        let mut strength = MoveStrength::new(1);
        strength.raise_to(3, vec![(PowerId(0), 2), (PowerId(1), 3)].into_iter());
        assert_eq!(strength.get(None), 3);
        assert_eq!(strength.get(Some(PowerId(0))), 2);
        assert_eq!(strength.get(Some(PowerId(2))), 3);
    }
}
