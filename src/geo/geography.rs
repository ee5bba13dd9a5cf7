//! Container kinds.

use crate::geo::ForceId;
use crate::order::OrderKind;
use serde::{Deserialize, Serialize};

/// Identifier of a geography; an index into the map's geography arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GeographyId(pub(crate) u8);

impl GeographyId {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// A container kind pairing a force with the orders available to units of
/// that force when stationed there. The classic map has three: inland and
/// coast offer Hold, Move, and Support; sea adds Convoy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geography {
    pub name: String,
    pub force: ForceId,
    pub orders: Vec<OrderKind>,
}

impl Geography {
    /// Whether a unit stationed here may issue the given order kind.
    pub fn offers(&self, kind: OrderKind) -> bool {
        self.orders.contains(&kind)
    }
}
