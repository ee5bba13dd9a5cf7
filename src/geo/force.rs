//! Unit kinds.

use crate::order::OrderKind;
use crate::ShortName;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identifier of a force; an index into the map's force arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ForceId(pub(crate) u8);

impl ForceId {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// A kind of unit ("Army", "Fleet"). A force knows which order kinds its
/// units may be the object of (an army may be convoyed, a fleet may not)
/// and which coast specifiers its locations may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Force {
    pub name: String,
    /// Order kinds a unit of this force may be the object of.
    pub may_receive: Vec<OrderKind>,
    /// Coast specifiers appearing in location names for this force, in
    /// display form ("(south coast)").
    pub specifiers: Vec<String>,
    /// Short forms of the specifiers, index-aligned ("(sc)").
    pub short_forms: Vec<String>,
}

impl Force {
    /// Whether a unit of this force may be the object of the given order
    /// kind.
    pub fn may_receive(&self, kind: OrderKind) -> bool {
        self.may_receive.contains(&kind)
    }

    /// Expands a specifier short form ("(sc)") to its display form.
    pub fn expand_specifier(&self, short: &str) -> Option<&str> {
        self.short_forms
            .iter()
            .position(|s| s.eq_ignore_ascii_case(short))
            .map(|i| self.specifiers[i].as_str())
    }
}

impl ShortName for Force {
    fn short_name(&self) -> Cow<'_, str> {
        Cow::Owned(self.name[..1].to_uppercase())
    }
}

impl fmt::Display for Force {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}
