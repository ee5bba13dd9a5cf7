//! The immutable board topology: provinces, locations, and the queries the
//! resolver asks of them.

mod force;
mod geography;
mod location;
mod map;
mod province;

pub use self::force::{Force, ForceId};
pub use self::geography::{Geography, GeographyId};
pub use self::location::{Location, LocationId};
pub use self::map::{LocationRef, Map};
pub use self::province::{Province, ProvinceId};
