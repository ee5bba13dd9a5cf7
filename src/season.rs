//! The season ticker.
//!
//! A season is a counter of phases from game start. Phase 0 is Pregame;
//! thereafter five phases repeat per year: Spring Diplomacy, Spring
//! Retreats, Fall Diplomacy, Fall Retreats, Builds. The year increments
//! when the count crosses into a Spring Diplomacy phase, so a Pregame
//! season stores `starting_year - 1`.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The step within a game year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Pregame,
    Diplomacy,
    Retreats,
    Builds,
    Postgame,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Phase::Pregame => "Pregame",
            Phase::Diplomacy => "Diplomacy",
            Phase::Retreats => "Retreats",
            Phase::Builds => "Builds",
            Phase::Postgame => "Postgame",
        })
    }
}

/// The half of the year a phase belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeasonName {
    Spring,
    Fall,
}

impl fmt::Display for SeasonName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            SeasonName::Spring => "Spring",
            SeasonName::Fall => "Fall",
        })
    }
}

/// A ticker tracking the current season of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    count: u32,
    year: i32,
    name: SeasonName,
    phase: Phase,
}

impl Season {
    /// A pregame season for a variant starting in the given year.
    pub fn new(starting_year: i32) -> Self {
        Season {
            count: 0,
            year: starting_year - 1,
            name: SeasonName::Spring,
            phase: Phase::Pregame,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn name(&self) -> SeasonName {
        self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Restores the pregame state for a variant starting in the given year.
    pub fn reset(&mut self, starting_year: i32) {
        *self = Season::new(starting_year);
    }

    fn set_name_phase(&mut self) {
        let k = self.count % 5;
        self.phase = match k {
            1 | 3 => Phase::Diplomacy,
            2 | 4 => Phase::Retreats,
            _ => Phase::Builds,
        };
        self.name = match k {
            1 | 2 => SeasonName::Spring,
            _ => SeasonName::Fall,
        };
    }

    /// The change in year resulting from shifting the count by `k` steps.
    fn year_diff(&self, k: i64) -> i64 {
        let count = i64::from(self.count);
        (4 + count + k).div_euclid(5) - (4 + count).div_euclid(5)
    }

    /// Moves the season forward `k` phases.
    pub fn progress(&mut self, k: u32) -> Result<(), Error> {
        if self.phase == Phase::Postgame {
            return Err(Error::game("cannot progress a concluded game"));
        }
        self.year += self.year_diff(i64::from(k)) as i32;
        self.count += k;
        self.set_name_phase();
        Ok(())
    }

    /// Moves the season backwards `k` phases. One cannot roll back to
    /// before the starting season.
    pub fn rollback(&mut self, k: u32) -> Result<(), Error> {
        if self.count <= k {
            return Err(Error::game(
                "cannot roll back to before the first season",
            ));
        }
        self.year += self.year_diff(-i64::from(k)) as i32;
        self.count -= k;
        self.set_name_phase();
        Ok(())
    }

    /// Puts the ticker into postgame mode. The count is left untouched so
    /// a later `rollback` returns the ticker to normal counting.
    pub fn conclude(&mut self) {
        self.phase = Phase::Postgame;
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.phase {
            Phase::Pregame => write!(f, "Pregame."),
            Phase::Postgame => write!(f, "Postgame."),
            Phase::Builds => write!(f, "Builds in {}.", self.year),
            _ => write!(f, "{} in {} {}.", self.phase, self.name, self.year),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_phase_cycle() {
        let mut season = Season::new(1901);
        assert_eq!(season.phase(), Phase::Pregame);
        assert_eq!(season.year(), 1900);

        let expected = [
            (Phase::Diplomacy, SeasonName::Spring, 1901),
            (Phase::Retreats, SeasonName::Spring, 1901),
            (Phase::Diplomacy, SeasonName::Fall, 1901),
            (Phase::Retreats, SeasonName::Fall, 1901),
            (Phase::Builds, SeasonName::Fall, 1901),
            (Phase::Diplomacy, SeasonName::Spring, 1902),
        ];
        for (phase, name, year) in expected {
            season.progress(1).unwrap();
            assert_eq!((season.phase(), season.name(), season.year()), (phase, name, year));
        }
    }

    #[test]
    fn rollback_is_inverse_of_progress() {
        let mut season = Season::new(1901);
        season.progress(7).unwrap();
        let snapshot = season;
        season.progress(3).unwrap();
        season.rollback(3).unwrap();
        assert_eq!(season, snapshot);
    }

    #[test]
    fn rollback_guards_the_first_season() {
        let mut season = Season::new(1901);
        season.progress(2).unwrap();
        assert!(season.rollback(2).is_err());
        assert!(season.rollback(1).is_ok());
    }

    #[test]
    fn conclude_enters_postgame() {
        let mut season = Season::new(1901);
        season.progress(5).unwrap();
        season.conclude();
        assert_eq!(season.phase(), Phase::Postgame);
        assert!(season.progress(1).is_err());
        season.rollback(1).unwrap();
        assert_eq!(season.phase(), Phase::Retreats);
        assert_eq!(season.year(), 1901);
    }
}
