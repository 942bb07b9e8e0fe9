//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for units
///
/// Ids are assigned by whoever builds the roster. Ordering by id is the
/// stable tie-break wherever the battle needs a deterministic order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Battle tick counter (one discrete, synchronous time step)
pub type Tick = u64;

/// The two sides of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TeamId {
    Team1,
    Team2,
}

impl TeamId {
    /// Both teams in evaluation order
    pub fn all() -> [TeamId; 2] {
        [TeamId::Team1, TeamId::Team2]
    }

    /// The opposing team
    pub fn opponent(&self) -> TeamId {
        match self {
            TeamId::Team1 => TeamId::Team2,
            TeamId::Team2 => TeamId::Team1,
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamId::Team1 => write!(f, "Team 1"),
            TeamId::Team2 => write!(f, "Team 2"),
        }
    }
}
