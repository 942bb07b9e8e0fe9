//! Win evaluation: a team loses when the leader it started with is broken

use serde::{Deserialize, Serialize};

use crate::battle::targeting::find_unit;
use crate::battle::units::Unit;
use crate::core::types::{TeamId, UnitId};

/// Battle outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattleOutcome {
    #[default]
    Ongoing,
    Winner(TeamId),
}

impl BattleOutcome {
    pub fn winner(&self) -> Option<TeamId> {
        match self {
            BattleOutcome::Ongoing => None,
            BattleOutcome::Winner(team) => Some(*team),
        }
    }
}

/// Leaders designated at battle start, in team order
pub fn designated_leaders(units: &[Unit]) -> Vec<(TeamId, UnitId)> {
    TeamId::all()
        .into_iter()
        .filter_map(|team| {
            units
                .iter()
                .find(|u| u.team == team && u.is_leader)
                .map(|u| (team, u.id))
        })
        .collect()
}

/// Is this leader still in the fight? A leader missing from the roster
/// counts as dead.
pub fn leader_alive(units: &[Unit], leader: UnitId) -> bool {
    find_unit(units, leader).is_some_and(|u| u.is_alive())
}

/// The winner, if a designated leader has fallen
///
/// Teams are checked in order; the first team with a dead leader loses.
pub fn check_battle_end(units: &[Unit], leaders: &[(TeamId, UnitId)]) -> Option<TeamId> {
    leaders
        .iter()
        .find(|(_, leader)| !leader_alive(units, *leader))
        .map(|(team, _)| team.opponent())
}
