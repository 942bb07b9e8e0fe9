//! Renderable battle snapshots for the UI layer

use serde::{Deserialize, Serialize};

use crate::battle::execution::BattleState;
use crate::battle::narration::NarrationToken;
use crate::battle::outcome::BattleOutcome;
use crate::battle::parts::{Part, PartSlot};
use crate::battle::units::{Unit, UnitState};
use crate::core::types::{TeamId, Tick, UnitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSnapshot {
    pub slot: PartSlot,
    pub name: String,
    pub armor: i32,
    pub max_armor: i32,
    pub is_broken: bool,
}

impl From<&Part> for PartSnapshot {
    fn from(part: &Part) -> Self {
        Self {
            slot: part.slot,
            name: part.name.clone(),
            armor: part.armor,
            max_armor: part.max_armor,
            is_broken: part.is_broken,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub name: String,
    pub team: TeamId,
    pub is_leader: bool,
    pub state: UnitState,
    pub gauge: f64,
    pub parts: Vec<PartSnapshot>,
    pub last_action: String,
}

impl From<&Unit> for UnitSnapshot {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            name: unit.name.clone(),
            team: unit.team,
            is_leader: unit.is_leader,
            state: unit.state,
            gauge: unit.gauge,
            parts: unit.parts.iter().map(PartSnapshot::from).collect(),
            last_action: unit.last_action_narration.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub tick: Tick,
    pub outcome: BattleOutcome,
    pub awaiting_acknowledgement: Option<NarrationToken>,
    pub units: Vec<UnitSnapshot>,
}

impl BattleSnapshot {
    pub fn capture(state: &BattleState) -> Self {
        Self {
            tick: state.tick,
            outcome: state.outcome,
            awaiting_acknowledgement: state.narration_gate().pending(),
            units: state.units.iter().map(UnitSnapshot::from).collect(),
        }
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.units.iter().find(|u| u.id == id)
    }
}
