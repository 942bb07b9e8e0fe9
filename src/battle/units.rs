//! Units: a medal, four part slots and the runtime state driven by the gauge
//!
//! Units are built once at battle setup and never removed. Head loss makes a
//! unit `Broken`, which is terminal.

use serde::{Deserialize, Serialize};

use crate::battle::constants::GAUGE_MAX;
use crate::battle::parts::{Medal, Part, PartSet, PartSlot};
use crate::core::types::{TeamId, UnitId};

/// Scheduler state of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitState {
    /// Waiting for a part + target selection
    #[default]
    ReadyToSelect,
    /// Gauge filling at the selected part's charge rate
    Charging,
    /// Charged, waiting for its turn to execute
    ReadyToExecute,
    /// Gauge filling at the selected part's cooldown rate
    Cooldown,
    /// Head destroyed. Terminal.
    Broken,
}

/// Who picks actions for a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Controller {
    /// Selections arrive from the external selection collaborator
    Player,
    /// Auto-selected every time the unit becomes ready
    #[default]
    Ai,
}

/// A combat unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub team: TeamId,
    pub is_leader: bool,
    pub controller: Controller,
    pub medal: Medal,
    pub parts: PartSet,

    // Runtime state
    pub state: UnitState,
    pub gauge: f64, // 0.0 to 100.0
    pub selected_part: Option<PartSlot>,
    pub pending_target: Option<UnitId>,
    pub last_action_narration: String,
    pub evasion_disabled: bool,
    pub defense_disabled: bool,
}

impl Unit {
    pub fn new(id: UnitId, name: impl Into<String>, team: TeamId, medal: Medal) -> Self {
        Self {
            id,
            name: name.into(),
            team,
            is_leader: false,
            controller: Controller::default(),
            medal,
            parts: PartSet::default(),
            state: UnitState::ReadyToSelect,
            gauge: GAUGE_MAX,
            selected_part: None,
            pending_target: None,
            last_action_narration: String::new(),
            evasion_disabled: false,
            defense_disabled: false,
        }
    }

    pub fn with_parts(mut self, parts: impl IntoIterator<Item = Part>) -> Self {
        self.parts = PartSet::new(parts);
        self
    }

    pub fn as_leader(mut self) -> Self {
        self.is_leader = true;
        self
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = controller;
        self
    }

    /// Is this unit broken?
    pub fn is_broken(&self) -> bool {
        matches!(self.state, UnitState::Broken)
    }

    /// Is this unit still in the fight?
    pub fn is_alive(&self) -> bool {
        !self.is_broken()
    }

    /// Is this unit's gauge currently advancing?
    pub fn is_gauge_running(&self) -> bool {
        matches!(self.state, UnitState::Charging | UnitState::Cooldown)
    }

    /// The selected part, if it is still present and intact
    pub fn selected_intact_part(&self) -> Option<&Part> {
        self.selected_part.and_then(|slot| self.parts.intact(slot))
    }

    /// Slots this unit could select right now, in canonical order
    pub fn usable_action_slots(&self) -> Vec<PartSlot> {
        PartSlot::action_slots()
            .into_iter()
            .filter(|slot| self.parts.get(*slot).is_some_and(|p| p.is_usable()))
            .collect()
    }

    /// Head loss: terminal, discards any pending action
    pub fn mark_broken(&mut self) {
        self.state = UnitState::Broken;
        self.gauge = 0.0;
        self.selected_part = None;
        self.pending_target = None;
    }

    /// Back to action selection with everything from the last action cleared
    pub fn reset_to_select(&mut self) {
        self.state = UnitState::ReadyToSelect;
        self.gauge = 0.0;
        self.selected_part = None;
        self.pending_target = None;
        self.evasion_disabled = false;
        self.defense_disabled = false;
    }
}
