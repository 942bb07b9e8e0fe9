//! Battle execution loop
//!
//! Each tick: gauges -> AI selection -> execution -> win check. Player units
//! waiting for a selection are reported back to the caller.
//!
//! Executing an action is a pipeline paused by narration. Acknowledging the
//! pre-action narration resolves the action; acknowledging the post-action
//! narration starts the cooldown.

use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::ai;
use crate::battle::constants::{GAUGE_MAX, GAUGE_MIN};
use crate::battle::gauge::{advance_gauge, begin_charging, enter_cooldown, GaugeTransition};
use crate::battle::narration::{self, Narration, NarrationGate, NarrationKind, NarrationToken};
use crate::battle::outcome::{check_battle_end, designated_leaders, BattleOutcome};
use crate::battle::parts::{PartCategory, PartSlot};
use crate::battle::resolution::{resolve_action, ActionResolution, ResolutionOutcome, VoidReason};
use crate::battle::snapshot::BattleSnapshot;
use crate::battle::targeting::{find_unit, is_valid_target, live_opponents};
use crate::battle::units::{Controller, Unit, UnitState};
use crate::core::config::BalanceConfig;
use crate::core::error::{BattleError, Result, SelectionRejected};
use crate::core::types::{TeamId, Tick, UnitId};

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Active, // Gauges ticking
    Over, // A leader fell. Terminal.
}

/// A part + target choice for one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub unit: UnitId,
    pub slot: PartSlot,
    pub target: Option<UnitId>,
}

impl SelectionEvent {
    pub fn new(unit: UnitId, slot: PartSlot, target: Option<UnitId>) -> Self {
        Self { unit, slot, target }
    }
}

/// What a selection UI can offer a unit right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOptions {
    pub unit: UnitId,
    pub slots: Vec<PartSlot>,
    pub targets: Vec<UnitId>,
    pub default_target: Option<UnitId>,
}

/// Log entry for battle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub tick: Tick,
    pub event_type: BattleEventType,
    pub description: String,
}

impl BattleEvent {
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    ActionSelected {
        unit: UnitId,
        slot: PartSlot,
        target: Option<UnitId>,
    },
    ChargeComplete {
        unit: UnitId,
    },
    ActionCancelled {
        unit: UnitId,
        slot: Option<PartSlot>,
    },
    ActionStarted {
        unit: UnitId,
    },
    ActionVoided {
        unit: UnitId,
        reason: VoidReason,
    },
    SupportUsed {
        unit: UnitId,
    },
    AttackMissed {
        unit: UnitId,
        target: UnitId,
    },
    PartDamaged {
        unit: UnitId,
        target: UnitId,
        slot: PartSlot,
        damage: i32,
        critical: bool,
    },
    PartBroken {
        unit: UnitId,
        slot: PartSlot,
    },
    UnitBroken {
        unit: UnitId,
    },
    InvariantViolation {
        unit: UnitId,
    },
    CooldownStarted {
        unit: UnitId,
    },
    CooldownComplete {
        unit: UnitId,
    },
    BattleEnded {
        winner: TeamId,
    },
}

/// Events from a single tick or acknowledgement
#[derive(Debug, Clone, Default)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }

    pub fn count(&self, pred: impl Fn(&BattleEventType) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.event_type)).count()
    }
}

/// Everything a caller needs after driving the battle one step
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    pub events: BattleEventLog,
    /// Narration the UI must acknowledge before this pipeline resumes
    pub narration: Option<Narration>,
    /// Player units waiting for a selection, in id order
    pub awaiting_selection: Vec<UnitId>,
}

/// Complete battle state
#[derive(Debug, Clone)]
pub struct BattleState {
    // Core state
    pub units: Vec<Unit>,
    pub config: BalanceConfig,

    // Time
    pub tick: Tick,
    pub phase: BattlePhase,
    pub outcome: BattleOutcome,

    // Log
    pub battle_log: Vec<BattleEvent>,

    leaders: Vec<(TeamId, UnitId)>,
    execution_queue: VecDeque<UnitId>,
    pending: Option<Narration>,
    next_token: u64,
    step_events: BattleEventLog,

    rng: ChaCha8Rng,
    seed: u64,
    initial_units: Vec<Unit>,
}

impl BattleState {
    /// Set up a battle from a roster. Units are kept in id order.
    pub fn new(mut units: Vec<Unit>, config: BalanceConfig, seed: u64) -> Result<Self> {
        config.validate().map_err(BattleError::InvalidConfig)?;
        validate_roster(&units)?;
        units.sort_by_key(|u| u.id);

        let leaders = designated_leaders(&units);
        let execution_queue = units
            .iter()
            .filter(|u| u.state == UnitState::ReadyToExecute)
            .map(|u| u.id)
            .collect();

        tracing::debug!(
            "Battle created: {} units, {} leaders, seed {}",
            units.len(),
            leaders.len(),
            seed
        );

        Ok(Self {
            initial_units: units.clone(),
            units,
            config,
            tick: 0,
            phase: BattlePhase::Active,
            outcome: BattleOutcome::Ongoing,
            battle_log: Vec::new(),
            leaders,
            execution_queue,
            pending: None,
            next_token: 0,
            step_events: BattleEventLog::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        })
    }

    /// Is the battle over?
    pub fn is_over(&self) -> bool {
        matches!(self.phase, BattlePhase::Over)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Leaders designated at battle start
    pub fn leaders(&self) -> &[(TeamId, UnitId)] {
        &self.leaders
    }

    pub fn narration_gate(&self) -> NarrationGate {
        match &self.pending {
            Some(narration) => NarrationGate::AwaitingAcknowledgement(narration.token),
            None => NarrationGate::Idle,
        }
    }

    /// The narration waiting for acknowledgement, if any
    pub fn pending_narration(&self) -> Option<&Narration> {
        self.pending.as_ref()
    }

    pub fn get_unit(&self, unit_id: UnitId) -> Option<&Unit> {
        find_unit(&self.units, unit_id)
    }

    pub fn get_unit_mut(&mut self, unit_id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == unit_id)
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::capture(self)
    }

    /// Player units that can select an action right now
    pub fn awaiting_selection(&self) -> Vec<UnitId> {
        if self.is_over() {
            return Vec::new();
        }
        self.units
            .iter()
            .filter(|u| u.controller == Controller::Player && u.state == UnitState::ReadyToSelect)
            .filter(|u| !u.usable_action_slots().is_empty())
            .map(|u| u.id)
            .collect()
    }

    /// Log a battle event
    pub fn log_event(&mut self, event_type: BattleEventType, description: String) {
        let event = BattleEvent {
            tick: self.tick,
            event_type,
            description,
        };
        self.step_events.events.push(event.clone());
        self.battle_log.push(event);
    }

    /// End the battle with a winner
    pub fn end_battle(&mut self, winner: TeamId) {
        self.phase = BattlePhase::Over;
        self.outcome = BattleOutcome::Winner(winner);
        self.execution_queue.clear();
        tracing::info!("Battle over at tick {}: {} wins", self.tick, winner);
        self.log_event(
            BattleEventType::BattleEnded { winner },
            narration::battle_won(winner),
        );
    }

    /// Run the Win Evaluator. Announces a winner at most once.
    pub fn evaluate_outcome(&mut self) -> BattleOutcome {
        if self.is_over() {
            return self.outcome;
        }
        if let Some(winner) = check_battle_end(&self.units, &self.leaders) {
            self.end_battle(winner);
        }
        self.outcome
    }

    // ===== SELECTION =====

    /// Check a selection without touching any state
    pub fn validate_selection(
        &self,
        event: &SelectionEvent,
    ) -> std::result::Result<(), SelectionRejected> {
        if self.is_over() {
            return Err(SelectionRejected::BattleOver);
        }

        let unit = self
            .get_unit(event.unit)
            .ok_or(SelectionRejected::UnknownUnit(event.unit))?;

        if unit.state != UnitState::ReadyToSelect {
            return Err(SelectionRejected::NotReady {
                unit: unit.id,
                state: unit.state,
            });
        }

        let part = unit.parts.get(event.slot).ok_or(SelectionRejected::EmptySlot {
            unit: unit.id,
            slot: event.slot,
        })?;
        if part.is_broken {
            return Err(SelectionRejected::PartBroken {
                unit: unit.id,
                slot: event.slot,
            });
        }
        if part.charge <= 0 {
            return Err(SelectionRejected::NoCharge {
                unit: unit.id,
                slot: event.slot,
            });
        }

        let target = match (part.category, event.target) {
            (PartCategory::Shoot, None) => return Err(SelectionRejected::TargetRequired(unit.id)),
            (PartCategory::Shoot, Some(target)) | (PartCategory::Fight, Some(target)) => target,
            (PartCategory::Fight, None) | (PartCategory::None, _) => return Ok(()),
        };
        if !is_valid_target(&self.units, unit.team, target) {
            return Err(SelectionRejected::InvalidTarget {
                unit: unit.id,
                target,
            });
        }

        Ok(())
    }

    /// Apply a selection: the unit starts charging the chosen part
    ///
    /// A rejected selection leaves the battle untouched.
    pub fn select(&mut self, event: SelectionEvent) -> std::result::Result<(), SelectionRejected> {
        self.validate_selection(&event)?;

        let unit = self
            .get_unit_mut(event.unit)
            .ok_or(SelectionRejected::UnknownUnit(event.unit))?;
        let (category, part_name) = match unit.parts.get(event.slot) {
            Some(part) => (part.category, part.name.clone()),
            None => {
                return Err(SelectionRejected::EmptySlot {
                    unit: event.unit,
                    slot: event.slot,
                })
            }
        };
        // Support parts never carry a target
        let target = if category.is_attack() {
            event.target
        } else {
            None
        };
        begin_charging(unit, event.slot, target);
        let unit_name = unit.name.clone();

        tracing::debug!(
            "{} {} selected {:?} ({}) target {:?}",
            event.unit,
            unit_name,
            event.slot,
            part_name,
            target
        );
        let description = match target.and_then(|t| self.get_unit(t)) {
            Some(target_unit) => format!(
                "{} readies {} against {}",
                unit_name, part_name, target_unit.name
            ),
            None => format!("{} readies {}", unit_name, part_name),
        };
        self.log_event(
            BattleEventType::ActionSelected {
                unit: event.unit,
                slot: event.slot,
                target,
            },
            description,
        );
        Ok(())
    }

    /// Slots and targets a selection UI can offer, with a random default
    /// target drawn from the battle's generator
    pub fn selection_options(&mut self, unit_id: UnitId) -> Option<SelectionOptions> {
        let unit = find_unit(&self.units, unit_id)?;
        let slots = unit.usable_action_slots();
        let targets = live_opponents(&self.units, unit.team);
        let default_target = targets.choose(&mut self.rng).copied();

        Some(SelectionOptions {
            unit: unit_id,
            slots,
            targets,
            default_target,
        })
    }

    /// Let the AI policy pick for one unit. Returns whether it selected.
    pub fn auto_select(&mut self, unit_id: UnitId) -> bool {
        let Some(unit) = find_unit(&self.units, unit_id) else {
            return false;
        };
        let Some(choice) = ai::choose_action(&self.units, unit, &mut self.rng) else {
            tracing::debug!("{} has no action to select", unit_id);
            return false;
        };

        match self.select(SelectionEvent::new(unit_id, choice.slot, choice.target)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("AI selection for {} rejected: {}", unit_id, e);
                false
            }
        }
    }

    // ===== TICK =====

    /// Run a complete battle tick
    pub fn run_tick(&mut self) -> StepReport {
        if self.is_over() {
            return self.take_report(None);
        }

        // ===== PHASE 1: GAUGES =====
        self.phase_gauges();

        // ===== PHASE 2: AI SELECTION =====
        self.phase_ai_selection();

        // ===== PHASE 3: EXECUTION =====
        let narration = self.phase_execution();

        // ===== PHASE 4: POST-TICK =====
        self.phase_post_tick();

        self.take_report(narration)
    }

    fn phase_gauges(&mut self) {
        let mut transitions = Vec::new();
        for unit in self.units.iter_mut() {
            let transition = advance_gauge(unit, &self.config);
            if transition != GaugeTransition::None {
                transitions.push((unit.id, unit.name.clone(), transition));
            }
        }

        for (id, name, transition) in transitions {
            match transition {
                GaugeTransition::ChargeComplete => {
                    self.execution_queue.push_back(id);
                    self.log_event(
                        BattleEventType::ChargeComplete { unit: id },
                        format!("{} is ready to act", name),
                    );
                }
                GaugeTransition::CooldownComplete => {
                    self.log_event(
                        BattleEventType::CooldownComplete { unit: id },
                        format!("{} is ready for orders", name),
                    );
                }
                GaugeTransition::Cancelled { slot } => {
                    self.execution_queue.retain(|queued| *queued != id);
                    self.log_event(
                        BattleEventType::ActionCancelled { unit: id, slot },
                        format!("{} lost its part, the action was cancelled", name),
                    );
                }
                GaugeTransition::HeadBroken => {
                    self.execution_queue.retain(|queued| *queued != id);
                    self.log_event(
                        BattleEventType::UnitBroken { unit: id },
                        format!("{} is out of action!", name),
                    );
                }
                GaugeTransition::None => {}
            }
        }
    }

    fn phase_ai_selection(&mut self) {
        let ready: Vec<UnitId> = self
            .units
            .iter()
            .filter(|u| u.controller == Controller::Ai && u.state == UnitState::ReadyToSelect)
            .map(|u| u.id)
            .collect();

        for unit_id in ready {
            self.auto_select(unit_id);
        }
    }

    /// Start the next queued action, unless a narration is still pending
    fn phase_execution(&mut self) -> Option<Narration> {
        if self.pending.is_some() {
            return None;
        }

        while let Some(unit_id) = self.execution_queue.pop_front() {
            let ready = self
                .get_unit(unit_id)
                .is_some_and(|u| u.state == UnitState::ReadyToExecute);
            if ready {
                return self.start_action(unit_id);
            }
        }
        None
    }

    fn phase_post_tick(&mut self) {
        self.evaluate_outcome();

        // Advance tick counter
        self.tick += 1;
    }

    // ===== ACTION PIPELINE =====

    fn start_action(&mut self, unit_id: UnitId) -> Option<Narration> {
        let unit = self.get_unit(unit_id)?;

        let text = match unit.selected_intact_part() {
            Some(part) => {
                let target_name = match part.category {
                    PartCategory::Shoot => unit
                        .pending_target
                        .and_then(|t| self.get_unit(t))
                        .filter(|t| t.is_alive())
                        .map(|t| t.name.clone()),
                    _ => None,
                };
                narration::pre_action(&unit.name, &part.name, target_name.as_deref())
            }
            // Part lost while waiting to execute: report the failure directly
            None => return self.resolve_and_report(unit_id),
        };

        tracing::debug!("{} starts its action: {}", unit_id, text);
        self.log_event(BattleEventType::ActionStarted { unit: unit_id }, text.clone());
        Some(self.emit(unit_id, NarrationKind::PreAction, text))
    }

    /// Resolve the unit's action, run the Win Evaluator, then narrate the result
    fn resolve_and_report(&mut self, unit_id: UnitId) -> Option<Narration> {
        let resolution =
            match resolve_action(&mut self.units, unit_id, &self.config, &mut self.rng) {
                Some(resolution) => resolution,
                None => {
                    tracing::warn!("Action of {} could not be resolved", unit_id);
                    ActionResolution {
                        actor: unit_id,
                        outcome: ResolutionOutcome::Voided {
                            reason: VoidReason::PartInvalid,
                        },
                        narration: narration::part_invalid(&unit_id.to_string(), "part"),
                    }
                }
            };

        self.record_resolution(&resolution);
        if let Some(unit) = self.get_unit_mut(unit_id) {
            unit.last_action_narration = resolution.narration.clone();
        }
        self.evaluate_outcome();

        Some(self.emit(unit_id, NarrationKind::PostAction, resolution.narration))
    }

    fn record_resolution(&mut self, resolution: &ActionResolution) {
        let unit = resolution.actor;
        let text = resolution.narration.clone();

        match resolution.outcome {
            ResolutionOutcome::Voided { reason } => {
                self.log_event(BattleEventType::ActionVoided { unit, reason }, text);
            }
            ResolutionOutcome::Support => {
                self.log_event(BattleEventType::SupportUsed { unit }, text);
            }
            ResolutionOutcome::Miss { target, .. } => {
                self.log_event(BattleEventType::AttackMissed { unit, target }, text);
            }
            ResolutionOutcome::NoValidPart { target } => {
                self.log_event(BattleEventType::InvariantViolation { unit: target }, text);
            }
            ResolutionOutcome::Hit { target, roll, report } => {
                self.log_event(
                    BattleEventType::PartDamaged {
                        unit,
                        target,
                        slot: report.slot,
                        damage: report.damage,
                        critical: roll.is_critical,
                    },
                    text,
                );
                let target_name = self
                    .get_unit(target)
                    .map_or_else(|| target.to_string(), |t| t.name.clone());
                if report.part_broken {
                    self.log_event(
                        BattleEventType::PartBroken {
                            unit: target,
                            slot: report.slot,
                        },
                        format!("{}'s {} is broken", target_name, report.slot.label()),
                    );
                }
                if report.unit_broken {
                    self.execution_queue.retain(|queued| *queued != target);
                    self.log_event(
                        BattleEventType::UnitBroken { unit: target },
                        format!("{} is out of action!", target_name),
                    );
                }
            }
        }
    }

    fn finish_action(&mut self, unit_id: UnitId) {
        let Some(unit) = self.get_unit_mut(unit_id) else {
            return;
        };
        if unit.is_broken() {
            return;
        }
        enter_cooldown(unit);
        let description = format!("{} is cooling down", unit.name);
        self.log_event(BattleEventType::CooldownStarted { unit: unit_id }, description);
    }

    fn emit(&mut self, unit: UnitId, kind: NarrationKind, text: String) -> Narration {
        self.next_token += 1;
        let narration = Narration {
            token: NarrationToken(self.next_token),
            unit,
            kind,
            text,
        };
        self.pending = Some(narration.clone());
        narration
    }

    /// Resume the paused pipeline
    ///
    /// Acknowledging a pre-action narration resolves the action and returns
    /// the post-action narration; acknowledging that one starts the cooldown.
    /// A token that does not match the pending narration changes nothing.
    pub fn acknowledge(&mut self, token: NarrationToken) -> Result<StepReport> {
        let narration = match self.pending.take() {
            Some(narration) if narration.token == token => narration,
            other => {
                let expected = other.as_ref().map(|n| n.token);
                self.pending = other;
                tracing::warn!(
                    "Rejected acknowledgement {:?}, expected {:?}",
                    token,
                    expected
                );
                return Err(BattleError::UnexpectedAcknowledgement {
                    expected,
                    received: token,
                });
            }
        };

        if self.is_over() {
            return Ok(self.take_report(None));
        }

        let next = match narration.kind {
            NarrationKind::PreAction => self.resolve_and_report(narration.unit),
            NarrationKind::PostAction => {
                self.finish_action(narration.unit);
                None
            }
        };
        Ok(self.take_report(next))
    }

    fn take_report(&mut self, narration: Option<Narration>) -> StepReport {
        StepReport {
            events: std::mem::take(&mut self.step_events),
            narration,
            awaiting_selection: self.awaiting_selection(),
        }
    }

    // ===== DRIVERS =====

    /// Acknowledge narration until the gate is idle
    pub fn acknowledge_all(&mut self) {
        while let Some(token) = self.narration_gate().pending() {
            if let Err(e) = self.acknowledge(token) {
                tracing::warn!("Auto-acknowledge failed: {}", e);
                break;
            }
        }
    }

    /// Run headless until a leader falls or `max_ticks` more ticks pass
    ///
    /// Narration is acknowledged immediately and player units are driven by
    /// the AI policy.
    pub fn run_until_over(&mut self, max_ticks: Tick) -> BattleOutcome {
        let limit = self.tick.saturating_add(max_ticks);
        self.acknowledge_all();

        while !self.is_over() && self.tick < limit {
            let report = self.run_tick();
            for unit_id in report.awaiting_selection {
                self.auto_select(unit_id);
            }
            self.acknowledge_all();
        }
        self.outcome
    }

    /// Rebuild the battle from the initial roster and seed
    pub fn restart(&mut self) -> Result<()> {
        let units = std::mem::take(&mut self.initial_units);
        *self = Self::new(units, self.config.clone(), self.seed)?;
        tracing::debug!("Battle restarted with seed {}", self.seed);
        Ok(())
    }
}

/// Reject rosters the scheduler cannot run
fn validate_roster(units: &[Unit]) -> Result<()> {
    if units.is_empty() {
        return Err(BattleError::InvalidRoster("roster is empty".into()));
    }

    let mut ids = HashSet::new();
    for unit in units {
        if !ids.insert(unit.id) {
            return Err(BattleError::InvalidRoster(format!(
                "duplicate unit id {}",
                unit.id
            )));
        }

        let Some(head) = unit.parts.get(PartSlot::Head) else {
            return Err(BattleError::InvalidRoster(format!(
                "unit {} {} has no head part",
                unit.id, unit.name
            )));
        };
        if head.is_broken && !unit.is_broken() {
            return Err(BattleError::InvalidRoster(format!(
                "unit {} {} has a broken head but is not broken",
                unit.id, unit.name
            )));
        }

        for part in unit.parts.iter() {
            let armor_ok = (0..=part.max_armor).contains(&part.armor);
            if !armor_ok || part.is_broken != (part.armor == 0) {
                return Err(BattleError::InvalidRoster(format!(
                    "unit {} part {} has armor {}/{} with broken = {}",
                    unit.id, part.name, part.armor, part.max_armor, part.is_broken
                )));
            }
        }

        if !(GAUGE_MIN..=GAUGE_MAX).contains(&unit.gauge) {
            return Err(BattleError::InvalidRoster(format!(
                "unit {} gauge {} out of range",
                unit.id, unit.gauge
            )));
        }
    }

    for team in TeamId::all() {
        let leaders = units
            .iter()
            .filter(|u| u.team == team && u.is_leader)
            .count();
        if leaders > 1 {
            return Err(BattleError::InvalidRoster(format!(
                "{} has {} leaders",
                team, leaders
            )));
        }
    }

    Ok(())
}
