//! Gauge scheduler
//!
//! ReadyToSelect -> Charging -> ReadyToExecute -> Cooldown -> ReadyToSelect.
//! Only Charging and Cooldown advance the gauge. Broken is reachable from any
//! state the moment the head part breaks.

use crate::battle::constants::{GAUGE_MAX, GAUGE_MIN};
use crate::battle::parts::PartSlot;
use crate::battle::units::{Unit, UnitState};
use crate::core::config::BalanceConfig;
use crate::core::types::UnitId;

/// What happened to a unit during one gauge step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeTransition {
    /// Nothing changed state (gauge may have moved)
    None,
    /// Charging -> ReadyToExecute
    ChargeComplete,
    /// Cooldown -> ReadyToSelect
    CooldownComplete,
    /// Selected part lost mid-charge or mid-cooldown -> ReadyToSelect
    Cancelled { slot: Option<PartSlot> },
    /// Head lost -> Broken
    HeadBroken,
}

/// Gauge gained per tick by a unit in its current state
///
/// The stat is the selected part's charge while charging and its cooldown
/// while cooling down. Intact legs add propulsion scaled by the balance rate.
pub fn gauge_speed(unit: &Unit, config: &BalanceConfig) -> f64 {
    let stat_value = match (unit.state, unit.selected_intact_part()) {
        (UnitState::Charging, Some(part)) => part.charge,
        (UnitState::Cooldown, Some(part)) => part.cooldown,
        _ => 0,
    };
    let leg_propulsion = unit.parts.leg_propulsion();

    (stat_value as f64 + leg_propulsion as f64 * config.time.propulsion_effect_rate)
        / config.time.overall_time_divisor
}

/// Advance one unit by one tick
pub fn advance_gauge(unit: &mut Unit, config: &BalanceConfig) -> GaugeTransition {
    if unit.is_broken() {
        return GaugeTransition::None;
    }

    if unit.parts.is_head_broken() {
        unit.mark_broken();
        tracing::debug!("{} {} lost its head and is broken", unit.id, unit.name);
        return GaugeTransition::HeadBroken;
    }

    if !unit.is_gauge_running() {
        return GaugeTransition::None;
    }

    if unit.selected_intact_part().is_none() {
        let slot = unit.selected_part;
        unit.reset_to_select();
        tracing::debug!(
            "{} {} lost its selected part {:?}, action cancelled",
            unit.id,
            unit.name,
            slot
        );
        return GaugeTransition::Cancelled { slot };
    }

    let speed = gauge_speed(unit, config);
    if speed > 0.0 {
        unit.gauge = (unit.gauge + speed).clamp(GAUGE_MIN, GAUGE_MAX);
    } else {
        // Nothing drives the gauge (zero stat, no legs): the phase has no wait
        unit.gauge = GAUGE_MAX;
    }

    if unit.gauge < GAUGE_MAX {
        return GaugeTransition::None;
    }

    match unit.state {
        UnitState::Charging => {
            unit.state = UnitState::ReadyToExecute;
            unit.gauge = GAUGE_MIN;
            tracing::debug!("{} {} finished charging", unit.id, unit.name);
            GaugeTransition::ChargeComplete
        }
        UnitState::Cooldown => {
            unit.reset_to_select();
            tracing::debug!("{} {} finished cooldown", unit.id, unit.name);
            GaugeTransition::CooldownComplete
        }
        _ => GaugeTransition::None,
    }
}

/// Start charging a validated selection and apply the trait's self-effects
pub fn begin_charging(unit: &mut Unit, slot: PartSlot, target: Option<UnitId>) {
    let part_trait = unit.parts.get(slot).map(|p| p.part_trait).unwrap_or_default();

    unit.selected_part = Some(slot);
    unit.pending_target = target;
    unit.state = UnitState::Charging;
    unit.gauge = GAUGE_MIN;
    unit.evasion_disabled = part_trait.disables_evasion();
    unit.defense_disabled = part_trait.disables_defense();
}

/// Execution finished: start the cooldown from an empty gauge
///
/// No-op for a broken unit.
pub fn enter_cooldown(unit: &mut Unit) {
    if unit.is_broken() {
        return;
    }
    unit.state = UnitState::Cooldown;
    unit.gauge = GAUGE_MIN;
}
