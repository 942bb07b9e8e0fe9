//! Combat resolution: hit check, damaged part, damage, part-break cascade
//!
//! Integer stats throughout; only the critical multiplier is fractional and
//! the final damage is truncated, never rounded.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::{CRITICAL_THRESHOLD, MIN_DAMAGE, ROLL_RANGE};
use crate::battle::narration;
use crate::battle::parts::{Part, PartCategory, PartSlot, PartTrait};
use crate::battle::targeting::{resolve_target, TargetResolution};
use crate::battle::units::Unit;
use crate::core::config::BalanceConfig;
use crate::core::types::UnitId;

/// Accuracy change granted by a part trait
pub fn trait_bonus(part_trait: PartTrait, config: &BalanceConfig) -> i32 {
    match part_trait {
        PartTrait::Normal => 0,
        PartTrait::Aim => config.hit.trait_aim_bonus,
        PartTrait::Strike => config.hit.trait_strike_bonus,
        PartTrait::Berserk => config.hit.trait_berserk_debuff,
    }
}

/// Mobility the target can use to evade (0 without intact legs or while
/// its evasion is disabled)
pub fn target_mobility(target: &Unit) -> i32 {
    if target.evasion_disabled {
        return 0;
    }
    target.parts.leg_mobility()
}

/// `max(0, base + accuracy - mobility)`. No upper clamp: the excess over 100
/// is the critical chance.
pub fn hit_chance(accuracy: i32, target_mobility: i32, config: &BalanceConfig) -> i32 {
    (config.hit.base_chance + accuracy - target_mobility).max(0)
}

/// Critical chance implied by a hit chance
pub fn critical_chance(hit_chance: i32) -> i32 {
    (hit_chance - CRITICAL_THRESHOLD).max(0)
}

/// Outcome of the hit and critical rolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRoll {
    pub hit_chance: i32,
    pub is_hit: bool,
    pub is_critical: bool,
}

/// Roll hit, then critical if the hit chance exceeds 100
///
/// Draws one number for the hit and a second only when a critical is
/// possible.
pub fn roll_hit<R: Rng>(hit_chance: i32, rng: &mut R) -> HitRoll {
    let is_hit = rng.gen_range(0..ROLL_RANGE) < hit_chance;
    let is_critical = is_hit
        && hit_chance > CRITICAL_THRESHOLD
        && rng.gen_range(0..ROLL_RANGE) < critical_chance(hit_chance);

    HitRoll {
        hit_chance,
        is_hit,
        is_critical,
    }
}

/// Defense the damaged part brings: its own plus intact legs, 0 while the
/// target's defense is disabled
pub fn defense_value(target: &Unit, damaged: &Part) -> i32 {
    if target.defense_disabled {
        return 0;
    }
    // A hit on the legs counts their defense twice
    damaged.defense + target.parts.leg_defense()
}

/// `floor(max(1, power - defense) * (critical ? multiplier : 1))`
pub fn calculate_damage(
    base_power: i32,
    defense: i32,
    is_critical: bool,
    config: &BalanceConfig,
) -> i32 {
    let mut raw = (base_power - defense).max(MIN_DAMAGE) as f64;
    if is_critical {
        raw *= config.damage.critical_multiplier;
    }
    raw.floor() as i32
}

/// Everything about the attacker the resolver needs, read before the target
/// is borrowed mutably
#[derive(Debug, Clone)]
pub struct AttackProfile {
    pub attacker: UnitId,
    pub attacker_name: String,
    pub part_name: String,
    pub category: PartCategory,
    pub accuracy: i32,
    pub base_power: i32,
}

impl AttackProfile {
    pub fn new(attacker: &Unit, part: &Part, config: &BalanceConfig) -> Self {
        let skill = attacker.medal.skill_for(part.category);

        let accuracy = part.accuracy + skill + trait_bonus(part.part_trait, config);

        let mut base_power = part.power + skill * config.damage.medal_skill_factor;
        if part.part_trait == PartTrait::Berserk {
            base_power += attacker.parts.leg_propulsion();
        }

        Self {
            attacker: attacker.id,
            attacker_name: attacker.name.clone(),
            part_name: part.name.clone(),
            category: part.category,
            accuracy,
            base_power,
        }
    }
}

/// Armor change applied to one part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub target: UnitId,
    pub slot: PartSlot,
    pub damage: i32,
    pub armor_before: i32,
    pub armor_after: i32,
    /// This hit broke the part
    pub part_broken: bool,
    /// This hit broke the head and with it the unit
    pub unit_broken: bool,
}

/// Apply damage to one part of `target`, cascading a head break to the unit
pub fn apply_damage(target: &mut Unit, slot: PartSlot, damage: i32) -> Option<DamageReport> {
    let part = target.parts.get_mut(slot)?;
    let armor_before = part.armor;
    let part_broken = part.take_damage(damage);
    let armor_after = part.armor;

    let unit_broken = part_broken && slot == PartSlot::Head && !target.is_broken();
    if unit_broken {
        target.mark_broken();
        tracing::debug!("{} {} head destroyed", target.id, target.name);
    }

    Some(DamageReport {
        target: target.id,
        slot,
        damage,
        armor_before,
        armor_after,
        part_broken,
        unit_broken,
    })
}

/// Uniform pick among the target's intact parts
pub fn select_damaged_part<R: Rng>(target: &Unit, rng: &mut R) -> Option<PartSlot> {
    target.parts.intact_slots().choose(rng).copied()
}

/// Why a valid selection produced no effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoidReason {
    /// The selected part broke before execution
    PartInvalid,
    /// The locked ranged target is gone
    TargetLost,
    /// No live opponent for a melee attack
    NoTarget,
}

/// Outcome of one executed action
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Voided {
        reason: VoidReason,
    },
    /// Non-attack part used
    Support,
    Miss {
        target: UnitId,
        roll: HitRoll,
    },
    Hit {
        target: UnitId,
        roll: HitRoll,
        report: DamageReport,
    },
    /// Hit a non-broken unit with no intact part; nothing applied
    NoValidPart {
        target: UnitId,
    },
}

impl ResolutionOutcome {
    pub fn is_voided(&self) -> bool {
        matches!(self, ResolutionOutcome::Voided { .. })
    }
}

/// A resolved action and its narration
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResolution {
    pub actor: UnitId,
    pub outcome: ResolutionOutcome,
    pub narration: String,
}

/// Resolve the selected action of `actor` against the current roster
///
/// Target resolution happens here, at execution time. Mutates only the
/// target's parts and state. None only when `actor` is not in `units`.
pub fn resolve_action<R: Rng>(
    units: &mut [Unit],
    actor: UnitId,
    config: &BalanceConfig,
    rng: &mut R,
) -> Option<ActionResolution> {
    let attacker_idx = units.iter().position(|u| u.id == actor)?;
    let attacker = &units[attacker_idx];

    let Some(part) = attacker.selected_intact_part() else {
        let part_name = attacker
            .selected_part
            .and_then(|slot| attacker.parts.get(slot))
            .map_or_else(|| "part".to_string(), |p| p.name.clone());
        return Some(ActionResolution {
            actor,
            outcome: ResolutionOutcome::Voided {
                reason: VoidReason::PartInvalid,
            },
            narration: narration::part_invalid(&attacker.name, &part_name),
        });
    };

    let profile = AttackProfile::new(attacker, part, config);

    let target_id = match resolve_target(units, attacker, profile.category, rng) {
        TargetResolution::Target(id) => id,
        TargetResolution::NotNeeded => {
            return Some(ActionResolution {
                actor,
                outcome: ResolutionOutcome::Support,
                narration: narration::support_used(&profile.attacker_name, &profile.part_name),
            });
        }
        TargetResolution::TargetLost(_) => {
            return Some(ActionResolution {
                actor,
                outcome: ResolutionOutcome::Voided {
                    reason: VoidReason::TargetLost,
                },
                narration: narration::target_lost(&profile.part_name),
            });
        }
        TargetResolution::NoCandidates => {
            return Some(ActionResolution {
                actor,
                outcome: ResolutionOutcome::Voided {
                    reason: VoidReason::NoTarget,
                },
                narration: narration::no_target(&profile.part_name),
            });
        }
    };

    let Some(target_idx) = units.iter().position(|u| u.id == target_id) else {
        return Some(ActionResolution {
            actor,
            outcome: ResolutionOutcome::Voided {
                reason: VoidReason::TargetLost,
            },
            narration: narration::target_lost(&profile.part_name),
        });
    };
    let target = &mut units[target_idx];

    let mobility = target_mobility(target);
    let roll = roll_hit(hit_chance(profile.accuracy, mobility, config), rng);
    tracing::debug!(
        "{} -> {}: accuracy {} vs mobility {}, hit chance {}, hit {}, critical {}",
        actor,
        target_id,
        profile.accuracy,
        mobility,
        roll.hit_chance,
        roll.is_hit,
        roll.is_critical
    );

    if !roll.is_hit {
        return Some(ActionResolution {
            actor,
            outcome: ResolutionOutcome::Miss {
                target: target_id,
                roll,
            },
            narration: narration::missed(&target.name),
        });
    }

    let Some(slot) = select_damaged_part(target, rng) else {
        tracing::warn!(
            "Invariant violation: live unit {} {} has no intact part to damage",
            target.id,
            target.name
        );
        return Some(ActionResolution {
            actor,
            outcome: ResolutionOutcome::NoValidPart { target: target_id },
            narration: narration::no_valid_part(&target.name),
        });
    };

    let (damage, part_name) = match target.parts.get(slot) {
        Some(damaged) => (
            calculate_damage(
                profile.base_power,
                defense_value(target, damaged),
                roll.is_critical,
                config,
            ),
            damaged.name.clone(),
        ),
        None => return None,
    };

    let report = apply_damage(target, slot, damage)?;
    let narration = narration::hit(&target.name, &part_name, &report, roll.is_critical);

    Some(ActionResolution {
        actor,
        outcome: ResolutionOutcome::Hit {
            target: target_id,
            roll,
            report,
        },
        narration,
    })
}
