//! Narration and the acknowledgement gate
//!
//! The acting unit's pipeline pauses after each narration until the UI
//! acknowledges it with the matching token. Only one narration is pending at
//! any time; gauges of every other unit keep ticking meanwhile.

use serde::{Deserialize, Serialize};

use crate::battle::resolution::DamageReport;
use crate::core::types::{TeamId, UnitId};

/// Handle the UI returns to resume a paused pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NarrationToken(pub u64);

/// Where in the action pipeline a narration was emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrationKind {
    /// Before target resolution and combat
    PreAction,
    /// After resolution; acknowledging it starts the cooldown
    PostAction,
}

/// A message for the UI plus the token that resumes the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narration {
    pub token: NarrationToken,
    pub unit: UnitId,
    pub kind: NarrationKind,
    pub text: String,
}

/// Suspend/resume state of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrationGate {
    #[default]
    Idle,
    AwaitingAcknowledgement(NarrationToken),
}

impl NarrationGate {
    pub fn is_idle(&self) -> bool {
        matches!(self, NarrationGate::Idle)
    }

    pub fn pending(&self) -> Option<NarrationToken> {
        match self {
            NarrationGate::Idle => None,
            NarrationGate::AwaitingAcknowledgement(token) => Some(*token),
        }
    }
}

// === MESSAGE TEXT ===

pub fn pre_action(actor: &str, part: &str, target: Option<&str>) -> String {
    match target {
        Some(target) => format!("{}: {} -> {}!", actor, part, target),
        None => format!("{}: {}!", actor, part),
    }
}

pub fn part_invalid(actor: &str, part: &str) -> String {
    format!("{}: {} is broken, the action failed", actor, part)
}

pub fn target_lost(part: &str) -> String {
    format!("{} failed: the target is gone", part)
}

pub fn no_target(part: &str) -> String {
    format!("{} found no target", part)
}

pub fn support_used(actor: &str, part: &str) -> String {
    format!("{} used {}", actor, part)
}

pub fn missed(target: &str) -> String {
    format!("{} evaded the attack!", target)
}

pub fn no_valid_part(target: &str) -> String {
    format!("{} has no part left to hit!", target)
}

pub fn hit(target: &str, part: &str, report: &DamageReport, critical: bool) -> String {
    let mut text = format!(
        "{}'s {} took {} damage! ({} -> {})",
        target, part, report.damage, report.armor_before, report.armor_after
    );
    if critical {
        text = format!("Critical! {}", text);
    }
    if report.part_broken {
        text.push_str(" [Broken!]");
    }
    if report.unit_broken {
        text.push_str(&format!(" {} is out of action!", target));
    }
    text
}

pub fn battle_won(winner: TeamId) -> String {
    format!("{} wins!", winner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::parts::PartSlot;

    fn report(part_broken: bool, unit_broken: bool) -> DamageReport {
        DamageReport {
            target: UnitId(2),
            slot: PartSlot::Head,
            damage: 12,
            armor_before: 20,
            armor_after: 8,
            part_broken,
            unit_broken,
        }
    }

    #[test]
    fn test_gate_pending_token() {
        assert_eq!(NarrationGate::Idle.pending(), None);
        let gate = NarrationGate::AwaitingAcknowledgement(NarrationToken(4));
        assert!(!gate.is_idle());
        assert_eq!(gate.pending(), Some(NarrationToken(4)));
    }

    #[test]
    fn test_pre_action_names_target_when_known() {
        assert_eq!(pre_action("Ace", "Rifle", Some("Bolt")), "Ace: Rifle -> Bolt!");
        assert_eq!(pre_action("Ace", "Sword", None), "Ace: Sword!");
    }

    #[test]
    fn test_hit_annotations() {
        let plain = hit("Bolt", "Vulcan", &report(false, false), false);
        assert_eq!(plain, "Bolt's Vulcan took 12 damage! (20 -> 8)");

        let crit = hit("Bolt", "Vulcan", &report(false, false), true);
        assert!(crit.starts_with("Critical! "));

        let broken = hit("Bolt", "Vulcan", &report(true, true), false);
        assert!(broken.contains("[Broken!]"));
        assert!(broken.ends_with("Bolt is out of action!"));
    }
}
