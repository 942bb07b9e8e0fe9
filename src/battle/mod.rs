//! Battle system - gauge-driven combat between two teams of part-built units
//!
//! Time is continuous, not turn-based: every unit fills a gauge at a rate
//! set by its selected part and legs, then acts.
//!
//! Key points:
//! - Selection -> charge -> execute -> cooldown, per unit
//! - Ranged targets lock at selection, melee targets are drawn on execution
//! - Losing the head breaks a unit; losing the leader loses the battle
//! - Narration pauses the acting unit until the UI acknowledges it

pub mod ai;
pub mod constants;
pub mod execution;
pub mod gauge;
pub mod narration;
pub mod outcome;
pub mod parts;
pub mod resolution;
pub mod roster;
pub mod snapshot;
pub mod targeting;
pub mod units;

// Re-exports for convenient access
pub use ai::{choose_action, AiChoice};
pub use constants::*;
pub use execution::{
    BattleEvent, BattleEventLog, BattleEventType, BattlePhase, BattleState, SelectionEvent,
    SelectionOptions, StepReport,
};
pub use gauge::{advance_gauge, begin_charging, enter_cooldown, gauge_speed, GaugeTransition};
pub use narration::{Narration, NarrationGate, NarrationKind, NarrationToken};
pub use outcome::{check_battle_end, designated_leaders, BattleOutcome};
pub use parts::{Medal, Part, PartCategory, PartSet, PartSlot, PartTrait};
pub use resolution::{
    calculate_damage, hit_chance, resolve_action, roll_hit, ActionResolution, DamageReport,
    HitRoll, ResolutionOutcome, VoidReason,
};
pub use roster::{demo_roster, mirror_roster, with_player_team};
pub use snapshot::{BattleSnapshot, PartSnapshot, UnitSnapshot};
pub use targeting::{live_opponents, resolve_target, TargetResolution};
pub use units::{Controller, Unit, UnitState};
