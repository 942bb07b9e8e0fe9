//! Battle constants that are not balance knobs
//!
//! Tunable numbers live in `BalanceConfig`; these are fixed by the rules.

// Gauge
pub const GAUGE_MIN: f64 = 0.0;
pub const GAUGE_MAX: f64 = 100.0;

// Dice: hit and critical rolls are uniform over [0, ROLL_RANGE)
pub const ROLL_RANGE: i32 = 100;

// Hit chance above this is reinterpreted as critical chance
pub const CRITICAL_THRESHOLD: i32 = 100;

// Smallest damage a landed hit deals before the critical multiplier
pub const MIN_DAMAGE: i32 = 1;

// Headless runs give up after this many ticks
pub const DEFAULT_MAX_TICKS: u64 = 100_000;
