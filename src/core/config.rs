//! Balance configuration with documented constants
//!
//! Every tuning number used by the gauge scheduler and the combat resolver
//! lives here. The config is owned by the battle and passed by reference into
//! the systems that need it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{BattleError, Result};

/// Tuning for gauge progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeBalance {
    /// Weight of leg propulsion in the gauge speed
    ///
    /// At 0.5, a propulsion of 20 adds as much speed as a charge stat of 10.
    pub propulsion_effect_rate: f64,

    /// Divisor applied to the combined charge/cooldown + propulsion stat
    ///
    /// At 50.0, a combined stat of 50 fills the gauge in 100 ticks.
    /// Larger = slower battles.
    pub overall_time_divisor: f64,
}

impl Default for TimeBalance {
    fn default() -> Self {
        Self {
            propulsion_effect_rate: 0.5,
            overall_time_divisor: 50.0,
        }
    }
}

/// Tuning for the hit check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitBalance {
    /// Hit chance before accuracy and mobility are applied
    pub base_chance: i32,

    /// Accuracy bonus of aim parts (pays with own evasion)
    pub trait_aim_bonus: i32,

    /// Accuracy bonus of strike parts (pays with own defense)
    pub trait_strike_bonus: i32,

    /// Accuracy change of berserk parts; zero or negative
    pub trait_berserk_debuff: i32,
}

impl Default for HitBalance {
    fn default() -> Self {
        Self {
            base_chance: 75,
            trait_aim_bonus: 50,
            trait_strike_bonus: 20,
            trait_berserk_debuff: -10,
        }
    }
}

/// Tuning for damage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageBalance {
    /// Multiplier on raw damage for a critical hit, applied before truncation
    pub critical_multiplier: f64,

    /// Power added per point of the matching medal skill
    pub medal_skill_factor: i32,
}

impl Default for DamageBalance {
    fn default() -> Self {
        Self {
            critical_multiplier: 1.5,
            medal_skill_factor: 2,
        }
    }
}

/// All balance constants consumed by the battle core
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub time: TimeBalance,
    pub hit: HitBalance,
    pub damage: DamageBalance,
}

impl BalanceConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, value) in [
            ("propulsion_effect_rate", self.time.propulsion_effect_rate),
            ("overall_time_divisor", self.time.overall_time_divisor),
            ("critical_multiplier", self.damage.critical_multiplier),
        ] {
            if !value.is_finite() {
                return Err(format!("{} ({}) must be a finite number", name, value));
            }
        }

        if self.time.overall_time_divisor <= 0.0 {
            return Err(format!(
                "overall_time_divisor ({}) must be positive",
                self.time.overall_time_divisor
            ));
        }

        if self.time.propulsion_effect_rate < 0.0 {
            return Err(format!(
                "propulsion_effect_rate ({}) must not be negative",
                self.time.propulsion_effect_rate
            ));
        }

        if self.damage.critical_multiplier < 1.0 {
            return Err(format!(
                "critical_multiplier ({}) should be >= 1.0",
                self.damage.critical_multiplier
            ));
        }

        if self.hit.trait_berserk_debuff > 0 {
            return Err(format!(
                "trait_berserk_debuff ({}) must be zero or negative",
                self.hit.trait_berserk_debuff
            ));
        }

        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BalanceConfig = toml::from_str(content)?;
        config.validate().map_err(BattleError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}
