use thiserror::Error;

use crate::battle::narration::NarrationToken;
use crate::battle::parts::PartSlot;
use crate::battle::units::UnitState;
use crate::core::types::UnitId;

/// Why a selection event was refused. The battle state is never touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionRejected {
    #[error("Battle is already over")]
    BattleOver,

    #[error("Unit not found: {0}")]
    UnknownUnit(UnitId),

    #[error("Unit {unit} cannot select an action while {state:?}")]
    NotReady { unit: UnitId, state: UnitState },

    #[error("Unit {unit} has no part in slot {slot:?}")]
    EmptySlot { unit: UnitId, slot: PartSlot },

    #[error("Part {slot:?} of unit {unit} is broken")]
    PartBroken { unit: UnitId, slot: PartSlot },

    #[error("Part {slot:?} of unit {unit} has no charge time")]
    NoCharge { unit: UnitId, slot: PartSlot },

    #[error("Ranged action of unit {0} needs a target")]
    TargetRequired(UnitId),

    #[error("Unit {target} is not a valid target for unit {unit}")]
    InvalidTarget { unit: UnitId, target: UnitId },
}

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Acknowledgement {received:?} does not match pending narration {expected:?}")]
    UnexpectedAcknowledgement {
        expected: Option<NarrationToken>,
        received: NarrationToken,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, BattleError>;
