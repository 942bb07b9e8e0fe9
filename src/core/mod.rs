pub mod config;
pub mod error;
pub mod types;

pub use config::BalanceConfig;
pub use error::{BattleError, Result, SelectionRejected};
pub use types::{TeamId, Tick, UnitId};
