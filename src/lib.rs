//! Gauge Battle - real-time-gauge combat between two teams of modular units

pub mod battle;
pub mod core;
