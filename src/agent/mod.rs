//! Learners and scripted players: parameters, schedules and per-round snapshots.

mod agent;
mod params;
mod representation;
mod snapshot;
mod strategy;

pub use agent::*;
pub use params::*;
pub use representation::*;
pub use snapshot::*;
pub use strategy::*;
