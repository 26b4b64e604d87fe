//! The round loop and what it leaves behind.

mod convergence;
mod phase;
mod record;
mod simulation;
mod trajectory;

pub use convergence::*;
pub use phase::*;
pub use record::*;
pub use simulation::*;
pub use trajectory::*;
