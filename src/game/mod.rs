//! Repeated bimatrix games.

mod joint;
mod memory;
mod payoff;

pub use joint::*;
pub use memory::*;
pub use payoff::*;
