//! Update rules: the value landscape they differentiate,
//! independent learning, and opponent-aware learning.

mod aware;
mod landscape;
mod naive;
mod updater;

pub use aware::*;
pub use landscape::*;
pub use naive::*;
pub use updater::*;
