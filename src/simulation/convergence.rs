use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// A run converges once the largest policy change across both agents
/// stays within `tolerance` for `window` consecutive rounds.
/// A zero window never converges; a zero tolerance waits for frozen policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Convergence {
    pub window: usize,
    pub tolerance: Energy,
}

impl Convergence {
    pub fn disabled() -> Self {
        Self {
            window: 0,
            tolerance: CONVERGENCE_TOLERANCE,
        }
    }
    pub fn enabled(&self) -> bool {
        self.window > 0
    }
    pub fn validate(&self) -> Result<(), Error> {
        match self.tolerance.is_finite() && self.tolerance >= 0. {
            true => Ok(()),
            false => Err(Error::InvalidConfiguration(format!(
                "convergence tolerance {} must be finite and non-negative",
                self.tolerance
            ))),
        }
    }
    /// Extend or reset a streak of quiet rounds.
    pub fn observe(&self, streak: usize, change: Energy) -> usize {
        match change <= self.tolerance {
            true => streak + 1,
            false => 0,
        }
    }
    pub fn holds(&self, streak: usize) -> bool {
        self.enabled() && streak >= self.window
    }
}

impl Default for Convergence {
    fn default() -> Self {
        Self {
            window: CONVERGENCE_WINDOW,
            tolerance: CONVERGENCE_TOLERANCE,
        }
    }
}
