use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// How a schedule moves away from its initial value over rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Decay {
    #[default]
    Constant,
    /// Subtract `slope` every round.
    Linear { slope: f64 },
    /// Multiply by `factor` every round.
    Exponential { factor: f64 },
}

/// A per-round value (temperature, exploration rate, learning rate)
/// that starts at `initial`, decays, and never drops below `floor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub initial: f64,
    #[serde(default)]
    pub decay: Decay,
    #[serde(default)]
    pub floor: f64,
}

impl Schedule {
    pub fn constant(initial: f64) -> Self {
        Self {
            initial,
            decay: Decay::Constant,
            floor: 0.,
        }
    }
    pub fn linear(initial: f64, slope: f64, floor: f64) -> Self {
        Self {
            initial,
            decay: Decay::Linear { slope },
            floor,
        }
    }
    pub fn exponential(initial: f64, factor: f64, floor: f64) -> Self {
        Self {
            initial,
            decay: Decay::Exponential { factor },
            floor,
        }
    }

    /// Value in effect during a round.
    pub fn at(&self, round: usize) -> f64 {
        let t = round as f64;
        match self.decay {
            Decay::Constant => self.initial,
            Decay::Linear { slope } => self.initial - slope * t,
            Decay::Exponential { factor } => self.initial * factor.powf(t),
        }
        .max(self.floor)
    }

    /// The value must stay finite and strictly positive at every round.
    pub fn validate(&self, name: &str) -> Result<(), Error> {
        let invalid = |reason: &str| Err(Error::InvalidConfiguration(format!("{} {}", name, reason)));
        if !self.initial.is_finite() || self.initial <= 0. {
            return invalid("must start finite and positive");
        }
        if !self.floor.is_finite() || self.floor < 0. || self.floor > self.initial {
            return invalid("floor must lie in [0, initial]");
        }
        match self.decay {
            Decay::Constant => Ok(()),
            _ if self.floor <= 0. => invalid("needs a positive floor to decay"),
            Decay::Linear { slope } if !slope.is_finite() || slope < 0. => {
                invalid("slope must be finite and non-negative")
            }
            Decay::Exponential { factor } if !(factor > 0. && factor <= 1.) => {
                invalid("factor must lie in (0, 1]")
            }
            _ => Ok(()),
        }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::constant(DEFAULT_LEARNING_RATE)
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.decay {
            Decay::Constant => write!(f, "{}", self.initial),
            Decay::Linear { slope } => write!(f, "{}-{}t≥{}", self.initial, slope, self.floor),
            Decay::Exponential { factor } => {
                write!(f, "{}·{}^t≥{}", self.initial, factor, self.floor)
            }
        }
    }
}
