use super::*;
use serde::Deserialize;
use serde::Serialize;

/// How an agent turns its parameters into a behavior policy.
///
/// The agent's exploration schedule supplies the level: a temperature
/// for `Softmax`, an exploration rate ε for `EpsilonGreedy`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exploration {
    #[default]
    Softmax,
    EpsilonGreedy,
}

impl Exploration {
    pub fn distribution(&self, params: &[f64], level: f64) -> Policy {
        match self {
            Self::Softmax => Softmax::from(level).distribution(params),
            Self::EpsilonGreedy => Greedy::from(level).distribution(params),
        }
    }
    pub fn jacobian(&self, params: &[f64], level: f64) -> Option<DMatrix<f64>> {
        match self {
            Self::Softmax => Softmax::from(level).jacobian(params),
            Self::EpsilonGreedy => Greedy::from(level).jacobian(params),
        }
    }
    pub fn score(&self, params: &[f64], level: f64, action: usize) -> Option<Vec<f64>> {
        match self {
            Self::Softmax => Softmax::from(level).score(params, action),
            Self::EpsilonGreedy => Greedy::from(level).score(params, action),
        }
    }
    pub fn differentiable(&self) -> bool {
        matches!(self, Self::Softmax)
    }
}

impl std::fmt::Display for Exploration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Softmax => write!(f, "softmax"),
            Self::EpsilonGreedy => write!(f, "epsilon-greedy"),
        }
    }
}
