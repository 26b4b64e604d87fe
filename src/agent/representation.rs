use serde::Deserialize;
use serde::Serialize;

/// What an agent's parameters mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Action-value estimates, learned by Q-learning.
    #[default]
    Tabular,
    /// Policy logits, learned by gradient ascent.
    Logits,
}

/// How a logit learner estimates its policy gradient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Estimator {
    /// REINFORCE on the realized reward of the sampled action.
    #[default]
    Sampled,
    /// Closed-form gradient of the expected value under both policies.
    Exact,
}

impl std::fmt::Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tabular => write!(f, "tabular"),
            Self::Logits => write!(f, "logits"),
        }
    }
}

impl std::fmt::Display for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sampled => write!(f, "sampled"),
            Self::Exact => write!(f, "exact"),
        }
    }
}
