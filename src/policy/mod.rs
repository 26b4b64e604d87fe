//! Projections from raw parameters to action distributions,
//! and the schedules that drive exploration and learning rates.

mod exploration;
mod greedy;
mod schedule;
mod softmax;

pub use exploration::*;
pub use greedy::*;
pub use schedule::*;
pub use softmax::*;

use crate::*;
use nalgebra::DMatrix;

/// A probability vector over one agent's actions.
pub type Policy = Vec<Probability>;

/// Maps a row of parameters to a probability distribution.
pub trait Projector {
    /// Probability of each action. Sums to one, strictly positive.
    fn distribution(&self, params: &[f64]) -> Policy;
    /// `J[a][k] = ∂π_a / ∂θ_k`, if the map is differentiable.
    fn jacobian(&self, params: &[f64]) -> Option<DMatrix<f64>>;
    /// `∇_θ log π(action)`, if the map is differentiable.
    fn score(&self, params: &[f64], action: usize) -> Option<Vec<f64>>;
}

/// Floor every weight at `POLICY_MIN`, then rescale to unit mass.
pub(crate) fn normalize(weights: Vec<f64>) -> Policy {
    let floored = weights
        .into_iter()
        .map(|w| w.max(POLICY_MIN))
        .collect::<Vec<_>>();
    let total = floored.iter().sum::<f64>();
    floored.into_iter().map(|w| w / total).collect()
}

/// Largest absolute difference between two distributions.
pub fn distance(p: &[Probability], q: &[Probability]) -> Energy {
    p.iter()
        .zip(q)
        .map(|(a, b)| (a - b).abs())
        .fold(0., Energy::max)
}
