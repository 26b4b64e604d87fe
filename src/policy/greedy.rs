use super::*;

/// ε-greedy projection over action values.
///
/// Mass `1 − ε` is split evenly across the maximizing actions and `ε / n`
/// goes to every action. Piecewise constant in the parameters, so it offers
/// no jacobian and no score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Greedy(Probability);

impl From<Probability> for Greedy {
    fn from(epsilon: Probability) -> Self {
        Self(epsilon.clamp(0., 1.))
    }
}

impl Greedy {
    pub fn epsilon(&self) -> Probability {
        self.0
    }
}

impl Projector for Greedy {
    fn distribution(&self, params: &[f64]) -> Policy {
        let n = params.len() as f64;
        let max = params.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let ties = params.iter().filter(|x| **x == max).count() as f64;
        normalize(
            params
                .iter()
                .map(|x| match *x == max {
                    true => (1. - self.0) / ties + self.0 / n,
                    false => self.0 / n,
                })
                .collect(),
        )
    }
    fn jacobian(&self, _: &[f64]) -> Option<DMatrix<f64>> {
        None
    }
    fn score(&self, _: &[f64], _: usize) -> Option<Vec<f64>> {
        None
    }
}
