use super::*;
use crate::*;
use nalgebra::DMatrix;

/// An agent frozen at the start of a round.
///
/// Both updaters read the same pair of snapshots, so neither
/// agent's step can observe the other's update from the same round.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub(crate) id: usize,
    pub(crate) params: Params,
    pub(crate) representation: Representation,
    pub(crate) exploration: Exploration,
    pub(crate) estimator: Estimator,
    pub(crate) temperature: Entropy,
    pub(crate) learning_rate: Rate,
    /// The move a scripted agent commits to this round.
    pub(crate) scripted: Option<usize>,
}

impl Snapshot {
    pub fn id(&self) -> usize {
        self.id
    }
    pub fn params(&self) -> &Params {
        &self.params
    }
    pub fn representation(&self) -> Representation {
        self.representation
    }
    pub fn estimator(&self) -> Estimator {
        self.estimator
    }
    pub fn temperature(&self) -> Entropy {
        self.temperature
    }
    pub fn learning_rate(&self) -> Rate {
        self.learning_rate
    }
    pub fn actions(&self) -> usize {
        self.params.actions()
    }
    pub fn states(&self) -> usize {
        self.params.states()
    }
    pub fn scripted(&self) -> Option<usize> {
        self.scripted
    }
    pub fn differentiable(&self) -> bool {
        self.scripted.is_none()
            && self.representation == Representation::Logits
            && self.exploration.differentiable()
    }

    pub fn distribution(&self, state: usize) -> Policy {
        match self.scripted {
            Some(action) => (0..self.actions())
                .map(|a| (a == action) as usize as Probability)
                .collect(),
            None => self
                .exploration
                .distribution(self.params.row(state), self.temperature),
        }
    }
    /// Policy at every memory state.
    pub fn table(&self) -> Vec<Policy> {
        (0..self.states()).map(|s| self.distribution(s)).collect()
    }
    pub fn jacobian(&self, state: usize) -> Option<DMatrix<f64>> {
        match self.differentiable() {
            true => self
                .exploration
                .jacobian(self.params.row(state), self.temperature),
            false => None,
        }
    }
    pub fn score(&self, state: usize, action: usize) -> Option<Vec<f64>> {
        match self.differentiable() {
            true => self
                .exploration
                .score(self.params.row(state), self.temperature, action),
            false => None,
        }
    }

    /// Same snapshot with one flat parameter shifted by `h`.
    pub fn perturbed(&self, index: usize, h: f64) -> Self {
        Self {
            params: self.params.nudged(index, h),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_resolves_schedules_per_round() {
        let agent = Agent::new(
            0,
            vec![1., 0.],
            Schedule::linear(1., 0.1, 0.2),
            Schedule::exponential(0.5, 0.5, 0.01),
            Representation::Logits,
        )
        .unwrap();
        let snapshot = agent.snapshot(5);
        assert!((snapshot.temperature() - 0.5).abs() < 1e-12);
        assert!((snapshot.learning_rate() - 0.015625).abs() < 1e-12);
        assert_eq!(snapshot.table(), agent.policies(5));
    }

    #[test]
    fn snapshot_is_independent_of_later_updates() {
        let mut agent = Agent::new(
            0,
            vec![0., 0.],
            Schedule::constant(1.),
            Schedule::constant(0.1),
            Representation::Logits,
        )
        .unwrap();
        let snapshot = agent.snapshot(0);
        agent.apply(&Params::replicate(&[1., 0.], 1)).unwrap();
        assert_eq!(snapshot.params().row(0), &[0., 0.]);
        assert_ne!(snapshot.distribution(0), agent.policies(0)[0]);
    }

    #[test]
    fn tabular_snapshots_offer_no_jacobian() {
        let agent = Agent::new(
            1,
            vec![0., 0.],
            Schedule::constant(1.),
            Schedule::constant(0.1),
            Representation::Tabular,
        )
        .unwrap();
        assert!(agent.snapshot(0).jacobian(0).is_none());
        assert!(agent.snapshot(0).score(0, 1).is_none());
    }

    #[test]
    fn scripted_snapshots_commit_to_one_move() {
        let mut agent = Agent::scripted(1, 2, Strategy::TitForTat).unwrap();
        agent.widen(5);
        assert_eq!(agent.snapshot(0).table(), vec![vec![1., 0.]; 5]);
        let snapshot = agent.facing(3, &[0, 0, 1]).unwrap();
        assert_eq!(snapshot.scripted(), Some(1));
        assert_eq!(snapshot.distribution(2), vec![0., 1.]);
        assert!(!snapshot.differentiable());
        assert!(snapshot.jacobian(0).is_none());
        let wild = Agent::scripted(0, 2, Strategy::custom(|_| 2)).unwrap();
        assert!(wild.facing(0, &[]).is_err());
    }
}
