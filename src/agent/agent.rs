use super::*;
use crate::*;

/// One learner's mutable state.
///
/// Owned by the simulation, mutated once per round by applying an
/// updater step, and never shared with the opponent. Updaters read
/// it only through a [`Snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    id: usize,
    params: Params,
    temperature: Schedule,
    learning_rate: Schedule,
    representation: Representation,
    exploration: Exploration,
    estimator: Estimator,
    strategy: Option<Strategy>,
}

impl Agent {
    /// A stateless agent whose single parameter row is `initial`.
    ///
    /// `temperature` drives exploration: a softmax temperature by default,
    /// or ε once switched to ε-greedy.
    pub fn new(
        id: usize,
        initial: Vec<f64>,
        temperature: Schedule,
        learning_rate: Schedule,
        representation: Representation,
    ) -> Result<Self, Error> {
        if id >= N {
            return Err(Error::InvalidConfiguration(format!(
                "agent id {} outside 0..{}",
                id, N
            )));
        }
        if initial.len() < MIN_ACTIONS {
            return Err(Error::DimensionMismatch {
                expected: MIN_ACTIONS,
                actual: initial.len(),
            });
        }
        if initial.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidConfiguration(format!(
                "agent {} has non-finite initial parameters",
                id
            )));
        }
        temperature.validate("temperature")?;
        learning_rate.validate("learning rate")?;
        let agent = Self {
            id,
            params: Params::replicate(&initial, 1),
            temperature,
            learning_rate,
            representation,
            exploration: Exploration::default(),
            estimator: Estimator::default(),
            strategy: None,
        };
        agent.check()?;
        Ok(agent)
    }

    /// A non-learning agent that plays a fixed strategy over `actions` moves.
    pub fn scripted(id: usize, actions: usize, strategy: Strategy) -> Result<Self, Error> {
        Ok(Self {
            strategy: Some(strategy),
            ..Self::new(
                id,
                vec![0.; actions],
                Schedule::constant(1.),
                Schedule::constant(1.),
                Representation::Tabular,
            )?
        })
    }

    pub fn with_exploration(mut self, exploration: Exploration) -> Result<Self, Error> {
        self.exploration = exploration;
        self.check()?;
        Ok(self)
    }
    pub fn with_estimator(mut self, estimator: Estimator) -> Result<Self, Error> {
        self.estimator = estimator;
        self.check()?;
        Ok(self)
    }

    /// Copy the start row into every memory state.
    /// Agents built by hand are stateless until a simulation widens them.
    pub fn widen(&mut self, states: usize) {
        if self.params.states() != states {
            self.params = Params::replicate(self.params.row(Memory::START), states);
        }
    }

    /// Frozen copy with this round's schedules resolved.
    /// Scripted agents commit to their opening move.
    pub fn snapshot(&self, round: usize) -> Snapshot {
        self.frozen(round, self.strategy.as_ref().map(|s| s.act(&[])))
    }

    /// Frozen copy whose scripted move answers the opponent's history.
    pub fn facing(&self, round: usize, opponent: &[usize]) -> Result<Snapshot, Error> {
        let scripted = match self.strategy {
            Some(ref strategy) => Some(strategy.checked(opponent, self.actions())?),
            None => None,
        };
        Ok(self.frozen(round, scripted))
    }

    /// Parameters after a step, without committing them.
    pub fn stepped(&self, step: &Params) -> Result<Params, Error> {
        let mut params = self.params.clone();
        params.accumulate(step)?;
        match params.is_finite() {
            true => Ok(params),
            false => Err(Error::NumericalInstability(format!(
                "agent {} parameters overflowed",
                self.id
            ))),
        }
    }

    /// Add a step to the parameters. Leaves them untouched on overflow.
    pub fn apply(&mut self, step: &Params) -> Result<(), Error> {
        let params = self.stepped(step)?;
        self.commit(params);
        Ok(())
    }

    pub(crate) fn commit(&mut self, params: Params) {
        self.params = params;
    }

    /// Distribution at every memory state, using this round's exploration level.
    pub fn policies(&self, round: usize) -> Vec<Policy> {
        self.snapshot(round).table()
    }

    /// Whether the policy is a smooth function of the parameters.
    pub fn differentiable(&self) -> bool {
        self.strategy.is_none()
            && self.representation == Representation::Logits
            && self.exploration.differentiable()
    }
    pub fn is_scripted(&self) -> bool {
        self.strategy.is_some()
    }
    pub fn strategy(&self) -> Option<&Strategy> {
        self.strategy.as_ref()
    }

    pub fn id(&self) -> usize {
        self.id
    }
    pub fn actions(&self) -> usize {
        self.params.actions()
    }
    pub fn params(&self) -> &Params {
        &self.params
    }
    pub fn temperature(&self) -> &Schedule {
        &self.temperature
    }
    pub fn learning_rate(&self) -> &Schedule {
        &self.learning_rate
    }
    pub fn representation(&self) -> Representation {
        self.representation
    }
    pub fn exploration(&self) -> Exploration {
        self.exploration
    }
    pub fn estimator(&self) -> Estimator {
        self.estimator
    }

    fn frozen(&self, round: usize, scripted: Option<usize>) -> Snapshot {
        Snapshot {
            id: self.id,
            params: self.params.clone(),
            representation: self.representation,
            exploration: self.exploration,
            estimator: self.estimator,
            temperature: self.temperature.at(round),
            learning_rate: self.learning_rate.at(round),
            scripted,
        }
    }

    /// Reject combinations no updater knows how to drive.
    fn check(&self) -> Result<(), Error> {
        match (self.representation, self.exploration, self.estimator) {
            (Representation::Logits, Exploration::EpsilonGreedy, _) => {
                Err(Error::InvalidConfiguration(format!(
                    "agent {}: logits need a softmax projection",
                    self.id
                )))
            }
            (Representation::Tabular, _, Estimator::Exact) => {
                Err(Error::InvalidConfiguration(format!(
                    "agent {}: exact gradients need a logit representation",
                    self.id
                )))
            }
            (_, Exploration::EpsilonGreedy, _) if self.temperature.initial > 1. => {
                Err(Error::InvalidConfiguration(format!(
                    "agent {}: exploration rate must not exceed 1",
                    self.id
                )))
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref strategy) = self.strategy {
            return write!(f, "agent {} [scripted {}]", self.id, strategy);
        }
        write!(
            f,
            "agent {} [{} {} {}] τ={} α={}",
            self.id,
            self.representation,
            self.exploration,
            self.estimator,
            self.temperature,
            self.learning_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logits(id: usize) -> Agent {
        Agent::new(
            id,
            vec![0., 0.],
            Schedule::constant(1.),
            Schedule::constant(0.1),
            Representation::Logits,
        )
        .unwrap()
    }

    #[test]
    fn rejects_logits_with_epsilon_greedy() {
        let result = logits(0).with_exploration(Exploration::EpsilonGreedy);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn rejects_tabular_with_exact_gradients() {
        let result = Agent::new(
            0,
            vec![0., 0.],
            Schedule::constant(1.),
            Schedule::constant(0.1),
            Representation::Tabular,
        )
        .and_then(|agent| agent.with_estimator(Estimator::Exact));
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn rejects_bad_construction() {
        let build = |id, initial: Vec<f64>, lr| {
            Agent::new(
                id,
                initial,
                Schedule::constant(1.),
                Schedule::constant(lr),
                Representation::Logits,
            )
        };
        assert!(build(2, vec![0., 0.], 0.1).is_err());
        assert!(build(0, vec![0.], 0.1).is_err());
        assert!(build(0, vec![0., f64::NAN], 0.1).is_err());
        assert!(build(0, vec![0., 0.], 0.).is_err());
    }

    #[test]
    fn epsilon_must_be_a_probability() {
        let result = Agent::new(
            0,
            vec![0., 0.],
            Schedule::constant(1.5),
            Schedule::constant(0.1),
            Representation::Tabular,
        )
        .and_then(|agent| agent.with_exploration(Exploration::EpsilonGreedy));
        assert!(result.is_err());
    }

    #[test]
    fn widen_replicates_start_row() {
        let mut agent = Agent::new(
            1,
            vec![1., -1., 0.5],
            Schedule::constant(1.),
            Schedule::constant(0.1),
            Representation::Logits,
        )
        .unwrap();
        agent.widen(4);
        assert_eq!(agent.params().states(), 4);
        assert!(agent.params().rows().all(|row| row == [1., -1., 0.5]));
        assert_eq!(agent.policies(0).len(), 4);
    }

    #[test]
    fn only_softmax_logits_are_differentiable() {
        assert!(logits(0).differentiable());
        let tabular = Agent::new(
            0,
            vec![0., 0.],
            Schedule::constant(1.),
            Schedule::constant(0.1),
            Representation::Tabular,
        )
        .unwrap();
        assert!(!tabular.differentiable());
    }

    #[test]
    fn scripted_agents_never_differentiate() {
        let agent = Agent::scripted(0, 2, Strategy::Defect).unwrap();
        assert!(agent.is_scripted());
        assert!(!agent.differentiable());
        assert_eq!(agent.policies(0), vec![vec![0., 1.]]);
        assert!(agent.clone().with_estimator(Estimator::Exact).is_err());
        assert!(agent.to_string().contains("scripted defect"));
    }

    #[test]
    fn stepping_does_not_commit() {
        let mut agent = logits(0);
        let params = agent.stepped(&Params::replicate(&[1., 2.], 1)).unwrap();
        assert_eq!(params.row(0), &[1., 2.]);
        assert_eq!(agent.params().row(0), &[0., 0.]);
        assert!(agent.stepped(&Params::replicate(&[f64::MAX, 0.], 1)).is_ok());
        let mut big = agent.clone();
        big.apply(&Params::replicate(&[f64::MAX, 0.], 1)).unwrap();
        assert!(matches!(
            big.stepped(&Params::replicate(&[f64::MAX, 0.], 1)),
            Err(Error::NumericalInstability(_))
        ));
        agent.apply(&Params::replicate(&[1., 2.], 1)).unwrap();
        assert_eq!(agent.params().row(0), &[1., 2.]);
    }
}
