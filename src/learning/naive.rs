use super::*;
use crate::*;

/// Independent learning: each agent treats its opponent as part of
/// a stationary environment and updates only from its own reward.
///
/// - tabular agents run Q-learning,
///   `Q[s][a] += α · (r + γ · max Q[s'] − Q[s][a])`
/// - logit agents ascend their policy gradient, either the sampled
///   REINFORCE estimate `α · r · ∇ log π(a|s)` or the exact `α · ∇V`
///
/// Scripted agents do not learn and always take a zero step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Naive;

impl Naive {
    fn temporal(&self, hero: usize, context: &Context) -> Params {
        let snapshot = context.hero(hero);
        let ref observation = context.observation;
        let ref params = snapshot.params;
        let action = observation.joint.of(hero);
        let future = params
            .row(observation.next)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let target = observation.rewards[hero] + context.discount * future;
        let error = target - params.row(observation.state)[action];
        let mut delta = Params::zeros(params.states(), params.actions());
        delta.row_mut(observation.state)[action] = snapshot.learning_rate * error;
        delta
    }

    fn reinforce(&self, hero: usize, context: &Context) -> Result<Params, Error> {
        let snapshot = context.hero(hero);
        let ref observation = context.observation;
        let score = snapshot
            .score(observation.state, observation.joint.of(hero))
            .ok_or_else(|| {
                Error::InvalidConfiguration(format!("agent {} has no policy score", hero))
            })?;
        let scale = snapshot.learning_rate * observation.rewards[hero];
        let mut delta = Params::zeros(snapshot.states(), snapshot.actions());
        delta
            .row_mut(observation.state)
            .iter_mut()
            .zip(score)
            .for_each(|(d, g)| *d = scale * g);
        Ok(delta)
    }

    fn exact(&self, hero: usize, context: &Context) -> Result<Params, Error> {
        let snapshot = context.hero(hero);
        Ok(context
            .landscape()
            .evaluate(context.snapshots, hero)?
            .gradient(hero)?
            .scaled(snapshot.learning_rate))
    }

    fn conform(&self, hero: usize, context: &Context) -> Result<(), Error> {
        let snapshot = context.hero(hero);
        let actions = context.game.actions(hero);
        let states = context.memory.states(context.game);
        match (snapshot.actions() == actions, snapshot.states() == states) {
            (true, true) => Ok(()),
            (false, _) => Err(Error::DimensionMismatch {
                expected: actions,
                actual: snapshot.actions(),
            }),
            (_, false) => Err(Error::DimensionMismatch {
                expected: states,
                actual: snapshot.states(),
            }),
        }
    }
}

impl Updater for Naive {
    fn gradient(&self, hero: usize, context: &Context) -> Result<Step, Error> {
        self.conform(hero, context)?;
        let snapshot = context.hero(hero);
        let delta = match (snapshot.representation, snapshot.estimator) {
            _ if snapshot.scripted.is_some() => {
                Params::zeros(snapshot.states(), snapshot.actions())
            }
            (Representation::Tabular, _) => self.temporal(hero, context),
            (Representation::Logits, Estimator::Sampled) => self.reinforce(hero, context)?,
            (Representation::Logits, Estimator::Exact) => self.exact(hero, context)?,
        };
        match delta.is_finite() {
            true => Ok(Step {
                delta,
                correction: Correction::None,
            }),
            false => Err(Error::NumericalInstability(format!(
                "naive step of agent {} is not finite",
                hero
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: usize, representation: Representation, initial: Vec<f64>) -> Agent {
        Agent::new(
            id,
            initial,
            Schedule::constant(1.),
            Schedule::constant(0.5),
            representation,
        )
        .unwrap()
    }

    fn observation(joint: [usize; N], rewards: [Utility; N]) -> Observation {
        Observation {
            state: Memory::START,
            next: Memory::START,
            joint: JointAction::from(joint),
            rewards,
        }
    }

    #[test]
    fn q_learning_moves_toward_target() {
        let ref game = Game::prisoners();
        let ref snapshots = [
            agent(0, Representation::Tabular, vec![1., 2.]).snapshot(0),
            agent(1, Representation::Tabular, vec![0., 0.]).snapshot(0),
        ];
        let ref observation = observation([0, 1], [0., 5.]);
        let context = Context {
            game,
            memory: Memory::Stateless,
            discount: 0.5,
            snapshots,
            observation,
        };
        let step = Naive.gradient(0, &context).unwrap();
        // 0.5 · (0 + 0.5 · 2 − 1) = 0
        assert_eq!(step.delta.row(0), &[0., 0.]);
        let step = Naive.gradient(1, &context).unwrap();
        // 0.5 · (5 + 0 − 0)
        assert_eq!(step.delta.row(0), &[0., 2.5]);
        assert_eq!(step.correction, Correction::None);
    }

    #[test]
    fn reinforce_follows_the_score() {
        let ref game = Game::prisoners();
        let ref snapshots = [
            agent(0, Representation::Logits, vec![0., 0.]).snapshot(0),
            agent(1, Representation::Logits, vec![0., 0.]).snapshot(0),
        ];
        let ref observation = observation([1, 1], [1., 1.]);
        let context = Context {
            game,
            memory: Memory::Stateless,
            discount: 0.,
            snapshots,
            observation,
        };
        // 0.5 · 1 · (e_1 − ½)
        let step = Naive.gradient(0, &context).unwrap();
        assert!((step.delta.row(0)[0] + 0.25).abs() < 1e-12);
        assert!((step.delta.row(0)[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn exact_ascends_own_value() {
        let ref game = Game::prisoners();
        let ref snapshots = [
            agent(0, Representation::Logits, vec![0.3, 0.])
                .with_estimator(Estimator::Exact)
                .unwrap()
                .snapshot(0),
            agent(1, Representation::Logits, vec![0., 0.2]).snapshot(0),
        ];
        let ref observation = observation([0, 0], [3., 3.]);
        let context = Context {
            game,
            memory: Memory::Stateless,
            discount: 0.,
            snapshots,
            observation,
        };
        let step = Naive.gradient(0, &context).unwrap();
        // defection dominates, so the gradient favors it
        assert!(step.delta.row(0)[1] > 0.);
        assert!(step.delta.row(0)[0] < 0.);
        let before = context.landscape().evaluate(snapshots, 0).unwrap().value();
        let mut moved = snapshots.clone();
        moved[0].params.accumulate(&step.delta.scaled(0.01)).unwrap();
        let after = context.landscape().evaluate(&moved, 0).unwrap().value();
        assert!(after > before);
    }

    #[test]
    fn never_touches_the_opponent() {
        // agent 1 is paid nothing, so only agent 0 has anything to learn
        let game = Game::from_fn(2, 2, |a, b| ((a == b) as usize as Utility, 0.)).unwrap();
        let agents = [
            agent(0, Representation::Logits, vec![0.1, 0.]),
            agent(1, Representation::Logits, vec![0.3, 0.]),
        ];
        let settings = Settings {
            horizon: 20,
            convergence: Convergence::disabled(),
            ..Settings::default()
        };
        let outcome = Simulation::new(game, agents.clone(), settings)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(outcome.trajectory.len(), 20);
        assert_eq!(outcome.agents[1], agents[1]);
        assert_ne!(outcome.agents[0].params(), agents[0].params());
    }

    #[test]
    fn scripted_agents_stand_still() {
        let ref game = Game::prisoners();
        let ref snapshots = [
            Agent::scripted(0, 2, Strategy::TitForTat).unwrap().snapshot(0),
            agent(1, Representation::Tabular, vec![0., 0.]).snapshot(0),
        ];
        let ref observation = observation([0, 1], [0., 5.]);
        let context = Context {
            game,
            memory: Memory::Stateless,
            discount: 0.,
            snapshots,
            observation,
        };
        let step = Naive.gradient(0, &context).unwrap();
        assert_eq!(step.delta, Params::zeros(1, 2));
        assert_eq!(step.correction, Correction::None);
        assert_eq!(Naive.gradient(1, &context).unwrap().delta.row(0), &[0., 2.5]);
    }

    #[test]
    fn rejects_wrong_width() {
        let ref game = Game::from_fn(3, 2, |_, _| (0., 0.)).unwrap();
        let ref snapshots = [
            agent(0, Representation::Tabular, vec![0., 0.]).snapshot(0),
            agent(1, Representation::Tabular, vec![0., 0.]).snapshot(0),
        ];
        let ref observation = observation([0, 0], [0., 0.]);
        let context = Context {
            game,
            memory: Memory::Stateless,
            discount: 0.,
            snapshots,
            observation,
        };
        assert!(matches!(
            Naive.gradient(0, &context),
            Err(Error::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }
}
