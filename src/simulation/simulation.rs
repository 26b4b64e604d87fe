use super::*;
use crate::*;
use rand::SeedableRng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::SmallRng;
use serde::Deserialize;
use serde::Serialize;

/// Run-level knobs shared by both agents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub updater: UpdaterKind,
    pub horizon: usize,
    pub seed: u64,
    pub convergence: Convergence,
    pub memory: Memory,
    /// Bootstrap discount for Q-learning and the value landscape, in `[0, 1)`.
    pub discount: Utility,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            updater: UpdaterKind::default(),
            horizon: DEFAULT_HORIZON,
            seed: DEFAULT_SEED,
            convergence: Convergence::default(),
            memory: Memory::default(),
            discount: DEFAULT_DISCOUNT,
        }
    }
}

/// How a finished run ended, what it recorded, and where the agents landed.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub phase: Phase,
    pub trajectory: Trajectory,
    pub agents: [Agent; N],
}

/// Synchronous round loop over one game and two learners.
///
/// Each round freezes both agents, samples a joint action with the run's
/// own seeded generator (agent 0 first), scores it, computes both steps
/// from the frozen pair and only then applies them. A round either
/// updates both agents or neither. Identical inputs replay identical
/// trajectories.
pub struct Simulation {
    game: Game,
    agents: [Agent; N],
    settings: Settings,
    updater: Box<dyn Updater>,
    rng: SmallRng,
    phase: Phase,
    round: usize,
    state: usize,
    streak: usize,
    moves: [Vec<usize>; N],
    trajectory: Trajectory,
}

impl Simulation {
    pub fn new(game: Game, mut agents: [Agent; N], settings: Settings) -> Result<Self, Error> {
        for (i, agent) in agents.iter().enumerate() {
            if agent.id() != i {
                return Err(Error::InvalidConfiguration(format!(
                    "agent in slot {} has id {}",
                    i,
                    agent.id()
                )));
            }
            if agent.actions() != game.actions(i) {
                return Err(Error::DimensionMismatch {
                    expected: game.actions(i),
                    actual: agent.actions(),
                });
            }
        }
        if !(settings.discount >= 0. && settings.discount < 1.) {
            return Err(Error::InvalidConfiguration(format!(
                "discount {} outside [0, 1)",
                settings.discount
            )));
        }
        for (hero, villain) in [(0, 1), (1, 0)] {
            if agents[hero].estimator() == Estimator::Exact && agents[villain].is_scripted() {
                return Err(Error::InvalidConfiguration(format!(
                    "agent {} needs exact gradients against scripted agent {}",
                    hero, villain
                )));
            }
        }
        settings.convergence.validate()?;
        let states = settings.memory.states(&game);
        agents.iter_mut().for_each(|agent| agent.widen(states));
        Ok(Self {
            updater: settings.updater.updater(),
            rng: SmallRng::seed_from_u64(settings.seed),
            phase: Phase::Initialized,
            round: 0,
            state: Memory::START,
            streak: 0,
            moves: [Vec::new(), Vec::new()],
            trajectory: Trajectory::default(),
            game,
            agents,
            settings,
        })
    }

    /// Play one round, or report the terminal phase if the run is over.
    pub fn step(&mut self) -> Result<Phase, Error> {
        if self.phase.is_terminal() {
            return Ok(self.phase);
        }
        if self.round >= self.settings.horizon {
            return Ok(self.finish(Phase::Exhausted));
        }
        let round = self.round;
        let snapshots = [
            self.agents[0].facing(round, &self.moves[1])?,
            self.agents[1].facing(round, &self.moves[0])?,
        ];
        let policies = [
            snapshots[0].distribution(self.state),
            snapshots[1].distribution(self.state),
        ];
        let joint = JointAction::from([self.sample(&policies[0])?, self.sample(&policies[1])?]);
        let rewards = self.game.rewards(&joint);
        let next = self.settings.memory.next(&self.game, &joint);
        let observation = Observation {
            state: self.state,
            next,
            joint,
            rewards,
        };
        let context = Context {
            game: &self.game,
            memory: self.settings.memory,
            discount: self.settings.discount,
            snapshots: &snapshots,
            observation: &observation,
        };
        let steps = [
            self.updater.gradient(0, &context)?,
            self.updater.gradient(1, &context)?,
        ];
        let params = [
            self.agents[0].stepped(&steps[0].delta)?,
            self.agents[1].stepped(&steps[1].delta)?,
        ];
        for (agent, params) in self.agents.iter_mut().zip(params) {
            agent.commit(params);
        }
        self.moves[0].push(joint.of(0));
        self.moves[1].push(joint.of(1));
        let change = self.change(&snapshots, round);
        self.trajectory.append(Record::new(
            round,
            self.state,
            joint,
            rewards,
            policies,
            [steps[0].correction, steps[1].correction],
        ));
        self.round += 1;
        self.state = next;
        self.streak = self.settings.convergence.observe(self.streak, change);
        if self.round % LOG_INTERVAL == 0 {
            log::debug!(
                "round {:>6} change {:.2e} streak {:>4} {}",
                self.round,
                change,
                self.streak,
                self.trajectory.last().map(ToString::to_string).unwrap_or_default()
            );
        }
        Ok(match (
            self.settings.convergence.holds(self.streak),
            self.round >= self.settings.horizon,
        ) {
            (true, _) => self.finish(Phase::Converged),
            (false, true) => self.finish(Phase::Exhausted),
            (false, false) => {
                self.phase = Phase::Running;
                self.phase
            }
        })
    }

    /// Step until a terminal phase.
    pub fn run(mut self) -> Result<Outcome, Error> {
        while !self.step()?.is_terminal() {}
        Ok(Outcome {
            phase: self.phase,
            trajectory: self.trajectory,
            agents: self.agents,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn round(&self) -> usize {
        self.round
    }
    pub fn game(&self) -> &Game {
        &self.game
    }
    pub fn agents(&self) -> &[Agent; N] {
        &self.agents
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    fn sample(&mut self, policy: &[Probability]) -> Result<usize, Error> {
        WeightedIndex::new(policy)
            .map(|index| index.sample(&mut self.rng))
            .map_err(|e| Error::NumericalInstability(format!("cannot sample policy: {}", e)))
    }

    /// Largest movement of either learner's full policy table during a round,
    /// holding the round's exploration level fixed.
    fn change(&self, before: &[Snapshot; N], round: usize) -> Energy {
        self.agents
            .iter()
            .zip(before.iter())
            .filter(|(agent, _)| !agent.is_scripted())
            .flat_map(|(agent, snapshot)| {
                agent
                    .policies(round)
                    .into_iter()
                    .zip(snapshot.table())
                    .map(|(ref p, ref q)| distance(p, q))
            })
            .fold(0., Energy::max)
    }

    fn finish(&mut self, phase: Phase) -> Phase {
        self.phase = phase;
        log::info!(
            "{} after {} rounds ({} updater, seed {})",
            phase,
            self.round,
            self.settings.updater,
            self.settings.seed
        );
        phase
    }
}
