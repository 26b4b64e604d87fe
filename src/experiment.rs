//! Library entry points: one-call runs, naive-versus-aware comparisons
//! and seed sweeps.
use crate::*;
use serde::Serialize;

/// Validated game from both agents' reward matrices.
pub fn build_game(first: Vec<Vec<Utility>>, second: Vec<Vec<Utility>>) -> Result<Game, Error> {
    Game::new(first, second)
}

/// Validated stateless agent with softmax exploration and sampled gradients.
pub fn build_agent(
    id: usize,
    initial: Vec<f64>,
    temperature: Schedule,
    learning_rate: Schedule,
    representation: Representation,
) -> Result<Agent, Error> {
    Agent::new(id, initial, temperature, learning_rate, representation)
}

/// Play a stateless run to completion and hand back its records.
pub fn run(
    game: Game,
    agents: [Agent; N],
    updater: UpdaterKind,
    horizon: usize,
    seed: u64,
    convergence: Convergence,
) -> Result<Trajectory, Error> {
    let settings = Settings {
        updater,
        horizon,
        seed,
        convergence,
        ..Settings::default()
    };
    Ok(Simulation::new(game, agents, settings)?.run()?.trajectory)
}

/// Headline numbers of one finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub updater: UpdaterKind,
    pub seed: u64,
    pub phase: Phase,
    pub rounds: usize,
    /// Mean probability of each agent's first action over the final window.
    pub cooperation: [Probability; N],
    /// Mean reward of each agent over the final window.
    pub rewards: [Utility; N],
    pub rejected: usize,
}

impl Summary {
    pub fn new(settings: &Settings, outcome: &Outcome) -> Self {
        let ref trajectory = outcome.trajectory;
        let cooperation = |agent| {
            trajectory
                .cooperation(agent, 0, SUMMARY_WINDOW)
                .unwrap_or(Probability::NAN)
        };
        Self {
            updater: settings.updater,
            seed: settings.seed,
            phase: outcome.phase,
            rounds: trajectory.len(),
            cooperation: [cooperation(0), cooperation(1)],
            rewards: trajectory
                .mean_rewards(SUMMARY_WINDOW)
                .unwrap_or([Utility::NAN; N]),
            rejected: trajectory.rejected(),
        }
    }

    /// Run a fresh simulation and summarize it.
    pub fn play(game: &Game, agents: &[Agent; N], settings: Settings) -> Result<Self, Error> {
        let outcome = Simulation::new(game.clone(), agents.clone(), settings)?.run()?;
        Ok(Self::new(&settings, &outcome))
    }
}

/// The same game, agents and seed under both update rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub naive: Summary,
    pub aware: Summary,
}

impl Comparison {
    pub fn new(game: &Game, agents: &[Agent; N], settings: Settings) -> Result<Self, Error> {
        let with = |updater| Settings { updater, ..settings };
        let naive = || Summary::play(game, agents, with(UpdaterKind::Naive));
        let aware = || Summary::play(game, agents, with(UpdaterKind::OpponentAware));
        #[cfg(feature = "parallel")]
        let (naive, aware) = rayon::join(naive, aware);
        #[cfg(not(feature = "parallel"))]
        let (naive, aware) = (naive(), aware());
        Ok(Self {
            naive: naive?,
            aware: aware?,
        })
    }

    /// How much more the aware rule cooperates, per agent.
    pub fn shift(&self) -> [Probability; N] {
        [
            self.aware.cooperation[0] - self.naive.cooperation[0],
            self.aware.cooperation[1] - self.naive.cooperation[1],
        ]
    }
}

/// Summaries of independent runs that differ only in their seed.
pub fn sweep(
    game: &Game,
    agents: &[Agent; N],
    settings: Settings,
    seeds: &[u64],
) -> Result<Vec<Summary>, Error> {
    let play = |seed: &u64| Summary::play(game, agents, Settings { seed: *seed, ..settings });
    #[cfg(feature = "parallel")]
    {
        use rayon::iter::IntoParallelRefIterator;
        use rayon::iter::ParallelIterator;
        seeds.par_iter().map(play).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(play).collect()
    }
}

/// Naive-versus-aware comparisons across seeds.
pub fn compare(
    game: &Game,
    agents: &[Agent; N],
    settings: Settings,
    seeds: &[u64],
) -> Result<Vec<Comparison>, Error> {
    let compare = |seed: &u64| Comparison::new(game, agents, Settings { seed: *seed, ..settings });
    #[cfg(feature = "parallel")]
    {
        use rayon::iter::IntoParallelRefIterator;
        use rayon::iter::ParallelIterator;
        seeds.par_iter().map(compare).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(compare).collect()
    }
}

#[rustfmt::skip]
impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌─────────┬────────┬───────────┬────────┬─────────┬─────────┬──────────┬──────────┬──────────┐")?;
        writeln!(f, "│ Updater │   Seed │     Phase │ Rounds │   π₀(0) │   π₁(0) │   r̄₀     │   r̄₁     │ Rejected │")?;
        writeln!(f, "├─────────┼────────┼───────────┼────────┼─────────┼─────────┼──────────┼──────────┼──────────┤")?;
        self.row(f)?;
        writeln!(f, "└─────────┴────────┴───────────┴────────┴─────────┴─────────┴──────────┴──────────┴──────────┘")
    }
}

impl Summary {
    fn row(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "│ {:>7} │ {:>6} │ {:>9} │ {:>6} │ {:>7.4} │ {:>7.4} │ {:>+8.3} │ {:>+8.3} │ {:>8} │",
            self.updater.to_string(),
            self.seed,
            self.phase.to_string(),
            self.rounds,
            self.cooperation[0],
            self.cooperation[1],
            self.rewards[0],
            self.rewards[1],
            self.rejected,
        )
    }
}

#[rustfmt::skip]
impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌─────────┬────────┬───────────┬────────┬─────────┬─────────┬──────────┬──────────┬──────────┐")?;
        writeln!(f, "│ Updater │   Seed │     Phase │ Rounds │   π₀(0) │   π₁(0) │   r̄₀     │   r̄₁     │ Rejected │")?;
        writeln!(f, "├─────────┼────────┼───────────┼────────┼─────────┼─────────┼──────────┼──────────┼──────────┤")?;
        self.naive.row(f)?;
        self.aware.row(f)?;
        writeln!(f, "└─────────┴────────┴───────────┴────────┴─────────┴─────────┴──────────┴──────────┴──────────┘")?;
        let [a, b] = self.shift();
        writeln!(f, "aware − naive first-action probability: {:>+7.4} {:>+7.4}", a, b)
    }
}
