//! Serializable experiment description.
//!
//! ```json
//! {
//!   "game": { "kind": "dilemma", "r": 3, "s": 0, "t": 5, "p": 1 },
//!   "agents": [
//!     { "representation": "logits", "estimator": "exact",
//!       "learning_rate": { "initial": 1.0 } },
//!     { "representation": "tabular", "exploration": "epsilon_greedy",
//!       "temperature": { "initial": 0.2, "decay": { "kind": "linear", "slope": 1e-4 }, "floor": 0.01 } }
//!   ],
//!   "updater": "opponent_aware",
//!   "horizon": 1000,
//!   "seed": 7,
//!   "memory": "one",
//!   "discount": 0.96,
//!   "convergence": { "window": 0, "tolerance": 1e-6 }
//! }
//! ```
//!
//! Every field except `game` may be omitted. An agent may instead play
//! a fixed strategy, e.g. `{ "strategy": "tit_for_tat" }`.
use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Which payoff matrices to play.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GameConfig {
    #[default]
    Prisoners,
    Pennies,
    Reference,
    Dilemma {
        r: Utility,
        s: Utility,
        t: Utility,
        p: Utility,
    },
    Matrices {
        first: Vec<Vec<Utility>>,
        second: Vec<Vec<Utility>>,
        #[serde(default)]
        labels: Option<[Vec<String>; N]>,
    },
}

impl GameConfig {
    pub fn build(&self) -> Result<Game, Error> {
        match self {
            Self::Prisoners => Ok(Game::prisoners()),
            Self::Pennies => Ok(Game::pennies()),
            Self::Reference => Ok(Game::reference()),
            Self::Dilemma { r, s, t, p } => Game::dilemma(*r, *s, *t, *p),
            Self::Matrices {
                first,
                second,
                labels,
            } => match labels {
                None => Game::new(first.clone(), second.clone()),
                Some([a, b]) => {
                    Game::new(first.clone(), second.clone())?.with_labels(a.clone(), b.clone())
                }
            },
        }
    }
}

/// How to build one learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub representation: Representation,
    pub exploration: Exploration,
    pub estimator: Estimator,
    /// Starting parameters; zeros over the agent's actions when absent.
    pub initial: Option<Vec<f64>>,
    /// Softmax temperature, or ε under ε-greedy exploration.
    pub temperature: Schedule,
    pub learning_rate: Schedule,
    /// Play a fixed strategy instead of learning.
    pub strategy: Option<Strategy>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            representation: Representation::default(),
            exploration: Exploration::default(),
            estimator: Estimator::default(),
            initial: None,
            temperature: Schedule::constant(DEFAULT_TEMPERATURE),
            learning_rate: Schedule::constant(DEFAULT_LEARNING_RATE),
            strategy: None,
        }
    }
}

impl AgentConfig {
    pub fn build(&self, id: usize, game: &Game) -> Result<Agent, Error> {
        if let Some(ref strategy) = self.strategy {
            return Agent::scripted(id, game.actions(id), strategy.clone());
        }
        let initial = self
            .initial
            .clone()
            .unwrap_or_else(|| vec![0.; game.actions(id)]);
        Agent::new(
            id,
            initial,
            self.temperature,
            self.learning_rate,
            self.representation,
        )?
        .with_exploration(self.exploration)?
        .with_estimator(self.estimator)
    }
}

/// A whole run: the game, both learners and the run settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub game: GameConfig,
    #[serde(default)]
    pub agents: [AgentConfig; N],
    #[serde(flatten)]
    pub settings: Settings,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    pub fn game(&self) -> Result<Game, Error> {
        self.game.build()
    }
    pub fn agents(&self, game: &Game) -> Result<[Agent; N], Error> {
        Ok([
            self.agents[0].build(0, game)?,
            self.agents[1].build(1, game)?,
        ])
    }
    pub fn simulation(&self) -> Result<Simulation, Error> {
        let game = self.game()?;
        let agents = self.agents(&game)?;
        Simulation::new(game, agents, self.settings)
    }
}
