use super::*;
use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// What happened in one round, as seen by both updaters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Memory state the round was played in.
    pub state: usize,
    /// Memory state the next round will be played in.
    pub next: usize,
    pub joint: JointAction,
    pub rewards: [Utility; N],
}

/// Read-only inputs shared by both agents' updates in a round.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub game: &'a Game,
    pub memory: Memory,
    pub discount: Utility,
    pub snapshots: &'a [Snapshot; N],
    pub observation: &'a Observation,
}

impl<'a> Context<'a> {
    pub fn landscape(&self) -> Landscape<'a> {
        Landscape::new(self.game, self.memory, self.discount)
    }
    pub fn hero(&self, hero: usize) -> &'a Snapshot {
        &self.snapshots[hero]
    }
    pub fn villain(&self, hero: usize) -> &'a Snapshot {
        &self.snapshots[N - 1 - hero]
    }
}

/// How an agent's update related to its opponent's learning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correction {
    /// Independent update, no correction attempted.
    #[default]
    None,
    /// The opponent-aware term was added to the base step.
    Applied,
    /// One of the agents is not differentiable; the base step was used.
    Unavailable,
    /// The correction was not finite; the base step was used.
    Rejected,
}

/// A parameter delta for one agent and how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub delta: Params,
    pub correction: Correction,
}

/// Computes one agent's parameter step from a synchronized pair of snapshots.
pub trait Updater: Send + Sync {
    fn gradient(&self, hero: usize, context: &Context) -> Result<Step, Error>;
}

/// Which update rule drives both agents of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdaterKind {
    #[default]
    Naive,
    OpponentAware,
}

impl UpdaterKind {
    pub fn updater(&self) -> Box<dyn Updater> {
        match self {
            Self::Naive => Box::new(Naive),
            Self::OpponentAware => Box::new(Aware),
        }
    }
}

impl std::fmt::Display for UpdaterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Naive => write!(f, "naive"),
            Self::OpponentAware => write!(f, "aware"),
        }
    }
}

impl std::fmt::Display for Correction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "-"),
            Self::Applied => write!(f, "applied"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}
