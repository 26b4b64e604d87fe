use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// One action index per agent for a single round.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointAction([usize; N]);

impl JointAction {
    /// Action taken by an agent.
    pub fn of(&self, agent: usize) -> usize {
        self.0[agent]
    }
    /// Row-major position in the joint action space of a game.
    pub fn index(&self, game: &Game) -> usize {
        self.0[0] * game.actions(1) + self.0[1]
    }
    pub fn pair(&self) -> [usize; N] {
        self.0
    }
}

impl From<[usize; N]> for JointAction {
    fn from(actions: [usize; N]) -> Self {
        Self(actions)
    }
}

impl std::fmt::Display for JointAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0[0], self.0[1])
    }
}
