use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// What agents remember between rounds.
///
/// Parameters are kept per memory state. State 0 is the start of the game;
/// with one-step memory, state `1 + c` follows the joint action with
/// row-major index `c`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Memory {
    /// Every round is played from the same state.
    #[default]
    #[serde(rename = "none")]
    Stateless,
    /// Agents condition on the previous joint action.
    #[serde(rename = "one")]
    OneStep,
}

impl Memory {
    /// State every run starts from.
    pub const START: usize = 0;

    /// Number of distinct memory states for a game.
    pub fn states(&self, game: &Game) -> usize {
        match self {
            Self::Stateless => 1,
            Self::OneStep => 1 + game.joints(),
        }
    }
    /// State following the joint action with row-major index `joint`.
    pub fn after(&self, joint: usize) -> usize {
        match self {
            Self::Stateless => Self::START,
            Self::OneStep => 1 + joint,
        }
    }
    /// State following a played joint action.
    pub fn next(&self, game: &Game, joint: &JointAction) -> usize {
        self.after(joint.index(game))
    }
}

impl std::fmt::Display for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stateless => write!(f, "none"),
            Self::OneStep => write!(f, "one"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stateless_always_returns_to_start() {
        let ref game = Game::prisoners();
        assert_eq!(Memory::Stateless.states(game), 1);
        assert_eq!(Memory::Stateless.next(game, &JointAction::from([1, 0])), Memory::START);
    }

    #[test]
    fn one_step_indexes_previous_joint_action() {
        let ref game = Game::prisoners();
        assert_eq!(Memory::OneStep.states(game), 5);
        assert_eq!(Memory::OneStep.next(game, &JointAction::from([0, 0])), 1);
        assert_eq!(Memory::OneStep.next(game, &JointAction::from([1, 0])), 3);
        assert_eq!(Memory::OneStep.next(game, &JointAction::from([1, 1])), 4);
    }
}
