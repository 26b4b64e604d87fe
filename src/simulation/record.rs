use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Everything observable about one round.
///
/// Policies are each agent's distribution at the start of the round,
/// in the memory state the round was played in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    round: usize,
    state: usize,
    joint: JointAction,
    rewards: [Utility; N],
    policies: [Policy; N],
    corrections: [Correction; N],
}

impl Record {
    pub(crate) fn new(
        round: usize,
        state: usize,
        joint: JointAction,
        rewards: [Utility; N],
        policies: [Policy; N],
        corrections: [Correction; N],
    ) -> Self {
        Self {
            round,
            state,
            joint,
            rewards,
            policies,
            corrections,
        }
    }
    pub fn round(&self) -> usize {
        self.round
    }
    pub fn state(&self) -> usize {
        self.state
    }
    pub fn joint(&self) -> JointAction {
        self.joint
    }
    pub fn rewards(&self) -> [Utility; N] {
        self.rewards
    }
    pub fn policy(&self, agent: usize) -> &Policy {
        &self.policies[agent]
    }
    pub fn policies(&self) -> &[Policy; N] {
        &self.policies
    }
    pub fn correction(&self, agent: usize) -> Correction {
        self.corrections[agent]
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>6} s{:<2} {} {:>+8.3} {:>+8.3} {:?} {:?}",
            self.round,
            self.state,
            self.joint,
            self.rewards[0],
            self.rewards[1],
            self.policies[0]
                .iter()
                .map(|p| format!("{:.3}", p))
                .collect::<Vec<_>>(),
            self.policies[1]
                .iter()
                .map(|p| format!("{:.3}", p))
                .collect::<Vec<_>>(),
        )
    }
}
