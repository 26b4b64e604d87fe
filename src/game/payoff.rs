use crate::*;
use nalgebra::DMatrix;
use nalgebra::DVector;
use serde::Serialize;

/// Immutable description of a two-player bimatrix game.
///
/// `rewards[i][a][b]` is agent i's reward when agent 0 plays `a`
/// and agent 1 plays `b`. Every entry is finite and both matrices
/// share the same `|A_0| × |A_1|` shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    labels: [Vec<String>; N],
    rewards: [Vec<Vec<Utility>>; N],
}

impl Game {
    /// Build from both agents' reward matrices, indexed `[a_0][a_1]`.
    pub fn new(first: Vec<Vec<Utility>>, second: Vec<Vec<Utility>>) -> Result<Self, Error> {
        let rows = first.len();
        let cols = first.first().map(Vec::len).unwrap_or_default();
        if rows < MIN_ACTIONS || cols < MIN_ACTIONS {
            return Err(Error::InvalidPayoffShape(format!(
                "each agent needs at least {} actions, got {}×{}",
                MIN_ACTIONS, rows, cols
            )));
        }
        for (agent, matrix) in [&first, &second].into_iter().enumerate() {
            if matrix.len() != rows || matrix.iter().any(|row| row.len() != cols) {
                return Err(Error::InvalidPayoffShape(format!(
                    "agent {} matrix does not match the {}×{} joint action space",
                    agent, rows, cols
                )));
            }
            for (row, values) in matrix.iter().enumerate() {
                if let Some(col) = values.iter().position(|x| !x.is_finite()) {
                    return Err(Error::NonFiniteReward { agent, row, col });
                }
            }
        }
        Ok(Self {
            labels: [Self::numbered(rows), Self::numbered(cols)],
            rewards: [first, second],
        })
    }

    /// Build from a reward function over the joint action space.
    pub fn from_fn<F>(rows: usize, cols: usize, f: F) -> Result<Self, Error>
    where
        F: Fn(usize, usize) -> (Utility, Utility),
    {
        let ref table = (0..rows)
            .map(|a| (0..cols).map(|b| f(a, b)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        Self::new(
            table.iter().map(|row| row.iter().map(|r| r.0).collect()).collect(),
            table.iter().map(|row| row.iter().map(|r| r.1).collect()).collect(),
        )
    }

    /// Symmetric dilemma with payoffs (R)eward, (S)ucker, (T)emptation, (P)unishment.
    /// Action 0 cooperates, action 1 defects.
    pub fn dilemma(r: Utility, s: Utility, t: Utility, p: Utility) -> Result<Self, Error> {
        Self::new(vec![vec![r, s], vec![t, p]], vec![vec![r, t], vec![s, p]])?
            .with_labels(vec!["C", "D"], vec!["C", "D"])
    }

    /// Prisoner's dilemma with R=3, S=0, T=5, P=1.
    pub fn prisoners() -> Self {
        Self {
            labels: [Self::labeled(&["C", "D"]), Self::labeled(&["C", "D"])],
            rewards: [
                vec![vec![3., 0.], vec![5., 1.]],
                vec![vec![3., 5.], vec![0., 1.]],
            ],
        }
    }

    /// The dilemma with R=6, S=2, T=10, P=4 that the two-agent
    /// learning environment plays by default.
    pub fn reference() -> Self {
        Self {
            labels: [Self::labeled(&["C", "D"]), Self::labeled(&["C", "D"])],
            rewards: [
                vec![vec![6., 2.], vec![10., 4.]],
                vec![vec![6., 10.], vec![2., 4.]],
            ],
        }
    }

    /// Zero-sum matching pennies. Agent 0 wins on a match.
    pub fn pennies() -> Self {
        Self {
            labels: [Self::labeled(&["H", "T"]), Self::labeled(&["H", "T"])],
            rewards: [
                vec![vec![1., -1.], vec![-1., 1.]],
                vec![vec![-1., 1.], vec![1., -1.]],
            ],
        }
    }

    /// Attach human-readable action labels.
    pub fn with_labels<S>(mut self, first: Vec<S>, second: Vec<S>) -> Result<Self, Error>
    where
        S: Into<String>,
    {
        if first.len() != self.actions(0) || second.len() != self.actions(1) {
            return Err(Error::InvalidPayoffShape(format!(
                "expected {}+{} labels, got {}+{}",
                self.actions(0),
                self.actions(1),
                first.len(),
                second.len()
            )));
        }
        self.labels = [
            first.into_iter().map(Into::into).collect(),
            second.into_iter().map(Into::into).collect(),
        ];
        Ok(self)
    }

    /// Number of actions available to an agent.
    pub fn actions(&self, agent: usize) -> usize {
        match agent {
            0 => self.rewards[0].len(),
            _ => self.rewards[0][0].len(),
        }
    }
    /// Size of the joint action space.
    pub fn joints(&self) -> usize {
        self.actions(0) * self.actions(1)
    }
    pub fn labels(&self, agent: usize) -> &[String] {
        &self.labels[agent]
    }
    pub fn matrix(&self, agent: usize) -> &[Vec<Utility>] {
        &self.rewards[agent]
    }
    pub fn reward(&self, agent: usize, joint: &JointAction) -> Utility {
        self.rewards[agent][joint.of(0)][joint.of(1)]
    }
    pub fn rewards(&self, joint: &JointAction) -> [Utility; N] {
        [self.reward(0, joint), self.reward(1, joint)]
    }

    /// Payee's rewards with rows indexed by hero's actions
    /// and columns by the other agent's actions.
    pub fn oriented(&self, hero: usize, payee: usize) -> DMatrix<Utility> {
        let ref matrix = self.rewards[payee];
        match hero {
            0 => DMatrix::from_fn(self.actions(0), self.actions(1), |a, b| matrix[a][b]),
            _ => DMatrix::from_fn(self.actions(1), self.actions(0), |b, a| matrix[a][b]),
        }
    }

    /// Payee's rewards flattened over joint indices.
    pub fn vector(&self, payee: usize) -> DVector<Utility> {
        let cols = self.actions(1);
        DVector::from_fn(self.joints(), |c, _| self.rewards[payee][c / cols][c % cols])
    }

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|a| a.to_string()).collect()
    }
    fn labeled(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }
}

#[rustfmt::skip]
impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (a, row) in self.labels[0].iter().enumerate() {
            for (b, col) in self.labels[1].iter().enumerate() {
                write!(f, "{:>2}{:<2} {:>+6.1},{:<+6.1} ", row, col, self.rewards[0][a][b], self.rewards[1][a][b])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prisoners_matches_dilemma() {
        assert_eq!(Game::prisoners(), Game::dilemma(3., 0., 5., 1.).unwrap());
        assert_eq!(Game::reference(), Game::dilemma(6., 2., 10., 4.).unwrap());
    }

    #[test]
    fn reference_rewards_follow_the_environment_table() {
        let game = Game::reference();
        assert_eq!(game.rewards(&JointAction::from([0, 0])), [6., 6.]);
        assert_eq!(game.rewards(&JointAction::from([0, 1])), [2., 10.]);
        assert_eq!(game.rewards(&JointAction::from([1, 0])), [10., 2.]);
        assert_eq!(game.rewards(&JointAction::from([1, 1])), [4., 4.]);
    }

    #[test]
    fn rewards_are_indexed_by_joint_action() {
        let game = Game::prisoners();
        assert_eq!(game.rewards(&JointAction::from([0, 1])), [0., 5.]);
        assert_eq!(game.rewards(&JointAction::from([1, 0])), [5., 0.]);
        assert_eq!(game.rewards(&JointAction::from([1, 1])), [1., 1.]);
    }

    #[test]
    fn rejects_ragged_matrices() {
        let result = Game::new(vec![vec![1., 2.], vec![3.]], vec![vec![1., 2.], vec![3., 4.]]);
        assert!(matches!(result, Err(Error::InvalidPayoffShape(_))));
    }

    #[test]
    fn rejects_mismatched_matrices() {
        let result = Game::new(
            vec![vec![1., 2.], vec![3., 4.]],
            vec![vec![1., 2., 0.], vec![3., 4., 0.]],
        );
        assert!(matches!(result, Err(Error::InvalidPayoffShape(_))));
    }

    #[test]
    fn rejects_single_action() {
        let result = Game::new(vec![vec![1., 2.]], vec![vec![1., 2.]]);
        assert!(matches!(result, Err(Error::InvalidPayoffShape(_))));
    }

    #[test]
    fn rejects_non_finite_rewards() {
        let result = Game::new(
            vec![vec![1., 2.], vec![3., 4.]],
            vec![vec![1., 2.], vec![Utility::NAN, 4.]],
        );
        assert_eq!(result, Err(Error::NonFiniteReward { agent: 1, row: 1, col: 0 }));
    }

    #[test]
    fn builds_rectangular_games_from_functions() {
        let game = Game::from_fn(2, 3, |a, b| (a as Utility, b as Utility)).unwrap();
        assert_eq!(game.actions(0), 2);
        assert_eq!(game.actions(1), 3);
        assert_eq!(game.reward(1, &JointAction::from([1, 2])), 2.);
    }

    #[test]
    fn orientation_transposes_for_second_agent() {
        let game = Game::from_fn(2, 3, |a, b| (10. * a as Utility + b as Utility, 0.)).unwrap();
        let oriented = game.oriented(1, 0);
        assert_eq!(oriented.shape(), (3, 2));
        assert_eq!(oriented[(2, 1)], 12.);
        assert_eq!(game.vector(0)[5], 12.);
    }

    #[test]
    fn label_counts_must_match() {
        assert!(Game::pennies().with_labels(vec!["H"], vec!["H", "T"]).is_err());
    }
}
