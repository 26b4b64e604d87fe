use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Append-only log of every round in a run.
///
/// Analysis helpers take a `window` of trailing rounds;
/// a zero window, or one longer than the run, covers every round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory(Vec<Record>);

impl Trajectory {
    pub(crate) fn append(&mut self, record: Record) {
        self.0.push(record);
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn last(&self) -> Option<&Record> {
        self.0.last()
    }

    /// Mean probability an agent assigned to an action.
    pub fn cooperation(&self, agent: usize, action: usize, window: usize) -> Option<Probability> {
        Self::mean(self.tail(window).iter().map(|r| r.policy(agent)[action]))
    }
    /// How often an agent actually played an action.
    pub fn frequency(&self, agent: usize, action: usize, window: usize) -> Option<Probability> {
        Self::mean(
            self.tail(window)
                .iter()
                .map(|r| (r.joint().of(agent) == action) as usize as Probability),
        )
    }
    /// Mean realized reward of each agent.
    pub fn mean_rewards(&self, window: usize) -> Option<[Utility; N]> {
        let ref tail = self.tail(window);
        Some([
            Self::mean(tail.iter().map(|r| r.rewards()[0]))?,
            Self::mean(tail.iter().map(|r| r.rewards()[1]))?,
        ])
    }
    /// Discounted cumulative reward of each agent, `Σ γᵗ rₜ`.
    pub fn discounted(&self, discount: Utility) -> [Utility; N] {
        self.iter()
            .fold(([0.; N], 1.), |(mut total, weight), record| {
                total
                    .iter_mut()
                    .zip(record.rewards())
                    .for_each(|(t, r)| *t += weight * r);
                (total, weight * discount)
            })
            .0
    }
    /// Actions an agent played, in order.
    pub fn history(&self, agent: usize) -> Vec<usize> {
        self.iter().map(|r| r.joint().of(agent)).collect()
    }
    /// Rounds in which either agent recorded a given correction.
    pub fn count(&self, correction: Correction) -> usize {
        self.iter()
            .filter(|r| (0..N).any(|i| r.correction(i) == correction))
            .count()
    }
    /// Rounds in which either agent's correction was rejected.
    pub fn rejected(&self) -> usize {
        self.count(Correction::Rejected)
    }

    fn tail(&self, window: usize) -> &[Record] {
        match window {
            0 => &self.0,
            w => &self.0[self.0.len().saturating_sub(w)..],
        }
    }
    fn mean<I>(values: I) -> Option<f64>
    where
        I: Iterator<Item = f64>,
    {
        let (sum, n) = values.fold((0., 0usize), |(s, n), x| (s + x, n + 1));
        match n {
            0 => None,
            n => Some(sum / n as f64),
        }
    }
}

impl<'t> IntoIterator for &'t Trajectory {
    type Item = &'t Record;
    type IntoIter = std::slice::Iter<'t, Record>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(round: usize, joint: [usize; N], rewards: [Utility; N], p: Probability) -> Record {
        Record::new(
            round,
            Memory::START,
            JointAction::from(joint),
            rewards,
            [vec![p, 1. - p], vec![0.5, 0.5]],
            [Correction::Applied, Correction::None],
        )
    }

    fn trajectory() -> Trajectory {
        let mut trajectory = Trajectory::default();
        trajectory.append(record(0, [0, 0], [3., 3.], 0.2));
        trajectory.append(record(1, [1, 0], [5., 0.], 0.4));
        trajectory.append(record(2, [1, 1], [1., 1.], 0.6));
        trajectory.append(record(3, [0, 1], [0., 5.], 0.8));
        trajectory
    }

    #[test]
    fn windows_cover_the_tail() {
        let trajectory = trajectory();
        assert!((trajectory.cooperation(0, 0, 2).unwrap() - 0.7).abs() < 1e-12);
        assert!((trajectory.cooperation(0, 0, 0).unwrap() - 0.5).abs() < 1e-12);
        assert!((trajectory.cooperation(0, 0, 99).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(trajectory.frequency(0, 1, 3), Some(2. / 3.));
        assert_eq!(trajectory.mean_rewards(2), Some([0.5, 3.]));
    }

    #[test]
    fn empty_windows_have_no_mean() {
        let trajectory = Trajectory::default();
        assert_eq!(trajectory.cooperation(0, 0, 10), None);
        assert_eq!(trajectory.mean_rewards(0), None);
        assert_eq!(trajectory.discounted(0.9), [0., 0.]);
    }

    #[test]
    fn discounting_weights_early_rounds() {
        let trajectory = trajectory();
        assert_eq!(trajectory.discounted(1.), [9., 9.]);
        assert_eq!(trajectory.discounted(0.5), [3. + 2.5 + 0.25, 3. + 0.25 + 0.625]);
        assert_eq!(trajectory.discounted(0.), [3., 3.]);
    }

    #[test]
    fn replays_history_and_diagnostics() {
        let trajectory = trajectory();
        assert_eq!(trajectory.history(0), vec![0, 1, 1, 0]);
        assert_eq!(trajectory.history(1), vec![0, 0, 1, 1]);
        assert_eq!(trajectory.count(Correction::Applied), 4);
        assert_eq!(trajectory.rejected(), 0);
        assert_eq!((&trajectory).into_iter().count(), trajectory.len());
        assert_eq!(trajectory.iter().map(Record::round).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }
}
