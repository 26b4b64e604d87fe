use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Learnable values laid out as one row per memory state
/// and one column per own action.
///
/// Also serves as the shape of an update step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params(Vec<Vec<f64>>);

impl Params {
    pub fn zeros(states: usize, actions: usize) -> Self {
        Self(vec![vec![0.; actions]; states])
    }
    /// The same row copied into every memory state.
    pub fn replicate(row: &[f64], states: usize) -> Self {
        Self(vec![row.to_vec(); states])
    }
    /// Rebuild from a row-major flat vector.
    pub fn from_flat(flat: &[f64], actions: usize) -> Self {
        Self(flat.chunks(actions).map(<[f64]>::to_vec).collect())
    }

    pub fn states(&self) -> usize {
        self.0.len()
    }
    pub fn actions(&self) -> usize {
        self.0.first().map(Vec::len).unwrap_or_default()
    }
    pub fn row(&self, state: usize) -> &[f64] {
        &self.0[state]
    }
    pub fn row_mut(&mut self, state: usize) -> &mut [f64] {
        &mut self.0[state]
    }
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.0.iter().map(Vec::as_slice)
    }
    pub fn flatten(&self) -> Vec<f64> {
        self.0.iter().flatten().copied().collect()
    }
    pub fn len(&self) -> usize {
        self.states() * self.actions()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn is_finite(&self) -> bool {
        self.0.iter().flatten().all(|x| x.is_finite())
    }

    /// Elementwise `self + other`, shapes must agree.
    pub fn accumulate(&mut self, other: &Self) -> Result<(), Error> {
        self.conform(other)?;
        self.0
            .iter_mut()
            .flatten()
            .zip(other.0.iter().flatten())
            .for_each(|(x, dx)| *x += dx);
        Ok(())
    }
    pub fn scaled(&self, k: f64) -> Self {
        Self(
            self.0
                .iter()
                .map(|row| row.iter().map(|x| x * k).collect())
                .collect(),
        )
    }
    /// A copy with one flat coordinate shifted by `h`.
    pub fn nudged(&self, index: usize, h: f64) -> Self {
        let mut copy = self.clone();
        let actions = self.actions();
        copy.0[index / actions][index % actions] += h;
        copy
    }

    fn conform(&self, other: &Self) -> Result<(), Error> {
        match (self.states() == other.states(), self.actions() == other.actions()) {
            (true, true) => Ok(()),
            (false, _) => Err(Error::DimensionMismatch {
                expected: self.states(),
                actual: other.states(),
            }),
            (_, false) => Err(Error::DimensionMismatch {
                expected: self.actions(),
                actual: other.actions(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_layout_is_row_major() {
        let params = Params::from_flat(&[1., 2., 3., 4., 5., 6.], 2);
        assert_eq!(params.states(), 3);
        assert_eq!(params.row(1), &[3., 4.]);
        assert_eq!(params.flatten(), vec![1., 2., 3., 4., 5., 6.]);
        assert_eq!(params.nudged(3, 0.5).row(1), &[3., 4.5]);
    }

    #[test]
    fn accumulate_rejects_other_shapes() {
        let mut params = Params::zeros(1, 2);
        assert_eq!(
            params.accumulate(&Params::zeros(1, 3)),
            Err(Error::DimensionMismatch { expected: 2, actual: 3 })
        );
        assert!(params.accumulate(&Params::replicate(&[1., -1.], 1)).is_ok());
        assert_eq!(params.row(0), &[1., -1.]);
    }
}
