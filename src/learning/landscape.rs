use crate::*;
use nalgebra::DMatrix;
use nalgebra::DVector;

/// Closed-form expected value of the repeated game.
///
/// Both memory-conditioned policies induce a Markov chain over joint
/// actions with transition `P[c][d] = x_{next(c)}[d]`, where `x_s` is the
/// joint distribution played in memory state `s`. The normalized
/// discounted value for a payee is
///
/// ```text
/// V = (1 − γ) · x₀ᵀ (I − γP)⁻¹ r
/// ```
///
/// which collapses to the one-shot bimatrix value `π₀ᵀ R π₁`
/// when agents remember nothing.
#[derive(Debug, Clone, Copy)]
pub struct Landscape<'a> {
    game: &'a Game,
    memory: Memory,
    discount: Utility,
}

/// The value of one payee at one pair of snapshots,
/// with the solves needed to differentiate it.
#[derive(Debug, Clone)]
pub struct Evaluation<'a> {
    game: &'a Game,
    snapshots: &'a [Snapshot; N],
    tables: [Vec<Policy>; N],
    discount: Utility,
    /// `(I − γP)⁻¹ r`
    y: DVector<f64>,
    /// Discounted visitation weight of each memory state.
    w: Vec<f64>,
    value: Utility,
}

impl<'a> Landscape<'a> {
    pub fn new(game: &'a Game, memory: Memory, discount: Utility) -> Self {
        Self {
            game,
            memory,
            discount,
        }
    }

    pub fn evaluate<'s>(
        &self,
        snapshots: &'s [Snapshot; N],
        payee: usize,
    ) -> Result<Evaluation<'s>, Error>
    where
        'a: 's,
    {
        self.conform(snapshots)?;
        let gamma = self.discount;
        let joints = self.game.joints();
        let states = self.memory.states(self.game);
        let tables = [snapshots[0].table(), snapshots[1].table()];
        let x = self.distributions(&tables);
        let ref start = x[Memory::START];
        let m = DMatrix::<f64>::identity(joints, joints)
            - DMatrix::from_fn(joints, joints, |c, d| x[self.memory.after(c)][d]) * gamma;
        let y = m
            .clone()
            .lu()
            .solve(&self.game.vector(payee))
            .ok_or_else(|| Error::NumericalInstability("singular value system".into()))?;
        let z = m
            .transpose()
            .lu()
            .solve(start)
            .ok_or_else(|| Error::NumericalInstability("singular visitation system".into()))?;
        let mut w = vec![0.; states];
        w[Memory::START] = 1.;
        for c in 0..joints {
            w[self.memory.after(c)] += gamma * z[c];
        }
        let value = (1. - gamma) * start.dot(&y);
        if !value.is_finite() || y.iter().chain(w.iter()).any(|v| !v.is_finite()) {
            return Err(Error::NumericalInstability(format!(
                "value of agent {} is not finite",
                payee
            )));
        }
        Ok(Evaluation {
            game: self.game,
            snapshots,
            tables,
            discount: gamma,
            y,
            w,
            value,
        })
    }

    /// `∂²V_payee / ∂θ_hero ∂θ_villain` over flattened parameters,
    /// rows indexed by the hero's.
    pub fn mixed(
        &self,
        snapshots: &[Snapshot; N],
        hero: usize,
        payee: usize,
    ) -> Result<DMatrix<f64>, Error> {
        match self.memory {
            Memory::Stateless => self.analytic(snapshots, hero, payee),
            Memory::OneStep => self.numeric(snapshots, hero, payee),
        }
    }

    /// Stateless closed form `J_heroᵀ · R · J_villain`.
    pub fn analytic(
        &self,
        snapshots: &[Snapshot; N],
        hero: usize,
        payee: usize,
    ) -> Result<DMatrix<f64>, Error> {
        let villain = N - 1 - hero;
        let jh = Self::jacobian(&snapshots[hero], Memory::START)?;
        let jv = Self::jacobian(&snapshots[villain], Memory::START)?;
        let mixed = jh.transpose() * self.game.oriented(hero, payee) * jv;
        match mixed.iter().all(|x| x.is_finite()) {
            true => Ok(mixed),
            false => Err(Error::NumericalInstability("mixed partials overflow".into())),
        }
    }

    /// Central differences of the analytic villain gradient
    /// along each of the hero's parameters.
    pub fn numeric(
        &self,
        snapshots: &[Snapshot; N],
        hero: usize,
        payee: usize,
    ) -> Result<DMatrix<f64>, Error> {
        let villain = N - 1 - hero;
        let rows = snapshots[hero].params().len();
        let cols = snapshots[villain].params().len();
        let mut mixed = DMatrix::zeros(rows, cols);
        for k in 0..rows {
            let ref plus = self.shifted(snapshots, hero, k, MIXED_STEP, payee)?;
            let ref minus = self.shifted(snapshots, hero, k, -MIXED_STEP, payee)?;
            for l in 0..cols {
                mixed[(k, l)] = (plus[l] - minus[l]) / (2. * MIXED_STEP);
            }
        }
        match mixed.iter().all(|x| x.is_finite()) {
            true => Ok(mixed),
            false => Err(Error::NumericalInstability("mixed partials overflow".into())),
        }
    }

    /// Villain gradient of the payee's value after nudging one hero parameter.
    fn shifted(
        &self,
        snapshots: &[Snapshot; N],
        hero: usize,
        index: usize,
        step: Energy,
        payee: usize,
    ) -> Result<Vec<f64>, Error> {
        let mut pair = snapshots.clone();
        pair[hero] = snapshots[hero].perturbed(index, step);
        Ok(self
            .evaluate(&pair, payee)?
            .gradient(N - 1 - hero)?
            .flatten())
    }

    /// Joint action distribution played in each memory state.
    fn distributions(&self, tables: &[Vec<Policy>; N]) -> Vec<DVector<f64>> {
        let cols = self.game.actions(1);
        (0..self.memory.states(self.game))
            .map(|s| {
                DVector::from_fn(self.game.joints(), |c, _| {
                    tables[0][s][c / cols] * tables[1][s][c % cols]
                })
            })
            .collect()
    }

    fn jacobian(snapshot: &Snapshot, state: usize) -> Result<DMatrix<f64>, Error> {
        snapshot.jacobian(state).ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "agent {} policy is not differentiable",
                snapshot.id()
            ))
        })
    }

    fn conform(&self, snapshots: &[Snapshot; N]) -> Result<(), Error> {
        let states = self.memory.states(self.game);
        for (agent, snapshot) in snapshots.iter().enumerate() {
            if snapshot.actions() != self.game.actions(agent) {
                return Err(Error::DimensionMismatch {
                    expected: self.game.actions(agent),
                    actual: snapshot.actions(),
                });
            }
            if snapshot.states() != states {
                return Err(Error::DimensionMismatch {
                    expected: states,
                    actual: snapshot.states(),
                });
            }
        }
        Ok(())
    }
}

impl Evaluation<'_> {
    pub fn value(&self) -> Utility {
        self.value
    }

    /// `∂V / ∂θ_wrt`, one row per memory state.
    ///
    /// Each state contributes its visitation weight times the change in
    /// the joint distribution it plays, scored against the solved values.
    pub fn gradient(&self, wrt: usize) -> Result<Params, Error> {
        let other = N - 1 - wrt;
        let cols = self.game.actions(1);
        let actions = self.game.actions(wrt);
        let mut gradient = Params::zeros(self.w.len(), actions);
        for (s, weight) in self.w.iter().enumerate() {
            let jacobian = Landscape::jacobian(&self.snapshots[wrt], s)?;
            let ref opponent = self.tables[other][s];
            for k in 0..actions {
                let sum = (0..self.game.joints())
                    .map(|c| match wrt {
                        0 => jacobian[(c / cols, k)] * opponent[c % cols] * self.y[c],
                        _ => jacobian[(c % cols, k)] * opponent[c / cols] * self.y[c],
                    })
                    .sum::<f64>();
                gradient.row_mut(s)[k] = (1. - self.discount) * weight * sum;
            }
        }
        match gradient.is_finite() {
            true => Ok(gradient),
            false => Err(Error::NumericalInstability(format!(
                "value gradient of agent {} is not finite",
                wrt
            ))),
        }
    }
}
