use super::*;

/// Boltzmann projection `π = softmax(θ / τ)`.
///
/// The maximum parameter is subtracted before exponentiating, so the
/// projection never overflows. Temperatures below `TEMPERATURE_MIN` are
/// clamped, which makes the zero-temperature limit a one-hot argmax
/// (up to the `POLICY_MIN` floor) rather than a division by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Softmax(Entropy);

impl From<Entropy> for Softmax {
    fn from(temperature: Entropy) -> Self {
        Self(temperature.max(TEMPERATURE_MIN))
    }
}

impl Softmax {
    pub fn temperature(&self) -> Entropy {
        self.0
    }
}

impl Projector for Softmax {
    fn distribution(&self, params: &[f64]) -> Policy {
        let max = params.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        normalize(params.iter().map(|x| ((x - max) / self.0).exp()).collect())
    }
    fn jacobian(&self, params: &[f64]) -> Option<DMatrix<f64>> {
        let ref p = self.distribution(params);
        let n = p.len();
        Some(DMatrix::from_fn(n, n, |a, k| {
            p[a] * (kronecker(a, k) - p[k]) / self.0
        }))
    }
    fn score(&self, params: &[f64], action: usize) -> Option<Vec<f64>> {
        let p = self.distribution(params);
        Some(
            p.into_iter()
                .enumerate()
                .map(|(k, pk)| (kronecker(k, action) - pk) / self.0)
                .collect(),
        )
    }
}

fn kronecker(i: usize, j: usize) -> f64 {
    if i == j { 1. } else { 0. }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sums_to_one(p: &[Probability]) {
        assert!((p.iter().sum::<Probability>() - 1.).abs() < TOLERANCE);
        assert!(p.iter().all(|x| *x > 0.), "{:?}", p);
    }

    #[test]
    fn uniform_when_parameters_tie() {
        let p = Softmax::from(1.).distribution(&[0.3, 0.3, 0.3, 0.3]);
        sums_to_one(&p);
        assert!(p.iter().all(|x| (x - 0.25).abs() < TOLERANCE));
    }

    #[test]
    fn never_overflows() {
        let p = Softmax::from(1.).distribution(&[1e300, -1e300, 700.]);
        sums_to_one(&p);
        assert!((p[0] - 1.).abs() < TOLERANCE);
    }

    #[test]
    fn zero_temperature_limit_is_one_hot() {
        let params = [0.1, 0.5, 0.3];
        for temperature in [1e-3, 1e-6, 1e-12, 0.] {
            let p = Softmax::from(temperature).distribution(&params);
            sums_to_one(&p);
            assert!(p.iter().all(|x| x.is_finite()));
            assert!((p[1] - 1.).abs() < 1e-9, "τ={} {:?}", temperature, p);
            assert!(p[0] < 1e-9 && p[2] < 1e-9);
        }
    }

    #[test]
    fn higher_temperature_is_flatter() {
        let params = [1., 0.];
        let cold = Softmax::from(0.5).distribution(&params);
        let warm = Softmax::from(5.0).distribution(&params);
        assert!(cold[0] > warm[0]);
        assert!(warm[0] > 0.5);
    }

    #[test]
    fn jacobian_matches_finite_differences() {
        let h = 1e-6;
        let params = [0.4, -1.2, 0.9];
        let softmax = Softmax::from(0.7);
        let jacobian = softmax.jacobian(&params).unwrap();
        for k in 0..params.len() {
            let mut plus = params;
            let mut minus = params;
            plus[k] += h;
            minus[k] -= h;
            let p = softmax.distribution(&plus);
            let m = softmax.distribution(&minus);
            for a in 0..params.len() {
                let numeric = (p[a] - m[a]) / (2. * h);
                assert!((jacobian[(a, k)] - numeric).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn score_is_gradient_of_log_probability() {
        let h = 1e-6;
        let params = [0.2, 0.1];
        let softmax = Softmax::from(2.);
        let score = softmax.score(&params, 1).unwrap();
        for k in 0..params.len() {
            let mut plus = params;
            let mut minus = params;
            plus[k] += h;
            minus[k] -= h;
            let numeric = (softmax.distribution(&plus)[1].ln()
                - softmax.distribution(&minus)[1].ln())
                / (2. * h);
            assert!((score[k] - numeric).abs() < 1e-7);
        }
    }
}
