use super::*;
use crate::*;
use nalgebra::DVector;

/// Opponent-aware learning.
///
/// The hero takes its naive step plus a first-order look-ahead term that
/// accounts for the villain's own naive gradient step:
///
/// ```text
/// Δθ_i = base_i + α_i · η_j · (∂²V_j / ∂θ_i ∂θ_j) · ∇_{θ_j} V_i
/// ```
///
/// Both agents must expose a smooth policy for the term to exist. When one
/// does not, or when the term is not finite, the base step stands alone
/// and the step records why.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aware;

impl Aware {
    fn correction(&self, hero: usize, context: &Context) -> Result<Params, Error> {
        let villain = N - 1 - hero;
        let ref landscape = context.landscape();
        let shaping = landscape
            .evaluate(context.snapshots, hero)?
            .gradient(villain)?
            .flatten();
        let mixed = landscape.mixed(context.snapshots, hero, villain)?;
        let scale = context.hero(hero).learning_rate * context.villain(hero).learning_rate;
        let term = mixed * DVector::from_vec(shaping) * scale;
        match term.iter().all(|x| x.is_finite()) {
            true => Ok(Params::from_flat(term.as_slice(), context.game.actions(hero))),
            false => Err(Error::NumericalInstability(format!(
                "correction of agent {} is not finite",
                hero
            ))),
        }
    }
}

impl Updater for Aware {
    fn gradient(&self, hero: usize, context: &Context) -> Result<Step, Error> {
        let Step { mut delta, .. } = Naive.gradient(hero, context)?;
        if !(context.hero(hero).differentiable() && context.villain(hero).differentiable()) {
            return Ok(Step {
                delta,
                correction: Correction::Unavailable,
            });
        }
        match self.correction(hero, context) {
            Ok(ref term) => {
                let base = delta.clone();
                delta.accumulate(term)?;
                match delta.is_finite() {
                    true => Ok(Step {
                        delta,
                        correction: Correction::Applied,
                    }),
                    false => {
                        log::warn!("agent {} corrected step overflowed, using base step", hero);
                        Ok(Step {
                            delta: base,
                            correction: Correction::Rejected,
                        })
                    }
                }
            }
            Err(Error::NumericalInstability(reason)) => {
                log::warn!("agent {} correction rejected: {}", hero, reason);
                Ok(Step {
                    delta,
                    correction: Correction::Rejected,
                })
            }
            Err(e) => Err(e),
        }
    }
}
