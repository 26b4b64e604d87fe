use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::sync::Arc;

/// Rule that picks a move from the opponent's past moves.
pub type Script = Arc<dyn Fn(&[usize]) -> usize + Send + Sync>;

/// A fixed, non-learning way to play a repeated game.
///
/// Action 0 cooperates and action 1 defects, as in [`Game::dilemma`].
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Cooperate,
    Defect,
    /// Cooperate first, then repeat the opponent's last move.
    TitForTat,
    /// Cooperate until the opponent defects once, then defect forever.
    Grim,
    #[serde(skip)]
    Custom(Script),
}

impl Strategy {
    pub const COOPERATE: usize = 0;
    pub const DEFECT: usize = 1;

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[usize]) -> usize + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Next move given everything the opponent has played so far.
    pub fn act(&self, opponent: &[usize]) -> usize {
        match self {
            Self::Cooperate => Self::COOPERATE,
            Self::Defect => Self::DEFECT,
            Self::TitForTat => opponent.last().copied().unwrap_or(Self::COOPERATE),
            Self::Grim => match opponent.iter().any(|a| *a != Self::COOPERATE) {
                true => Self::DEFECT,
                false => Self::COOPERATE,
            },
            Self::Custom(f) => f(opponent),
        }
    }

    /// Like [`Strategy::act`], rejecting moves outside `0..actions`.
    pub fn checked(&self, opponent: &[usize], actions: usize) -> Result<usize, Error> {
        match self.act(opponent) {
            a if a < actions => Ok(a),
            a => Err(Error::InvalidConfiguration(format!(
                "{} strategy played action {} of {}",
                self, a, actions
            ))),
        }
    }
}

/// Moves and scores of a game between two fixed strategies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub moves: [Vec<usize>; N],
    /// Cumulative payoff of each player, `Σ γᵗ rₜ`.
    pub payoffs: [Utility; N],
}

impl Match {
    /// How often a player chose an action.
    pub fn frequency(&self, player: usize, action: usize) -> Option<Probability> {
        let ref moves = self.moves[player];
        match moves.len() {
            0 => None,
            n => Some(moves.iter().filter(|a| **a == action).count() as Probability / n as f64),
        }
    }
}

/// Play two strategies against each other, each seeing only the other's history.
pub fn play(
    first: &Strategy,
    second: &Strategy,
    game: &Game,
    rounds: usize,
    discount: Utility,
) -> Result<Match, Error> {
    if !(discount.is_finite() && discount >= 0.) {
        return Err(Error::InvalidConfiguration(format!(
            "discount {} must be finite and non-negative",
            discount
        )));
    }
    let mut moves = [Vec::with_capacity(rounds), Vec::with_capacity(rounds)];
    let mut payoffs = [0.; N];
    let mut weight = 1.;
    for _ in 0..rounds {
        let joint = JointAction::from([
            first.checked(&moves[1], game.actions(0))?,
            second.checked(&moves[0], game.actions(1))?,
        ]);
        let rewards = game.rewards(&joint);
        payoffs
            .iter_mut()
            .zip(rewards)
            .for_each(|(total, r)| *total += weight * r);
        moves[0].push(joint.of(0));
        moves[1].push(joint.of(1));
        weight *= discount;
    }
    Ok(Match { moves, payoffs })
}

impl PartialEq for Strategy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Strategy({})", self)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cooperate => write!(f, "cooperate"),
            Self::Defect => write!(f, "defect"),
            Self::TitForTat => write!(f, "tit-for-tat"),
            Self::Grim => write!(f, "grim"),
            Self::Custom(_) => write!(f, "custom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_strategies_follow_their_rules() {
        assert_eq!(Strategy::Cooperate.act(&[1, 1]), 0);
        assert_eq!(Strategy::Defect.act(&[]), 1);
        assert_eq!(Strategy::TitForTat.act(&[]), 0);
        assert_eq!(Strategy::TitForTat.act(&[0, 1]), 1);
        assert_eq!(Strategy::TitForTat.act(&[1, 0]), 0);
        assert_eq!(Strategy::Grim.act(&[0, 0]), 0);
        assert_eq!(Strategy::Grim.act(&[1, 0, 0]), 1);
    }

    #[test]
    fn tit_for_tat_punishes_one_round_late() {
        let ref game = Game::prisoners();
        let result = play(&Strategy::TitForTat, &Strategy::Defect, game, 4, 1.).unwrap();
        assert_eq!(result.moves[0], vec![0, 1, 1, 1]);
        assert_eq!(result.moves[1], vec![1, 1, 1, 1]);
        assert_eq!(result.payoffs, [0. + 1. + 1. + 1., 5. + 1. + 1. + 1.]);
        assert_eq!(result.frequency(0, 1), Some(0.75));
    }

    #[test]
    fn payoffs_are_discounted_from_the_first_round() {
        let ref game = Game::dilemma(6., 2., 10., 4.).unwrap();
        let result = play(&Strategy::Cooperate, &Strategy::TitForTat, game, 3, 0.5).unwrap();
        assert_eq!(result.payoffs, [6. + 3. + 1.5, 6. + 3. + 1.5]);
    }

    #[test]
    fn custom_strategies_see_the_opponent_history() {
        let ref game = Game::prisoners();
        let alternate = Strategy::custom(|opponent| opponent.len() % 2);
        let result = play(&alternate, &Strategy::Cooperate, game, 4, 0.9).unwrap();
        assert_eq!(result.moves[0], vec![0, 1, 0, 1]);
        assert_eq!(alternate, alternate.clone());
        assert_ne!(alternate, Strategy::custom(|_| 0));
    }

    #[test]
    fn rejects_moves_outside_the_game() {
        let ref game = Game::prisoners();
        let wild = Strategy::custom(|_| 7);
        assert!(matches!(
            play(&wild, &Strategy::Cooperate, game, 1, 0.9),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(play(&Strategy::Defect, &Strategy::Defect, game, 0, 0.9)
            .unwrap()
            .frequency(0, 1)
            .is_none());
    }

    #[test]
    fn named_strategies_parse_from_json() {
        let strategy: Strategy = serde_json::from_str(r#""tit_for_tat""#).unwrap();
        assert_eq!(strategy, Strategy::TitForTat);
    }
}
