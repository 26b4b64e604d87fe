/// Everything that can go wrong while building or running an experiment.
///
/// Static problems (shapes, dimensions, configuration) surface at construction.
/// `NumericalInstability` is the only variant that can appear mid-run, and the
/// opponent-aware updater recovers from it locally.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    InvalidPayoffShape(String),
    NonFiniteReward {
        agent: usize,
        row: usize,
        col: usize,
    },
    DimensionMismatch {
        expected: usize,
        actual: usize,
    },
    NumericalInstability(String),
    InvalidConfiguration(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPayoffShape(s) => write!(f, "invalid payoff shape: {}", s),
            Self::NonFiniteReward { agent, row, col } => write!(
                f,
                "non-finite reward for agent {} at joint action ({}, {})",
                agent, row, col
            ),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {}, got {}", expected, actual)
            }
            Self::NumericalInstability(s) => write!(f, "numerical instability: {}", s),
            Self::InvalidConfiguration(s) => write!(f, "invalid configuration: {}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidConfiguration(e.to_string())
    }
}
