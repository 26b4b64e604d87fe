//! Learning dynamics of independent and opponent-aware agents
//! in repeated two-player matrix games.
//!
//! # Module Structure
//!
//! - `game`: Bimatrix payoff model, joint actions, memory states
//! - `policy`: Parameter-to-distribution projections and schedules
//! - `agent`: Learnable parameters, per-round snapshots, scripted strategies
//! - `learning`: Value landscape, naive and opponent-aware updaters
//! - `simulation`: Round loop, convergence, trajectory records
//! - `config`: Serializable experiment configuration
//! - `experiment`: Library entry points, comparisons and seed sweeps
#![allow(clippy::needless_range_loop)]

mod agent;
mod config;
mod error;
mod experiment;
mod game;
mod learning;
mod policy;
mod simulation;

pub use agent::*;
pub use config::*;
pub use error::*;
pub use experiment::*;
pub use game::*;
pub use learning::*;
pub use policy::*;
pub use simulation::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Rewards, expected values and value gradients.
pub type Utility = f64;
/// Action probabilities and exploration rates.
pub type Probability = f64;
/// Softmax temperatures.
pub type Entropy = f64;
/// Tolerances, step sizes and distances between policies.
pub type Energy = f64;
/// Learning rates.
pub type Rate = f64;

// ============================================================================
// GAME PARAMETERS
// ============================================================================
/// Number of agents in a repeated game.
pub const N: usize = 2;
/// Minimum number of actions available to each agent.
pub const MIN_ACTIONS: usize = 2;

// ============================================================================
// POLICY PROJECTION
// ============================================================================
/// Distributions must sum to one within this tolerance.
pub const TOLERANCE: Probability = 1e-9;
/// Floor applied to every action probability before renormalization.
pub const POLICY_MIN: Probability = Probability::MIN_POSITIVE;
/// Temperatures are clamped here so the softmax never divides by zero.
pub const TEMPERATURE_MIN: Entropy = 1e-12;

// ============================================================================
// OPPONENT-AWARE CORRECTION
// ============================================================================
/// Central-difference step for mixed partials of memory-conditioned values.
/// Truncation error is O(h²) ≈ 1e-10, roundoff O(ε/h) ≈ 1e-11.
pub const MIXED_STEP: Energy = 1e-5;

// ============================================================================
// EXPERIMENT DEFAULTS
// ============================================================================
/// Rounds per run.
pub const DEFAULT_HORIZON: usize = 1000;
/// Seed of the per-run random source.
pub const DEFAULT_SEED: u64 = 42;
/// Constant learning rate.
pub const DEFAULT_LEARNING_RATE: Rate = 0.1;
/// Constant softmax temperature.
pub const DEFAULT_TEMPERATURE: Entropy = 1.0;
/// Exploration rate for ε-greedy agents.
pub const DEFAULT_EPSILON: Probability = 0.1;
/// Bootstrap discount. Stateless repeated games need none.
pub const DEFAULT_DISCOUNT: Utility = 0.0;
/// Consecutive quiet rounds before declaring convergence.
pub const CONVERGENCE_WINDOW: usize = 50;
/// Largest policy change that still counts as quiet.
pub const CONVERGENCE_TOLERANCE: Energy = 1e-6;
/// Trailing rounds summarized by analysis helpers.
pub const SUMMARY_WINDOW: usize = 100;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Rounds between progress log messages.
pub const LOG_INTERVAL: usize = 250;

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to stderr.
#[cfg(feature = "cli")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
