//! Simulate Binary
//!
//! Plays naive and opponent-aware learners against each other and prints
//! summary tables, or every round as JSON lines with `--json`.
//! Logs go to stderr, so stdout carries only results.
//!
//! Options: --preset, --config, --updater, --horizon, --seed, --seeds, --json

use clap::Parser;
use clap::ValueEnum;
use shaping::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Prisoners,
    Pennies,
    /// R=6, S=2, T=10, P=4
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum Mode {
    Naive,
    Aware,
    Both,
}

#[derive(Parser)]
#[command(author, version, about = "Learning dynamics in repeated matrix games", long_about = None)]
struct Args {
    #[arg(long, value_enum, default_value = "prisoners", help = "Built-in game, ignored with --config")]
    preset: Preset,
    #[arg(long, help = "JSON experiment description")]
    config: Option<std::path::PathBuf>,
    #[arg(long, value_enum, default_value = "both")]
    updater: Mode,
    #[arg(long)]
    horizon: Option<usize>,
    #[arg(long, help = "First seed of the sweep")]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..), help = "Number of consecutive seeds")]
    seeds: u64,
    #[arg(long, help = "Write every round to stdout as JSON lines")]
    json: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match self.config {
            Some(ref path) => Config::from_json(&std::fs::read_to_string(path)?)?,
            None => Config {
                game: match self.preset {
                    Preset::Prisoners => GameConfig::Prisoners,
                    Preset::Pennies => GameConfig::Pennies,
                    Preset::Reference => GameConfig::Reference,
                },
                ..Config::default()
            },
        };
        if let Some(horizon) = self.horizon {
            config.settings.horizon = horizon;
        }
        if let Some(seed) = self.seed {
            config.settings.seed = seed;
        }
        Ok(config)
    }
    fn kinds(&self) -> Vec<UpdaterKind> {
        match self.updater {
            Mode::Naive => vec![UpdaterKind::Naive],
            Mode::Aware => vec![UpdaterKind::OpponentAware],
            Mode::Both => vec![UpdaterKind::Naive, UpdaterKind::OpponentAware],
        }
    }
    /// Consecutive seeds from `first`, stopping short at `u64::MAX`.
    fn seeds(&self, first: u64) -> Vec<u64> {
        let seeds = (first..=first.saturating_add(self.seeds - 1)).collect::<Vec<_>>();
        if (seeds.len() as u64) < self.seeds {
            log::warn!("only {} seeds fit after {}", seeds.len(), first);
        }
        seeds
    }
}

/// One JSON object per round of every run.
fn dump<W>(
    out: &mut W,
    game: &Game,
    agents: &[Agent; N],
    settings: Settings,
    kinds: &[UpdaterKind],
    seeds: &[u64],
) -> anyhow::Result<()>
where
    W: std::io::Write,
{
    for updater in kinds.iter().copied() {
        for seed in seeds.iter().copied() {
            let settings = Settings {
                updater,
                seed,
                ..settings
            };
            let outcome = Simulation::new(game.clone(), agents.clone(), settings)?.run()?;
            for record in &outcome.trajectory {
                let line = serde_json::json!({
                    "updater": updater,
                    "seed": seed,
                    "record": record,
                });
                writeln!(out, "{}", line)?;
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    log();
    let ref args = Args::parse();
    let config = args.config()?;
    let ref game = config.game()?;
    let ref agents = config.agents(game)?;
    let settings = config.settings;
    let ref seeds = args.seeds(settings.seed);
    log::info!("game\n{}", game);
    log::info!("{}", agents[0]);
    log::info!("{}", agents[1]);
    if args.json {
        let ref mut out = std::io::stdout().lock();
        return dump(out, game, agents, settings, &args.kinds(), seeds);
    }
    match args.updater {
        Mode::Both => compare(game, agents, settings, seeds)?
            .iter()
            .for_each(|comparison| println!("{}", comparison)),
        _ => args
            .kinds()
            .into_iter()
            .map(|updater| sweep(game, agents, Settings { updater, ..settings }, seeds))
            .collect::<Result<Vec<_>, _>>()?
            .iter()
            .flatten()
            .for_each(|summary| println!("{}", summary)),
    }
    Ok(())
}
