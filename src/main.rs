use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agricap::{
    engine::EngineSettings,
    io::{TerminalConsole, TerminalInput},
    scenario::{Scenario, ScenarioLoader},
    session::{Outcome, Session},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Agricultural Capitalism Simulator")]
struct Cli {
    /// Path to a scenario YAML file (uses the built-in valley when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Seed for the weather (uses the scenario seed, else a random one)
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of years to play
    #[arg(long)]
    years: Option<u32>,

    /// Override the starting balance
    #[arg(long)]
    balance: Option<i64>,

    /// Log filter when RUST_LOG is unset (defaults to the scenario's level)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut scenario = match &cli.scenario {
        Some(path) => ScenarioLoader::new(".").load(path)?,
        None => Scenario::builtin()?,
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| scenario.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();

    if let Some(years) = cli.years {
        scenario.rules.horizon_years = years;
    }
    if let Some(balance) = cli.balance {
        scenario.rules.starting_balance = balance;
    }
    scenario.validate()?;

    let seed = cli.seed.or(scenario.seed).unwrap_or_else(rand::random);
    let world = scenario.build_world()?;
    let settings = EngineSettings {
        seed,
        config: scenario.rules.clone(),
    };
    let stdin = io::stdin();
    let mut session = Session::new(
        world,
        settings,
        TerminalConsole::new(io::stdout()),
        TerminalInput::new(stdin.lock(), io::stdout()),
    );

    match session.run()? {
        Outcome::Completed { score } => {
            tracing::info!(scenario = %scenario.name, seed, score, "finished");
        }
        Outcome::Bankrupt { balance } => {
            tracing::info!(scenario = %scenario.name, seed, balance, "bankrupt");
        }
        Outcome::Exited => {
            tracing::info!(scenario = %scenario.name, seed, "player quit");
        }
    }
    Ok(())
}
