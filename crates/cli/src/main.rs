use std::{fs, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use engine::{Placement, RoundConfig, Scenario, Session, check};

mod settings;

#[derive(Parser, Debug)]
#[command(name = "quadratura")]
#[command(about = "Authoring tools for three-ledger reconciliation rounds")]
struct Cli {
    /// Log filter level (also read from `QUADRATURA_LOG`).
    #[arg(long, env = "QUADRATURA_LOG")]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one round and emit it as JSON.
    Generate(GenerateArgs),
    /// Reconcile a scenario file against a placement file.
    Check(CheckArgs),
    /// Generate a round, place every card correctly, print the totals.
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Seed for a reproducible round; drawn from the OS when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of modeled firms (at least 3).
    #[arg(long)]
    firms: Option<usize>,
    /// Write the scenario here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Scenario JSON produced by `generate`.
    #[arg(long)]
    scenario: PathBuf,
    /// Placement JSON mapping card ids to categories per ledger.
    #[arg(long)]
    placement: PathBuf,
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct DemoArgs {
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    firms: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new()?;

    let level = cli
        .log
        .clone()
        .or_else(|| settings.level.clone())
        .unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(format!("quadratura={level},engine={level}"))
        .init();

    match cli.command {
        Command::Generate(args) => generate(&settings, args),
        Command::Check(args) => reconcile_files(args),
        Command::Demo(args) => demo(&settings, args),
    }
}

fn generate(
    settings: &settings::Settings,
    args: GenerateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = new_session(settings, args.firms, args.seed)?;
    let scenario = session.scenario();
    tracing::info!(
        "generated round: {} cards, target {}",
        scenario.len(),
        scenario.target()
    );

    let payload = if args.pretty {
        serde_json::to_string_pretty(scenario)?
    } else {
        serde_json::to_string(scenario)?
    };
    match args.out {
        Some(path) => fs::write(path, payload)?,
        None => println!("{payload}"),
    }
    Ok(())
}

fn reconcile_files(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let scenario: Scenario = serde_json::from_str(&fs::read_to_string(&args.scenario)?)?;
    let placement: Placement = serde_json::from_str(&fs::read_to_string(&args.placement)?)?;

    let report = check(&scenario, &placement);
    tracing::info!("{report}");

    let payload = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{payload}");
    Ok(())
}

fn demo(settings: &settings::Settings, args: DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = new_session(settings, args.firms, args.seed)?;

    let cards: Vec<_> = session.scenario().iter().cloned().collect();
    for card in &cards {
        session.place(card.ledger, card.id, card.correct_bin);
    }

    let report = session.check();
    println!("production:  {}", report.gdp_production);
    println!("expenditure: {}", report.gdp_expenditure);
    println!("income:      {}", report.gdp_income);
    println!("{report}");
    Ok(())
}

fn new_session(
    settings: &settings::Settings,
    firms: Option<usize>,
    seed: Option<u64>,
) -> Result<Session, engine::EngineError> {
    let mut config = RoundConfig::default();
    if let Some(firms) = firms.or(settings.rounds.firms) {
        config.firms = firms;
    }
    if let (Some(min), Some(max)) = (settings.rounds.scale_min, settings.rounds.scale_max) {
        config.scale_range = min..=max;
    }
    match seed {
        Some(seed) => Session::with_seed(config, seed),
        None => Session::new(config),
    }
}
