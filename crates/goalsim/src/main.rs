mod logging;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use goalsim_core::strategy::{RunProgress, SimulationStrategy};
use goalsim_core::synthetic;
use goalsim_core::{EngineSettings, Goal, InvestorProfile, RunResult, Universe, recommend};

use logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "goalsim")]
#[command(about = "Goal-based ETF recommendation engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank a universe of instruments against a savings goal
    Recommend(RecommendArgs),
    /// Generate a synthetic universe for demos and benchmarks
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Path to the universe dataset (a JSON array of instruments)
    #[arg(short, long)]
    universe: PathBuf,

    /// Amount the plan should reach
    #[arg(short, long)]
    target: f64,

    /// Horizon in years
    #[arg(short, long)]
    years: u32,

    /// Starting amount
    #[arg(long, default_value_t = 0.0)]
    initial: f64,

    /// Monthly contribution
    #[arg(long, default_value_t = 0.0)]
    monthly: f64,

    /// Simulation strategy
    #[arg(short, long, value_enum, default_value_t = Strategy::MonteCarlo)]
    strategy: Strategy,

    /// Restrict candidates to one theme
    #[arg(long)]
    theme: Option<String>,

    /// Key separating users' random streams
    #[arg(long, default_value = "0")]
    user_key: String,

    /// Risk appetite on a 0-100 scale
    #[arg(long, default_value_t = 50.0)]
    risk_score: f64,

    /// Monte Carlo trials per instrument
    #[arg(long)]
    trials: Option<usize>,

    /// How many recommendations to keep
    #[arg(long)]
    top: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of instruments
    #[arg(short, long, default_value_t = 50)]
    instruments: usize,

    /// Years of daily history per instrument
    #[arg(short, long, default_value_t = 5)]
    years: u32,

    /// Where to write the dataset (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    MonteCarlo,
    HistoricalWindow,
}

impl From<Strategy> for SimulationStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::MonteCarlo => Self::MonteCarlo,
            Strategy::HistoricalWindow => Self::HistoricalWindow,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Recommend(args) => run_recommend(args),
        Commands::Generate(args) => run_generate(args),
    }
}

fn run_recommend(args: RecommendArgs) -> color_eyre::Result<()> {
    let universe = load_universe(&args.universe)?;
    tracing::info!(
        "loaded {} instruments from {}",
        universe.len(),
        args.universe.display()
    );

    let goal = Goal {
        target_amount: args.target,
        years: args.years,
        initial_amount: args.initial,
        monthly_contribution: args.monthly,
    };
    let profile = InvestorProfile {
        user_key: args.user_key,
        risk_score: args.risk_score,
        theme: args.theme,
        ..InvestorProfile::default()
    };

    let mut settings = EngineSettings::default();
    if let Some(trials) = args.trials {
        settings.trials = trials;
    }
    if let Some(top) = args.top {
        settings.top_results = top;
    }

    let result = recommend(
        &universe,
        &goal,
        &profile,
        args.strategy.into(),
        &settings,
        &RunProgress::new(0),
    )?;
    tracing::info!(
        "analyzed {} instruments ({} skipped) in {} s",
        result.meta.instruments_analyzed,
        result.meta.instruments_skipped,
        result.meta.calculation_time_secs
    );

    print_result(&result, args.pretty)
}

fn run_generate(args: GenerateArgs) -> color_eyre::Result<()> {
    let universe = synthetic::benchmark_universe(args.instruments, args.years)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&universe)?
    } else {
        serde_json::to_string(&universe)?
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            tracing::info!(
                "wrote {} instruments to {}",
                args.instruments,
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn load_universe(path: &Path) -> color_eyre::Result<Universe> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_result(result: &RunResult, pretty: bool) -> color_eyre::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
