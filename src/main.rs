//! CalcLab - checked calculator and probability simulator
//!
//! A CLI front end over the `calclab` library: evaluates arithmetic and
//! logarithm expressions and runs coin/dice trials with ASCII charts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad config, unwritable output, etc.)
//!   2 - The expression could not be evaluated (message is still printed)

mod cli;
mod config;

use anyhow::{Context, Result};
use calclab::calculator::evaluate;
use calclab::models::{
    Calculation, CalculationReport, ExperimentKind, Operation, ReportMetadata, SimulationReport,
    TrialSummary,
};
use calclab::report::{self, ChartStyle};
use calclab::simulation::{self, random::rng_from_seed};
use cli::{Args, Command, OutputFormat};
use config::{Config, CONFIG_FILE};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if let Command::InitConfig = args.command {
        return handle_init_config();
    }

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    debug!("CalcLab v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args, &config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .calclab.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("{} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("Created {} with default settings.", CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so rendered output on stdout stays clean.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("Warning: ignoring {}: {:#}", CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}

/// Dispatch the subcommand. Returns the exit code (0 or 2).
fn run(args: &Args, config: &Config) -> Result<i32> {
    let (output, exit_code) = match args.command {
        Command::Calc { operation, a, b } => run_calculation(operation, a, b, config)?,
        Command::Simulate {
            experiment, trials, ..
        } => (run_simulation(experiment, trials, config)?, 0),
        Command::InitConfig => return handle_init_config().map(|_| 0),
    };

    match args.output {
        Some(ref path) => {
            report::write_report(&output, path)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("Output saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(exit_code)
}

/// Evaluate one expression and render it.
fn run_calculation(
    operation: Operation,
    a: Option<f64>,
    b: Option<f64>,
    config: &Config,
) -> Result<(String, i32)> {
    let (default_a, default_b) = operation.default_operands();
    let a = a.unwrap_or(default_a);
    let b = b.unwrap_or(default_b);

    let result = evaluate(operation, a, b);
    debug!("{} -> {:?}", operation.expression(a, b), result);

    let calculation = Calculation::new(operation, a, b, result);
    let exit_code = if let Some(err) = calculation.error {
        warn!("{} failed: {}", operation, err);
        2
    } else {
        0
    };

    let calc_report = CalculationReport {
        metadata: ReportMetadata::now(None),
        calculation,
    };

    let precision = config.calculator.precision;
    let output = match config.general.format {
        OutputFormat::Text => report::generate_text_calculation(&calc_report, precision),
        OutputFormat::Markdown => report::generate_markdown_calculation(&calc_report, precision),
        OutputFormat::Json => report::generate_json_report(&calc_report)?,
    };

    Ok((output, exit_code))
}

/// Run a batch of trials and render the report.
fn run_simulation(
    experiment: ExperimentKind,
    trials: Option<usize>,
    config: &Config,
) -> Result<String> {
    let requested = trials.unwrap_or(config.simulation.default_trials);
    let n = simulation::clamp_trials(requested, config.simulation.max_trials);
    if n != requested {
        warn!(
            "Trial count {} is outside 1..={}, using {}",
            requested, config.simulation.max_trials, n
        );
    }

    let seed = config.simulation.seed;
    info!("Simulating {} x{} (seed: {:?})", experiment, n, seed);

    let mut rng = rng_from_seed(seed);
    let trials = simulation::run_trials_with(experiment, n, &mut rng);
    let summary = TrialSummary::from_report(&trials);

    let sim_report = SimulationReport {
        metadata: ReportMetadata::now(seed),
        trials,
        summary,
        requested_trials: (n != requested).then_some(requested),
    };

    let style = ChartStyle::from(&config.chart);
    let output = match config.general.format {
        OutputFormat::Text => report::generate_text_simulation(&sim_report, &style),
        OutputFormat::Markdown => report::generate_markdown_simulation(&sim_report, &style),
        OutputFormat::Json => report::generate_json_report(&sim_report)?,
    };

    Ok(output)
}
