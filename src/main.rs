use clap::Parser;
use tracing::info;

use diet_optimizer_rs::cli::{Cli, Command, Preset, SolveArgs};
use diet_optimizer_rs::data::{OptimizerConfig, TableLayout, load_config, load_table};
use diet_optimizer_rs::error::Result;
use diet_optimizer_rs::interface::{display_dataset_summary, display_report, write_report_json};
use diet_optimizer_rs::milp::{BigM, DietRules};
use diet_optimizer_rs::models::NutritionDataset;
use diet_optimizer_rs::planner::DietOptimizer;
use diet_optimizer_rs::solver::{GoodLpSolver, SolverAdapter, TimeoutSolver};

/// Exit code when the model has no optimal plan.
const EXIT_UNSOLVED: i32 = 2;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Solve(args) => cmd_solve(args),
        Command::Inspect { table, config } => {
            let layout = match &config {
                Some(path) => load_config(path)?.layout,
                None => TableLayout::default(),
            };
            let raw = load_table(&table, &layout)?;
            let dataset = NutritionDataset::from_table(raw)?;
            display_dataset_summary(&dataset);
            Ok(0)
        }
    }
}

/// Load, build, solve and report.
fn cmd_solve(args: SolveArgs) -> Result<i32> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => OptimizerConfig {
            rules: match args.preset {
                Preset::Basic => DietRules::default(),
                Preset::Classic => DietRules::classic(),
            },
            ..Default::default()
        },
    };
    apply_overrides(&mut config, &args);
    config.rules.validate()?;

    let raw = load_table(&args.table, &config.layout)?;
    let dataset = NutritionDataset::from_table(raw)?;
    info!(
        "Loaded {} foods, {} nutrients from {}",
        dataset.len(),
        dataset.nutrients().len(),
        args.table.display()
    );

    let solver: Box<dyn SolverAdapter> = match config.solve_timeout() {
        Some(limit) => Box::new(TimeoutSolver::new(GoodLpSolver, limit)),
        None => Box::new(GoodLpSolver),
    };
    let optimizer = DietOptimizer::new(solver, config.rules).with_tolerances(config.tolerances);
    let outcome = optimizer.optimize(&dataset)?;

    display_report(&outcome);
    if let Some(path) = &args.json {
        write_report_json(&outcome, path)?;
        info!("Wrote report to {}", path.display());
    }

    Ok(if outcome.plan().is_some() { 0 } else { EXIT_UNSOLVED })
}

/// Command-line flags win over the config file.
fn apply_overrides(config: &mut OptimizerConfig, args: &SolveArgs) {
    if let Some(threshold) = args.min_serving {
        config.rules.min_serving.enabled = true;
        config.rules.min_serving.threshold = threshold;
    }
    if args.no_min_serving {
        config.rules.min_serving.enabled = false;
    }
    if let Some(value) = args.big_m {
        config.rules.big_m = BigM::Fixed { value };
    }
    if args.timeout.is_some() {
        config.solve_timeout_secs = args.timeout;
    }
}
