use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// DietOptimizer: find the cheapest food plan that meets nutrient bounds.
#[derive(Parser, Debug)]
#[command(name = "diet_optimizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve for the minimum-cost plan.
    Solve(SolveArgs),

    /// Show the foods, nutrients and bounds of a table without solving.
    Inspect {
        /// Path to the diet table CSV.
        #[arg(short, long, default_value = "diet.csv")]
        table: PathBuf,

        /// JSON configuration; only its table layout is used.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Built-in rule sets, used when no config file is given.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    /// Nutrient bounds and minimum-serving linkage only.
    Basic,
    /// Basic plus celery-xor-broccoli and three meat/fish/egg dishes.
    #[default]
    Classic,
}

#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Path to the diet table CSV.
    #[arg(short, long, default_value = "diet.csv")]
    pub table: PathBuf,

    /// JSON configuration (rules, tolerances, layout, timeout).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Rule set to use when no config file is given.
    #[arg(long, value_enum, default_value_t = Preset::Classic)]
    pub preset: Preset,

    /// Minimum servings of any selected food.
    #[arg(long)]
    pub min_serving: Option<f64>,

    /// Drop the minimum-serving rule.
    #[arg(long, conflicts_with = "min_serving")]
    pub no_min_serving: bool,

    /// Use this big-M for every food instead of deriving it from bounds.
    #[arg(long)]
    pub big_m: Option<f64>,

    /// Give up on the solve after this many seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Also write the report as JSON to this path.
    #[arg(long)]
    pub json: Option<PathBuf>,
}
