use clap::{Args, Parser, Subcommand, ValueEnum};
use lifespan::score::VarianceModel;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lifespan",
    version,
    about = "Lifespan prediction calculator with confidence intervals"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the calculator form and JSON API
    Serve(ServeCommand),
    /// Score one answer set and print the result
    Predict(PredictCommand),
    /// Print the covariate table
    Covariates(CovariatesCommand),
}

/// Scoring overrides shared by `serve` and `predict`.
#[derive(Args, Clone)]
pub struct ScoringArgs {
    /// Critical value for the confidence interval
    #[arg(long)]
    pub z: Option<f64>,
    #[arg(long, value_enum)]
    pub variance_model: Option<VarianceModel>,
    /// Directory holding lifespan.toml
    #[arg(long, default_value = ".")]
    pub config_dir: PathBuf,
}

#[derive(Args)]
pub struct ServeCommand {
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    #[command(flatten)]
    pub scoring: ScoringArgs,
}

#[derive(Args)]
pub struct PredictCommand {
    /// Age in years
    #[arg(long, allow_hyphen_values = true)]
    pub age: String,
    /// Covariate keys answered "yes"; every other question is answered "no"
    #[arg(long = "yes", value_name = "KEY")]
    pub yes: Vec<String>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    #[command(flatten)]
    pub scoring: ScoringArgs,
}

#[derive(Args)]
pub struct CovariatesCommand {
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
