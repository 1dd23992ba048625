mod cli;

use clap::Parser;
use lifespan::config;
use lifespan::encode::encode_with;
use lifespan::error::LifespanError;
use lifespan::model::{Model, AGE_KEY};
use lifespan::report::{self, OutputFormat, PredictionReport};
use lifespan::score::Scorer;
use lifespan::server;
use lifespan::types::config::{validate_z, Settings};
use lifespan::types::covariate::AnswerSet;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const INVALID_INPUT: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(cli: &cli::Cli) {
    let default_level = if cli.quiet {
        "error"
    } else {
        match (cli.verbose, &cli.command) {
            (0, cli::Commands::Serve(_)) => "info",
            (0, _) => "warn",
            (1, _) => "info",
            _ => "debug",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve(scoring: &cli::ScoringArgs) -> Result<Settings, LifespanError> {
    let mut settings = config::resolve_settings(&scoring.config_dir)?;
    if let Some(z) = scoring.z {
        settings.z = z;
    }
    if let Some(variance_model) = scoring.variance_model {
        settings.variance_model = variance_model;
    }
    validate_z(settings.z)?;
    Ok(settings)
}

fn output_format(format: &cli::ReportFormat) -> OutputFormat {
    match format {
        cli::ReportFormat::Json => OutputFormat::Json,
        cli::ReportFormat::Md => OutputFormat::Md,
    }
}

fn predict_answers(model: &Model, cmd: &cli::PredictCommand) -> Result<AnswerSet, LifespanError> {
    let mut answers = AnswerSet::new();
    answers.insert(AGE_KEY.to_string(), cmd.age.clone());
    for covariate in model.binary_covariates() {
        answers.insert(covariate.key.to_string(), "0".to_string());
    }
    for key in &cmd.yes {
        match model.covariate(key) {
            Some(covariate) if covariate.is_binary() => {
                answers.insert(covariate.key.to_string(), "1".to_string());
            }
            _ => {
                return Err(LifespanError::InvalidInput(format!(
                    "unknown yes/no covariate: {key}"
                )));
            }
        }
    }
    Ok(answers)
}

fn run(cli: cli::Cli) -> Result<i32, LifespanError> {
    match cli.command {
        cli::Commands::Serve(cmd) => {
            let mut settings = resolve(&cmd.scoring)?;
            if let Some(host) = cmd.host {
                settings.host = host;
            }
            if let Some(port) = cmd.port {
                settings.port = port;
            }
            settings.validate()?;
            println!("Lifespan calculator v{}", env!("CARGO_PKG_VERSION"));
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(server::serve(&settings))?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Predict(cmd) => {
            let settings = resolve(&cmd.scoring)?;
            let scorer = Scorer::default()
                .with_z(settings.z)
                .with_variance_model(settings.variance_model);
            let answers = predict_answers(scorer.model(), &cmd)?;
            let features = encode_with(scorer.model(), &answers)?;
            let result = scorer.score(&features);
            let rendered = report::render(
                &PredictionReport::new(&scorer, result),
                output_format(&cmd.format),
            )?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Covariates(cmd) => {
            let model = Model::standard();
            let rendered = match cmd.format {
                cli::ReportFormat::Json => serde_json::to_string_pretty(model.covariates)?,
                cli::ReportFormat::Md => report::md::covariates_to_markdown(model),
            };
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(&cli);
    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = match e {
                LifespanError::InvalidInput(_) => exit_code::INVALID_INPUT,
                _ => exit_code::RUNTIME_FAILURE,
            };
            std::process::exit(code);
        }
    }
}
