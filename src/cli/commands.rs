//! Command implementations for the pipeline CLI.

use tracing::debug;

use crate::cli::args::{Args, CheckArgs, Commands, RunArgs};
use crate::constants::SOURCE_BASE_URL;
use crate::error::Result;
use crate::models::RunStats;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Dispatch to the appropriate subcommand handler
pub fn run(args: Args) -> Result<RunStats> {
    match args.get_command() {
        Some(Commands::Run(run_args)) => run_pipeline(run_args),
        Some(Commands::Check(check_args)) => run_check(check_args),
        None => unreachable!("main shows help when no subcommand is given"),
    }
}

fn run_pipeline(args: RunArgs) -> Result<RunStats> {
    setup_logging(args.get_log_level());
    args.validate()?;

    let config = PipelineConfig {
        input_dir: args.input_path,
        data_dir: args.data_dir,
        output_dir: args.output_dir,
        base_url: args
            .base_url
            .unwrap_or_else(|| SOURCE_BASE_URL.to_string()),
        dry_run: args.dry_run,
    };

    Pipeline::new(config).run()
}

fn run_check(args: CheckArgs) -> Result<RunStats> {
    setup_logging(args.get_log_level());
    args.validate()?;

    let config = PipelineConfig {
        input_dir: Some(args.input_path),
        dry_run: true,
        ..PipelineConfig::default()
    };

    Pipeline::new(config).run()
}

/// Set up structured logging from the CLI verbosity level
fn setup_logging(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("covid_pipeline={}", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized at level: {}", log_level);
}
