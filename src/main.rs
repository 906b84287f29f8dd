mod args;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use cookie_hosts::QueryRunner;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, RunConfig};
use crate::logging::DiagnosticsSink;

fn main() -> ExitCode {
    let args = Args::parse();
    let config = RunConfig::from_args(args);
    let writer = DiagnosticsSink::open(config.log.as_deref()).unwrap_or_else(|err| {
        eprintln!("failed to open log file: {err}");
        std::process::exit(1);
    });

    let default_level = if config.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(false)
        .with_env_filter(filter)
        .init();

    let config_json = serde_json::to_string(&config).unwrap_or_else(|_| "{}".to_string());
    tracing::debug!("config: {}", config_json);

    let runner = QueryRunner::new(config.query_options());
    let mut stdout = std::io::stdout().lock();
    match runner.run_to_writer(&mut stdout, config.format) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
