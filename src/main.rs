use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use strategy_schema::cli::Args;
use strategy_schema::commands::CommandRunner;
use strategy_schema::db::DatabaseConfig;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "schema bootstrap failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<String, Box<dyn std::error::Error>> {
    let overrides = args.overrides();
    let config = DatabaseConfig::resolve(args.config.as_deref(), Path::new("."))?
        .with_overrides(&overrides);
    debug!(database = config.database_name(), "resolved configuration");

    args.command.run(&config, args.format)
}
