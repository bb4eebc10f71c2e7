//! CLI argument definitions.
//!
//! This module contains the top-level CLI structure and shared types.
//! Individual command definitions are in the `commands` module.

use clap::Parser;
use std::path::PathBuf;

use crate::commands::Command;
use crate::db::ConnectionOverrides;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a JSON config file
    ///
    /// If not specified, uses .strategy_schema.json in the current directory
    /// when present, otherwise DB_NAME, DB_USER, DB_PORT, DB_HOST, DB_PASSWORD
    /// and DATABASE_URL from the environment.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database name (overrides config and DB_NAME)
    #[arg(long, global = true)]
    pub db_name: Option<String>,

    /// Database user (overrides config and DB_USER)
    #[arg(long, global = true)]
    pub db_user: Option<String>,

    /// Database port (overrides config and DB_PORT)
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    pub db_port: Option<u16>,

    /// Database host (overrides config and DB_HOST)
    #[arg(long, global = true)]
    pub db_host: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Connection overrides given on the command line.
    pub fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            host: self.db_host.clone(),
            port: self.db_port,
            database: self.db_name.clone(),
            user: self.db_user.clone(),
        }
    }
}
