mod execute;
mod output;

use std::error::Error;

use clap::Args;

use crate::commands::CommandRunner;
use crate::db::DatabaseConfig;
use crate::output::{OutputFormat, Outputable};

/// Print the idempotent DDL script without connecting
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  strategy_schema sql > schema.sql       # Save the script
  strategy_schema sql | psql \"$DATABASE_URL\"  # Apply it with psql")]
pub struct SqlCmd {}

impl CommandRunner for SqlCmd {
    fn run(self, _config: &DatabaseConfig, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        Ok(self.render().format(format))
    }
}
