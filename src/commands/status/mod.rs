mod execute;
mod output;

use std::error::Error;

use clap::Args;

use crate::commands::{CommandRunner, Execute};
use crate::db::DatabaseConfig;
use crate::output::{OutputFormat, Outputable};

/// Show applied migrations and schema objects that are missing
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  strategy_schema status                 # Ledger rows and missing objects
  strategy_schema status -o json         # Same, as JSON")]
pub struct StatusCmd {}

impl CommandRunner for StatusCmd {
    fn run(self, config: &DatabaseConfig, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let db = config.connect()?;
        let result = self.execute(db.as_ref())?;
        Ok(result.format(format))
    }
}
