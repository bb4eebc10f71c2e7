mod execute;
mod output;

use std::error::Error;

use clap::Args;
use tracing::info;

use crate::commands::{CommandRunner, Execute};
use crate::db::DatabaseConfig;
use crate::output::{OutputFormat, Outputable};

/// Create the game schema in the target database
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  strategy_schema setup                       # Create missing objects, record the baseline
  strategy_schema setup --dry-run             # Show what would be created
  strategy_schema setup --db-name arena       # Target another database
  DB_PORT=5432 strategy_schema setup -o json  # Machine-readable report")]
pub struct SetupCmd {
    /// Show what would be created without doing it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl CommandRunner for SetupCmd {
    fn run(self, config: &DatabaseConfig, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let db = config.connect()?;
        info!(
            backend = db.backend_name(),
            database = db.database_name(),
            dry_run = self.dry_run,
            "running setup"
        );
        let result = self.execute(db.as_ref())?;
        Ok(result.format(format))
    }
}
