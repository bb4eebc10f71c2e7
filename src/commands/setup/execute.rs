use std::error::Error;

use serde::Serialize;

use super::SetupCmd;
use crate::commands::Execute;
use crate::db::schema::{plan_migrations, run_migrations, MigrationOutcome, ObjectState};
use crate::db::DatabaseBackend;

/// Result of the setup command execution
#[derive(Debug, Serialize)]
pub struct SetupResult {
    pub database: String,
    pub migrations: Vec<MigrationOutcome>,
    pub created_new: bool,
    pub dry_run: bool,
}

impl SetupResult {
    /// Number of objects in the given state across every migration.
    pub fn count(&self, state: ObjectState) -> usize {
        self.migrations.iter().map(|m| m.count(state)).sum()
    }
}

impl Execute for SetupCmd {
    type Output = SetupResult;

    fn execute(self, db: &dyn DatabaseBackend) -> Result<Self::Output, Box<dyn Error>> {
        let migrations = if self.dry_run {
            plan_migrations(db)?
        } else {
            run_migrations(db)?
        };

        let created_new = migrations
            .iter()
            .any(|m| m.count(ObjectState::Created) > 0);

        Ok(SetupResult {
            database: db.database_name().to_string(),
            migrations,
            created_new,
            dry_run: self.dry_run,
        })
    }
}
