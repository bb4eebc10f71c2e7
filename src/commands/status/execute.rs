use std::error::Error;

use serde::Serialize;

use super::StatusCmd;
use crate::commands::Execute;
use crate::db::schema::{pending_objects, ObjectKind, MIGRATIONS};
use crate::db::{AppliedMigration, DatabaseBackend};

/// A schema object absent from the database.
#[derive(Debug, Clone, Serialize)]
pub struct MissingObject {
    pub kind: ObjectKind,
    pub name: String,
}

/// Result of the status command execution
#[derive(Debug, Serialize)]
pub struct StatusResult {
    pub database: String,
    pub applied: Vec<AppliedMigration>,
    /// Known migrations without a ledger row.
    pub unapplied: Vec<String>,
    pub missing: Vec<MissingObject>,
    pub up_to_date: bool,
}

impl Execute for StatusCmd {
    type Output = StatusResult;

    fn execute(self, db: &dyn DatabaseBackend) -> Result<Self::Output, Box<dyn Error>> {
        let applied = db.applied_migrations()?;

        let unapplied: Vec<String> = MIGRATIONS
            .iter()
            .filter(|m| !applied.iter().any(|a| a.version == m.version))
            .map(|m| m.version.to_string())
            .collect();

        let missing: Vec<MissingObject> = pending_objects(db)?
            .iter()
            .map(|object| MissingObject {
                kind: object.kind(),
                name: object.name().to_string(),
            })
            .collect();

        let up_to_date = unapplied.is_empty() && missing.is_empty();

        Ok(StatusResult {
            database: db.database_name().to_string(),
            applied,
            unapplied,
            missing,
            up_to_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::setup::SetupCmd;
    use crate::db::schema::BASELINE_VERSION;
    use crate::db::MemoryBackend;
    use rstest::{fixture, rstest};

    #[fixture]
    fn backend() -> MemoryBackend {
        MemoryBackend::new("myapp")
    }

    #[rstest]
    fn test_status_empty_database(backend: MemoryBackend) {
        let result = StatusCmd {}.execute(&backend).unwrap();

        assert!(!result.up_to_date);
        assert!(result.applied.is_empty());
        assert_eq!(result.unapplied, vec![BASELINE_VERSION.to_string()]);
        assert_eq!(result.missing.len(), 35);
        assert_eq!(result.missing[0].kind, ObjectKind::Type);
        assert_eq!(result.missing[0].name, "lobby_status");
    }

    #[rstest]
    fn test_status_after_setup(backend: MemoryBackend) {
        SetupCmd { dry_run: false }.execute(&backend).unwrap();
        let result = StatusCmd {}.execute(&backend).unwrap();

        assert!(result.up_to_date);
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.applied[0].version, BASELINE_VERSION);
        assert!(result.unapplied.is_empty());
        assert!(result.missing.is_empty());
    }

    #[rstest]
    fn test_status_reports_dropped_trigger(backend: MemoryBackend) {
        SetupCmd { dry_run: false }.execute(&backend).unwrap();
        backend.drop_object(ObjectKind::Trigger, "units_set_updated_at");

        let result = StatusCmd {}.execute(&backend).unwrap();

        assert!(!result.up_to_date);
        assert!(result.unapplied.is_empty());
        assert_eq!(result.missing.len(), 1);
        assert_eq!(result.missing[0].kind, ObjectKind::Trigger);
        assert_eq!(result.missing[0].name, "units_set_updated_at");
    }

    #[rstest]
    fn test_status_does_not_write(backend: MemoryBackend) {
        StatusCmd {}.execute(&backend).unwrap();
        assert!(backend.statements().is_empty());
    }
}
