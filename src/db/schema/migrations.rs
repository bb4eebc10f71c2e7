//! Migration runner for the game schema.
//!
//! - Every migration is an ordered list of create-if-absent schema objects
//! - Each object is checked against the live catalog before it is created
//! - Each successful migration is recorded in `schema_migrations`
//! - A created object must show up in the catalog afterwards
//! - The first failure aborts the run; objects created before it stay in place
//! - Running twice is a no-op the second time

use std::error::Error;

use serde::Serialize;
use tracing::{debug, info};

use crate::db::backend::DatabaseBackend;
use crate::db::DbError;
use crate::db::schema::definition::{ObjectKind, SchemaObject};
use crate::db::schema::tables::ALL_TABLES;
use crate::db::schema::types::{ALL_ENUMS, SET_UPDATED_AT};

/// Ledger version of the baseline schema.
pub const BASELINE_VERSION: &str = "0001_baseline_strategy_game";

/// A single migration: a named, ordered set of schema objects.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Ledger key, sortable (`NNNN_description`)
    pub version: &'static str,
    /// Human-readable description
    pub description: &'static str,
    objects: fn() -> Vec<SchemaObject>,
}

impl Migration {
    /// Objects this migration creates, in creation order.
    pub fn objects(&self) -> Vec<SchemaObject> {
        (self.objects)()
    }
}

/// All migrations, in application order. Append-only.
pub static MIGRATIONS: &[Migration] = &[Migration {
    version: BASELINE_VERSION,
    description: "Baseline strategy game schema",
    objects: baseline_objects,
}];

/// The baseline plan: enum types, the trigger function, then each table
/// followed by its indexes and its `updated_at` trigger.
pub fn baseline_objects() -> Vec<SchemaObject> {
    let mut objects: Vec<SchemaObject> = ALL_ENUMS.iter().copied().map(SchemaObject::Enum).collect();
    objects.push(SchemaObject::Function(&SET_UPDATED_AT));

    for table in ALL_TABLES.iter().copied() {
        objects.push(SchemaObject::Table(table));
        objects.extend(table.indexes.iter().map(SchemaObject::Index));
        if let Some(trigger) = &table.update_trigger {
            objects.push(SchemaObject::Trigger { table, trigger });
        }
    }

    objects
}

/// State of a schema object after a run or plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectState {
    #[serde(rename = "created")]
    Created,
    #[serde(rename = "exists")]
    AlreadyExists,
    #[serde(rename = "would_create")]
    WouldCreate,
}

/// State of a migration's ledger row after a run or plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LedgerState {
    #[serde(rename = "recorded")]
    Recorded,
    #[serde(rename = "already_recorded")]
    AlreadyRecorded,
    #[serde(rename = "would_record")]
    WouldRecord,
}

/// Status information for a single schema object.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectStatus {
    pub kind: ObjectKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub state: ObjectState,
}

impl ObjectStatus {
    fn new(object: &SchemaObject, state: ObjectState) -> Self {
        let table = match object {
            SchemaObject::Table(_) => None,
            _ => object.table().map(str::to_string),
        };
        Self {
            kind: object.kind(),
            name: object.name().to_string(),
            table,
            state,
        }
    }
}

/// Outcome of one migration.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationOutcome {
    pub version: String,
    pub description: String,
    pub objects: Vec<ObjectStatus>,
    pub ledger: LedgerState,
}

impl MigrationOutcome {
    /// Number of objects in the given state.
    pub fn count(&self, state: ObjectState) -> usize {
        self.objects.iter().filter(|o| o.state == state).count()
    }
}

/// Apply every migration in order.
///
/// Objects already present are left untouched. Returns on the first error,
/// leaving everything created before it in place.
pub fn run_migrations(backend: &dyn DatabaseBackend) -> Result<Vec<MigrationOutcome>, Box<dyn Error>> {
    let mut outcomes = Vec::with_capacity(MIGRATIONS.len());

    for migration in MIGRATIONS {
        info!(version = migration.version, "applying migration");
        let mut objects = Vec::new();

        for object in migration.objects() {
            let state = if backend.object_exists(&object)? {
                debug!(object = %object.describe(), "already exists");
                ObjectState::AlreadyExists
            } else {
                backend.create_object(&object)?;
                if !backend.object_exists(&object)? {
                    return Err(Box::new(DbError::StillMissing {
                        object: object.describe(),
                    }));
                }
                info!(object = %object.describe(), "created");
                ObjectState::Created
            };
            objects.push(ObjectStatus::new(&object, state));
        }

        let ledger = if backend.record_migration(migration.version)? {
            info!(version = migration.version, "recorded in schema_migrations");
            LedgerState::Recorded
        } else {
            debug!(version = migration.version, "already recorded");
            LedgerState::AlreadyRecorded
        };

        outcomes.push(MigrationOutcome {
            version: migration.version.to_string(),
            description: migration.description.to_string(),
            objects,
            ledger,
        });
    }

    Ok(outcomes)
}

/// Walk every migration without writing anything.
pub fn plan_migrations(backend: &dyn DatabaseBackend) -> Result<Vec<MigrationOutcome>, Box<dyn Error>> {
    let applied = backend.applied_migrations()?;
    let mut outcomes = Vec::with_capacity(MIGRATIONS.len());

    for migration in MIGRATIONS {
        let mut objects = Vec::new();
        for object in migration.objects() {
            let state = if backend.object_exists(&object)? {
                ObjectState::AlreadyExists
            } else {
                ObjectState::WouldCreate
            };
            objects.push(ObjectStatus::new(&object, state));
        }

        let ledger = if applied.iter().any(|a| a.version == migration.version) {
            LedgerState::AlreadyRecorded
        } else {
            LedgerState::WouldRecord
        };

        outcomes.push(MigrationOutcome {
            version: migration.version.to_string(),
            description: migration.description.to_string(),
            objects,
            ledger,
        });
    }

    Ok(outcomes)
}

/// Objects from every migration that are currently absent.
pub fn pending_objects(backend: &dyn DatabaseBackend) -> Result<Vec<SchemaObject>, Box<dyn Error>> {
    let mut pending = Vec::new();
    for migration in MIGRATIONS {
        for object in migration.objects() {
            if !backend.object_exists(&object)? {
                pending.push(object);
            }
        }
    }
    Ok(pending)
}
