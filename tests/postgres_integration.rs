//! Integration tests running the bootstrap against a live PostgreSQL server.
//!
//! These tests require PostgreSQL 13 or newer.
//! Run with: cargo test --features postgres-tests
//!
//! Prerequisites:
//! 1. A reachable PostgreSQL server
//! 2. Create test database: `createdb -U postgres strategy_schema_test`
//! 3. Optionally point `STRATEGY_SCHEMA_TEST_URL` at it
//!
//! Each test bootstraps into its own schema, so tests can run in parallel.

#![cfg(feature = "postgres-tests")]

use std::error::Error;
use std::process::Command;

use postgres::error::SqlState;
use postgres::{Client, NoTls};
use strategy_schema::db::schema::tables::ALL_TABLES;
use strategy_schema::db::schema::{
    pending_objects, run_migrations, LedgerState, ObjectState, BASELINE_VERSION,
};
use strategy_schema::db::{DatabaseBackend, DatabaseConfig, PostgresConfig};
use rstest::rstest;

/// Test connection string for PostgreSQL (local instance)
const PG_CONNECTION: &str = "host=localhost user=postgres dbname=strategy_schema_test";

fn connection_string() -> String {
    std::env::var("STRATEGY_SCHEMA_TEST_URL").unwrap_or_else(|_| PG_CONNECTION.to_string())
}

/// A fresh schema plus a direct client for assertions.
struct TestDb {
    client: Client,
    config: DatabaseConfig,
    schema: String,
}

impl TestDb {
    fn new(schema: &str) -> Result<Self, Box<dyn Error>> {
        let url = connection_string();
        let mut client = Client::connect(&url, NoTls)?;
        client.batch_execute(&format!(
            "DROP SCHEMA IF EXISTS {schema} CASCADE; CREATE SCHEMA {schema}; SET search_path = {schema};"
        ))?;

        let pg_config = PostgresConfig {
            schema: Some(schema.to_string()),
            ..PostgresConfig::from_url(&url)?
        };

        Ok(Self {
            client,
            config: DatabaseConfig::Postgres(pg_config),
            schema: schema.to_string(),
        })
    }

    fn backend(&self) -> Result<Box<dyn DatabaseBackend>, Box<dyn Error>> {
        self.config.connect()
    }

    fn bootstrapped(schema: &str) -> Result<Self, Box<dyn Error>> {
        let db = Self::new(schema)?;
        run_migrations(db.backend()?.as_ref())?;
        Ok(db)
    }

    fn insert_user(&mut self, username: &str) -> Result<String, Box<dyn Error>> {
        let row = self.client.query_one(
            "INSERT INTO users (email, username, password_hash) \
             VALUES ($1 || '@example.com', $1, 'x') RETURNING id::text",
            &[&username],
        )?;
        Ok(row.get(0))
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = self
            .client
            .batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema));
    }
}

fn sql_state(err: &postgres::Error) -> Option<&SqlState> {
    err.code()
}

// ============================================================================
// Idempotence and ledger
// ============================================================================

#[test]
fn test_bootstrap_then_rerun_is_noop() -> Result<(), Box<dyn Error>> {
    let mut db = TestDb::new("it_rerun")?;
    let backend = db.backend()?;

    let first = run_migrations(backend.as_ref())?;
    assert_eq!(first[0].count(ObjectState::Created), 35);
    assert_eq!(first[0].ledger, LedgerState::Recorded);

    let second = run_migrations(backend.as_ref())?;
    assert_eq!(second[0].count(ObjectState::Created), 0);
    assert_eq!(second[0].count(ObjectState::AlreadyExists), 35);
    assert_eq!(second[0].ledger, LedgerState::AlreadyRecorded);

    let count: i64 = db
        .client
        .query_one(
            "SELECT count(*) FROM schema_migrations WHERE version = $1",
            &[&BASELINE_VERSION],
        )?
        .get(0);
    assert_eq!(count, 1);

    let applied = backend.applied_migrations()?;
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].version, BASELINE_VERSION);
    Ok(())
}

#[test]
fn test_all_tables_present() -> Result<(), Box<dyn Error>> {
    let mut db = TestDb::bootstrapped("it_tables")?;

    let rows = db.client.query(
        "SELECT table_name::text FROM information_schema.tables WHERE table_schema = $1",
        &[&db.schema],
    )?;
    let mut found: Vec<String> = rows.iter().map(|r| r.get(0)).collect();
    found.sort();

    let mut expected: Vec<String> = ALL_TABLES.iter().map(|t| t.name.to_string()).collect();
    expected.sort();

    assert_eq!(found, expected);
    assert!(pending_objects(db.backend()?.as_ref())?.is_empty());
    Ok(())
}

#[test]
fn test_dropped_index_is_recreated() -> Result<(), Box<dyn Error>> {
    let mut db = TestDb::bootstrapped("it_recreate")?;
    db.client.batch_execute("DROP INDEX uniq_units_alive_position")?;

    let backend = db.backend()?;
    let pending = pending_objects(backend.as_ref())?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].name(), "uniq_units_alive_position");

    let outcome = run_migrations(backend.as_ref())?;
    assert_eq!(outcome[0].count(ObjectState::Created), 1);
    assert!(pending_objects(backend.as_ref())?.is_empty());
    Ok(())
}

// ============================================================================
// Constraints
// ============================================================================

#[test]
fn test_foreign_key_delete_rules() -> Result<(), Box<dyn Error>> {
    let mut db = TestDb::bootstrapped("it_fk_rules")?;

    let rows = db.client.query(
        "SELECT kcu.table_name::text, kcu.column_name::text, rc.delete_rule::text
         FROM information_schema.referential_constraints rc
         JOIN information_schema.key_column_usage kcu
           ON kcu.constraint_name = rc.constraint_name
          AND kcu.constraint_schema = rc.constraint_schema
         WHERE rc.constraint_schema = $1",
        &[&db.schema],
    )?;

    let mut expected = 0;
    for table in ALL_TABLES {
        for (column, fk) in table.foreign_keys() {
            expected += 1;
            let rule = rows
                .iter()
                .find(|r| r.get::<_, String>(0) == table.name && r.get::<_, String>(1) == column.name)
                .map(|r| r.get::<_, String>(2))
                .unwrap_or_else(|| panic!("no foreign key on {}.{}", table.name, column.name));
            assert_eq!(
                rule,
                fk.on_delete.delete_rule(),
                "{}.{}",
                table.name,
                column.name
            );
        }
    }
    assert_eq!(rows.len(), expected);
    Ok(())
}

#[test]
fn test_one_alive_unit_per_tile() -> Result<(), Box<dyn Error>> {
    let mut db = TestDb::bootstrapped("it_units")?;
    let user = db.insert_user("ada")?;
    let game: String = db
        .client
        .query_one(
            "INSERT INTO games (created_by_user_id, map_width, map_height) \
             VALUES ($1::text::uuid, 10, 10) RETURNING id::text",
            &[&user],
        )?
        .get(0);

    let insert = "INSERT INTO units (game_id, owner_user_id, unit_type, x, y, hp, max_hp, is_alive) \
                  VALUES ($1::text::uuid, $2::text::uuid, 'knight', 3, 4, 10, 10, $3) RETURNING id::text";

    let first: String = db.client.query_one(insert, &[&game, &user, &true])?.get(0);

    let err = db
        .client
        .query_one(insert, &[&game, &user, &true])
        .expect_err("second living unit on the same tile must be rejected");
    assert_eq!(sql_state(&err), Some(&SqlState::UNIQUE_VIOLATION));

    // Dead units may share the tile
    db.client.query_one(insert, &[&game, &user, &false])?;
    db.client.query_one(insert, &[&game, &user, &false])?;

    db.client.execute(
        "UPDATE units SET is_alive = false, hp = 0 WHERE id = $1::text::uuid",
        &[&first],
    )?;
    db.client.query_one(insert, &[&game, &user, &true])?;
    Ok(())
}

/// Ids of one row in each table carrying an `updated_at` trigger.
struct World {
    user: String,
    lobby: String,
    game: String,
    unit: String,
}

impl World {
    fn id(&self, table: &str) -> &str {
        match table {
            "users" => &self.user,
            "lobbies" => &self.lobby,
            "games" => &self.game,
            _ => &self.unit,
        }
    }
}

/// Insert one row per triggered table, all stamped 2000-01-01.
fn seed_old_rows(db: &mut TestDb) -> Result<World, Box<dyn Error>> {
    let user: String = db
        .client
        .query_one(
            "INSERT INTO users (email, username, password_hash, created_at, updated_at) \
             VALUES ('old@example.com', 'old', 'x', '2000-01-01', '2000-01-01') RETURNING id::text",
            &[],
        )?
        .get(0);
    let lobby: String = db
        .client
        .query_one(
            "INSERT INTO lobbies (code, name, host_user_id, created_at, updated_at) \
             VALUES ('OLD1', 'Old', $1::text::uuid, '2000-01-01', '2000-01-01') RETURNING id::text",
            &[&user],
        )?
        .get(0);
    let game: String = db
        .client
        .query_one(
            "INSERT INTO games (created_by_user_id, map_width, map_height, created_at, updated_at) \
             VALUES ($1::text::uuid, 8, 8, '2000-01-01', '2000-01-01') RETURNING id::text",
            &[&user],
        )?
        .get(0);
    let unit: String = db
        .client
        .query_one(
            "INSERT INTO units (game_id, owner_user_id, unit_type, x, y, hp, max_hp, created_at, updated_at) \
             VALUES ($1::text::uuid, $2::text::uuid, 'archer', 1, 1, 5, 5, '2000-01-01', '2000-01-01') \
             RETURNING id::text",
            &[&game, &user],
        )?
        .get(0);

    Ok(World {
        user,
        lobby,
        game,
        unit,
    })
}

#[rstest]
#[case("users", "display_name = 'Renamed'")]
#[case("lobbies", "name = 'Renamed'")]
#[case("games", "current_turn = current_turn + 1")]
#[case("units", "hp = hp - 1")]
fn test_updated_at_advances_on_update(
    #[case] table: &str,
    #[case] change: &str,
    #[values(false, true)] sets_updated_at: bool,
) -> Result<(), Box<dyn Error>> {
    let schema = format!("it_touch_{}_{}", table, sets_updated_at as u8);
    let mut db = TestDb::bootstrapped(&schema)?;
    let world = seed_old_rows(&mut db)?;
    let id = world.id(table).to_string();

    let set_clause = if sets_updated_at {
        format!("{}, updated_at = '2000-01-01'", change)
    } else {
        change.to_string()
    };
    let updated = db.client.execute(
        &format!("UPDATE {} SET {} WHERE id = $1::text::uuid", table, set_clause),
        &[&id],
    )?;
    assert_eq!(updated, 1);

    let advanced: bool = db
        .client
        .query_one(
            &format!(
                "SELECT updated_at > timestamptz '2000-01-02' AND created_at < timestamptz '2000-01-02' \
                 FROM {} WHERE id = $1::text::uuid",
                table
            ),
            &[&id],
        )?
        .get(0);
    assert!(advanced, "{} updated_at did not advance", table);
    Ok(())
}

#[test]
fn test_delete_lobby_keeps_game_and_user_is_protected() -> Result<(), Box<dyn Error>> {
    let mut db = TestDb::bootstrapped("it_scenario")?;
    let host = db.insert_user("host")?;

    let lobby: String = db
        .client
        .query_one(
            "INSERT INTO lobbies (code, name, host_user_id) VALUES ('ABCD', 'Friday', $1::text::uuid) RETURNING id::text",
            &[&host],
        )?
        .get(0);
    db.client.execute(
        "INSERT INTO lobby_players (lobby_id, user_id, slot) VALUES ($1::text::uuid, $2::text::uuid, 0)",
        &[&lobby, &host],
    )?;
    let game: String = db
        .client
        .query_one(
            "INSERT INTO games (lobby_id, created_by_user_id, map_width, map_height) \
             VALUES ($1::text::uuid, $2::text::uuid, 8, 8) RETURNING id::text",
            &[&lobby, &host],
        )?
        .get(0);

    db.client
        .execute("DELETE FROM lobbies WHERE id = $1::text::uuid", &[&lobby])?;

    let lobby_id: Option<String> = db
        .client
        .query_one("SELECT lobby_id::text FROM games WHERE id = $1::text::uuid", &[&game])?
        .get(0);
    assert_eq!(lobby_id, None);

    let members: i64 = db
        .client
        .query_one("SELECT count(*) FROM lobby_players", &[])?
        .get(0);
    assert_eq!(members, 0);

    let err = db
        .client
        .execute("DELETE FROM users WHERE id = $1::text::uuid", &[&host])
        .expect_err("user who created a game must not be deletable");
    assert_eq!(sql_state(&err), Some(&SqlState::FOREIGN_KEY_VIOLATION));
    Ok(())
}

// ============================================================================
// Conflicting objects and error reporting
// ============================================================================

#[test]
fn test_view_named_like_table_fails_instead_of_reporting_created() -> Result<(), Box<dyn Error>> {
    let mut db = TestDb::new("it_view_conflict")?;
    db.client.batch_execute("CREATE VIEW users AS SELECT 1 AS id")?;

    let err = run_migrations(db.backend()?.as_ref()).expect_err("a view must not pass for the users table");
    let message = err.to_string();
    assert!(message.starts_with("Failed to create table users: still missing"), "{}", message);

    let ledger_exists: bool = db
        .client
        .query_one("SELECT to_regclass('schema_migrations') IS NOT NULL", &[])?
        .get(0);
    assert!(!ledger_exists);
    Ok(())
}

#[test]
fn test_setup_prints_server_error_and_exits_nonzero() -> Result<(), Box<dyn Error>> {
    let mut db = TestDb::new("it_cli_error")?;
    db.client.batch_execute("CREATE TABLE lobbies (id integer)")?;
    let workdir = tempfile::tempdir()?;

    let output = Command::new(env!("CARGO_BIN_EXE_strategy_schema"))
        .arg("setup")
        .current_dir(workdir.path())
        .env("DATABASE_URL", connection_string())
        .env("DB_SCHEMA", &db.schema)
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Error: Failed to create index idx_lobbies_status: ERROR: column \"status\" does not exist"),
        "{}",
        stderr
    );
    Ok(())
}
