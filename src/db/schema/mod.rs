//! Declarative schema for the strategy game database.
//!
//! The schema is declared once as static data and compiled to PostgreSQL DDL.
//!
//! # Overview
//!
//! The schema system consists of four main components:
//!
//! 1. **Core Types** (`definition.rs`):
//!    - `ColumnType` - Column data types, including named enum types
//!    - `Column` - A single column with constraints, built with const builders
//!    - `Table`, `Index`, `UpdateTrigger` - Tables and their dependents
//!    - `SchemaObject` - Any creatable object, in a form the runner can walk
//!
//! 2. **Declarations** (`types.rs`, `tables.rs`):
//!    - The five enum types and the `set_updated_at` trigger function
//!    - `ALL_TABLES` - The eleven tables, each after every table it references
//!
//! 3. **Compiler** (`compilers/postgres.rs`):
//!    - `PostgresCompiler` - Self-guarding DDL for each object
//!
//! 4. **Runner** (`migrations.rs`):
//!    - `run_migrations`, `plan_migrations`, `pending_objects`
//!
//! # Type Mapping
//!
//! | Rust Variant | PostgreSQL Type |
//! |--------------|-----------------|
//! | Uuid | UUID |
//! | Text | TEXT |
//! | Integer | INTEGER |
//! | Boolean | BOOLEAN |
//! | Timestamptz | TIMESTAMPTZ |
//! | Jsonb | JSONB |
//! | Enum(name) | name |

pub mod compilers;
pub mod definition;
pub mod migrations;
pub mod tables;
pub mod types;

pub use compilers::PostgresCompiler;
pub use definition::{
    Column, ColumnType, EnumType, ForeignKey, Index, ObjectKind, OnDelete, SchemaObject, Table,
    TriggerFunction, UpdateTrigger,
};
pub use migrations::{
    pending_objects, plan_migrations, run_migrations, LedgerState, Migration, MigrationOutcome,
    ObjectState, ObjectStatus, BASELINE_VERSION, MIGRATIONS,
};
