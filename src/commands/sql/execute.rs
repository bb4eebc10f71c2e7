use serde::Serialize;

use super::SqlCmd;
use crate::db::schema::{PostgresCompiler, MIGRATIONS};

/// The rendered bootstrap script
#[derive(Debug, Serialize)]
pub struct SqlResult {
    pub migrations: Vec<String>,
    pub script: String,
}

impl SqlCmd {
    /// Render every migration. Needs no database.
    pub fn render(self) -> SqlResult {
        SqlResult {
            migrations: MIGRATIONS.iter().map(|m| m.version.to_string()).collect(),
            script: PostgresCompiler::compile_script(MIGRATIONS),
        }
    }
}
