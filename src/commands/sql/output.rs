//! Output formatting for the sql command.

use crate::commands::sql::execute::SqlResult;
use crate::output::Outputable;

impl Outputable for SqlResult {
    /// The script itself, ready for psql.
    fn to_table(&self) -> String {
        self.script.trim_end().to_string()
    }
}
