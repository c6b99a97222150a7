// src/store/mod.rs
pub mod duck;

use crate::error::ImportError;

/// How often `write_all` reports progress, in rows.
pub const PROGRESS_EVERY: usize = 100;

/// Everything a backend needs to open its one connection for the run.
/// Credentials are part of the contract even though not every backend uses
/// them; a file-backed store has no logins and runs as a trusted connection.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub instance: String,
    pub database: String,
    pub trusted_auth: bool,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// The destination store as the orchestrator sees it: an existence probe,
/// a partition delete, and one bulk write. Each method commits on its own;
/// the delete and the inserts are two independent committed operations, so a
/// crash between them leaves the partition cleared but not yet refilled.
pub trait TableStore {
    /// Select-top-1 probe against the destination table.
    fn ensure_table_exists(&mut self, database: &str, table: &str) -> Result<(), ImportError>;

    /// Run the delete built by the query module and commit it.
    fn execute_delete(&mut self, statement: &str) -> Result<(), ImportError>;

    /// Append `partition_date` to every row, run the parameterized insert per
    /// row, commit once at the end. Returns the number of rows submitted.
    fn write_all(
        &mut self,
        insert: &str,
        rows: &[Vec<String>],
        partition_date: &str,
    ) -> Result<usize, ImportError>;
}
