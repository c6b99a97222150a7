// src/import/mod.rs
use tracing::{info, warn};

use crate::error::ImportError;
use crate::extract;
use crate::query;
use crate::request::{ImportRequest, ImportType};
use crate::source;
use crate::store::{ConnectOptions, TableStore};

/// Outcome of one run. `succeeded` is a soft integrity check: the write path
/// raised no error, but the submitted row count must also match the rows read
/// from the file (header excluded).
#[derive(Debug)]
pub struct ImportResult {
    pub total_rows_read: usize,
    pub rows_written: usize,
    pub succeeded: bool,
}

/// Sequence one import: resolve the partition date, connect, probe the
/// destination table, clear the partition for daily runs, then bulk-insert
/// the file tagged with the date. The store is built through `connect` so
/// callers pick the backend.
pub fn run<S, F>(request: &ImportRequest, connect: F) -> Result<ImportResult, ImportError>
where
    S: TableStore,
    F: FnOnce(&ConnectOptions) -> Result<S, ImportError>,
{
    let partition_date = match request.import_type {
        ImportType::Daily => extract::partition_date_from_filename(&request.source_path)?,
        ImportType::Full => request.partition_date.ok_or_else(|| {
            ImportError::Validation("full import requires a partition date".to_string())
        })?,
    };
    info!(
        date = %partition_date,
        table = %request.table,
        "starting {} import",
        match request.import_type {
            ImportType::Daily => "daily",
            ImportType::Full => "full",
        }
    );

    let mut store = connect(&request.connect_options())?;
    store.ensure_table_exists(&request.database, &request.table)?;

    if request.import_type == ImportType::Daily {
        let delete = query::build_delete(&request.table, query::PARTITION_COLUMN, partition_date);
        info!(date = %partition_date, "clearing partition before re-import");
        store.execute_delete(&delete)?;
    }

    let file = source::load_delimited(&request.source_path)?;
    let total_rows_read = file.rows.len();

    let columns = query::normalize_columns(&file.header, query::PARTITION_COLUMN);
    let insert = query::build_insert(&request.table, &columns);
    let rows_written = store.write_all(&insert, &file.rows, &partition_date.to_string())?;

    let succeeded = rows_written == total_rows_read;
    if succeeded {
        info!(rows = rows_written, table = %request.table, "import complete");
    } else {
        warn!(
            read = total_rows_read,
            written = rows_written,
            "row count mismatch after import"
        );
    }

    Ok(ImportResult {
        total_rows_read,
        rows_written,
        succeeded,
    })
}
