use duckdb::{Connection, ToSql};
use tracing::info;

use super::{ConnectOptions, TableStore, PROGRESS_EVERY};
use crate::error::ImportError;

/// DuckDB-backed destination store. `instance` is the path of the database
/// file; the connection lives for the run and closes when the store drops.
#[derive(Debug)]
pub struct DuckStore {
    conn: Connection,
}

impl DuckStore {
    pub fn connect(opts: &ConnectOptions) -> Result<Self, ImportError> {
        let auth = if opts.trusted_auth { "trusted" } else { "credential" };
        info!(
            instance = %opts.instance,
            database = %opts.database,
            auth,
            "connecting to destination store"
        );
        let conn =
            Connection::open(&opts.instance).map_err(|e| ImportError::Connection(e.into()))?;
        Ok(DuckStore { conn })
    }
}

impl TableStore for DuckStore {
    fn ensure_table_exists(&mut self, database: &str, table: &str) -> Result<(), ImportError> {
        info!(database, table, "checking destination table exists");
        let probe = format!("select * from {} limit 1", table);
        self.conn
            .prepare(&probe)
            .and_then(|mut stmt| {
                stmt.query([])?;
                Ok(())
            })
            .map_err(|e| ImportError::TableNotFound {
                table: table.to_string(),
                source: e.into(),
            })
    }

    fn execute_delete(&mut self, statement: &str) -> Result<(), ImportError> {
        let removed = self
            .conn
            .execute(statement, [])
            .map_err(|e| ImportError::Store(e.into()))?;
        info!(removed, "cleared existing partition rows");
        Ok(())
    }

    fn write_all(
        &mut self,
        insert: &str,
        rows: &[Vec<String>],
        partition_date: &str,
    ) -> Result<usize, ImportError> {
        let total = rows.len();
        let date_value = partition_date.to_string();

        // one transaction around the whole batch, committed at the end
        self.conn
            .execute_batch("begin transaction")
            .map_err(|e| ImportError::Store(e.into()))?;
        {
            let mut stmt = self
                .conn
                .prepare(insert)
                .map_err(|e| ImportError::Store(e.into()))?;
            for (idx, row) in rows.iter().enumerate() {
                let mut values: Vec<&dyn ToSql> = Vec::with_capacity(row.len() + 1);
                for field in row {
                    values.push(field);
                }
                values.push(&date_value);
                stmt.execute(&values[..])
                    .map_err(|e| ImportError::Store(e.into()))?;

                let done = idx + 1;
                if done % PROGRESS_EVERY == 0 {
                    info!("{} of {} rows copied", done, total);
                }
            }
        }
        self.conn
            .execute_batch("commit")
            .map_err(|e| ImportError::Store(e.into()))?;

        info!(total, "bulk insert committed");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import;
    use crate::request::{ImportRequest, ImportType};
    use std::io::Write;
    use tempfile::TempDir;

    const CREATE_PRICES: &str =
        "create table prices (Date varchar, Ticker varchar, Price varchar, DiffDateTime varchar)";

    fn mem_store() -> DuckStore {
        DuckStore {
            conn: Connection::open_in_memory().unwrap(),
        }
    }

    fn partition_count(conn: &Connection, date: &str) -> i64 {
        conn.query_row(
            "select count(*) from prices where DiffDateTime = ?",
            [date],
            |r| r.get(0),
        )
        .unwrap()
    }

    #[test]
    fn existence_probe_passes_for_present_table_only() {
        let mut store = mem_store();
        store.conn.execute_batch(CREATE_PRICES).unwrap();
        store.ensure_table_exists("ivydb", "prices").unwrap();

        let err = store.ensure_table_exists("ivydb", "no_such_table").unwrap_err();
        assert!(matches!(err, ImportError::TableNotFound { .. }));
    }

    #[test]
    fn write_all_appends_the_partition_date_to_every_row() {
        let mut store = mem_store();
        store.conn.execute_batch(CREATE_PRICES).unwrap();

        let rows = vec![
            vec!["2021-07-07".to_string(), "ABC".to_string(), "10.5".to_string()],
            vec!["2021-07-07".to_string(), "DEF".to_string(), "3.25".to_string()],
        ];
        let written = store
            .write_all(
                "insert into prices (Date,Ticker,Price,DiffDateTime) values (?,?,?,?)",
                &rows,
                "2021-07-07",
            )
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(partition_count(&store.conn, "2021-07-07"), 2);
    }

    #[test]
    fn delete_clears_only_the_target_partition() {
        let mut store = mem_store();
        store.conn.execute_batch(CREATE_PRICES).unwrap();
        store
            .conn
            .execute_batch(
                "insert into prices values
                   ('2021-07-06','ABC','9.9','2021-07-06'),
                   ('2021-07-07','ABC','10.5','2021-07-07')",
            )
            .unwrap();

        store
            .execute_delete("delete from prices where DiffDateTime = '2021-07-07'")
            .unwrap();
        assert_eq!(partition_count(&store.conn, "2021-07-07"), 0);
        assert_eq!(partition_count(&store.conn, "2021-07-06"), 1);
    }

    fn seed_database(path: &str) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(CREATE_PRICES).unwrap();
        conn.execute_batch(
            "insert into prices values ('2021-07-06','OLD','1.0','2021-07-06')",
        )
        .unwrap();
    }

    fn request(import_type: ImportType, db: &str, source: &str) -> ImportRequest {
        ImportRequest {
            import_type,
            instance: db.to_string(),
            database: "ivydb".to_string(),
            trusted_auth: true,
            user: None,
            password: None,
            table: "prices".to_string(),
            source_path: source.to_string(),
            partition_date: None,
        }
    }

    #[test]
    fn daily_reimport_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("dest.duckdb");
        let db = db.to_str().unwrap();
        seed_database(db);

        let source = dir.path().join("prices_2021070719.csv");
        let mut f = std::fs::File::create(&source).unwrap();
        writeln!(f, "Date,Ticker,Price").unwrap();
        writeln!(f, "2021-07-07,ABC,10.5").unwrap();
        writeln!(f, "2021-07-07,DEF,3.25").unwrap();
        drop(f);

        let req = request(ImportType::Daily, db, source.to_str().unwrap());
        for _ in 0..2 {
            let result = import::run(&req, DuckStore::connect).unwrap();
            assert!(result.succeeded);
            assert_eq!(result.rows_written, 2);
        }

        let conn = Connection::open(db).unwrap();
        // running twice did not duplicate the partition
        assert_eq!(partition_count(&conn, "2021-07-07"), 2);
        // the other partition was never touched
        assert_eq!(partition_count(&conn, "2021-07-06"), 1);
    }

    #[test]
    fn full_import_tags_every_row_and_deletes_nothing() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("dest.duckdb");
        let db = db.to_str().unwrap();
        seed_database(db);

        let source = dir.path().join("prices_backfill.csv");
        let mut f = std::fs::File::create(&source).unwrap();
        writeln!(f, "Date,Ticker,Price").unwrap();
        writeln!(f, "2021-03-20,ABC,10.5").unwrap();
        writeln!(f, "2021-03-21,DEF,3.25").unwrap();
        writeln!(f, "2021-03-22,GHI,7.75").unwrap();
        drop(f);

        let mut req = request(ImportType::Full, db, source.to_str().unwrap());
        req.partition_date = chrono::NaiveDate::from_ymd_opt(2021, 3, 23);

        let result = import::run(&req, DuckStore::connect).unwrap();
        assert!(result.succeeded);
        assert_eq!(result.rows_written, 3);

        let conn = Connection::open(db).unwrap();
        assert_eq!(partition_count(&conn, "2021-03-23"), 3);
        assert_eq!(partition_count(&conn, "2021-07-06"), 1);
    }

    #[test]
    fn connect_fails_for_unreachable_path() {
        let opts = ConnectOptions {
            instance: "/no/such/dir/dest.duckdb".to_string(),
            database: "ivydb".to_string(),
            trusted_auth: true,
            user: None,
            password: None,
        };
        let err = DuckStore::connect(&opts).unwrap_err();
        assert!(matches!(err, ImportError::Connection(_)));
    }
}
