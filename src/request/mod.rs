// src/request/mod.rs
use chrono::NaiveDate;
use tracing::info;

use crate::error::ImportError;
use crate::store::ConnectOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportType {
    /// Incremental load: clear the drop's partition, then insert it.
    Daily,
    /// Bulk load: no delete, every row tagged with the supplied date.
    Full,
}

impl ImportType {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "daily" => Some(ImportType::Daily),
            "full" => Some(ImportType::Full),
            _ => None,
        }
    }
}

/// The flags exactly as the CLI handed them over, before any checking.
/// Kept separate from `clap` so validation is testable on its own.
#[derive(Debug, Default)]
pub struct RawArgs {
    pub importtype: Option<String>,
    pub destinst: Option<String>,
    pub destdb: Option<String>,
    pub trustedconnection: Option<String>,
    pub destuser: Option<String>,
    pub destpass: Option<String>,
    pub desttbl: Option<String>,
    pub sourcefilepath: Option<String>,
    pub extracoldata: Option<String>,
}

/// One fully-validated import run. Invariants held after `from_args`:
/// a Full request carries a `partition_date`; a non-trusted request carries
/// both user and password.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub import_type: ImportType,
    pub instance: String,
    pub database: String,
    pub trusted_auth: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    pub table: String,
    pub source_path: String,
    /// Supplied for Full imports; Daily derives its date from the filename.
    pub partition_date: Option<NaiveDate>,
}

fn required(value: Option<String>, message: &str) -> Result<String, ImportError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ImportError::Validation(message.to_string())),
    }
}

impl ImportRequest {
    /// Check the raw flags and assemble a request, short-circuiting on the
    /// first violation. Runs before any file or network I/O.
    pub fn from_args(args: RawArgs) -> Result<Self, ImportError> {
        info!("validating input");

        let import_type_raw = required(
            args.importtype,
            "please specify whether we are doing a full or daily import",
        )?;
        let import_type = ImportType::parse(&import_type_raw).ok_or_else(|| {
            ImportError::Validation(format!(
                "import type must be `daily` or `full`, got `{}`",
                import_type_raw
            ))
        })?;

        let instance = required(args.destinst, "database instance name must not be empty")?;
        let database = required(args.destdb, "database name must not be empty")?;
        let table = required(
            args.desttbl,
            "please provide a name for the destination table",
        )?;
        let source_path = required(
            args.sourcefilepath,
            "please provide a valid path for the source file",
        )?;

        let trusted_auth = args
            .trustedconnection
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("yes"));

        let (user, password) = if trusted_auth {
            (None, None)
        } else {
            let user = required(
                args.destuser,
                "please provide a database user or set --trustedconnection=yes",
            )?;
            let password = required(
                args.destpass,
                "please provide a database password or set --trustedconnection=yes",
            )?;
            (Some(user), Some(password))
        };

        let partition_date = match import_type {
            ImportType::Full => {
                let raw = required(
                    args.extracoldata,
                    "full refresh requires --extracoldata with the date for the partition column",
                )?;
                let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                    ImportError::Validation(format!(
                        "--extracoldata `{}` is not a valid YYYY-MM-DD date",
                        raw
                    ))
                })?;
                Some(date)
            }
            // ignored if supplied; the date comes from the filename
            ImportType::Daily => None,
        };

        Ok(ImportRequest {
            import_type,
            instance,
            database,
            trusted_auth,
            user,
            password,
            table,
            source_path,
            partition_date,
        })
    }

    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            instance: self.instance.clone(),
            database: self.database.clone(),
            trusted_auth: self.trusted_auth,
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}
