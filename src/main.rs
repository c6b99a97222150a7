use clap::Parser;
use partload::error::ImportError;
use partload::import::{self, ImportResult};
use partload::request::{ImportRequest, RawArgs};
use partload::store::duck::DuckStore;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Imports one delimited vendor drop into a partitioned destination table.
///
/// Daily runs derive the partition date from the filename and replace that
/// day's rows; Full runs tag every row with --extracoldata and delete nothing.
#[derive(Parser, Debug)]
#[command(name = "partload", version)]
struct Cli {
    /// "Daily" or "Full"
    #[arg(long)]
    importtype: Option<String>,
    /// Destination store instance (path of the database file)
    #[arg(long)]
    destinst: Option<String>,
    /// Destination database name
    #[arg(long)]
    destdb: Option<String>,
    /// "yes" to use the caller's ambient identity instead of user/password
    #[arg(long)]
    trustedconnection: Option<String>,
    /// Database user, required unless --trustedconnection=yes
    #[arg(long)]
    destuser: Option<String>,
    /// Database password, required unless --trustedconnection=yes
    #[arg(long)]
    destpass: Option<String>,
    /// Destination table
    #[arg(long)]
    desttbl: Option<String>,
    /// Path of the source file
    #[arg(long)]
    sourcefilepath: Option<String>,
    /// Partition date (YYYY-MM-DD) for Full imports
    #[arg(long)]
    extracoldata: Option<String>,
}

fn run(cli: Cli) -> Result<ImportResult, ImportError> {
    let request = ImportRequest::from_args(RawArgs {
        importtype: cli.importtype,
        destinst: cli.destinst,
        destdb: cli.destdb,
        trustedconnection: cli.trustedconnection,
        destuser: cli.destuser,
        destpass: cli.destpass,
        desttbl: cli.desttbl,
        sourcefilepath: cli.sourcefilepath,
        extracoldata: cli.extracoldata,
    })?;
    import::run(&request, DuckStore::connect)
}

fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(result) if result.succeeded => {
            info!(rows = result.rows_written, "import succeeded");
            ExitCode::SUCCESS
        }
        Ok(result) => {
            error!(
                read = result.total_rows_read,
                written = result.rows_written,
                "import finished with a row count mismatch"
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
