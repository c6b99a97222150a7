use thiserror::Error;

/// Everything that can sink an import run. All variants are fatal: the
/// orchestrator propagates them up and `main` maps any of them to exit
/// status 1. A row-count mismatch is deliberately not here — it is a soft
/// failure surfaced through `ImportResult::succeeded`.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{0}")]
    Validation(String),

    #[error("could not derive a partition date from `{path}`: {reason}")]
    DateExtraction { path: String, reason: String },

    #[error("database connection failed: {0}")]
    Connection(anyhow::Error),

    #[error("destination table `{table}` is missing or unreadable: {source}")]
    TableNotFound { table: String, source: anyhow::Error },

    #[error("could not read source file `{path}`: {source}")]
    SourceFile { path: String, source: anyhow::Error },

    #[error("destination store rejected the import: {0}")]
    Store(anyhow::Error),
}
