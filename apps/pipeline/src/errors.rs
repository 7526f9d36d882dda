use thiserror::Error;

/// Top-level abort errors.
///
/// Per-item extraction failures never surface here — they are downgraded to
/// typed outcomes inside the pipeline. Only total setup failures (unreadable
/// dataset, unreachable endpoint, bad configuration) abort a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("inference endpoint unavailable: {0}")]
    Endpoint(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
