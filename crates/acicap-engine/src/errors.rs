use thiserror::Error;

/// Errors emitted while ingesting fabric datasets.
///
/// Ingestion is all-or-nothing: any of these aborts the run and leaves the
/// engine without a class index. A dataset file that is simply absent is
/// skipped, not an error.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("malformed export payload: {0}")]
    MalformedPayload(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
