use thiserror::Error;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised while notifying the monitoring service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid or missing configuration, raised before any network attempt
    #[error("configuration error: {0}")]
    Config(String),

    /// The build log sink could not be opened or written
    #[error("failed to write log sink: {0}")]
    LogSink(#[source] std::io::Error),

    /// Transport failure that is not normalized into a synthetic response
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Execution failure outside the normalized transport cases
    #[error("execution failed: {0}")]
    Execution(String),

    /// The monitoring service answered with a status other than 200
    #[error("Fail: the returned code {status} is not: 200")]
    Rejected { status: u16 },
}
