use thiserror::Error;

/// Failure of a call to a remote service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The remote has no record of the requested resource.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote understood the request and refused it.
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("deadline exceeded")]
    DeadlineExceeded,
}
