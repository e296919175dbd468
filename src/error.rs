use std::fmt;
use std::io;
use std::sync::Arc;

/// A download failure.
#[derive(Debug, Clone)]
pub enum Error {
    /// The request could not be sent or the server answered with a
    /// non-success status.
    RequestFailed(Arc<reqwest::Error>),
    /// The response body stopped before it was fully received.
    TransferInterrupted(Arc<reqwest::Error>),
    /// Writing the artifact to disk failed.
    IOFailed(Arc<io::Error>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RequestFailed(error) => write!(f, "request failed: {error}"),
            Error::TransferInterrupted(error) => write!(f, "transfer interrupted: {error}"),
            Error::IOFailed(error) => write!(f, "i/o failed: {error}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::RequestFailed(error) | Error::TransferInterrupted(error) => Some(error.as_ref()),
            Error::IOFailed(error) => Some(error.as_ref()),
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::IOFailed(Arc::new(error))
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::RequestFailed(Arc::new(error))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(error: tokio::task::JoinError) -> Self {
        Error::IOFailed(Arc::new(io::Error::other(error)))
    }
}
