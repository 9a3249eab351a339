//! Error types surfaced by the resolution, fetching and pagination kernel.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by [`crate::YouTubeClient`] and the kernel operations beneath it.
///
/// Callers branch on [`Error::kind`] rather than on the message.
#[derive(Debug, Error)]
pub enum Error {
    /// The request was rejected before any network call was made.
    #[error("{0}")]
    Validation(String),

    /// The API answered, but with no items where at least one was required.
    #[error("{0}")]
    NotFound(String),

    /// The transport failed, or returned a body that could not be interpreted.
    ///
    /// The report is carried unchanged from the transport.
    #[error("{0:#}")]
    Transport(eyre::Report),
}

/// Discriminant of [`Error`], for matching without borrowing the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Transport,
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }
}

impl From<eyre::Report> for Error {
    fn from(report: eyre::Report) -> Self {
        Self::Transport(report)
    }
}
