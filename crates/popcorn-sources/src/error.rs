use thiserror::Error;

/// Failure of a single catalog request.
///
/// `Display` is the message shown to the user; the underlying cause is kept in the
/// variant for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Request could not be sent, returned a non-success status, or the body was unreadable
    #[error("Failed to fetch!")]
    Transport { reason: String },
    /// Well-formed response saying there is nothing matching
    #[error("Movie not found!")]
    NotFound { message: String },
    /// Superseded by a newer request; never shown to the user
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn transport(reason: impl Into<String>) -> Self {
        FetchError::Transport { reason: reason.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        FetchError::NotFound { message: message.into() }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    /// Underlying cause, for logs
    pub fn detail(&self) -> &str {
        match self {
            FetchError::Transport { reason } => reason,
            FetchError::NotFound { message } => message,
            FetchError::Cancelled => "cancelled",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::transport(err.to_string())
    }
}
