use std::time::Duration;

use thiserror::Error;

pub const AUTH_FAILURE_MESSAGE: &str = "System Error: Authentication failed.";
pub const SAFETY_FILTER_MESSAGE: &str = "System Error: Response scrubbed by safety protocols.";
pub const CONNECTIVITY_MESSAGE: &str = "Neural link unstable. Please retry.";

/// Failure talking to the completion service.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("API key missing")]
    MissingCredential,
    #[error("API key rejected by the service: {0}")]
    Unauthorized(String),
    #[error("response blocked by safety filter ({reason})")]
    ContentBlocked { reason: String },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("service returned {status}: {body}")]
    Http { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned no text")]
    EmptyResponse,
}

/// The three buckets a failure is shown to the user as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Safety,
    Connectivity,
}

impl ErrorKind {
    pub fn fallback_message(&self) -> &'static str {
        match self {
            ErrorKind::Authentication => AUTH_FAILURE_MESSAGE,
            ErrorKind::Safety => SAFETY_FILTER_MESSAGE,
            ErrorKind::Connectivity => CONNECTIVITY_MESSAGE,
        }
    }
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::MissingCredential | ChatError::Unauthorized(_) => ErrorKind::Authentication,
            ChatError::ContentBlocked { .. } => ErrorKind::Safety,
            ChatError::Timeout(_)
            | ChatError::Http { .. }
            | ChatError::Transport(_)
            | ChatError::EmptyResponse => ErrorKind::Connectivity,
        }
    }

    pub fn fallback_message(&self) -> &'static str {
        self.kind().fallback_message()
    }
}
