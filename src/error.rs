use thiserror::Error;

use crate::session::SessionPhase;

/// Failures raised by a speech recognition capability
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("speech recognition is not supported here: {0}")]
    Unsupported(String),
    #[error("microphone permission denied")]
    PermissionDenied,
    #[error("no speech detected")]
    NoSpeech,
    #[error("recognition already active; stop it before starting again")]
    AlreadyActive,
    #[error("recognition capture failed: {0}")]
    Capture(String),
}

/// Failures talking to the scoring backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("invalid URL for {endpoint}: {reason}")]
    InvalidUrl { endpoint: String, reason: String },
    #[error("could not decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

/// Errors surfaced by the practice session and the report flows
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },
    #[error("session is complete; no further attempts can be recorded")]
    SessionComplete,
    #[error("no metrics are available for session {0}")]
    MetricsUnavailable(String),
    #[error("metric {name} is missing or not a level in 0..=3")]
    MissingMetric { name: &'static str },
    #[error("no stored session token found")]
    NoStoredSession,
    #[error("'{0}' is not a valid session token")]
    InvalidToken(String),
    #[error("session store failed: {0}")]
    Storage(String),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
