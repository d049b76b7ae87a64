// src/error.rs
use thiserror::Error;

/// Failure taxonomy for outbound source calls (news feeds, Bluesky,
/// fixture-data vendors). None of these may abort a polling tick; they
/// are logged at the tick boundary and the next tick always runs.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network/HTTP failure fetching a source. Log, skip, continue.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// 401/expired token after the one allowed refresh-and-retry.
    #[error("auth token expired")]
    AuthExpired,

    /// Response arrived but did not match the expected schema.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::Unavailable(e.to_string())
    }
}

pub type SourceResult<T> = Result<T, SourceError>;
