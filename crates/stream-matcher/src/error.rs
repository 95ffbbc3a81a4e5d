use thiserror::Error;

/// Stream resolution failed for one identifier. Always recovered by falling
/// back to the next ranked candidate.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("stream unavailable for {identifier}: {reason}")]
    Unavailable { identifier: String, reason: String },
    #[error("stream resolution timed out for {identifier}")]
    Timeout { identifier: String },
    #[error("stream resolver transport error: {0}")]
    Transport(String),
    #[error("stream resolver returned malformed data: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("candidate search timed out")]
    Timeout,
    #[error("candidate search transport error: {0}")]
    Transport(String),
    #[error("candidate search returned malformed data: {0}")]
    Malformed(String),
}
