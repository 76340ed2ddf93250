use roster_database::{Player, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// A field value was absent, out of range or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The identifier is not a positive integer.
    #[error("player id should be a positive integer, got {0}")]
    InvalidId(i64),

    #[error("player with id {0} not found")]
    NotFound(i64),

    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl PlayerError {
    /// True for errors caused by the caller's input rather than the server.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, PlayerError::Validation(_) | PlayerError::InvalidId(_))
    }
}

/// A failed creation, carrying the input so the caller can see what was rejected.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Rejected {
    #[source]
    pub error: PlayerError,
    pub input: Player,
}
