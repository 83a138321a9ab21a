use thiserror::Error;

/// Everything that can go wrong between pressing Save and getting an answer
#[derive(Debug, Error)]
pub enum JournalError {
    /// The request never completed (connection refused, DNS, reset...)
    #[error("request to journal service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered, but not with a 2xx
    #[error("journal service returned HTTP {0}")]
    Status(u16),

    /// The body was not JSON we could read
    #[error("could not decode journal service response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Valid JSON that matches neither the success nor the partial envelope
    #[error("unexpected response shape: {0}")]
    Shape(String),

    /// An envelope carrying a status value we do not know
    #[error("unrecognized response status '{0}'")]
    Unrecognized(String),

    /// The request task went away without reporting back
    #[error("request task ended without a result")]
    TaskLost,
}

impl JournalError {
    /// True for failures where the request itself did not go through.
    /// Everything else means the service answered with something we can't use.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            JournalError::Transport(_) | JournalError::Status(_) | JournalError::TaskLost
        )
    }
}
