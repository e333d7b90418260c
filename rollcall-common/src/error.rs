//! Common error types for rollcall

use thiserror::Error;

/// Common result type for rollcall operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the fetch, edit and submit paths.
///
/// Fetch and submit failures are returned to the caller for display and
/// never retried here. [`Error::Stale`] marks the result of a superseded
/// fetch cycle; callers drop it without showing anything to the operator.
#[derive(Error, Debug)]
pub enum Error {
    /// Network unreachable or request timed out
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credential rejected by the backend (401/403)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Backend answered outside the 2xx class, or with a body the client
    /// could not decode
    #[error("Server error {status}: {detail}")]
    Server { status: u16, detail: String },

    /// Aggregate batch submission failure
    #[error("Failed to mark attendance: {0}")]
    Submit(String),

    /// Edit addressed a student id that is not on the reconciled sheet
    #[error("Unknown student id {0}")]
    UnknownStudent(i64),

    /// Result belongs to a superseded fetch cycle
    #[error("Stale cycle result discarded")]
    Stale,

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
