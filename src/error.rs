//! Error taxonomy for the booking core.
//!
//! ERROR HANDLING
//! ==============
//! Validation failures are raised before any request leaves the process.
//! Network, conflict, auth and API failures come back from the backend and
//! are surfaced to the user as dismissible notices. `StaleResponse` is
//! internal: superseded availability results are dropped, never shown.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use crate::state::query::QueryTicket;

/// Errors produced by booking operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    /// Local input is missing or malformed. Nothing was sent.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Transport failure, timeout, or a response body that is not JSON.
    #[error("network error: {0}")]
    Network(String),

    /// The backend reports the table or slot is no longer available.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The bearer token is missing, invalid, or expired.
    #[error("not authorized: {0}")]
    Auth(String),

    /// Any other non-2xx response from the backend.
    #[error("request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// A response for a query that has since been superseded.
    #[error("stale response for query {ticket} (current is {current})")]
    StaleResponse { ticket: QueryTicket, current: QueryTicket },

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),
}

impl BookingError {
    /// Stable machine-readable code for logs and the CLI.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Network(_) => "E_NETWORK",
            Self::Conflict(_) => "E_CONFLICT",
            Self::Auth(_) => "E_AUTH",
            Self::Api { .. } => "E_API",
            Self::StaleResponse { .. } => "E_STALE_RESPONSE",
            Self::Config(_) => "E_CONFIG",
        }
    }

    /// Whether repeating the same request unchanged could succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api { status: 429 | 500..=599, .. })
    }

    /// Whether the error should be shown to the user as a notice.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::StaleResponse { .. })
    }
}

impl From<reqwest::Error> for BookingError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Result alias for booking operations.
pub type BookingResult<T> = Result<T, BookingError>;
