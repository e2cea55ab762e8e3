//! Error types for the dashboard
//!
//! Uses thiserror for ergonomic error definitions.
//! Only configuration errors stop a request; everything else ends up as an
//! inline notice on the rendered page.

use thiserror::Error;

/// Custom Result type using our Error
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Dashboard errors
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration errors (missing credentials, malformed values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cosmos DB key or signing errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Document does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Cosmos DB returned a non-success status
    #[error("Cosmos DB error: HTTP {status}: {message}")]
    Store { status: u16, message: String },

    /// Request rate too large (HTTP 429)
    #[error("Request throttled: retry after {0} ms")]
    Throttled(u64),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid operator input
    #[error("{0}")]
    Validation(String),

    /// The trading engine could not be reached
    #[error("Failed to call ForceBuy API: {0}\nEnsure Function App is running locally.")]
    ForceBuyUnreachable(String),

    /// The trading engine answered with a non-200 status
    #[error("Error: {body}")]
    ForceBuyRejected { status: u16, body: String },
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Http(err.to_string())
    }
}

impl From<DashboardError> for worker::Error {
    fn from(err: DashboardError) -> Self {
        worker::Error::RustError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashboardError::Store {
            status: 503,
            message: "service unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cosmos DB error: HTTP 503: service unavailable"
        );
    }

    #[test]
    fn test_force_buy_rejection_shows_body() {
        let err = DashboardError::ForceBuyRejected {
            status: 500,
            body: "engine offline".to_string(),
        };
        assert_eq!(err.to_string(), "Error: engine offline");
    }

    #[test]
    fn test_unreachable_engine_hint() {
        let err = DashboardError::ForceBuyUnreachable("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to call ForceBuy API: connection refused\nEnsure Function App is running locally."
        );
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(matches!(err, DashboardError::Json(_)));
    }
}
