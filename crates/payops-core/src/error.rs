//! Error Types

use thiserror::Error;

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// A single field-level validation message extracted from the backend.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field (e.g. "amount")
    pub field: String,

    /// Human-readable message for that field
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Console error types
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Local configuration problem, caught before any network call
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend rejected the request with field-level validation messages
    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// Non-2xx backend response with an extracted message
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The embedded checkout script could not be loaded
    #[error("Checkout script failed to load: {0}")]
    ScriptLoad(String),

    /// The shopper closed the provider modal without paying
    #[error("Payment cancelled")]
    Dismissed,

    /// The provider reported the payment as failed
    #[error("Payment failed: {0}")]
    Declined(String),

    /// The backend could not verify the provider's signature
    #[error("Signature verification failed: {0}")]
    VerificationFailed(String),

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConsoleError {
    /// Check if the failed operation is worth retrying as-is
    pub fn is_retryable(&self) -> bool {
        match self {
            ConsoleError::Network(_) => true,
            ConsoleError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Convert to a message suitable for direct display
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Config(msg) => msg.clone(),
            ConsoleError::Validation(errors) => join_fields(errors),
            ConsoleError::Api { message, .. } => message.clone(),
            ConsoleError::ScriptLoad(_) => {
                "Failed to load the checkout. Please check your internet connection.".into()
            }
            ConsoleError::Dismissed => "Payment cancelled.".into(),
            ConsoleError::Declined(reason) => reason.clone(),
            ConsoleError::VerificationFailed(msg) => {
                format!("Payment signature verification failed: {}", msg)
            }
            ConsoleError::Network(_) => "Could not reach the payments service. Please try again.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for ConsoleError {
    fn from(err: anyhow::Error) -> Self {
        ConsoleError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_fields() {
        let err = ConsoleError::Validation(vec![
            FieldError::new("amount", "must be positive"),
            FieldError::new("currency", "unknown code"),
        ]);
        assert_eq!(
            err.user_message(),
            "amount: must be positive; currency: unknown code"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ConsoleError::Api { status: 503, message: "down".into() }.is_retryable());
        assert!(!ConsoleError::Api { status: 422, message: "bad".into() }.is_retryable());
        assert!(!ConsoleError::Dismissed.is_retryable());
        assert!(!ConsoleError::VerificationFailed("mismatch".into()).is_retryable());
    }

    #[test]
    fn test_verification_failure_is_distinct_from_decline() {
        let verification = ConsoleError::VerificationFailed("hash mismatch".into());
        let decline = ConsoleError::Declined("card declined".into());
        assert_ne!(verification.user_message(), decline.user_message());
    }
}
