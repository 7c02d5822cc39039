//! Crate-level error types.
//!
//! [`CartError`] unifies every error source (configuration, HTTP, JSON,
//! remote API rejections) behind a single enum so callers can match on the
//! variant they care about while still using the `?` operator for easy
//! propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CartError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// Configuration is missing or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote API answered with a non-success status.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The CA bundle could not be loaded.
    #[error("tls error: {0}")]
    Tls(String),

    /// A scope identifier cannot be embedded in a filter expression.
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    /// Listing saved carts failed. Carries no partial results.
    #[error("retrieval failed: {0}")]
    Retrieval(String),
}

impl CartError {
    /// Returns the text shown to the user through the notification channel.
    ///
    /// Remote rejections surface the server's own message verbatim; every
    /// other variant uses its display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_user_message_is_remote_message() {
        let err = CartError::Api {
            status: 400,
            message: "Item 12 is unavailable".to_string(),
        };
        assert_eq!(err.user_message(), "Item 12 is unavailable");
        assert_eq!(err.to_string(), "api error (400): Item 12 is unavailable");
    }

    #[test]
    fn other_errors_use_display_form() {
        let err = CartError::Retrieval("timeout".to_string());
        assert_eq!(err.user_message(), "retrieval failed: timeout");
    }
}
