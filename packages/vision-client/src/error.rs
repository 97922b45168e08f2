//! Error types for the vision clients.

use thiserror::Error;

/// Result type for vision client operations.
pub type Result<T> = std::result::Result<T, VisionClientError>;

/// Vision client errors.
#[derive(Debug, Error)]
pub enum VisionClientError {
    /// Configuration error (missing API key, empty endpoint)
    #[error("Configuration error: {0}")]
    Config(String),

    /// No response was received (DNS failure, connection refused, TLS)
    #[error("Network error reaching {url}: {message}")]
    Network { url: String, message: String },

    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl VisionClientError {
    /// Build an HTTP error from a status code and the raw response body.
    ///
    /// Providers report errors in a handful of shapes; the first readable
    /// message wins, otherwise a generic status message is used.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message =
            error_message_from_body(body).unwrap_or_else(|| format!("HTTP error {}", status));
        Self::Http { status, message }
    }
}

/// Pull a human-readable message out of a provider error body.
///
/// Accepts `{"error":{"message":..}}`, `{"error":".."}` and `{"message":".."}`.
pub fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let candidate = match value.get("error") {
        Some(serde_json::Value::Object(error)) => error.get("message").and_then(|m| m.as_str()),
        Some(serde_json::Value::String(message)) => Some(message.as_str()),
        _ => value.get("message").and_then(|m| m.as_str()),
    };

    candidate
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
