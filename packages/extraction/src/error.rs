//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;
use vision_client::VisionClientError;

use crate::types::outcome::ErrorKind;

/// Errors raised while preparing or running one extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Required credential or endpoint missing
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider rejected the request
    #[error("provider error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// Provider could not be reached
    #[error("network error: {0}")]
    Network(String),

    /// Response could not be interpreted
    #[error("parse error: {0}")]
    Parse(String),

    /// Field definitions break the compiler's contract
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaError),
}

impl ExtractionError {
    /// Outcome classification for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::Config(_) => ErrorKind::Configuration,
            ExtractionError::Http { .. } => ErrorKind::Http,
            ExtractionError::Network(_) => ErrorKind::Network,
            ExtractionError::Parse(_) => ErrorKind::Parse,
            ExtractionError::Schema(_) => ErrorKind::SchemaViolation,
        }
    }

    /// The message shown to the user, without the classification prefix.
    pub fn user_message(&self) -> String {
        match self {
            ExtractionError::Config(message)
            | ExtractionError::Network(message)
            | ExtractionError::Parse(message) => message.clone(),
            ExtractionError::Http { message, .. } => message.clone(),
            ExtractionError::Schema(err) => err.to_string(),
        }
    }
}

impl From<VisionClientError> for ExtractionError {
    fn from(err: VisionClientError) -> Self {
        match err {
            VisionClientError::Config(message) => ExtractionError::Config(message),
            VisionClientError::Network { url, message } => ExtractionError::Network(format!(
                "could not reach {} ({}); check the endpoint URL and that the server is running",
                url, message
            )),
            VisionClientError::Http { status, message } => {
                ExtractionError::Http { status, message }
            }
            VisionClientError::Parse(message) => ExtractionError::Parse(message),
        }
    }
}

impl From<serde_json::Error> for ExtractionError {
    fn from(err: serde_json::Error) -> Self {
        ExtractionError::Parse(err.to_string())
    }
}

/// Contract errors in field definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A value kind name outside the declared enumeration
    #[error("unknown value kind: {0}")]
    UnknownValueKind(String),

    /// Field key is blank
    #[error("field #{index} has an empty key")]
    EmptyKey { index: usize },

    /// Two fields share a key
    #[error("duplicate field key: {0}")]
    DuplicateKey(String),
}

/// Errors from the persisted store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid template: {0}")]
    InvalidTemplate(#[from] SchemaError),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("template not found: {id}")]
    TemplateNotFound { id: String },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_carries_guidance() {
        let err: ExtractionError = VisionClientError::Network {
            url: "http://localhost:1/chat/completions".into(),
            message: "connection refused".into(),
        }
        .into();

        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(err.user_message().contains("check the endpoint URL"));
        assert!(err.user_message().contains("http://localhost:1/chat/completions"));
    }

    #[test]
    fn test_http_message_is_verbatim() {
        let err: ExtractionError = VisionClientError::Http {
            status: 401,
            message: "invalid key".into(),
        }
        .into();

        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.user_message(), "invalid key");
    }

    #[test]
    fn test_schema_error_kind() {
        let err: ExtractionError = SchemaError::DuplicateKey("width".into()).into();
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert_eq!(err.user_message(), "duplicate field key: width");
    }
}
