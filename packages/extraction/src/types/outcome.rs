//! Extraction results and outcomes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field key to extracted value, in template order. Absent values are `null`.
pub type ExtractionResult = IndexMap<String, serde_json::Value>;

/// Classification of a failed extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Required credential or endpoint missing; no request was made
    Configuration,
    /// Provider answered with a non-success status
    Http,
    /// No response reached us
    Network,
    /// Response was not valid JSON, or content was absent
    Parse,
    /// Template fields break the compiler's contract
    SchemaViolation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Http => "http",
            ErrorKind::Network => "network",
            ErrorKind::Parse => "parse",
            ErrorKind::SchemaViolation => "schema violation",
        };
        f.write_str(name)
    }
}

/// A value the validation pass had to discard or could not find.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWarning {
    /// Field key, or `None` for response-level warnings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub message: String,
}

impl FieldWarning {
    pub fn field(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            message: message.into(),
        }
    }

    pub fn response(message: impl Into<String>) -> Self {
        Self {
            key: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}: {}", key, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A successful extraction: validated values plus anything discarded on the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub values: ExtractionResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FieldWarning>,
}

/// A failed extraction, carrying the adapter's message verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub kind: ErrorKind,
    pub message: String,
}

/// Terminal result of one (document, template, configuration) invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Success(Extraction),
    Failure(ExtractionFailure),
}

impl ExtractionOutcome {
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure(ExtractionFailure {
            kind,
            message: message.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn values(&self) -> Option<&ExtractionResult> {
        match self {
            Self::Success(extraction) => Some(&extraction.values),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ExtractionFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}
