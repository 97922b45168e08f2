//! API keys kept out of logs.
//!
//! Uses the `secrecy` crate so provider keys never show up in debug output,
//! tracing fields or error messages.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use.
    ///
    /// Only call this when building the outgoing request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }

    /// First four characters followed by asterisks, for settings displays.
    pub fn masked(&self) -> String {
        let value = self.expose();
        let total = value.chars().count();
        if total == 0 {
            return "(empty)".to_string();
        }
        let shown: String = value.chars().take(4.min(total)).collect();
        format!("{}{}", shown, "*".repeat(total.saturating_sub(4)))
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
