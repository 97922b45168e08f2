//! Provider adapters.
//!
//! - [`StructuredAdapter`] sends the compiled schema as a strict output
//!   constraint and trusts the provider to conform.
//! - [`ChatAdapter`] embeds a textual contract in the prompt and parses
//!   whatever JSON comes back.
//!
//! Both hand back a [`RawResponse`]; checking it against the fields is the
//! job of [`crate::validate`].

pub mod chat;
pub mod structured;

pub use chat::ChatAdapter;
pub use structured::StructuredAdapter;

/// Unvalidated provider output.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// Parsed JSON as sent by the provider
    Json(serde_json::Value),

    /// The provider produced no text at all
    Empty,
}
