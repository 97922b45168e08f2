//! Document payloads handed to the providers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Document body: raw bytes, or an already-encoded form.
#[derive(Clone)]
pub enum DocumentBody {
    /// Raw file bytes
    Bytes(Vec<u8>),

    /// Plain base64 or a `data:<mime>;base64,<payload>` URL
    Encoded(String),
}

/// A document reference: content plus MIME type. Never mutated by the core.
#[derive(Clone)]
pub struct DocumentPayload {
    pub body: DocumentBody,
    pub mime_type: String,
}

impl DocumentPayload {
    pub fn from_bytes(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            body: DocumentBody::Bytes(bytes),
            mime_type: mime_type.into(),
        }
    }

    pub fn from_encoded(encoded: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            body: DocumentBody::Encoded(encoded.into()),
            mime_type: mime_type.into(),
        }
    }

    /// Plain base64 payload with any `data:` prefix removed.
    pub fn inline_base64(&self) -> String {
        match &self.body {
            DocumentBody::Bytes(bytes) => STANDARD.encode(bytes),
            DocumentBody::Encoded(encoded) => strip_data_url_prefix(encoded).to_string(),
        }
    }

    /// `data:<mime>;base64,<payload>`, reusing the encoded form when it already is one.
    pub fn data_url(&self) -> String {
        match &self.body {
            DocumentBody::Encoded(encoded) if encoded.starts_with("data:") => encoded.clone(),
            _ => format!("data:{};base64,{}", self.mime_type, self.inline_base64()),
        }
    }

    /// Approximate size of the content in bytes.
    pub fn len(&self) -> usize {
        match &self.body {
            DocumentBody::Bytes(bytes) => bytes.len(),
            DocumentBody::Encoded(encoded) => strip_data_url_prefix(encoded).len() / 4 * 3,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for DocumentPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPayload")
            .field("mime_type", &self.mime_type)
            .field("len", &self.len())
            .finish()
    }
}

/// Remove a `data:...;base64,` header if present.
pub fn strip_data_url_prefix(encoded: &str) -> &str {
    if encoded.starts_with("data:") {
        match encoded.split_once(',') {
            Some((_, payload)) => payload,
            None => encoded,
        }
    } else {
        encoded
    }
}

/// Hex-encoded SHA-256 of file content, used to identify documents in exports.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
