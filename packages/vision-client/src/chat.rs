//! OpenAI-compatible chat completion client with image input.

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{Result, VisionClientError};
use crate::types::{ChatRequest, ChatResponseRaw};

/// Path every OpenAI-compatible server exposes for chat completions.
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Normalize a user-supplied endpoint into the full completions URL.
///
/// Trailing slashes are trimmed and the completions path is appended only
/// when missing, so a bare base URL and a fully-qualified URL both work.
pub fn normalize_endpoint(base: &str) -> String {
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.ends_with(CHAT_COMPLETIONS_PATH) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, CHAT_COMPLETIONS_PATH)
    }
}

/// Chat completion client for any OpenAI-compatible server.
#[derive(Clone)]
pub struct ChatClient {
    http_client: Client,
    api_key: String,
    url: String,
}

impl ChatClient {
    /// Create a client. `endpoint` may be a base URL or the full completions URL.
    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            url: normalize_endpoint(endpoint),
        }
    }

    /// Get the normalized request URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Chat completion.
    ///
    /// Returns the first choice's message content, which may be a JSON
    /// string or an already-structured value. `None` when the server sent
    /// no content at all.
    pub async fn chat_completion(
        &self,
        request: &ChatRequest,
    ) -> Result<Option<serde_json::Value>> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "Chat completion request failed");
                VisionClientError::Network {
                    url: self.url.clone(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Chat completion API error");
            return Err(VisionClientError::from_response(status.as_u16(), &error_text));
        }

        let chat_response: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| VisionClientError::Parse(e.to_string()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Chat completion"
        );

        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.is_null()))
    }
}
