//! Gemini `generateContent` client with schema-constrained JSON output.

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{Result, VisionClientError};
use crate::types::{GenerateContentRequest, GenerateContentResponseRaw};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Structured-output client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a custom base URL (for proxies, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model (default: gemini-2.5-flash).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Generate content and return the response text.
    ///
    /// The text is returned as sent; an empty string means the model
    /// produced no candidate text.
    pub async fn generate_content(&self, request: &GenerateContentRequest) -> Result<String> {
        if self.api_key.trim().is_empty() {
            return Err(VisionClientError::Config("API key is not set".into()));
        }

        let start = std::time::Instant::now();
        let url = self.url();

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "generateContent request failed");
                VisionClientError::Network {
                    url: url.clone(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "generateContent API error");
            return Err(VisionClientError::from_response(status.as_u16(), &error_text));
        }

        let raw: GenerateContentResponseRaw = response
            .json()
            .await
            .map_err(|e| VisionClientError::Parse(e.to_string()))?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            "generateContent"
        );

        Ok(raw.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("key")
            .with_base_url("http://127.0.0.1:9999/")
            .with_model("gemini-test");

        assert_eq!(client.model(), "gemini-test");
        assert_eq!(
            client.url(),
            "http://127.0.0.1:9999/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_missing_key_fails_without_request() {
        let client = GeminiClient::new("  ").with_base_url("http://127.0.0.1:1");
        let request = GenerateContentRequest::new(vec![], serde_json::json!({}), 0.0);

        let result = tokio_test::block_on(client.generate_content(&request));
        assert!(matches!(result, Err(VisionClientError::Config(_))));
    }
}
