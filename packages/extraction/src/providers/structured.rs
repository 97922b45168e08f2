//! Structured-output adapter.

use tracing::{debug, info_span, Instrument};
use vision_client::{GeminiClient, GenerateContentRequest, Part};

use crate::error::{ExtractionError, Result};
use crate::providers::RawResponse;
use crate::schema::StructuredSchema;
use crate::types::config::StructuredConfig;
use crate::types::document::DocumentPayload;

/// Talks to a provider that accepts an explicit output schema.
#[derive(Clone)]
pub struct StructuredAdapter {
    client: Option<GeminiClient>,
}

impl StructuredAdapter {
    /// Build the adapter. A missing key is not an error until `invoke`.
    pub fn new(config: &StructuredConfig) -> Self {
        let client = config
            .api_key
            .as_ref()
            .filter(|key| !key.is_blank())
            .map(|key| {
                let mut client = GeminiClient::new(key.expose());
                if let Some(model) = &config.model {
                    client = client.with_model(model);
                }
                if let Some(url) = &config.base_url {
                    client = client.with_base_url(url);
                }
                client
            });

        Self { client }
    }

    /// Send the document and schema; return the provider's JSON unmodified.
    pub async fn invoke(
        &self,
        document: &DocumentPayload,
        schema: &StructuredSchema,
        system_prompt: &str,
        temperature: f32,
    ) -> Result<RawResponse> {
        let client = self.client.as_ref().ok_or_else(|| {
            ExtractionError::Config(
                "API key for the structured provider is not set (GEMINI_API_KEY)".to_string(),
            )
        })?;

        let request = GenerateContentRequest::new(
            vec![
                Part::inline_data(&document.mime_type, document.inline_base64()),
                Part::text(system_prompt),
            ],
            schema.to_value(),
            temperature,
        );

        let span = info_span!(
            "structured_invoke",
            model = %client.model(),
            fields = schema.required.len()
        );
        let text = client.generate_content(&request).instrument(span).await?;

        parse_structured_text(&text)
    }
}

/// Parse the provider's text. Blank text becomes [`RawResponse::Empty`].
pub fn parse_structured_text(text: &str) -> Result<RawResponse> {
    if text.trim().is_empty() {
        debug!("Structured provider returned no text");
        return Ok(RawResponse::Empty);
    }

    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| ExtractionError::Parse(format!("provider returned invalid JSON: {}", e)))?;
    Ok(RawResponse::Json(value))
}
