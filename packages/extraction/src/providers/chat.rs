//! Generic chat-completion adapter.
//!
//! The provider gets no schema, only the textual contract, so the reply is
//! parsed optimistically.

use tracing::{debug, info_span, warn, Instrument};
use vision_client::{strip_code_blocks, ChatClient, ChatMessage, ChatRequest, ContentPart};

use crate::error::{ExtractionError, Result};
use crate::providers::RawResponse;
use crate::schema::TextualContract;
use crate::types::config::GenericChatConfig;
use crate::types::document::DocumentPayload;

/// Talks to any OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct ChatAdapter {
    client: ChatClient,
    model: String,
}

impl ChatAdapter {
    /// Build the adapter; fails when any endpoint setting is empty.
    pub fn new(config: &GenericChatConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client: ChatClient::new(&config.endpoint_base, config.api_key.expose()),
            model: config.model_name.trim().to_string(),
        })
    }

    /// Normalized completions URL requests are sent to.
    pub fn url(&self) -> &str {
        self.client.url()
    }

    /// Build the request body: one user message with the contract text and the document.
    pub fn build_request(
        &self,
        document: &DocumentPayload,
        contract: &TextualContract,
        temperature: f32,
    ) -> ChatRequest {
        ChatRequest::new(&self.model)
            .message(ChatMessage::user(vec![
                ContentPart::text(&contract.instruction),
                ContentPart::image_url(document.data_url()),
            ]))
            .json_object()
            .temperature(temperature)
    }

    pub async fn invoke(
        &self,
        document: &DocumentPayload,
        contract: &TextualContract,
        temperature: f32,
    ) -> Result<RawResponse> {
        let request = self.build_request(document, contract, temperature);

        let span = info_span!("chat_invoke", model = %self.model, url = %self.client.url());
        let content = self
            .client
            .chat_completion(&request)
            .instrument(span)
            .await?
            .ok_or_else(|| {
                ExtractionError::Parse("model response contained no message content".into())
            })?;

        parse_chat_content(content).map(RawResponse::Json)
    }
}

/// Interpret message content: JSON text is parsed, structured content is used as is.
pub fn parse_chat_content(content: serde_json::Value) -> Result<serde_json::Value> {
    let text = match content {
        serde_json::Value::String(text) => text,
        structured => return Ok(structured),
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::Parse("model returned empty content".into()));
    }

    let first_error = match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    // Some models ignore the JSON response mode and fence their answer
    match serde_json::from_str::<serde_json::Value>(strip_code_blocks(&text)) {
        Ok(value) => {
            debug!("Parsed JSON after removing code fences");
            Ok(value)
        }
        Err(_) => {
            warn!(error = %first_error, content_len = text.len(), "Model content is not JSON");
            Err(ExtractionError::Parse(format!(
                "model returned invalid JSON: {}",
                first_error
            )))
        }
    }
}
