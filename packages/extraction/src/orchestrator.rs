//! Extraction orchestrator: the single entry point for one document.
//!
//! Selects the adapter from the configuration's provider variant, compiles
//! the fields into that adapter's request shape, invokes it, validates the
//! response and folds every error into a [`ExtractionOutcome::Failure`].

use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::error::{ExtractionError, Result};
use crate::providers::{ChatAdapter, RawResponse, StructuredAdapter};
use crate::schema::{compile_contract, compile_structured};
use crate::traits::extractor::Extractor;
use crate::types::{
    config::{Provider, ProviderConfig, ProviderKind},
    document::DocumentPayload,
    field::Field,
    outcome::{Extraction, ExtractionOutcome},
    template::validate_fields,
};
use crate::validate::validate_response;

/// Lifecycle of one `extract` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    NotStarted,
    InFlight,
    Completed,
    Failed,
}

impl InvocationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InvocationState::Completed | InvocationState::Failed)
    }

    /// Move to `next`, panicking in debug builds on an illegal transition.
    fn advance(&mut self, next: InvocationState) {
        let legal = matches!(
            (*self, next),
            (InvocationState::NotStarted, InvocationState::InFlight)
                | (InvocationState::InFlight, InvocationState::Completed)
                | (InvocationState::InFlight, InvocationState::Failed)
        );
        debug_assert!(legal, "illegal invocation transition {:?} -> {:?}", self, next);
        *self = next;
    }
}

enum Backend {
    Structured(StructuredAdapter),
    GenericChat(ChatAdapter),
    /// Configuration that can never produce a request
    Misconfigured(String),
}

/// Runs extractions against the configured provider.
pub struct Orchestrator {
    config: ProviderConfig,
    backend: Backend,
}

impl Orchestrator {
    pub fn new(config: ProviderConfig) -> Self {
        let backend = match &config.provider {
            Provider::Structured(structured) => {
                Backend::Structured(StructuredAdapter::new(structured))
            }
            Provider::GenericChat(chat) => match ChatAdapter::new(chat) {
                Ok(adapter) => Backend::GenericChat(adapter),
                Err(e) => Backend::Misconfigured(e.user_message()),
            },
        };

        Self { config, backend }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.config.provider.kind()
    }

    /// Extract `fields` from `document`. Never fails: errors become outcomes.
    pub async fn extract(&self, document: &DocumentPayload, fields: &[Field]) -> ExtractionOutcome {
        let mut state = InvocationState::NotStarted;
        let start = Instant::now();
        let span = info_span!(
            "extract",
            provider = ?self.provider_kind(),
            mime = %document.mime_type,
            fields = fields.len(),
        );

        state.advance(InvocationState::InFlight);
        let result = self.run(document, fields).instrument(span.clone()).await;

        let _entered = span.enter();
        match result {
            Ok(extraction) => {
                state.advance(InvocationState::Completed);
                info!(
                    duration_ms = start.elapsed().as_millis(),
                    warnings = extraction.warnings.len(),
                    "Extraction completed"
                );
                ExtractionOutcome::Success(extraction)
            }
            Err(e) => {
                state.advance(InvocationState::Failed);
                warn!(
                    kind = %e.kind(),
                    error = %e,
                    duration_ms = start.elapsed().as_millis(),
                    "Extraction failed"
                );
                ExtractionOutcome::failure(e.kind(), e.user_message())
            }
        }
    }

    async fn run(&self, document: &DocumentPayload, fields: &[Field]) -> Result<Extraction> {
        validate_fields(fields)?;
        self.config.validate()?;

        let raw: RawResponse = match &self.backend {
            Backend::Structured(adapter) => {
                let schema = compile_structured(fields);
                debug!(required = schema.required.len(), "Compiled structured schema");
                adapter
                    .invoke(document, &schema, &self.config.system_prompt, self.config.temperature)
                    .await?
            }
            Backend::GenericChat(adapter) => {
                let contract = compile_contract(fields, &self.config.system_prompt);
                debug!(
                    keys = contract.keys.len(),
                    url = %adapter.url(),
                    "Compiled textual contract"
                );
                adapter.invoke(document, &contract, self.config.temperature).await?
            }
            Backend::Misconfigured(message) => {
                return Err(ExtractionError::Config(message.clone()));
            }
        };

        validate_response(fields, raw)
    }
}

#[async_trait]
impl Extractor for Orchestrator {
    async fn extract(&self, document: &DocumentPayload, fields: &[Field]) -> ExtractionOutcome {
        Orchestrator::extract(self, document, fields).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::{GenericChatConfig, StructuredConfig};
    use crate::types::field::ValueKind;
    use crate::types::outcome::ErrorKind;

    fn document() -> DocumentPayload {
        DocumentPayload::from_bytes(vec![0x89, 0x50, 0x4e, 0x47], "image/png")
    }

    fn fields() -> Vec<Field> {
        vec![Field::new("width", "Width", ValueKind::Number)]
    }

    #[test]
    fn test_state_transitions() {
        let mut state = InvocationState::NotStarted;
        assert!(!state.is_terminal());
        state.advance(InvocationState::InFlight);
        state.advance(InvocationState::Failed);
        assert!(state.is_terminal());
    }

    #[tokio::test]
    async fn test_missing_structured_key_is_configuration_failure() {
        let orchestrator = Orchestrator::new(ProviderConfig::new(Provider::Structured(
            StructuredConfig::default(),
        )));

        let outcome = orchestrator.extract(&document(), &fields()).await;
        let failure = outcome.error().expect("should fail");
        assert_eq!(failure.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_incomplete_generic_chat_does_not_fall_back() {
        // Generic chat selected without an API key.
        let orchestrator = Orchestrator::new(ProviderConfig::new(Provider::GenericChat(
            GenericChatConfig::new("https://api.example.com/v1", "", "llava"),
        )));

        assert_eq!(orchestrator.provider_kind(), ProviderKind::GenericChat);
        let outcome = orchestrator.extract(&document(), &fields()).await;
        let failure = outcome.error().expect("should fail");
        assert_eq!(failure.kind, ErrorKind::Configuration);
        assert!(failure.message.contains("API key"));
    }

    #[tokio::test]
    async fn test_duplicate_keys_are_schema_violation() {
        let orchestrator = Orchestrator::new(ProviderConfig::new(Provider::Structured(
            StructuredConfig::new("key").with_base_url("http://127.0.0.1:1"),
        )));
        let fields = vec![
            Field::new("a", "A", ValueKind::Text),
            Field::new("a", "A2", ValueKind::Text),
        ];

        let outcome = orchestrator.extract(&document(), &fields).await;
        assert_eq!(outcome.error().unwrap().kind, ErrorKind::SchemaViolation);
    }

    #[tokio::test]
    async fn test_out_of_range_temperature_rejected() {
        let orchestrator = Orchestrator::new(
            ProviderConfig::new(Provider::Structured(
                StructuredConfig::new("key").with_base_url("http://127.0.0.1:1"),
            ))
            .with_temperature(-0.5),
        );

        let outcome = orchestrator.extract(&document(), &fields()).await;
        assert_eq!(outcome.error().unwrap().kind, ErrorKind::Configuration);
    }
}
