//! Testing utilities including mock implementations.
//!
//! These are useful for testing callers of the extraction library without
//! making real provider calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::extractor::Extractor;
use crate::types::{
    document::DocumentPayload,
    field::Field,
    outcome::{ErrorKind, Extraction, ExtractionOutcome, ExtractionResult},
};

/// A mock extractor for testing.
///
/// Outcomes are scripted per document content; unscripted documents get a
/// success with every field set to `null`.
#[derive(Default, Clone)]
pub struct MockExtractor {
    /// Scripted outcomes keyed by the document's base64 content
    outcomes: Arc<RwLock<HashMap<String, ExtractionOutcome>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockExtractCall>>>,
}

/// Record of a call made to the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct MockExtractCall {
    /// Base64 content of the document
    pub document: String,
    pub mime_type: String,
    pub field_keys: Vec<String>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome for documents with this content.
    pub fn with_outcome(self, content: &[u8], outcome: ExtractionOutcome) -> Self {
        let key = DocumentPayload::from_bytes(content.to_vec(), "").inline_base64();
        self.outcomes.write().unwrap().insert(key, outcome);
        self
    }

    /// Script a success with the given values.
    pub fn with_values(self, content: &[u8], values: serde_json::Value) -> Self {
        let values: ExtractionResult = serde_json::from_value(values).unwrap_or_default();
        self.with_outcome(
            content,
            ExtractionOutcome::Success(Extraction {
                values,
                warnings: vec![],
            }),
        )
    }

    /// Script a failure.
    pub fn with_failure(self, content: &[u8], kind: ErrorKind, message: &str) -> Self {
        self.with_outcome(content, ExtractionOutcome::failure(kind, message))
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<MockExtractCall> {
        self.calls.read().unwrap().clone()
    }

    /// Contents of the documents processed, in call order.
    pub fn processed_contents(&self) -> Vec<Vec<u8>> {
        use base64::Engine as _;
        self.calls()
            .into_iter()
            .map(|call| {
                base64::engine::general_purpose::STANDARD
                    .decode(call.document)
                    .unwrap_or_default()
            })
            .collect()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, document: &DocumentPayload, fields: &[Field]) -> ExtractionOutcome {
        let content = document.inline_base64();
        self.calls.write().unwrap().push(MockExtractCall {
            document: content.clone(),
            mime_type: document.mime_type.clone(),
            field_keys: fields.iter().map(|f| f.key.clone()).collect(),
        });

        let scripted = self.outcomes.read().unwrap().get(&content).cloned();

        scripted.unwrap_or_else(|| {
            ExtractionOutcome::Success(Extraction {
                values: fields
                    .iter()
                    .map(|f| (f.key.clone(), serde_json::Value::Null))
                    .collect(),
                warnings: vec![],
            })
        })
    }
}
