//! Extractor trait: one document in, one outcome out.

use async_trait::async_trait;

use crate::types::{document::DocumentPayload, field::Field, outcome::ExtractionOutcome};

/// Anything that can turn a document and a field list into an outcome.
///
/// [`crate::Orchestrator`] is the production implementation;
/// [`crate::testing::MockExtractor`] scripts outcomes for tests.
/// Implementations never return an error: failures are part of the outcome.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, document: &DocumentPayload, fields: &[Field]) -> ExtractionOutcome;
}
