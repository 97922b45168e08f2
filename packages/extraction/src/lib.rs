//! Template-driven field extraction from technical drawings
//!
//! A template is an ordered list of typed fields with natural-language
//! descriptions. For each document, the fields are compiled into whatever
//! shape the configured provider understands, the provider is called, and
//! the reply is validated back into a result keyed by field.
//!
//! # Usage
//!
//! ```rust,ignore
//! use drawing_extraction::{
//!     BatchItem, BatchRunner, Orchestrator, Provider, ProviderConfig, StructuredConfig, Template,
//! };
//!
//! let template = Template::technical_drawing();
//! let orchestrator = Orchestrator::new(ProviderConfig::new(Provider::Structured(
//!     StructuredConfig::new(std::env::var("GEMINI_API_KEY")?),
//! )));
//!
//! let mut batch = BatchRunner::new();
//! batch.add(BatchItem::from_bytes("bracket.pdf", bytes, "application/pdf"));
//! batch.run(&orchestrator, &template.fields).await;
//! ```
//!
//! # Modules
//!
//! - [`types`] - Fields, templates, documents, configuration, outcomes
//! - [`schema`] - Field-to-schema compilation for both provider shapes
//! - [`providers`] - Structured and generic chat adapters
//! - [`validate`] - Post-parse kind checking of provider output
//! - [`orchestrator`] - Single-document entry point
//! - [`batch`] - Sequential batch runner
//! - [`export`] - JSON and CSV export
//! - [`store`] - Persisted settings and templates
//! - [`testing`] - Mock implementations for testing

pub mod batch;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod providers;
pub mod schema;
pub mod security;
pub mod store;
pub mod testing;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export core types at crate root
pub use batch::{BatchItem, BatchRunner, BatchSummary, DocumentStatus};
pub use error::{ExtractionError, SchemaError, StoreError};
pub use export::{export_csv, export_json};
pub use orchestrator::{InvocationState, Orchestrator};
pub use providers::{ChatAdapter, RawResponse, StructuredAdapter};
pub use schema::{compile_contract, compile_structured, StructuredSchema, TextualContract};
pub use security::SecretString;
pub use store::Store;
pub use traits::extractor::Extractor;
pub use types::{
    config::{
        GenericChatConfig, GenericChatSettings, Provider, ProviderConfig, ProviderKind, Settings,
        StructuredConfig, DEFAULT_SYSTEM_PROMPT,
    },
    document::{sha256_hex, DocumentBody, DocumentPayload},
    field::{Field, ValueKind},
    outcome::{
        ErrorKind, Extraction, ExtractionFailure, ExtractionOutcome, ExtractionResult, FieldWarning,
    },
    template::Template,
};
pub use validate::validate_response;

// Re-export testing utilities
pub use testing::MockExtractor;
