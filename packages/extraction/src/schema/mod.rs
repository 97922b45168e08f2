//! Field-to-schema compilation.
//!
//! Pure and deterministic: an ordered field list becomes either a strict
//! output schema ([`compile_structured`]) or a prompt-embedded JSON
//! contract ([`compile_contract`]).

pub mod contract;
pub mod structured;

pub use contract::{compile_contract, TextualContract};
pub use structured::{compile_structured, PropertySchema, SchemaType, StructuredSchema};
