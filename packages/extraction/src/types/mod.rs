//! Data types for fields, templates, documents, configuration and outcomes.

pub mod config;
pub mod document;
pub mod field;
pub mod outcome;
pub mod template;
