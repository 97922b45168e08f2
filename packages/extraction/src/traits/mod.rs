//! Core trait abstractions.

pub mod extractor;
