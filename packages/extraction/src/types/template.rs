//! Templates: named, ordered collections of fields.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::SchemaError;
use crate::types::field::{Field, ValueKind};

/// The unit of reuse across documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Template {
    /// Create an empty template with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a field.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Check that every key is non-empty and unique.
    ///
    /// Duplicate keys would silently overwrite each other in the result map.
    pub fn validate(&self) -> Result<(), SchemaError> {
        validate_fields(&self.fields)
    }

    /// Look up a field by key.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Built-in template for engineering drawings.
    pub fn technical_drawing() -> Self {
        Self {
            id: "technical-drawing".to_string(),
            name: "Technical drawing".to_string(),
            description: Some("Title block and general notes of a mechanical drawing".to_string()),
            fields: vec![
                Field::new("drawing_number", "Drawing number", ValueKind::Text)
                    .with_description("The drawing or part number printed in the title block"),
                Field::new("title", "Title", ValueKind::Text)
                    .with_description("The drawing title from the title block"),
                Field::new("revision", "Revision", ValueKind::Text)
                    .with_description("Current revision letter or number"),
                Field::new("scale", "Scale", ValueKind::Text)
                    .with_description("Drawing scale, e.g. 1:2"),
                Field::new("material", "Material", ValueKind::Text)
                    .with_description("Material specification of the part"),
                Field::new("sheet_count", "Sheets", ValueKind::Number)
                    .with_description("Total number of sheets"),
                Field::new("general_tolerance", "General tolerance", ValueKind::Text)
                    .with_description("General tolerance standard or class, e.g. ISO 2768-mK"),
                Field::new("surface_treatments", "Surface treatments", ValueKind::TextList)
                    .with_description("Every surface treatment or coating mentioned"),
                Field::new("critical_dimensions", "Critical dimensions (mm)", ValueKind::NumberList)
                    .with_description("Nominal values of dimensions marked as critical, in millimetres"),
                Field::new("approved", "Approved", ValueKind::Boolean)
                    .with_description("Whether the approval box is signed"),
            ],
        }
    }
}

/// Check that every key is non-empty and unique.
pub fn validate_fields(fields: &[Field]) -> Result<(), SchemaError> {
    let mut seen = HashSet::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        if field.key.trim().is_empty() {
            return Err(SchemaError::EmptyKey { index });
        }
        if !seen.insert(field.key.as_str()) {
            return Err(SchemaError::DuplicateKey(field.key.clone()));
        }
    }
    Ok(())
}
