//! Strict output schema for providers that enforce one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::field::{Field, ValueKind};

/// Primitive types understood by the structured provider's schema dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    Object,
    String,
    Number,
    Boolean,
    Array,
}

/// Schema for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertySchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Lets the model answer `null` for values absent from the document
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
}

impl PropertySchema {
    fn primitive(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            items: None,
            description: None,
            nullable: false,
        }
    }

    fn array_of(item_type: SchemaType) -> Self {
        Self {
            items: Some(Box::new(Self::primitive(item_type))),
            ..Self::primitive(SchemaType::Array)
        }
    }

    /// Schema for a field's kind. Exhaustive over [`ValueKind`].
    pub fn for_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Text => Self::primitive(SchemaType::String),
            ValueKind::Number => Self::primitive(SchemaType::Number),
            ValueKind::Boolean => Self::primitive(SchemaType::Boolean),
            ValueKind::TextList => Self::array_of(SchemaType::String),
            ValueKind::NumberList => Self::array_of(SchemaType::Number),
        }
    }
}

/// Root object schema: `{type: OBJECT, properties, required}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    pub properties: IndexMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl StructuredSchema {
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Compile fields into the structured-output schema.
///
/// Properties and `required` follow declaration order. Every field is
/// required; absence is expressed as `null`.
pub fn compile_structured(fields: &[Field]) -> StructuredSchema {
    let mut properties = IndexMap::with_capacity(fields.len());
    let mut required = Vec::with_capacity(fields.len());

    for field in fields {
        let mut property = PropertySchema::for_kind(field.value_kind);
        property.nullable = true;
        if !field.description.trim().is_empty() {
            property.description = Some(field.description.clone());
        }
        properties.insert(field.key.clone(), property);
        required.push(field.key.clone());
    }

    StructuredSchema {
        schema_type: SchemaType::Object,
        properties,
        required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_kind_mapping_is_defined_for_every_kind() {
        let expected = [
            (ValueKind::Text, json!({"type": "STRING"})),
            (ValueKind::Number, json!({"type": "NUMBER"})),
            (ValueKind::Boolean, json!({"type": "BOOLEAN"})),
            (ValueKind::TextList, json!({"type": "ARRAY", "items": {"type": "STRING"}})),
            (ValueKind::NumberList, json!({"type": "ARRAY", "items": {"type": "NUMBER"}})),
        ];

        for (kind, schema) in expected {
            assert_eq!(
                serde_json::to_value(PropertySchema::for_kind(kind)).unwrap(),
                schema,
                "mapping for {kind}"
            );
        }
    }

    #[test]
    fn test_compiled_wire_shape() {
        let fields = vec![
            Field::new("width", "Width", ValueKind::Number).with_description("Overall width in mm"),
            Field::new("notes", "Notes", ValueKind::TextList),
        ];

        let schema = compile_structured(&fields).to_value();
        assert_eq!(
            schema,
            json!({
                "type": "OBJECT",
                "properties": {
                    "width": {"type": "NUMBER", "description": "Overall width in mm", "nullable": true},
                    "notes": {"type": "ARRAY", "items": {"type": "STRING"}, "nullable": true}
                },
                "required": ["width", "notes"]
            })
        );
    }

    #[test]
    fn test_empty_fields_compile_to_empty_schema() {
        let schema = compile_structured(&[]);
        assert!(schema.is_empty());
        assert!(schema.required.is_empty());
        assert_eq!(schema.schema_type, SchemaType::Object);
    }

    #[test]
    fn test_property_order_follows_declaration() {
        let fields = vec![
            Field::new("z", "Z", ValueKind::Text),
            Field::new("a", "A", ValueKind::Text),
            Field::new("m", "M", ValueKind::Text),
        ];
        let schema = compile_structured(&fields);
        let keys: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    fn kind_strategy() -> impl Strategy<Value = ValueKind> {
        prop::sample::select(ValueKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_required_equals_field_keys(
            keys in prop::collection::hash_set("[a-z_]{1,12}", 0..16),
            kind in kind_strategy(),
        ) {
            let fields: Vec<Field> = keys
                .iter()
                .map(|k| Field::new(k.clone(), k.to_uppercase(), kind))
                .collect();

            let schema = compile_structured(&fields);
            let declared: Vec<String> = fields.iter().map(|f| f.key.clone()).collect();

            prop_assert_eq!(&schema.required, &declared);
            let unique: std::collections::HashSet<&String> = schema.required.iter().collect();
            prop_assert_eq!(unique.len(), schema.required.len());
            prop_assert_eq!(schema.properties.len(), fields.len());
        }
    }
}
