//! Field definitions: the typed vocabulary templates are built from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// The kind of value a field is expected to hold.
///
/// Wire names are `text`, `number`, `boolean`, `textList` and `numberList`.
/// Any other name is rejected when parsed, never mapped to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueKind {
    Text,
    Number,
    Boolean,
    TextList,
    NumberList,
}

impl ValueKind {
    /// Every declared kind, in display order.
    pub const ALL: [ValueKind; 5] = [
        ValueKind::Text,
        ValueKind::Number,
        ValueKind::Boolean,
        ValueKind::TextList,
        ValueKind::NumberList,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::TextList => "textList",
            ValueKind::NumberList => "numberList",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ValueKind::TextList | ValueKind::NumberList)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownValueKind(s.to_string()))
    }
}

impl TryFrom<String> for ValueKind {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueKind> for String {
    fn from(kind: ValueKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A single named, typed extraction target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Stable identifier, used as the key in extraction results
    pub key: String,

    /// Human-readable label (CSV header, display)
    pub label: String,

    /// Expected value kind
    pub value_kind: ValueKind,

    /// Natural-language instruction to the model
    #[serde(default)]
    pub description: String,
}

impl Field {
    pub fn new(key: impl Into<String>, label: impl Into<String>, value_kind: ValueKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value_kind,
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
