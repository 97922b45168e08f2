//! Post-parse validation of provider output against the template fields.
//!
//! Neither provider path is trusted to honour value kinds. Each declared
//! key is looked up in the response and checked against its kind; lossless
//! coercions are applied and anything else becomes `null` with a warning.

use serde_json::{Number, Value};

use crate::error::{ExtractionError, Result};
use crate::providers::RawResponse;
use crate::types::field::{Field, ValueKind};
use crate::types::outcome::{Extraction, ExtractionResult, FieldWarning};

/// Build the validated result for `fields` from a raw provider response.
///
/// The result always holds exactly the declared keys, in declaration order.
pub fn validate_response(fields: &[Field], response: RawResponse) -> Result<Extraction> {
    let mut warnings = Vec::new();

    let mut object = match response {
        RawResponse::Json(Value::Object(map)) => map,
        RawResponse::Json(other) => {
            return Err(ExtractionError::Parse(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )));
        }
        RawResponse::Empty => {
            warnings.push(FieldWarning::response(
                "provider returned no content; all fields left empty",
            ));
            serde_json::Map::new()
        }
    };

    let mut values = ExtractionResult::with_capacity(fields.len());
    for field in fields {
        let value = match object.remove(&field.key) {
            None | Some(Value::Null) => Value::Null,
            Some(raw) => match coerce(raw, field.value_kind) {
                Ok(value) => value,
                Err(found) => {
                    warnings.push(FieldWarning::field(
                        &field.key,
                        format!("expected {}, got {}; value discarded", field.value_kind, found),
                    ));
                    Value::Null
                }
            },
        };
        values.insert(field.key.clone(), value);
    }

    for key in object.keys() {
        warnings.push(FieldWarning::field(key, "not a template field; ignored"));
    }

    Ok(Extraction { values, warnings })
}

/// Coerce `value` to `kind`, or return the name of the offending type.
fn coerce(value: Value, kind: ValueKind) -> std::result::Result<Value, &'static str> {
    match kind {
        ValueKind::Text => coerce_text(value),
        ValueKind::Number => coerce_number(value),
        ValueKind::Boolean => coerce_boolean(value),
        ValueKind::TextList => coerce_list(value, coerce_text),
        ValueKind::NumberList => coerce_list(value, coerce_number),
    }
}

fn coerce_text(value: Value) -> std::result::Result<Value, &'static str> {
    match value {
        Value::String(_) => Ok(value),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Err(json_type_name(&other)),
    }
}

fn coerce_number(value: Value) -> std::result::Result<Value, &'static str> {
    match value {
        Value::Number(_) => Ok(value),
        Value::String(s) => parse_number(&s).ok_or("non-numeric string"),
        other => Err(json_type_name(&other)),
    }
}

fn coerce_boolean(value: Value) -> std::result::Result<Value, &'static str> {
    match value {
        Value::Bool(_) => Ok(value),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err("non-boolean string"),
        },
        other => Err(json_type_name(&other)),
    }
}

/// A lone scalar becomes a one-element list; `null` items are dropped.
fn coerce_list(
    value: Value,
    item: fn(Value) -> std::result::Result<Value, &'static str>,
) -> std::result::Result<Value, &'static str> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => return Err("object"),
        scalar => vec![scalar],
    };

    items
        .into_iter()
        .filter(|v| !v.is_null())
        .map(item)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(Value::Array)
        .map_err(|_| "list with mismatched items")
}

fn parse_number(s: &str) -> Option<Value> {
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
