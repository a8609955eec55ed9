//! Structural conversion of schema trees into plain data.
//!
//! The converter only looks at shape: objects become maps, sequences become
//! arrays, leaves pass through. It knows nothing about any particular service.

use std::collections::BTreeMap;

use crate::object::{SchemaObject, SchemaValue};
use crate::types::Value;

/// Nesting limit. Replies from the services are far shallower; anything
/// deeper is treated as malformed input.
pub const MAX_DEPTH: usize = 128;

/// Options for [`to_plain_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Lower-case map keys. This applies at every depth, not only to the
    /// top-level keys, so nested field names are rewritten too.
    pub lowercase_keys: bool,
    /// Render date, time and datetime leaves as ISO-8601 text.
    pub serialize_temporal: bool,
}

/// Errors from the converter.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("tree nesting exceeds {max} levels")]
    DepthExceeded { max: usize },
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Converts a schema value into a plain [`Value`].
///
/// Absent fields become [`Value::Null`]. Sequence order is preserved; object
/// fields land in a key-sorted [`Value::Map`].
///
/// # Errors
///
/// Returns [`ConvertError::DepthExceeded`] if the tree nests deeper than
/// [`MAX_DEPTH`].
pub fn to_plain_tree(node: &SchemaValue, opts: ConvertOptions) -> Result<Value, ConvertError> {
    convert_value(node, opts, 0)
}

/// [`to_plain_tree`] for a whole object.
///
/// # Errors
///
/// Same as [`to_plain_tree`].
pub fn object_to_plain_tree(obj: &SchemaObject, opts: ConvertOptions) -> Result<Value, ConvertError> {
    convert_object(obj, opts, 0)
}

/// Converts an object to a JSON string, with temporal leaves rendered as
/// ISO-8601 text and binary leaves as base64.
///
/// # Errors
///
/// Returns [`ConvertError`] if the tree is too deep or encoding fails.
pub fn to_json(obj: &SchemaObject, lowercase_keys: bool) -> Result<String, ConvertError> {
    let plain = object_to_plain_tree(
        obj,
        ConvertOptions {
            lowercase_keys,
            serialize_temporal: true,
        },
    )?;
    Ok(serde_json::to_string(&plain)?)
}

fn convert_value(node: &SchemaValue, opts: ConvertOptions, depth: usize) -> Result<Value, ConvertError> {
    if depth > MAX_DEPTH {
        return Err(ConvertError::DepthExceeded { max: MAX_DEPTH });
    }
    match node {
        SchemaValue::Absent => Ok(Value::Null),
        SchemaValue::Scalar(scalar) => Ok(match scalar.iso_8601() {
            Some(text) if opts.serialize_temporal => Value::String(text),
            _ => Value::from(scalar.clone()),
        }),
        SchemaValue::Sequence(items) => items
            .iter()
            .map(|item| convert_value(item, opts, depth + 1))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        SchemaValue::Object(obj) => convert_object(obj, opts, depth),
    }
}

fn convert_object(obj: &SchemaObject, opts: ConvertOptions, depth: usize) -> Result<Value, ConvertError> {
    if depth > MAX_DEPTH {
        return Err(ConvertError::DepthExceeded { max: MAX_DEPTH });
    }
    let mut map = BTreeMap::new();
    for (name, value) in obj.fields() {
        let key = if opts.lowercase_keys {
            name.to_lowercase()
        } else {
            name.to_string()
        };
        map.insert(key, convert_value(value, opts, depth + 1)?);
    }
    Ok(Value::Map(map))
}
