use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};

/// Leaf value carried by a schema object field.
///
/// Mirrors the scalar types that appear in the service schemas: text,
/// numbers, booleans, base64 binary content, and the three XML temporal types.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Explicit nil (`xsi:nil="true"`).
    Null,
    /// `xs:boolean`.
    Bool(bool),
    /// Any integral schema type, widened to signed 64-bit.
    Int(i64),
    /// `xs:decimal` / `xs:double`.
    Float(f64),
    /// `xs:string` and all enumerations.
    Text(String),
    /// `xs:base64Binary`, already decoded.
    Bytes(Vec<u8>),
    /// `xs:date`.
    Date(NaiveDate),
    /// `xs:time`.
    Time(NaiveTime),
    /// `xs:dateTime` with its UTC offset.
    DateTime(DateTime<FixedOffset>),
}

impl Scalar {
    /// Returns true for the three temporal variants.
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date(_) | Self::Time(_) | Self::DateTime(_))
    }

    /// Returns the text content, if this is a text scalar.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the scalar as display text, used when a schema declares a
    /// string field but the remote side sent a number (notification codes).
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Bytes(b) => Some(BASE64.encode(b)),
            Self::Date(d) => Some(d.to_string()),
            Self::Time(t) => Some(t.to_string()),
            Self::DateTime(dt) => Some(dt.to_rfc3339()),
        }
    }

    /// ISO-8601 text for temporal scalars, `None` otherwise.
    ///
    /// Dates render as `YYYY-MM-DD`, times as `HH:MM:SS[.fff]`, and
    /// datetimes as RFC 3339 with their offset.
    #[must_use]
    pub fn iso_8601(&self) -> Option<String> {
        match self {
            Self::Date(d) => Some(d.to_string()),
            Self::Time(t) => Some(t.to_string()),
            Self::DateTime(dt) => Some(dt.to_rfc3339()),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Int(i) => Value::Int(i),
            Scalar::Float(f) => Value::Float(f),
            Scalar::Text(s) => Value::String(s),
            Scalar::Bytes(b) => Value::Bytes(b),
            Scalar::Date(d) => Value::Date(d),
            Scalar::Time(t) => Value::Time(t),
            Scalar::DateTime(dt) => Value::DateTime(dt),
        }
    }
}

/// Plain nested data produced by flattening a schema tree.
///
/// Supports all JSON-compatible types plus binary data and the temporal
/// types, which survive flattening unless temporal serialization is requested.
/// Serializes untagged, so a `Value` encodes to the JSON a caller would expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON null. Unset schema fields flatten to this.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON integer (signed 64-bit).
    Int(i64),
    /// JSON floating-point (64-bit IEEE 754).
    Float(f64),
    /// JSON string (UTF-8).
    String(String),
    /// Binary data. Encodes as base64 text.
    #[serde(serialize_with = "serialize_base64")]
    Bytes(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Wall-clock time.
    Time(NaiveTime),
    /// Timestamp with offset.
    DateTime(DateTime<FixedOffset>),
    /// JSON array (ordered sequence of values).
    Array(Vec<Value>),
    /// JSON object. Uses `BTreeMap` for deterministic serialization order.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Looks up a key when this value is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Looks up an element when this value is an array.
    #[must_use]
    pub fn index(&self, idx: usize) -> Option<&Value> {
        match self {
            Self::Array(items) => items.get(idx),
            _ => None,
        }
    }

    /// Returns the string content, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(bytes))
}
