//! Schema objects: the in-memory form of request payloads and response trees.
//!
//! A [`SchemaObject`] is an ordered list of named fields, each holding a
//! [`SchemaValue`]. Objects created from a declared type are *closed*: every
//! declared field is present from the start (as [`SchemaValue::Absent`]) and
//! undeclared names are rejected. Objects decoded from responses, or created
//! by a permissive factory, are *open* and accept any field.
//!
//! Field order is insertion order. The remote schemas validate element order,
//! so it is kept from construction through dispatch, and decoded JSON keeps
//! its document order.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use crate::schema::SchemaError;
use crate::types::{Scalar, Value};

/// Value held by a schema object field.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaValue {
    /// Declared but not set. Omitted from the wire.
    Absent,
    /// Leaf value.
    Scalar(Scalar),
    /// Repeated element, order preserved.
    Sequence(Vec<SchemaValue>),
    /// Nested complex type.
    Object(SchemaObject),
}

impl SchemaValue {
    /// Returns true if the field is declared but unset.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the nested object, if this value is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&SchemaObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Mutable access to the nested object, if this value is one.
    pub fn as_object_mut(&mut self) -> Option<&mut SchemaObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Returns the scalar, if this value is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the text of a text scalar.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_text)
    }

    /// Views the value as a list of elements.
    ///
    /// SOAP decoders return a single element when a repeated field occurs
    /// once, so a lone object or scalar is treated as a one-element list.
    #[must_use]
    pub fn elements(&self) -> Vec<&SchemaValue> {
        match self {
            Self::Absent | Self::Scalar(Scalar::Null) => Vec::new(),
            Self::Sequence(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    /// Builds a schema tree from decoded JSON. Objects become open objects
    /// with an empty type name, fields in document order; `null` becomes
    /// [`Scalar::Null`].
    #[must_use]
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Scalar(Scalar::Null),
            serde_json::Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Scalar(Scalar::Int(i)),
                None => Self::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            serde_json::Value::String(s) => Self::Scalar(Scalar::Text(s)),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let mut obj = SchemaObject::open("");
                for (name, value) in map {
                    obj.fields.push((name, Self::from_json(value)));
                }
                Self::Object(obj)
            }
        }
    }
}

impl From<Value> for SchemaValue {
    /// Inverse of flattening, for plain data without unset fields.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Int(i) => Self::Scalar(Scalar::Int(i)),
            Value::Float(f) => Self::Scalar(Scalar::Float(f)),
            Value::String(s) => Self::Scalar(Scalar::Text(s)),
            Value::Bytes(b) => Self::Scalar(Scalar::Bytes(b)),
            Value::Date(d) => Self::Scalar(Scalar::Date(d)),
            Value::Time(t) => Self::Scalar(Scalar::Time(t)),
            Value::DateTime(dt) => Self::Scalar(Scalar::DateTime(dt)),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Map(map) => {
                let mut obj = SchemaObject::open("");
                for (name, value) in map {
                    obj.fields.push((name, Self::from(value)));
                }
                Self::Object(obj)
            }
        }
    }
}

impl From<Scalar> for SchemaValue {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<SchemaObject> for SchemaValue {
    fn from(obj: SchemaObject) -> Self {
        Self::Object(obj)
    }
}

impl From<Vec<SchemaValue>> for SchemaValue {
    fn from(items: Vec<SchemaValue>) -> Self {
        Self::Sequence(items)
    }
}

impl From<&str> for SchemaValue {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::Text(s.to_string()))
    }
}

impl From<String> for SchemaValue {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::Text(s))
    }
}

impl From<bool> for SchemaValue {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for SchemaValue {
    fn from(i: i64) -> Self {
        Self::Scalar(Scalar::Int(i))
    }
}

impl From<u32> for SchemaValue {
    fn from(i: u32) -> Self {
        Self::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<f64> for SchemaValue {
    fn from(f: f64) -> Self {
        Self::Scalar(Scalar::Float(f))
    }
}

impl From<NaiveDate> for SchemaValue {
    fn from(d: NaiveDate) -> Self {
        Self::Scalar(Scalar::Date(d))
    }
}

impl From<NaiveTime> for SchemaValue {
    fn from(t: NaiveTime) -> Self {
        Self::Scalar(Scalar::Time(t))
    }
}

impl From<DateTime<FixedOffset>> for SchemaValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Scalar(Scalar::DateTime(dt))
    }
}

/// Ordered, named-field container for one schema complex type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaObject {
    type_name: String,
    fields: Vec<(String, SchemaValue)>,
    open: bool,
}

impl SchemaObject {
    /// Creates an open object that accepts any field name.
    #[must_use]
    pub fn open(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
            open: true,
        }
    }

    /// Creates a closed object with the given declared fields, all absent.
    #[must_use]
    pub fn declared<I, S>(type_name: impl Into<String>, field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_name: type_name.into(),
            fields: field_names
                .into_iter()
                .map(|name| (name.into(), SchemaValue::Absent))
                .collect(),
            open: false,
        }
    }

    /// Builds an open object from a JSON object. Returns `None` for other
    /// JSON kinds.
    #[must_use]
    pub fn from_json(type_name: impl Into<String>, json: serde_json::Value) -> Option<Self> {
        match SchemaValue::from_json(json) {
            SchemaValue::Object(mut obj) => {
                obj.type_name = type_name.into();
                Some(obj)
            }
            _ => None,
        }
    }

    /// Schema type name, empty for anonymous decoded objects.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether undeclared fields may be added.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Iterates fields in order, including absent ones.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &SchemaValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Number of fields, including absent ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the object has no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether the field exists on this object (declared or previously set).
    #[must_use]
    pub fn supports(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the field value. Absent fields return `Some(&Absent)`;
    /// unknown names return `None`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaValue> {
        self.position(name).map(|idx| &self.fields[idx].1)
    }

    /// Case-insensitive lookup, used for response envelope fields whose
    /// capitalization differs between service versions.
    #[must_use]
    pub fn get_ignore_case(&self, name: &str) -> Option<&SchemaValue> {
        self.fields
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Mutable access to a field value.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut SchemaValue> {
        self.position(name).map(|idx| &mut self.fields[idx].1)
    }

    /// Returns a nested object field.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&SchemaObject> {
        self.get(name).and_then(SchemaValue::as_object)
    }

    /// Mutable access to a nested object field.
    pub fn object_mut(&mut self, name: &str) -> Option<&mut SchemaObject> {
        self.get_mut(name).and_then(SchemaValue::as_object_mut)
    }

    /// Returns the text of a text field.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(SchemaValue::as_text)
    }

    /// Sets a field.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] if the object is closed and does
    /// not declare `name`.
    pub fn set(&mut self, name: &str, value: impl Into<SchemaValue>) -> Result<(), SchemaError> {
        let value = value.into();
        match self.position(name) {
            Some(idx) => {
                self.fields[idx].1 = value;
                Ok(())
            }
            None if self.open => {
                self.fields.push((name.to_string(), value));
                Ok(())
            }
            None => Err(SchemaError::UnknownField {
                type_name: self.type_name.clone(),
                field: name.to_string(),
            }),
        }
    }

    /// Sets a field only if the object supports it. Returns whether the value
    /// was stored.
    pub fn set_if_supported(&mut self, name: &str, value: impl Into<SchemaValue>) -> bool {
        self.set(name, value).is_ok()
    }

    /// Builder form of [`set`](Self::set).
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set).
    pub fn with(mut self, name: &str, value: impl Into<SchemaValue>) -> Result<Self, SchemaError> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Sets a nested field addressed by a dot-separated path, e.g.
    /// `"PackageIdentifier.Value"`. Every intermediate segment must already
    /// hold an object.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotAnObject`] when an intermediate segment is
    /// missing or not an object, or [`SchemaError::UnknownField`] from the
    /// final `set`.
    pub fn set_path(&mut self, path: &str, value: impl Into<SchemaValue>) -> Result<(), SchemaError> {
        let mut segments: Vec<&str> = path.split('.').collect();
        let last = segments.pop().unwrap_or_default();
        let mut target = self;
        for segment in segments {
            let type_name = target.type_name.clone();
            target = target
                .object_mut(segment)
                .ok_or_else(|| SchemaError::NotAnObject {
                    type_name,
                    field: segment.to_string(),
                })?;
        }
        target.set(last, value)
    }

    /// Marks a field as explicitly nil.
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set).
    pub fn set_null(&mut self, name: &str) -> Result<(), SchemaError> {
        self.set(name, Scalar::Null)
    }

    /// Clears a field back to absent, keeping its declaration.
    pub fn clear(&mut self, name: &str) {
        if let Some(value) = self.get_mut(name) {
            *value = SchemaValue::Absent;
        }
    }

    /// Removes a field entirely, including its declaration. Returns the
    /// previous value, if the field existed.
    pub fn remove(&mut self, name: &str) -> Option<SchemaValue> {
        self.position(name).map(|idx| self.fields.remove(idx).1)
    }

    /// Appends to a sequence field, converting an absent field into a
    /// sequence first.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] for undeclared fields on closed
    /// objects and [`SchemaError::NotASequence`] if the field already holds a
    /// non-sequence value.
    pub fn push(&mut self, name: &str, value: impl Into<SchemaValue>) -> Result<(), SchemaError> {
        if !self.supports(name) {
            self.set(name, SchemaValue::Sequence(Vec::new()))?;
        }
        let type_name = self.type_name.clone();
        match self.get_mut(name) {
            Some(slot @ SchemaValue::Absent) => {
                *slot = SchemaValue::Sequence(vec![value.into()]);
                Ok(())
            }
            Some(SchemaValue::Sequence(items)) => {
                items.push(value.into());
                Ok(())
            }
            _ => Err(SchemaError::NotASequence {
                type_name,
                field: name.to_string(),
            }),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(field, _)| field == name)
    }
}
