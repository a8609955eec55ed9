//! Transport seam: named parameters, transport errors, and the in-memory
//! transports used by tests and local development.

pub mod scripted;
pub mod validating;

pub use scripted::{RecordedCall, ScriptedTransport};
pub use validating::ValidatingTransport;

use fedex_core::{SchemaObject, SchemaValue};

/// Errors a [`Transport`](crate::Transport) may raise.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request does not conform to the service schema. Raised before any
    /// network activity.
    #[error("request failed schema validation: {detail}")]
    Validation { detail: String },
    /// The remote end could not be reached or timed out.
    #[error("remote service unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Ordered named parameters of one operation call.
///
/// Order is significant: the shared envelope blocks come first, followed by
/// the operation payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedParams {
    entries: Vec<(String, SchemaValue)>,
}

impl NamedParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter. A repeated name replaces the earlier value in
    /// place.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<SchemaValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Appends a parameter only when a value is present.
    pub fn push_opt(&mut self, name: impl Into<String>, value: Option<impl Into<SchemaValue>>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SchemaValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Looks up an object parameter by name.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&SchemaObject> {
        self.get(name).and_then(SchemaValue::as_object)
    }

    /// Whether a parameter with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Parameter names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Parameters in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
