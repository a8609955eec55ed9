//! Transport decorator that validates required fields before delegating.

use std::sync::Arc;

use fedex_core::{SchemaObject, SchemaRegistry, SchemaValue, ValidationResult};

use super::{NamedParams, TransportError};
use crate::traits::Transport;

/// Checks every object parameter against a [`SchemaRegistry`] and raises
/// [`TransportError::Validation`] without calling the inner transport when
/// a required field is missing.
pub struct ValidatingTransport<T> {
    inner: T,
    registry: Arc<SchemaRegistry>,
}

impl<T: Transport> ValidatingTransport<T> {
    #[must_use]
    pub fn new(inner: T, registry: Arc<SchemaRegistry>) -> Self {
        Self { inner, registry }
    }

    /// The wrapped transport.
    #[must_use]
    pub fn inner(&self) -> &T {
        &self.inner
    }

    fn check(&self, params: &NamedParams) -> Result<(), TransportError> {
        let errors: Vec<String> = params
            .iter()
            .flat_map(|(_, value)| value.elements())
            .filter_map(SchemaValue::as_object)
            .filter_map(|obj| match self.registry.validate(obj) {
                ValidationResult::Valid => None,
                ValidationResult::Invalid { errors } => Some(errors),
            })
            .flatten()
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TransportError::Validation {
                detail: errors.join("; "),
            })
        }
    }
}

impl<T: Transport> Transport for ValidatingTransport<T> {
    fn invoke(&self, operation: &str, params: &NamedParams) -> Result<SchemaObject, TransportError> {
        if let Err(err) = self.check(params) {
            tracing::debug!(operation, error = %err, "request rejected before dispatch");
            return Err(err);
        }
        self.inner.invoke(operation, params)
    }
}
