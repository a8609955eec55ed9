use crate::transport::{NamedParams, TransportError};
use fedex_core::SchemaObject;

/// Invokes one remote operation.
///
/// Implementations own the wire encoding and the network. They receive the
/// operation name and its named parameters in wire order and return the
/// decoded reply tree. A request that fails schema validation must be
/// rejected with [`TransportError::Validation`] before anything is sent.
///
/// Used as `Arc<dyn Transport>`, shared by every request built from one
/// [`RequestFactory`](crate::RequestFactory).
pub trait Transport: Send + Sync {
    /// Sends `operation` with `params` and returns the reply tree.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Validation`] for local schema faults,
    /// [`TransportError::Unavailable`] when the remote end cannot be reached,
    /// and [`TransportError::Other`] for anything else.
    fn invoke(&self, operation: &str, params: &NamedParams) -> Result<SchemaObject, TransportError>;
}
