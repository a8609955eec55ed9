use crate::object::SchemaObject;
use crate::schema::SchemaError;

/// Produces empty schema objects for a service's type names.
///
/// Implementations wrap whatever describes the remote interface. The request
/// engine and operation adapters only ever go through this trait, so a
/// generated schema, a JSON description, or a permissive stand-in are
/// interchangeable.
pub trait SchemaFactory: Send + Sync {
    /// Creates an empty object of the named type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownType`] if the type is not part of the
    /// schema.
    fn create(&self, type_name: &str) -> Result<SchemaObject, SchemaError>;
}
