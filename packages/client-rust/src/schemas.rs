//! Schema catalog: which [`SchemaFactory`] serves which service.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use fedex_core::{SchemaFactory, SchemaRegistry, TypeSchema};
use serde::Deserialize;

/// Bundled type descriptions for every supported service.
const STANDARD_SCHEMAS: &str = include_str!("../schemas/standard.json");

/// Layout of `schemas/standard.json`: types shared by every service, then
/// per-service types that add to or replace the shared ones.
#[derive(Debug, Deserialize)]
struct StandardDocument {
    common: Vec<TypeSchema>,
    services: BTreeMap<String, Vec<TypeSchema>>,
}

/// Maps service ids (`"trck"`, `"crs"`, ...) to schema factories.
#[derive(Default, Clone)]
pub struct SchemaCatalog {
    factories: HashMap<String, Arc<dyn SchemaFactory>>,
    registries: HashMap<String, Arc<SchemaRegistry>>,
    fallback: Option<Arc<dyn SchemaFactory>>,
}

impl SchemaCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog that serves open objects for every service. Nothing is
    /// checked against a schema.
    #[must_use]
    pub fn permissive() -> Self {
        Self::new().with_fallback(Arc::new(SchemaRegistry::permissive()))
    }

    /// Catalog built from the bundled description of every supported
    /// service.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the bundled document is malformed.
    pub fn standard() -> Result<Self, serde_json::Error> {
        Self::from_json(STANDARD_SCHEMAS)
    }

    /// Parses a document in the `schemas/standard.json` layout.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let doc: StandardDocument = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for (service_id, types) in doc.services {
            let registry = SchemaRegistry::from_types(doc.common.iter().cloned().chain(types));
            tracing::debug!(service = %service_id, types = registry.len(), "schema registered");
            catalog = catalog.with_registry(service_id, Arc::new(registry));
        }
        Ok(catalog)
    }

    /// Registers a factory for a service, replacing any previous one.
    #[must_use]
    pub fn with_service(mut self, service_id: impl Into<String>, factory: Arc<dyn SchemaFactory>) -> Self {
        let service_id = service_id.into();
        self.registries.remove(&service_id);
        self.factories.insert(service_id, factory);
        self
    }

    /// Registers a registry for a service. Unlike
    /// [`with_service`](Self::with_service), the registry stays reachable
    /// through [`registry`](Self::registry) for request validation.
    #[must_use]
    pub fn with_registry(mut self, service_id: impl Into<String>, registry: Arc<SchemaRegistry>) -> Self {
        let service_id = service_id.into();
        self.factories.insert(service_id.clone(), registry.clone());
        self.registries.insert(service_id, registry);
        self
    }

    /// Serves services without their own factory.
    #[must_use]
    pub fn with_fallback(mut self, factory: Arc<dyn SchemaFactory>) -> Self {
        self.fallback = Some(factory);
        self
    }

    /// Factory for a service, or the fallback.
    #[must_use]
    pub fn factory_for(&self, service_id: &str) -> Option<Arc<dyn SchemaFactory>> {
        self.factories
            .get(service_id)
            .or(self.fallback.as_ref())
            .cloned()
    }

    /// Registry for a service, when it was registered as one.
    #[must_use]
    pub fn registry(&self, service_id: &str) -> Option<Arc<SchemaRegistry>> {
        self.registries.get(service_id).cloned()
    }

    /// Registered service ids, sorted.
    #[must_use]
    pub fn services(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for SchemaCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCatalog")
            .field("services", &self.services())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
