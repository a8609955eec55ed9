//! Type descriptions for the remote schemas and the registry that builds
//! [`SchemaObject`]s from them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::object::{SchemaObject, SchemaValue};
use crate::traits::SchemaFactory;

/// Errors raised while creating or mutating schema objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("type not found: {type_name}")]
    UnknownType { type_name: String },
    #[error("{type_name} has no field {field}")]
    UnknownField { type_name: String, field: String },
    #[error("{type_name}.{field} is not an object")]
    NotAnObject { type_name: String, field: String },
    #[error("{type_name}.{field} is not a sequence")]
    NotASequence { type_name: String, field: String },
}

/// Description of one complex type: its name and ordered field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSchema {
    /// Schema type name, e.g. `"ClientDetail"`.
    pub name: String,
    /// Field definitions in wire order.
    pub fields: Vec<FieldDef>,
}

impl TypeSchema {
    /// Convenience constructor; `required` lists the mandatory field names.
    #[must_use]
    pub fn new(name: &str, fields: &[&str], required: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|field| FieldDef {
                    name: (*field).to_string(),
                    required: required.contains(field),
                })
                .collect(),
        }
    }
}

/// Single field definition within a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Name of the field.
    pub name: String,
    /// Whether the field must be set before the object goes on the wire.
    #[serde(default)]
    pub required: bool,
}

/// Result of validating an object against its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The object conforms to the schema.
    Valid,
    /// The object violates one or more schema constraints.
    Invalid {
        /// Human-readable descriptions of each validation failure.
        errors: Vec<String>,
    },
}

impl ValidationResult {
    /// Returns true for [`ValidationResult::Valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// In-memory set of type descriptions for one service version.
///
/// Acts as the [`SchemaFactory`] for requests against that service. A
/// permissive registry hands out open objects for types it does not know,
/// which is useful when no schema description is available.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaRegistry {
    types: HashMap<String, TypeSchema>,
    #[serde(default)]
    permissive: bool,
}

impl SchemaRegistry {
    /// Creates an empty strict registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that accepts unknown types as open objects.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            types: HashMap::new(),
            permissive: true,
        }
    }

    /// Builds a strict registry from a list of type descriptions. Later
    /// entries replace earlier ones with the same name.
    #[must_use]
    pub fn from_types(types: impl IntoIterator<Item = TypeSchema>) -> Self {
        let mut registry = Self::new();
        for ty in types {
            registry.register(ty);
        }
        registry
    }

    /// Parses a JSON array of [`TypeSchema`] documents.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let types: Vec<TypeSchema> = serde_json::from_str(json)?;
        Ok(Self::from_types(types))
    }

    /// Registers a type, replacing any existing description of the same name.
    pub fn register(&mut self, ty: TypeSchema) {
        self.types.insert(ty.name.clone(), ty);
    }

    /// Looks up a type description.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&TypeSchema> {
        self.types.get(type_name)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Checks that every required field of `obj` (and of every nested object
    /// whose type is registered) is set.
    #[must_use]
    pub fn validate(&self, obj: &SchemaObject) -> ValidationResult {
        let mut errors = Vec::new();
        self.collect_errors(obj, &mut errors);
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { errors }
        }
    }

    fn collect_errors(&self, obj: &SchemaObject, errors: &mut Vec<String>) {
        if let Some(ty) = self.types.get(obj.type_name()) {
            for field in ty.fields.iter().filter(|f| f.required) {
                if obj.get(&field.name).map_or(true, SchemaValue::is_absent) {
                    errors.push(format!(
                        "{}: missing required field {}",
                        ty.name, field.name
                    ));
                }
            }
        }
        for (_, value) in obj.fields() {
            self.collect_value_errors(value, errors);
        }
    }

    fn collect_value_errors(&self, value: &SchemaValue, errors: &mut Vec<String>) {
        match value {
            SchemaValue::Object(nested) => self.collect_errors(nested, errors),
            SchemaValue::Sequence(items) => {
                for item in items {
                    self.collect_value_errors(item, errors);
                }
            }
            SchemaValue::Absent | SchemaValue::Scalar(_) => {}
        }
    }
}

impl SchemaFactory for SchemaRegistry {
    fn create(&self, type_name: &str) -> Result<SchemaObject, SchemaError> {
        match self.types.get(type_name) {
            Some(ty) => Ok(SchemaObject::declared(
                type_name,
                ty.fields.iter().map(|f| f.name.clone()),
            )),
            None if self.permissive => Ok(SchemaObject::open(type_name)),
            None => Err(SchemaError::UnknownType {
                type_name: type_name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_types([
            TypeSchema::new(
                "WebAuthenticationCredential",
                &["Key", "Password"],
                &["Key", "Password"],
            ),
            TypeSchema::new(
                "WebAuthenticationDetail",
                &["ParentCredential", "UserCredential"],
                &["UserCredential"],
            ),
        ])
    }

    #[test]
    fn create_declares_fields_in_order() {
        let obj = registry().create("WebAuthenticationDetail").unwrap();
        let names: Vec<&str> = obj.field_names().collect();
        assert_eq!(names, vec!["ParentCredential", "UserCredential"]);
    }

    #[test]
    fn strict_registry_rejects_unknown_type() {
        let err = registry().create("Nope").unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownType {
                type_name: "Nope".to_string()
            }
        );
    }

    #[test]
    fn permissive_registry_creates_open_objects() {
        let obj = SchemaRegistry::permissive().create("Anything").unwrap();
        assert!(obj.is_open());
        assert_eq!(obj.type_name(), "Anything");
    }

    #[test]
    fn validate_reports_nested_missing_fields() {
        let reg = registry();
        let mut detail = reg.create("WebAuthenticationDetail").unwrap();
        let mut cred = reg.create("WebAuthenticationCredential").unwrap();
        cred.set("Key", "k").unwrap();
        detail.set("UserCredential", cred).unwrap();

        match reg.validate(&detail) {
            ValidationResult::Invalid { errors } => {
                assert_eq!(
                    errors,
                    vec!["WebAuthenticationCredential: missing required field Password"]
                );
            }
            ValidationResult::Valid => panic!("expected invalid"),
        }
    }

    #[test]
    fn validate_accepts_complete_object() {
        let reg = registry();
        let cred = reg
            .create("WebAuthenticationCredential")
            .and_then(|c| c.with("Key", "k"))
            .and_then(|c| c.with("Password", "s"))
            .unwrap();
        assert!(reg.validate(&cred).is_valid());
    }

    #[test]
    fn registry_loads_from_json() {
        let json = r#"[
            {"name": "VersionId", "fields": [
                {"name": "ServiceId", "required": true},
                {"name": "Major", "required": true},
                {"name": "Intermediate"},
                {"name": "Minor"}
            ]}
        ]"#;
        let reg = SchemaRegistry::from_json(json).unwrap();
        assert_eq!(reg.len(), 1);
        let ty = reg.get("VersionId").unwrap();
        assert!(ty.fields[0].required);
        assert!(!ty.fields[2].required);
    }
}
