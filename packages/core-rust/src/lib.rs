//! `FedEx` core: schema objects, severity taxonomy, reply parsing and the
//! plain-data converter.

pub mod convert;
pub mod object;
pub mod response;
pub mod schema;
pub mod severity;
pub mod traits;
pub mod types;

pub use convert::{object_to_plain_tree, to_json, to_plain_tree, ConvertError, ConvertOptions};
pub use object::{SchemaObject, SchemaValue};
pub use response::{Response, ResponseError};
pub use schema::{FieldDef, SchemaError, SchemaRegistry, TypeSchema, ValidationResult};
pub use severity::{compare, first_matching, max_of, Notification, Severity, UnknownSeverity};
pub use traits::SchemaFactory;
pub use types::{Scalar, Value};
