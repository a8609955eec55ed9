//! FedEx Web Services client: request lifecycle, envelope assembly, reply
//! classification and the per-service operation adapters.
//!
//! A [`RequestFactory`] binds credentials, a [`Transport`] and a
//! [`SchemaCatalog`]. Each [`Request`] wraps one [`OperationAdapter`] and is
//! sent at most once.

pub mod classify;
pub mod config;
pub mod envelope;
pub mod error;
pub mod observability;
pub mod observer;
pub mod request;
pub mod schemas;
pub mod services;
pub mod traits;
pub mod transport;

pub use config::{Credentials, CredentialsError, Localization, RequestOptions};
pub use envelope::{Block, Envelope, VersionInfo};
pub use error::{RemoteError, RemoteErrorKind, RequestError};
pub use observability::{init_logging, LogFormat};
pub use observer::{CompositeObserver, LifecycleObserver, RequestInfo, TracingObserver};
pub use request::{OperationAdapter, Request, RequestFactory, RequestState};
pub use schemas::SchemaCatalog;
pub use traits::Transport;
pub use transport::{NamedParams, ScriptedTransport, TransportError, ValidatingTransport};
