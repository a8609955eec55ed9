//! Request lifecycle: construct, prepare, dispatch, classify.
//!
//! Every remote operation shares one flow. [`Request::new`] assembles the
//! shared envelope blocks and lets the [`OperationAdapter`] populate its
//! payload. [`Request::send`] dispatches once and classifies the reply by
//! severity. The adapter supplies only what differs between operations.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fedex_core::{Notification, Response, SchemaError, SchemaFactory, SchemaObject};

use crate::classify;
use crate::config::{Credentials, RequestOptions};
use crate::envelope::{self, Block, Envelope, VersionInfo};
use crate::error::RequestError;
use crate::observability;
use crate::observer::{LifecycleObserver, RequestInfo, TracingObserver};
use crate::schemas::SchemaCatalog;
use crate::traits::Transport;
use crate::transport::TransportError;

static NEXT_CALL_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// RequestState
// ---------------------------------------------------------------------------

/// Lifecycle state of a [`Request`].
///
/// `Constructed -> Prepared -> Dispatched -> Succeeded | Failed`. No state is
/// ever skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestState {
    Constructed,
    Prepared,
    Dispatched,
    Succeeded,
    Failed,
}

impl RequestState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Constructed => "constructed",
            Self::Prepared => "prepared",
            Self::Dispatched => "dispatched",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Whether the request has finished.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OperationAdapter
// ---------------------------------------------------------------------------

/// The operation-specific part of a request.
///
/// An adapter owns its payload objects, builds them in
/// [`prepare_fields`](Self::prepare_fields), and decides how they go on the
/// wire in [`assemble_and_dispatch`](Self::assemble_and_dispatch). The two
/// classification hooks default to the generic policy.
pub trait OperationAdapter {
    /// Service id and version this operation targets.
    fn version(&self) -> VersionInfo;

    /// Creates the payload objects with their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the service schema lacks a type or field
    /// the adapter needs.
    fn prepare_fields(&mut self, factory: &dyn SchemaFactory) -> Result<(), SchemaError>;

    /// Invokes the remote operation with the envelope followed by the
    /// payload.
    ///
    /// # Errors
    ///
    /// Propagates the transport's error unchanged.
    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError>;

    /// Raises the error for ERROR notifications. Runs only when no FAILURE
    /// was found.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Remote`] for the first ERROR notification.
    fn check_errors(&self, response: &Response) -> Result<(), RequestError> {
        classify::check_for_errors(response)
    }

    /// Collects advisories from a reply that raised nothing.
    fn check_warnings(&self, response: &Response) -> Vec<Notification> {
        classify::collect_advisories(response)
    }
}

// ---------------------------------------------------------------------------
// RequestFactory
// ---------------------------------------------------------------------------

/// Builds requests that share credentials, transport, schemas and observer.
#[derive(Clone)]
pub struct RequestFactory {
    credentials: Arc<Credentials>,
    transport: Arc<dyn Transport>,
    catalog: Arc<SchemaCatalog>,
    observer: Arc<dyn LifecycleObserver>,
}

impl RequestFactory {
    /// Creates a factory that logs through [`TracingObserver`].
    #[must_use]
    pub fn new(
        credentials: Arc<Credentials>,
        transport: Arc<dyn Transport>,
        catalog: Arc<SchemaCatalog>,
    ) -> Self {
        Self {
            credentials,
            transport,
            catalog,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replaces the lifecycle observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Shared credentials.
    #[must_use]
    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    /// Builds a prepared request for `adapter`.
    ///
    /// # Errors
    ///
    /// Same as [`Request::new`].
    pub fn create<A: OperationAdapter>(
        &self,
        adapter: A,
        options: &RequestOptions,
    ) -> Result<Request<A>, RequestError> {
        Request::new(self, adapter, options)
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One single-use remote call.
pub struct Request<A> {
    call_id: u64,
    account: String,
    version: VersionInfo,
    factory: Arc<dyn SchemaFactory>,
    transport: Arc<dyn Transport>,
    observer: Arc<dyn LifecycleObserver>,
    envelope: Envelope,
    adapter: A,
    state: RequestState,
    response: Option<Response>,
    advisories: Vec<Notification>,
}

impl<A: OperationAdapter> Request<A> {
    /// Validates the configuration, assembles the envelope blocks in order
    /// (authentication, client detail, version, transaction detail), then
    /// lets the adapter prepare its payload.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Configuration`] when the credentials or
    /// version are invalid, the catalog has no schema for the service, or a
    /// block cannot be built against the schema.
    pub fn new(
        factory: &RequestFactory,
        mut adapter: A,
        options: &RequestOptions,
    ) -> Result<Self, RequestError> {
        factory
            .credentials
            .validate()
            .map_err(RequestError::configuration)?;
        let version = adapter.version();
        if !version.is_valid() {
            return Err(RequestError::configuration("version has an empty service id"));
        }
        let schema = factory.catalog.factory_for(&version.service_id).ok_or_else(|| {
            RequestError::configuration(format!("no schema for service {}", version.service_id))
        })?;

        let call_id = NEXT_CALL_ID.fetch_add(1, Ordering::Relaxed);
        let account = factory.credentials.fingerprint();
        let info = RequestInfo {
            call_id,
            version: &version,
            account: &account,
        };
        let observer = &factory.observer;
        let assembled = |block: Block, object: SchemaObject| {
            observer.on_block_assembled(info, block, &object);
            object
        };

        let credentials = factory.credentials.as_ref();
        let built = envelope::authentication_block(schema.as_ref(), credentials)
            .map(|o| assembled(Block::Authentication, o))
            .and_then(|authentication| {
                let client_detail = envelope::client_detail_block(schema.as_ref(), credentials, options)
                    .map(|o| assembled(Block::ClientDetail, o))?;
                let version_id = envelope::version_block(schema.as_ref(), &version)
                    .map(|o| assembled(Block::Version, o))?;
                let transaction = envelope::transaction_block(schema.as_ref(), options)?
                    .map(|o| assembled(Block::TransactionDetail, o));
                Ok(Envelope {
                    authentication,
                    client_detail,
                    version: version_id,
                    transaction,
                })
            })
            .and_then(|envelope| adapter.prepare_fields(schema.as_ref()).map(|()| envelope));
        let envelope = built.map_err(RequestError::configuration)?;

        let mut request = Self {
            call_id,
            account,
            version,
            factory: schema,
            transport: Arc::clone(&factory.transport),
            observer: Arc::clone(&factory.observer),
            envelope,
            adapter,
            state: RequestState::Constructed,
            response: None,
            advisories: Vec::new(),
        };
        request.transition(RequestState::Prepared);
        Ok(request)
    }

    /// Dispatches through the adapter and classifies the reply.
    ///
    /// # Errors
    ///
    /// See [`send_with`](Self::send_with).
    pub fn send(&mut self) -> Result<&Response, RequestError> {
        self.send_with(A::assemble_and_dispatch)
    }

    /// Dispatches through `dispatch` instead of the adapter's default
    /// operation, then classifies the reply the same way.
    ///
    /// Classification order: the first FAILURE notification, then the
    /// adapter's error check, then its warning check. Advisories never fail
    /// the request.
    ///
    /// The reply is stored even when a notification in it cannot be read;
    /// such entries are skipped and listed in
    /// [`Response::anomalies`](fedex_core::Response::anomalies).
    ///
    /// # Errors
    ///
    /// - [`RequestError::AlreadySent`] if the request was already dispatched.
    /// - [`RequestError::SchemaValidation`] for a transport validation fault.
    /// - [`RequestError::RemoteFailure`] for FAILURE replies and unreachable
    ///   services.
    /// - [`RequestError::Remote`] from the adapter's error check.
    pub fn send_with<F>(&mut self, dispatch: F) -> Result<&Response, RequestError>
    where
        F: FnOnce(&A, &Envelope, &dyn Transport) -> Result<SchemaObject, TransportError>,
    {
        if self.state != RequestState::Prepared {
            return Err(RequestError::AlreadySent { state: self.state });
        }
        let span = observability::request_span(self.call_id, &self.version);
        let _guard = span.enter();

        self.transition(RequestState::Dispatched);
        let parsed = dispatch(&self.adapter, &self.envelope, self.transport.as_ref())
            .map_err(map_transport_error)
            .map(Response::from_tree);
        let response = match parsed {
            Ok(response) => response,
            Err(err) => {
                self.transition(RequestState::Failed);
                return Err(err);
            }
        };

        classify::check_summary(&response, self.call_id);
        let verdict = classify::check_for_failure(&response)
            .and_then(|()| self.adapter.check_errors(&response));
        if let Err(err) = verdict {
            self.response = Some(response);
            self.transition(RequestState::Failed);
            return Err(err);
        }

        self.advisories = self.adapter.check_warnings(&response);
        for advisory in &self.advisories {
            self.observer.on_advisory(self.info(), advisory);
        }
        self.transition(RequestState::Succeeded);
        Ok(self.response.insert(response))
    }

    /// Creates an empty object of a type from this request's service
    /// schema, e.g. a `RequestedPackageLineItem` to add to a shipment.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownType`] if the schema has no such type.
    pub fn create_object(&self, type_name: &str) -> Result<SchemaObject, SchemaError> {
        self.factory.create(type_name)
    }

    /// The operation adapter.
    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Mutable access to the adapter, only before dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::AlreadySent`] once the request was dispatched.
    pub fn adapter_mut(&mut self) -> Result<&mut A, RequestError> {
        if self.state == RequestState::Prepared {
            Ok(&mut self.adapter)
        } else {
            Err(RequestError::AlreadySent { state: self.state })
        }
    }
}

impl<A> Request<A> {
    /// Process-unique id of this request, as it appears in logs.
    #[must_use]
    pub fn call_id(&self) -> u64 {
        self.call_id
    }

    #[must_use]
    pub fn state(&self) -> RequestState {
        self.state
    }

    #[must_use]
    pub fn version(&self) -> &VersionInfo {
        &self.version
    }

    /// The assembled shared blocks.
    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// The parsed reply, once one has been received. Also kept when the
    /// reply was classified as an error.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// NOTE and WARNING notifications from a successful reply.
    #[must_use]
    pub fn advisories(&self) -> &[Notification] {
        &self.advisories
    }

    fn info(&self) -> RequestInfo<'_> {
        RequestInfo {
            call_id: self.call_id,
            version: &self.version,
            account: &self.account,
        }
    }

    fn transition(&mut self, to: RequestState) {
        let from = self.state;
        self.state = to;
        self.observer.on_transition(self.info(), from, to);
    }
}

impl<A: fmt::Debug> fmt::Debug for Request<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("call_id", &self.call_id)
            .field("version", &self.version)
            .field("state", &self.state)
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}

fn map_transport_error(err: TransportError) -> RequestError {
    match err {
        TransportError::Validation { detail } => RequestError::SchemaValidation { detail },
        TransportError::Unavailable(reason) => RequestError::RemoteFailure {
            code: None,
            message: Some(reason),
        },
        TransportError::Other(err) => RequestError::RemoteFailure {
            code: None,
            message: Some(format!("{err:#}")),
        },
    }
}
