//! In-memory [`Transport`] that replays scripted replies.
//!
//! [`ScriptedTransport`] never touches the network. Replies and faults are
//! queued per operation name and handed out in order; every call is
//! recorded so tests can inspect exactly what was sent.

use std::collections::VecDeque;

use dashmap::DashMap;
use fedex_core::SchemaObject;
use parking_lot::Mutex;

use super::{NamedParams, TransportError};
use crate::traits::Transport;

/// One recorded `invoke` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: String,
    pub params: NamedParams,
}

/// Transport backed by per-operation reply queues.
///
/// An operation with nothing queued fails with
/// [`TransportError::Unavailable`].
#[derive(Default)]
pub struct ScriptedTransport {
    replies: DashMap<String, VecDeque<Result<SchemaObject, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply tree for `operation`.
    pub fn respond(&self, operation: &str, reply: SchemaObject) {
        self.enqueue(operation, Ok(reply));
    }

    /// Queues a reply decoded from JSON. Non-object JSON queues an empty
    /// reply.
    pub fn respond_json(&self, operation: &str, reply: serde_json::Value) {
        let tree = SchemaObject::from_json(format!("{operation}Reply"), reply)
            .unwrap_or_else(|| SchemaObject::open(format!("{operation}Reply")));
        self.respond(operation, tree);
    }

    /// Queues a fault for `operation`.
    pub fn fail(&self, operation: &str, error: TransportError) {
        self.enqueue(operation, Err(error));
    }

    /// All calls made so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Most recent call, if any.
    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    /// Number of replies still queued for `operation`.
    #[must_use]
    pub fn pending(&self, operation: &str) -> usize {
        self.replies.get(operation).map_or(0, |queue| queue.len())
    }

    fn enqueue(&self, operation: &str, reply: Result<SchemaObject, TransportError>) {
        self.replies
            .entry(operation.to_string())
            .or_default()
            .push_back(reply);
    }
}

impl Transport for ScriptedTransport {
    fn invoke(&self, operation: &str, params: &NamedParams) -> Result<SchemaObject, TransportError> {
        self.calls.lock().push(RecordedCall {
            operation: operation.to_string(),
            params: params.clone(),
        });
        let next = self
            .replies
            .get_mut(operation)
            .and_then(|mut queue| queue.pop_front());
        tracing::debug!(operation, scripted = next.is_some(), "scripted transport invoked");
        next.unwrap_or_else(|| {
            Err(TransportError::Unavailable(format!(
                "no scripted reply for {operation}"
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_in_queue_order_then_unavailable() {
        let transport = ScriptedTransport::new();
        transport.respond("track", SchemaObject::open("first"));
        transport.respond("track", SchemaObject::open("second"));
        let params = NamedParams::new();

        assert_eq!(transport.invoke("track", &params).unwrap().type_name(), "first");
        assert_eq!(transport.pending("track"), 1);
        assert_eq!(transport.invoke("track", &params).unwrap().type_name(), "second");
        assert!(matches!(
            transport.invoke("track", &params),
            Err(TransportError::Unavailable(_))
        ));
    }

    #[test]
    fn records_every_call() {
        let transport = ScriptedTransport::new();
        transport.fail(
            "getRates",
            TransportError::Validation {
                detail: "bad".into(),
            },
        );
        let params = NamedParams::new().with("ReturnTransitAndCommit", true);
        let _ = transport.invoke("getRates", &params);
        let _ = transport.invoke("track", &NamedParams::new());

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].operation, "getRates");
        assert!(calls[0].params.contains("ReturnTransitAndCommit"));
        assert_eq!(transport.last_call().unwrap().operation, "track");
    }

    #[test]
    fn respond_json_builds_open_tree() {
        let transport = ScriptedTransport::new();
        transport.respond_json("track", serde_json::json!({"HighestSeverity": "SUCCESS"}));
        let reply = transport.invoke("track", &NamedParams::new()).unwrap();
        assert_eq!(reply.type_name(), "trackReply");
        assert_eq!(reply.text("HighestSeverity"), Some("SUCCESS"));
    }
}
