//! Lifecycle observer trait and composite implementation.
//!
//! Defines [`LifecycleObserver`] for reacting to request state changes, and
//! [`CompositeObserver`] which fans out notifications to multiple observers.
//! [`TracingObserver`] is the default and writes one structured `tracing`
//! event per notification.

use std::sync::Arc;

use fedex_core::{Notification, SchemaObject};

use crate::envelope::{Block, VersionInfo};
use crate::request::RequestState;

/// Identity of the request an event belongs to.
#[derive(Debug, Clone, Copy)]
pub struct RequestInfo<'a> {
    /// Process-unique id of the request.
    pub call_id: u64,
    /// Service and version the request targets.
    pub version: &'a VersionInfo,
    /// Short fingerprint of the credential key.
    pub account: &'a str,
}

/// Observer for request lifecycle events.
///
/// Used as `Arc<dyn LifecycleObserver>`.
pub trait LifecycleObserver: Send + Sync {
    /// Called once per state change, after the request has moved to `to`.
    fn on_transition(&self, info: RequestInfo<'_>, from: RequestState, to: RequestState);

    /// Called after each shared envelope block has been built.
    fn on_block_assembled(&self, info: RequestInfo<'_>, block: Block, object: &SchemaObject);

    /// Called for each NOTE or WARNING notification kept as an advisory.
    fn on_advisory(&self, info: RequestInfo<'_>, notification: &Notification);
}

/// Composite observer that fans out to multiple observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LifecycleObserver>>,
}

impl CompositeObserver {
    /// Creates a composite observer with the given list of observers.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn LifecycleObserver>>) -> Self {
        Self { observers }
    }

    /// Adds an observer after construction.
    pub fn add(&mut self, observer: Arc<dyn LifecycleObserver>) {
        self.observers.push(observer);
    }
}

impl LifecycleObserver for CompositeObserver {
    fn on_transition(&self, info: RequestInfo<'_>, from: RequestState, to: RequestState) {
        for observer in &self.observers {
            observer.on_transition(info, from, to);
        }
    }

    fn on_block_assembled(&self, info: RequestInfo<'_>, block: Block, object: &SchemaObject) {
        for observer in &self.observers {
            observer.on_block_assembled(info, block, object);
        }
    }

    fn on_advisory(&self, info: RequestInfo<'_>, notification: &Notification) {
        for observer in &self.observers {
            observer.on_advisory(info, notification);
        }
    }
}

/// Logs lifecycle events through `tracing`.
///
/// Blocks are logged at `debug` by type name only; credential values never
/// reach the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LifecycleObserver for TracingObserver {
    fn on_transition(&self, info: RequestInfo<'_>, from: RequestState, to: RequestState) {
        tracing::info!(
            call_id = info.call_id,
            service = %info.version,
            account = info.account,
            %from,
            %to,
            "request state changed"
        );
    }

    fn on_block_assembled(&self, info: RequestInfo<'_>, block: Block, object: &SchemaObject) {
        tracing::debug!(
            call_id = info.call_id,
            service = %info.version,
            param = block.param_name(),
            type_name = object.type_name(),
            "envelope block assembled"
        );
    }

    fn on_advisory(&self, info: RequestInfo<'_>, notification: &Notification) {
        tracing::warn!(
            call_id = info.call_id,
            service = %info.version,
            severity = %notification.severity,
            code = notification.code.as_deref().unwrap_or_default(),
            message = notification.message.as_deref().unwrap_or_default(),
            "advisory notification"
        );
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;

    use super::*;

    /// Event captured by [`RecordingObserver`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum Event {
        Transition(RequestState, RequestState),
        Block(Block),
        Advisory(Notification),
    }

    /// Observer that records every event, for assertions in tests.
    #[derive(Default)]
    pub struct RecordingObserver {
        events: Mutex<Vec<Event>>,
    }

    impl RecordingObserver {
        pub fn events(&self) -> Vec<Event> {
            self.events.lock().clone()
        }

        pub fn transitions(&self) -> Vec<(RequestState, RequestState)> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Event::Transition(from, to) => Some((from, to)),
                    _ => None,
                })
                .collect()
        }

        pub fn blocks(&self) -> Vec<Block> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Event::Block(b) => Some(b),
                    _ => None,
                })
                .collect()
        }
    }

    impl LifecycleObserver for RecordingObserver {
        fn on_transition(&self, _info: RequestInfo<'_>, from: RequestState, to: RequestState) {
            self.events.lock().push(Event::Transition(from, to));
        }

        fn on_block_assembled(&self, _info: RequestInfo<'_>, block: Block, _object: &SchemaObject) {
            self.events.lock().push(Event::Block(block));
        }

        fn on_advisory(&self, _info: RequestInfo<'_>, notification: &Notification) {
            self.events.lock().push(Event::Advisory(notification.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use fedex_core::Severity;

    use super::testing::{Event, RecordingObserver};
    use super::*;

    #[test]
    fn composite_fans_out_to_all_observers() {
        let a = Arc::new(RecordingObserver::default());
        let b = Arc::new(RecordingObserver::default());
        let mut composite = CompositeObserver::new(vec![a.clone() as Arc<dyn LifecycleObserver>]);
        composite.add(b.clone());
        composite.add(Arc::new(TracingObserver));

        let version = VersionInfo::new("trck", 16, 0, 0);
        let info = RequestInfo {
            call_id: 1,
            version: &version,
            account: "abc",
        };
        composite.on_transition(info, RequestState::Constructed, RequestState::Prepared);
        composite.on_advisory(info, &Notification::new(Severity::Note));

        for observer in [&a, &b] {
            assert_eq!(
                observer.events(),
                vec![
                    Event::Transition(RequestState::Constructed, RequestState::Prepared),
                    Event::Advisory(Notification::new(Severity::Note)),
                ]
            );
        }
    }
}
