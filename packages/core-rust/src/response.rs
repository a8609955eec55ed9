//! Parsed reply: the raw tree plus its severity summary and notifications.

use crate::object::{SchemaObject, SchemaValue};
use crate::severity::{max_of, Notification, Severity, UnknownSeverity};

/// Part of a reply's severity envelope that could not be read. The reply is
/// still accepted; see [`Response::anomalies`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    #[error(transparent)]
    UnknownSeverity(#[from] UnknownSeverity),
    #[error("notification element is not an object in {type_name}")]
    MalformedNotification { type_name: String },
}

/// Reply to one dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    tree: SchemaObject,
    highest_severity: Severity,
    /// Whether a readable `HighestSeverity` was present in the reply.
    reported: bool,
    notifications: Vec<Notification>,
    anomalies: Vec<ResponseError>,
}

impl Response {
    /// Reads `HighestSeverity` and `Notifications` from a reply tree.
    ///
    /// Field names are matched case-insensitively. A single `Notifications`
    /// element counts as a one-element list. A notification without a known
    /// severity, or one that is not an object, is skipped and recorded in
    /// [`anomalies`](Self::anomalies) so it matches no classification. When
    /// the summary is missing or unreadable, the highest notification
    /// severity stands in for it.
    #[must_use]
    pub fn from_tree(tree: SchemaObject) -> Self {
        let mut anomalies = Vec::new();
        let mut notifications = Vec::new();
        let elements = tree
            .get_ignore_case("Notifications")
            .map(SchemaValue::elements)
            .unwrap_or_default();
        for element in elements {
            let parsed = element
                .as_object()
                .ok_or_else(|| ResponseError::MalformedNotification {
                    type_name: tree.type_name().to_string(),
                })
                .and_then(|obj| Notification::from_object(obj).map_err(ResponseError::from));
            match parsed {
                Ok(notification) => notifications.push(notification),
                Err(err) => {
                    tracing::warn!(
                        type_name = tree.type_name(),
                        error = %err,
                        "skipping unreadable notification"
                    );
                    anomalies.push(err);
                }
            }
        }

        let summary = tree
            .get_ignore_case("HighestSeverity")
            .and_then(SchemaValue::as_scalar)
            .and_then(crate::types::Scalar::to_text)
            .map(|text| text.parse::<Severity>());
        let (highest_severity, reported) = match summary {
            Some(Ok(severity)) => (severity, true),
            Some(Err(err)) => {
                tracing::warn!(
                    type_name = tree.type_name(),
                    error = %err,
                    "unreadable HighestSeverity, using notifications"
                );
                anomalies.push(err.into());
                (max_of(&notifications), false)
            }
            None => {
                tracing::debug!(
                    type_name = tree.type_name(),
                    "reply has no HighestSeverity, using notifications"
                );
                (max_of(&notifications), false)
            }
        };

        Self {
            tree,
            highest_severity,
            reported,
            notifications,
            anomalies,
        }
    }

    /// The raw reply tree.
    #[must_use]
    pub fn tree(&self) -> &SchemaObject {
        &self.tree
    }

    /// Consumes the response, returning the raw tree.
    #[must_use]
    pub fn into_tree(self) -> SchemaObject {
        self.tree
    }

    /// Summary severity as reported (or derived, if the reply had none).
    #[must_use]
    pub fn highest_severity(&self) -> Severity {
        self.highest_severity
    }

    /// Whether the summary severity came from the reply itself.
    #[must_use]
    pub fn severity_reported(&self) -> bool {
        self.reported
    }

    /// Notifications in reply order.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Envelope parts that were skipped while reading the reply.
    #[must_use]
    pub fn anomalies(&self) -> &[ResponseError] {
        &self.anomalies
    }

    /// Returns true when the reported summary differs from the worst
    /// notification severity.
    #[must_use]
    pub fn summary_disagrees(&self) -> bool {
        self.reported
            && !self.notifications.is_empty()
            && self.highest_severity != max_of(&self.notifications)
    }
}
