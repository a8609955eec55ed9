//! Response severity taxonomy.
//!
//! Every reply carries a summary severity and a list of notifications, each
//! with its own severity. Severities form a total order from best to worst:
//! `SUCCESS < NOTE < WARNING < ERROR < FAILURE`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::object::SchemaObject;

/// Graded outcome classification, ordered by ascending badness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Success,
    Note,
    Warning,
    Error,
    Failure,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Severity; 5] = [
        Severity::Success,
        Severity::Note,
        Severity::Warning,
        Severity::Error,
        Severity::Failure,
    ];

    /// Wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Note => "NOTE",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Failure => "FAILURE",
        }
    }

    /// NOTE and WARNING are surfaced but never fail a request.
    #[must_use]
    pub const fn is_advisory(self) -> bool {
        matches!(self, Self::Note | Self::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a reply carries a severity outside the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity: {0}")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSeverity(s.to_string()))
    }
}

/// Compares two severities by badness.
#[must_use]
pub fn compare(a: Severity, b: Severity) -> Ordering {
    a.cmp(&b)
}

/// Worst severity among the notifications; `SUCCESS` when there are none.
pub fn max_of<'a, I>(notifications: I) -> Severity
where
    I: IntoIterator<Item = &'a Notification>,
{
    notifications
        .into_iter()
        .map(|n| n.severity)
        .max()
        .unwrap_or(Severity::Success)
}

/// First notification, in reply order, whose severity is in `targets`.
pub fn first_matching<'a, I>(notifications: I, targets: &[Severity]) -> Option<&'a Notification>
where
    I: IntoIterator<Item = &'a Notification>,
{
    notifications.into_iter().find(|n| n.matches(targets))
}

/// One message attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity of this individual message.
    pub severity: Severity,
    /// Subsystem that produced the message (e.g. `"trck"`).
    pub source: Option<String>,
    /// Service-specific message code.
    pub code: Option<String>,
    /// Human-readable text.
    pub message: Option<String>,
    /// Text in the requested locale, when localization was supplied.
    pub localized_message: Option<String>,
}

impl Notification {
    /// Creates a notification with only a severity set.
    #[must_use]
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            source: None,
            code: None,
            message: None,
            localized_message: None,
        }
    }

    /// Builder: sets the code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Builder: sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Whether this notification's severity is one of `targets`.
    #[must_use]
    pub fn matches(&self, targets: &[Severity]) -> bool {
        targets.contains(&self.severity)
    }

    /// Whether the message text contains `needle`, ignoring ASCII case.
    #[must_use]
    pub fn message_contains(&self, needle: &str) -> bool {
        self.message
            .as_deref()
            .is_some_and(|m| m.to_ascii_lowercase().contains(&needle.to_ascii_lowercase()))
    }

    /// Decodes a `Notification` element from a reply tree.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownSeverity`] if the `Severity` field is missing or not
    /// one of the five known values.
    pub fn from_object(obj: &SchemaObject) -> Result<Self, UnknownSeverity> {
        let text = |name: &str| {
            obj.get_ignore_case(name)
                .and_then(|v| v.as_scalar())
                .and_then(crate::types::Scalar::to_text)
        };
        let severity = text("Severity")
            .ok_or_else(|| UnknownSeverity(String::new()))?
            .parse()?;
        Ok(Self {
            severity,
            source: text("Source"),
            code: text("Code"),
            message: text("Message"),
            localized_message: text("LocalizedMessage"),
        })
    }
}
