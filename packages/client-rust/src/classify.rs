//! Severity classification: turns a parsed [`Response`] into success, one
//! error, or a list of advisories.
//!
//! Classification scans the notifications itself rather than trusting
//! `HighestSeverity`. The first matching notification in reply order wins.

use fedex_core::{first_matching, max_of, Notification, Response, Severity};

use crate::error::{RemoteError, RemoteErrorKind, RequestError};

/// Raises [`RequestError::RemoteFailure`] for the first FAILURE notification,
/// or for a FAILURE summary that no notification backs up.
///
/// # Errors
///
/// Returns [`RequestError::RemoteFailure`] as described above.
pub fn check_for_failure(response: &Response) -> Result<(), RequestError> {
    if let Some(note) = first_matching(response.notifications(), &[Severity::Failure]) {
        return Err(RequestError::RemoteFailure {
            code: note.code.clone(),
            message: note.message.clone(),
        });
    }
    if response.highest_severity() == Severity::Failure {
        return Err(RequestError::RemoteFailure {
            code: None,
            message: None,
        });
    }
    Ok(())
}

/// Raises a [`RemoteErrorKind::Rejected`] error for the first ERROR
/// notification.
///
/// # Errors
///
/// Returns [`RequestError::Remote`] as described above.
pub fn check_for_errors(response: &Response) -> Result<(), RequestError> {
    check_for_errors_with(response, |_| RemoteErrorKind::Rejected)
}

/// Like [`check_for_errors`], with `kind_of` choosing the error kind from
/// the first ERROR notification.
///
/// # Errors
///
/// Returns [`RequestError::Remote`] for the first ERROR notification.
pub fn check_for_errors_with<F>(response: &Response, kind_of: F) -> Result<(), RequestError>
where
    F: FnOnce(&Notification) -> RemoteErrorKind,
{
    match first_matching(response.notifications(), &[Severity::Error]) {
        Some(note) => Err(RemoteError::new(kind_of(note), note.code.clone(), note.message.clone()).into()),
        None => Ok(()),
    }
}

/// NOTE and WARNING notifications, in reply order.
#[must_use]
pub fn collect_advisories(response: &Response) -> Vec<Notification> {
    response
        .notifications()
        .iter()
        .filter(|n| n.severity.is_advisory())
        .cloned()
        .collect()
}

/// Logs a reply whose summary severity disagrees with its notifications.
pub(crate) fn check_summary(response: &Response, call_id: u64) {
    if response.summary_disagrees() {
        tracing::warn!(
            call_id,
            reported = %response.highest_severity(),
            derived = %max_of(response.notifications()),
            "HighestSeverity disagrees with notifications"
        );
    }
}

#[cfg(test)]
mod tests {
    use fedex_core::SchemaObject;
    use serde_json::json;

    use super::*;

    fn response(json: serde_json::Value) -> Response {
        Response::from_tree(SchemaObject::from_json("Reply", json).unwrap())
    }

    #[test]
    fn failure_wins_over_earlier_error() {
        let resp = response(json!({
            "HighestSeverity": "FAILURE",
            "Notifications": [
                {"Severity": "WARNING", "Code": "1"},
                {"Severity": "FAILURE", "Code": "2", "Message": "down"},
                {"Severity": "ERROR", "Code": "3"},
            ],
        }));
        match check_for_failure(&resp) {
            Err(RequestError::RemoteFailure { code, message }) => {
                assert_eq!(code.as_deref(), Some("2"));
                assert_eq!(message.as_deref(), Some("down"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn failure_summary_without_notification_still_fails() {
        let resp = response(json!({"HighestSeverity": "FAILURE"}));
        assert!(matches!(
            check_for_failure(&resp),
            Err(RequestError::RemoteFailure { code: None, message: None })
        ));
    }

    #[test]
    fn error_notification_is_found_even_with_success_summary() {
        let resp = response(json!({
            "HighestSeverity": "SUCCESS",
            "Notifications": [{"Severity": "ERROR", "Code": "7", "Message": "bad"}],
        }));
        assert!(check_for_failure(&resp).is_ok());
        match check_for_errors(&resp) {
            Err(RequestError::Remote(err)) => {
                assert_eq!(err.kind, RemoteErrorKind::Rejected);
                assert_eq!(err.code.as_deref(), Some("7"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn first_error_chooses_kind() {
        let resp = response(json!({
            "Notifications": [
                {"Severity": "ERROR", "Message": "Invalid tracking number"},
                {"Severity": "ERROR", "Message": "other"},
            ],
        }));
        let err = check_for_errors_with(&resp, |n| {
            if n.message_contains("invalid tracking number") {
                RemoteErrorKind::InvalidTrackingNumber
            } else {
                RemoteErrorKind::Rejected
            }
        })
        .unwrap_err();
        assert!(matches!(err, RequestError::Remote(RemoteError { kind: RemoteErrorKind::InvalidTrackingNumber, .. })));
    }

    #[test]
    fn advisories_keep_notes_and_warnings_in_order() {
        let resp = response(json!({
            "HighestSeverity": "WARNING",
            "Notifications": [
                {"Severity": "SUCCESS"},
                {"Severity": "WARNING", "Code": "a"},
                {"Severity": "NOTE", "Code": "b"},
            ],
        }));
        let codes: Vec<_> = collect_advisories(&resp)
            .into_iter()
            .filter_map(|n| n.code)
            .collect();
        assert_eq!(codes, vec!["a", "b"]);
        assert!(check_for_failure(&resp).is_ok());
        assert!(check_for_errors(&resp).is_ok());
    }
}
