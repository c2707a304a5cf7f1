use crate::error::{BanklyError, ConfigError, LoginError, TransportError};
use crate::taxonomy::{DomainError, ErrorKind};

use common::HttpStatusCode;

/// **VALUE**: Verifies that constructed errors carry their call site.
///
/// **WHY THIS MATTERS**: A credentials failure deep in a service start-up is
/// only actionable if it says where it was raised.
///
/// **BUG THIS CATCHES**: Would catch `#[track_caller]` being dropped from a
/// constructor, which makes every error point into the error module.
#[test]
fn given_config_error_when_formatted_then_includes_location() {
    let err = ConfigError::credentials_missing("client_secret");

    let text = err.to_string();

    assert!(text.contains("Client Credentials Missing"));
    assert!(text.contains("client_secret"));
    assert!(text.contains("error.rs"), "location missing from: {text}");
}

/// **VALUE**: Verifies that the login rejection reports status 400.
#[test]
fn given_rejected_login_when_status_queried_then_bad_request() {
    let err = LoginError::rejected("invalid_client");

    assert_eq!(err.status_code(), Some(HttpStatusCode::BAD_REQUEST));
    assert!(err.to_string().contains("invalid_client"));
    assert!(!err.is_cancelled());
}

/// **VALUE**: Verifies that domain errors are matched by variant, not downcast.
#[test]
fn given_domain_error_when_wrapped_then_kind_and_status_exposed() {
    let err: BanklyError = DomainError::from_kind(ErrorKind::EntryNotFound).into();

    assert!(err.is_kind(ErrorKind::EntryNotFound));
    assert_eq!(err.error_key(), Some("ENTRY_NOT_FOUND"));
    assert_eq!(err.status_code(), Some(HttpStatusCode::NOT_FOUND));
    assert_eq!(err.error_category(), "domain");
    assert!(matches!(err, BanklyError::Domain(_)));
}

/// **VALUE**: Verifies that cancellation is recognised whether it hit login or dispatch.
#[test]
fn given_cancellation_errors_when_checked_then_is_cancelled() {
    let during_login: BanklyError = LoginError::cancelled().into();
    let during_call: BanklyError = TransportError::cancelled().into();

    assert!(during_login.is_cancelled());
    assert!(during_call.is_cancelled());
    assert_eq!(during_call.error_category(), "cancelled");
}

/// **VALUE**: Verifies that unmapped domain errors are categorised separately.
#[test]
fn given_unmapped_domain_error_when_categorised_then_unmapped() {
    let err: BanklyError = DomainError::unmapped("NEW_CODE", &["x"]).into();

    assert_eq!(err.error_category(), "unmapped");
    assert_eq!(err.error_key(), Some("NEW_CODE"));
}

/// **VALUE**: Verifies the domain error display includes key, status and messages.
#[test]
fn given_domain_error_when_displayed_then_key_status_and_messages() {
    let err = DomainError::unmapped("NEW_CODE", &["first", "second"]);

    assert_eq!(err.to_string(), "NEW_CODE (HTTP 409): first; second");
}

/// **VALUE**: Verifies that a malformed URL becomes a request-build error.
#[test]
fn given_url_parse_error_when_converted_then_request_error() {
    let parse_error = url::Url::parse("::not a url").unwrap_err();

    let err = BanklyError::from(parse_error);

    assert!(matches!(err, BanklyError::Request { .. }));
    assert_eq!(err.error_category(), "request");
}
