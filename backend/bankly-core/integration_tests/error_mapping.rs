use crate::helpers::{api_path, client_for, mount_login};

use bankly_core::taxonomy::{DEFAULT_PARAMETER_HINTS, ErrorMapper, FamilyErrorHandler, ParameterHint};
use bankly_core::{ErrorFamily, ErrorKind, NO_BODY, RequestContext, TransferErrorHandler};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_failure(server: &MockServer, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(api_path(route)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// **VALUE**: Verifies the full path from an onboarding 400 to the precise
/// length error through the generic handler.
///
/// **WHY THIS MATTERS**: This is the mapping onboarding screens depend on to
/// point at the offending field.
#[tokio::test]
async fn given_invalid_parameter_response_when_posted_then_precise_length_error() {
    // GIVEN: The upstream overloaded code with a field hint
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    mount_failure(
        &server,
        "customers/account",
        400,
        json!({
            "errors": [{
                "code": "INVALID_PARAMETER",
                "messages": ["Exceeded the length of 'register name'"]
            }],
            "reference": "0f1e"
        }),
    )
    .await;
    let client = client_for(&server).with_family(ErrorFamily::Generic);

    // WHEN: Posting
    let err = client
        .post(&RequestContext::new(), "customers/account", NO_BODY, None)
        .await
        .unwrap_err();

    // THEN: The precise catalog key
    assert_eq!(err.error_key(), Some("INVALID_REGISTER_NAME_LENGTH"));
    assert!(err.is_kind(ErrorKind::InvalidRegisterNameLength));
}

/// **VALUE**: Verifies that an unknown upstream code surfaces as a 409 carrying
/// the upstream messages.
#[tokio::test]
async fn given_unknown_upstream_code_when_posted_then_conflict_with_messages() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    mount_failure(
        &server,
        "business",
        422,
        json!({"errors": [{"code": "SOME_UNKNOWN_CODE", "messages": ["custom message"]}]}),
    )
    .await;

    let err = client_for(&server)
        .with_family(ErrorFamily::Generic)
        .post(&RequestContext::new(), "business", NO_BODY, None)
        .await
        .unwrap_err();

    let domain = err.domain().unwrap();
    assert_eq!(domain.key(), "SOME_UNKNOWN_CODE");
    assert_eq!(domain.http_status().as_u16(), 409);
    assert_eq!(domain.messages(), ["custom message".to_string()]);
    assert_eq!(err.error_category(), "unmapped");
}

/// **VALUE**: Verifies the payment `{code, message}` shape through the generic handler.
#[tokio::test]
async fn given_single_code_payment_response_when_posted_then_mapped() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    mount_failure(
        &server,
        "bill-payment/confirm",
        400,
        json!({"code": "ALREADY_PAID", "message": "This boleto was already paid"}),
    )
    .await;

    let err = client_for(&server)
        .with_family(ErrorFamily::Generic)
        .post(&RequestContext::new(), "bill-payment/confirm", NO_BODY, None)
        .await
        .unwrap_err();

    assert!(err.is_kind(ErrorKind::BoletoAlreadyPaid));
}

/// **VALUE**: Verifies the transfer handler on a top-level-code transfer failure.
#[tokio::test]
async fn given_transfer_failure_when_posted_then_transfer_handler_maps_code() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    mount_failure(
        &server,
        "fund-transfers",
        400,
        json!({"code": "CASHOUT_LIMIT_NOT_ENOUGH", "message": "limit", "errors": []}),
    )
    .await;

    let err = client_for(&server)
        .with_error_handler(TransferErrorHandler::new())
        .post(&RequestContext::new(), "fund-transfers", Some(&json!({"amount": 1})), None)
        .await
        .unwrap_err();

    assert!(err.is_kind(ErrorKind::CashoutLimitNotEnough));
    assert_eq!(err.status_code().map(|s| s.as_u16()), Some(400));
}

/// **VALUE**: Verifies that a PIX-family client maps PIX vocabulary.
#[tokio::test]
async fn given_pix_failure_when_posted_then_pix_error() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    mount_failure(
        &server,
        "pix/entries",
        409,
        json!({"errors": [{"code": "ENTRY_ALREADY_EXISTS", "messages": ["key exists"]}]}),
    )
    .await;

    let err = client_for(&server)
        .with_family(ErrorFamily::Pix)
        .post(&RequestContext::new(), "pix/entries", NO_BODY, None)
        .await
        .unwrap_err();

    assert!(err.is_kind(ErrorKind::PixKeyAlreadyExists));
}

/// **VALUE**: Verifies that a handler built on a custom mapper uses its hints
/// end to end, while the defaults still apply after them.
#[tokio::test]
async fn given_custom_hint_mapper_when_posted_then_custom_hint_used() {
    // GIVEN: Default hints plus a Portuguese wording
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    mount_failure(
        &server,
        "customers",
        400,
        json!({"errors": [{"code": "INVALID_PARAMETER", "messages": ["tamanho do 'nome da mae' excedido"]}]}),
    )
    .await;
    let mut hints = vec![ParameterHint::owned("'nome da mae'", "INVALID_MOTHER_NAME_LENGTH")];
    hints.extend_from_slice(DEFAULT_PARAMETER_HINTS);
    let handler = FamilyErrorHandler::with_mapper(ErrorFamily::Generic, ErrorMapper::with_hints(&hints));

    // WHEN: Posting through that handler
    let err = client_for(&server)
        .with_error_handler(handler)
        .post(&RequestContext::new(), "customers", NO_BODY, None)
        .await
        .unwrap_err();

    // THEN: The custom hint applied
    assert!(err.is_kind(ErrorKind::InvalidMotherNameLength));
}
