use crate::helpers::{api_path, client_for, config_for, expected_bearer, mount_login};

use bankly_core::taxonomy::UNEXPECTED_RESPONSE_KEY;
use bankly_core::{
    BanklyClient, BanklyError, ErrorFamily, ErrorKind, NO_BODY, OutboundRequest, RequestContext,
    Session, decode_json,
};

use std::time::{Duration, Instant};

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Balance {
    amount: f64,
    currency: String,
}

/// **VALUE**: Verifies the standard headers on a request with a body.
///
/// **WHY THIS MATTERS**: The gateway rejects calls missing `api-version`, and
/// a body without `Content-Type` is read as form data.
///
/// **BUG THIS CATCHES**: Would catch the token being sent without its type
/// prefix, or the correlation id from the context being dropped.
#[tokio::test]
async fn given_post_with_body_when_executed_then_standard_headers_sent() {
    // GIVEN: An API route that only matches the full header set
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    let correlation_id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path(api_path("baas/transfers")))
        .and(header("authorization", expected_bearer().as_str()))
        .and(header("api-version", "1.0"))
        .and(header("content-type", "application/json"))
        .and(header("x-correlation-id", correlation_id.to_string().as_str()))
        .and(body_json(json!({"amount": 10.5})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);
    let ctx = RequestContext::new().with_correlation_id(correlation_id);

    // WHEN: Posting a body
    let response = client
        .post(&ctx, "baas/transfers", Some(&json!({"amount": 10.5})), None)
        .await
        .unwrap();

    // THEN: Accepted
    assert_eq!(response.status().as_u16(), 202);
}

/// **VALUE**: Verifies that a request without body carries no `Content-Type`.
#[tokio::test]
async fn given_get_without_body_when_executed_then_no_content_type() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("account/123/balance")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    client_for(&server)
        .get(&RequestContext::new(), "/account/123/balance", &[], None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let api_call = requests
        .iter()
        .find(|r| r.url.path() == api_path("account/123/balance"))
        .unwrap();
    assert!(api_call.headers.get("content-type").is_none());
    assert!(api_call.headers.get("x-correlation-id").is_none());
}

/// **VALUE**: Verifies that query parameters reach the API.
#[tokio::test]
async fn given_query_when_get_executed_then_parameters_sent() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("events")))
        .and(query_param("branch", "0001"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .get(&RequestContext::new(), "events", &[("branch", "0001"), ("page", "2")], None)
        .await
        .unwrap();
}

/// **VALUE**: Verifies that a caller header replaces the default of the same name.
#[tokio::test]
async fn given_caller_api_version_when_executed_then_caller_value_wins() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    Mock::given(method("PATCH"))
        .and(path(api_path("cards/123/status")))
        .and(header("api-version", "2.0"))
        .and(header("x-extra", "yes"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let mut headers = HeaderMap::new();
    headers.insert("api-version", HeaderValue::from_static("2.0"));
    headers.insert("x-extra", HeaderValue::from_static("yes"));

    client_for(&server)
        .patch(&RequestContext::new(), "cards/123/status", NO_BODY, Some(headers))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let api_call = requests
        .iter()
        .find(|r| r.url.path() == api_path("cards/123/status"))
        .unwrap();
    assert_eq!(api_call.headers.get_all("api-version").iter().count(), 1);
}

/// **VALUE**: Verifies that the success body decodes through `decode_json`.
#[tokio::test]
async fn given_success_body_when_decoded_then_typed_value() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("account/123/balance")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"amount": 99.9, "currency": "BRL"})),
        )
        .mount(&server)
        .await;

    let response = client_for(&server)
        .get(&RequestContext::new(), "account/123/balance", &[], None)
        .await
        .unwrap();
    let balance: Balance = decode_json(response).await.unwrap();

    assert_eq!(
        balance,
        Balance {
            amount: 99.9,
            currency: "BRL".to_string()
        }
    );
}

/// **VALUE**: Verifies that an empty 204 decodes as `()` and a wrong shape is a decode error.
#[tokio::test]
async fn given_empty_or_mismatched_body_when_decoded_then_unit_or_decode_error() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    Mock::given(method("POST"))
        .and(path(api_path("empty")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("wrong")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;
    let client = client_for(&server);
    let ctx = RequestContext::new();

    let empty = client.post(&ctx, "empty", NO_BODY, None).await.unwrap();
    let wrong = client.get(&ctx, "wrong", &[], None).await.unwrap();

    decode_json::<()>(empty).await.unwrap();
    let err = decode_json::<Balance>(wrong).await.unwrap_err();
    assert!(matches!(err, BanklyError::Decode { .. }));
}

/// **VALUE**: Verifies that 404/403/504 classify uniformly even when the body
/// carries a structured envelope and a family handler is installed.
///
/// **WHY THIS MATTERS**: Callers rely on `EntryNotFound` for "does not exist"
/// regardless of which resource they called.
///
/// **BUG THIS CATCHES**: Would catch the handler running before the status
/// checks and turning a 404 into whatever the body says.
#[tokio::test]
async fn given_uniform_statuses_with_envelope_when_executed_then_status_wins() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    let envelope = json!({"errors": [{"code": "CARD_ALREADY_ACTIVE", "messages": ["active"]}]});
    for (status, route) in [(404, "missing"), (403, "forbidden"), (504, "slow")] {
        Mock::given(method("GET"))
            .and(path(api_path(route)))
            .respond_with(ResponseTemplate::new(status).set_body_json(envelope.clone()))
            .mount(&server)
            .await;
    }
    let client = client_for(&server).with_family(ErrorFamily::Card);
    let ctx = RequestContext::new();

    let missing = client.get(&ctx, "missing", &[], None).await.unwrap_err();
    let forbidden = client.get(&ctx, "forbidden", &[], None).await.unwrap_err();
    let slow = client.get(&ctx, "slow", &[], None).await.unwrap_err();

    assert!(missing.is_kind(ErrorKind::EntryNotFound), "{missing:?}");
    assert!(forbidden.is_kind(ErrorKind::ServiceForbidden), "{forbidden:?}");
    assert!(slow.is_kind(ErrorKind::GatewayTimeout), "{slow:?}");
}

/// **VALUE**: Verifies that other failures go through the installed handler.
#[tokio::test]
async fn given_family_handler_when_conflict_returned_then_mapped_error() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    Mock::given(method("PATCH"))
        .and(path(api_path("cards/123/activate")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "errors": [{"code": "CARD_ALREADY_ACTIVE", "messages": ["Card is already active"]}],
            "reference": "abc"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .with_family(ErrorFamily::Card)
        .patch(
            &RequestContext::new(),
            "cards/123/activate",
            Some(&json!({"activateCode": "1234"})),
            None,
        )
        .await
        .unwrap_err();

    assert!(err.is_kind(ErrorKind::CardAlreadyActivated));
    assert_eq!(err.status_code().map(|s| s.as_u16()), Some(409));
}

/// **VALUE**: Verifies the no-handler fallback keeps the status and the raw body.
#[tokio::test]
async fn given_no_handler_when_bad_request_returned_then_unexpected_response() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    Mock::given(method("POST"))
        .and(path(api_path("boletos")))
        .respond_with(ResponseTemplate::new(400).set_body_string("{\"code\":\"X\"}"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .post(&RequestContext::new(), "boletos", NO_BODY, None)
        .await
        .unwrap_err();

    let domain = err.domain().unwrap();
    assert_eq!(domain.key(), UNEXPECTED_RESPONSE_KEY);
    assert_eq!(domain.http_status().as_u16(), 400);
    assert_eq!(domain.messages(), ["{\"code\":\"X\"}".to_string()]);
}

/// **VALUE**: Verifies that a closure handler receives the failing request details.
#[tokio::test]
async fn given_closure_handler_when_failure_returned_then_handler_sees_path_and_status() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("pix/entries/key")))
        .respond_with(ResponseTemplate::new(422).set_body_string("nope"))
        .mount(&server)
        .await;

    let client = client_for(&server).with_error_handler(|failure: &bankly_core::ResponseFailure| {
        assert_eq!(failure.path, "pix/entries/key");
        assert_eq!(failure.status.as_u16(), 422);
        bankly_core::find_error_in(ErrorFamily::Pix, "ENTRY_KEY_NOT_FOUND", &[failure.body.as_str()])
    });

    let err = client
        .get(&RequestContext::new(), "pix/entries/key", &[], None)
        .await
        .unwrap_err();

    assert!(err.is_kind(ErrorKind::PixKeyNotFound));
}

/// **VALUE**: Verifies that an unreachable API is a transport error, never a
/// domain error.
///
/// **WHY THIS MATTERS**: "Could not reach the bank" must be retried;
/// "the bank said no" must not.
#[tokio::test]
async fn given_unreachable_api_when_executed_then_transport_error() {
    // GIVEN: Working login, API on a closed port
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    let session = Session::new(config_for(&server).with_api_endpoint("http://127.0.0.1:1/")).unwrap();
    let client = BanklyClient::new(session).unwrap();

    // WHEN: Calling the API
    let err = client
        .get(&RequestContext::new(), "anything", &[], None)
        .await
        .unwrap_err();

    // THEN: Transport, not Domain
    assert!(matches!(err, BanklyError::Transport(_)), "{err:?}");
    assert_eq!(err.status_code(), None);
}

/// **VALUE**: Verifies that a login failure stops the pipeline before dispatch.
#[tokio::test]
async fn given_rejected_login_when_executed_then_authentication_error_and_no_api_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_client"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("cards")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get(&RequestContext::new(), "cards", &[], None)
        .await
        .unwrap_err();

    assert!(matches!(err, BanklyError::Authentication(_)), "{err:?}");
    assert_eq!(err.error_category(), "authentication");
}

/// **VALUE**: Verifies that a cancelled context fails before any network call.
#[tokio::test]
async fn given_cancelled_context_when_executed_then_cancelled_without_network() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 0).await;
    let ctx = RequestContext::new();
    ctx.cancel();

    let err = client_for(&server)
        .execute(&ctx, OutboundRequest::new(Method::GET, "cards"))
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
}

/// **VALUE**: Verifies that a path with `..` segments is refused before any
/// login or API call.
#[tokio::test]
async fn given_dot_segment_path_when_get_called_then_request_error_without_network() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 0).await;

    let err = client_for(&server)
        .get(&RequestContext::new(), "cards/../../admin", &[], None)
        .await
        .unwrap_err();

    assert!(matches!(err, BanklyError::Request { .. }), "{err:?}");
    assert_eq!(err.error_category(), "request");
}

/// **VALUE**: Verifies that cancellation aborts a slow API call promptly.
#[tokio::test]
async fn given_slow_api_when_context_cancelled_then_aborts_promptly() {
    // GIVEN: An API call that answers after 10 seconds
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("slow")))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;
    let client = client_for(&server);
    let ctx = RequestContext::new();

    // WHEN: Cancelling while the call is in flight
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        canceller.cancel();
    });
    let started = Instant::now();
    let err = client.get(&ctx, "slow", &[], None).await.unwrap_err();

    // THEN: Transport cancellation, well before the response
    assert!(matches!(err, BanklyError::Transport(_)));
    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(5));
}

/// **VALUE**: Verifies that several calls through one client share one token.
#[tokio::test]
async fn given_several_calls_when_executed_then_single_login() {
    let server = MockServer::start().await;
    mount_login(&server, Some(3600), 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("cards")))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;
    let client = client_for(&server);
    let cards = client.with_family(ErrorFamily::Card);
    let ctx = RequestContext::new();

    client.get(&ctx, "cards", &[], None).await.unwrap();
    cards.get(&ctx, "cards", &[], None).await.unwrap();
    client
        .request(&ctx, Method::GET, "cards", NO_BODY, &[], None)
        .await
        .unwrap();
}
