use crate::client::{OutboundRequest, join_path};
use crate::error::BanklyError;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use url::Url;

/// **VALUE**: Verifies that a path joins under a versioned base URL with
/// exactly one slash, for every slash variation of either input.
///
/// **WHY THIS MATTERS**: String concatenation of base + path is the classic
/// source of `//cards` (rejected by some gateways) and of `/v2` silently
/// dropped (`Url::join` replaces the last segment when the base has no
/// trailing slash).
///
/// **BUG THIS CATCHES**: Would catch `join_path` using raw `Url::join`, or
/// forgetting to strip the leading slash that makes the path absolute.
#[test]
fn given_slash_variations_when_joined_then_single_canonical_url() {
    // GIVEN: Base and path with and without slashes
    let bases = ["https://api.example.com/v2/", "https://api.example.com/v2"];
    let paths = ["cards/document/123", "/cards/document/123", "//cards/document/123"];

    for base in bases {
        for path in paths {
            // WHEN: Joining
            let url = join_path(&Url::parse(base).unwrap(), path).unwrap();

            // THEN: Always the same URL
            assert_eq!(
                url.as_str(),
                "https://api.example.com/v2/cards/document/123",
                "base={base} path={path}"
            );
        }
    }
}

/// **VALUE**: Verifies that dot segments are refused instead of resolved, so a
/// path built from caller-supplied ids never leaves the versioned base.
///
/// **BUG THIS CATCHES**: Would catch `cards/../../admin` against
/// `https://api.example.com/v2/` reaching `https://api.example.com/admin`.
#[test]
fn given_dot_segments_when_joined_then_request_error() {
    // GIVEN: A versioned base and paths that try to climb out of it
    let base = Url::parse("https://api.example.com/v2/").unwrap();
    let paths = [
        "cards/../../admin",
        "../admin",
        "cards/./1",
        "cards/%2e%2e/%2E%2E/admin",
        "cards/.%2e/admin",
        "cards\\..\\..\\admin",
        "cards/..?x=1",
        "..",
    ];

    for path in paths {
        // WHEN: Joining
        let result = join_path(&base, path);

        // THEN: Refused as a request error
        assert!(
            matches!(result, Err(BanklyError::Request { .. })),
            "path={path} gave {result:?}"
        );
    }
}

/// **VALUE**: Verifies that dots inside a segment are ordinary characters.
#[test]
fn given_dots_inside_segments_when_joined_then_kept_under_base() {
    let base = Url::parse("https://api.example.com/v2/").unwrap();

    let url = join_path(&base, "files/report..2024.pdf").unwrap();

    assert_eq!(url.as_str(), "https://api.example.com/v2/files/report..2024.pdf");
}

/// **VALUE**: Verifies that a host-only base joins like any other.
#[test]
fn given_host_only_base_when_joined_then_path_appended() {
    let base = Url::parse("https://api.example.com").unwrap();

    let url = join_path(&base, "/account/123/balance").unwrap();

    assert_eq!(url.as_str(), "https://api.example.com/account/123/balance");
}

/// **VALUE**: Verifies that a path segment containing ':' stays a path and is
/// not parsed as a URL scheme.
///
/// **BUG THIS CATCHES**: Would catch `baas:transfer/123` turning into a URL
/// with scheme `baas`.
#[test]
fn given_path_with_colon_when_joined_then_stays_relative() {
    let base = Url::parse("https://api.example.com/v2/").unwrap();

    let url = join_path(&base, "pix:keys/abc").unwrap();

    assert_eq!(url.as_str(), "https://api.example.com/v2/pix:keys/abc");
}

/// **VALUE**: Verifies that query pairs are appended and encoded.
#[test]
fn given_query_pairs_when_url_built_then_query_encoded() {
    // GIVEN: A request with query parameters that need encoding
    let request = OutboundRequest::get("events")
        .with_query(&[("branch", "0001"), ("beginDateTime", "2024-01-01 00:00")]);
    let base = Url::parse("https://api.example.com/").unwrap();

    // WHEN: Building the URL
    let url = request.url(&base).unwrap();

    // THEN: Pairs are form-encoded in order
    assert_eq!(
        url.as_str(),
        "https://api.example.com/events?branch=0001&beginDateTime=2024-01-01+00%3A00"
    );
}

/// **VALUE**: Verifies that no `?` is added when there are no query pairs.
#[test]
fn given_no_query_when_url_built_then_no_question_mark() {
    let request = OutboundRequest::get("cards/1");
    let base = Url::parse("https://api.example.com/").unwrap();

    let url = request.url(&base).unwrap();

    assert_eq!(url.query(), None);
}

/// **VALUE**: Verifies that the JSON body is serialized once at build time.
#[test]
fn given_json_body_when_attached_then_bytes_are_json() {
    let body = serde_json::json!({"amount": 10.5, "description": "rent"});

    let request = OutboundRequest::post("transfers").with_json_body(&body).unwrap();

    assert_eq!(request.method(), &Method::POST);
    assert!(request.has_body());
    let decoded: serde_json::Value = serde_json::from_slice(request.body().unwrap()).unwrap();
    assert_eq!(decoded, body);
}

/// **VALUE**: Verifies that an invalid header name is a request-build error,
/// not a panic.
#[test]
fn given_invalid_header_name_when_added_then_request_error() {
    let result = OutboundRequest::get("cards").with_header("bad header", "x");

    assert!(matches!(result, Err(BanklyError::Request { .. })));
}

/// **VALUE**: Verifies that caller headers keep every value, including repeats.
#[test]
fn given_caller_headers_when_merged_then_all_values_kept() {
    let mut headers = HeaderMap::new();
    headers.append("x-tag", HeaderValue::from_static("a"));
    headers.append("x-tag", HeaderValue::from_static("b"));

    let request = OutboundRequest::get("cards")
        .with_headers(headers)
        .with_header("x-other", "c")
        .unwrap();

    let tags: Vec<_> = request.headers().get_all("x-tag").iter().collect();
    assert_eq!(tags.len(), 2);
    assert_eq!(request.headers().get("x-other").unwrap(), "c");
}
