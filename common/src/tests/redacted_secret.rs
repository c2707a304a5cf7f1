use crate::RedactedSecret;

/// **VALUE**: Verifies that Debug and Display never print the secret.
///
/// **WHY THIS MATTERS**: Sessions and cached tokens are `Debug`. One `{:?}` in a log
/// line would otherwise leak the client secret or a live bearer token.
///
/// **BUG THIS CATCHES**: Would catch a derived Debug replacing the manual impl.
#[test]
fn given_secret_when_formatted_then_value_is_hidden() {
    // GIVEN: A secret
    let secret = RedactedSecret::new("super-secret-value");

    // WHEN: Formatting both ways
    let debug = format!("{:?}", secret);
    let display = format!("{}", secret);

    // THEN: Neither contains the value
    assert!(!debug.contains("super-secret-value"));
    assert!(!display.contains("super-secret-value"));
    assert_eq!(secret.expose(), "super-secret-value");
    assert_eq!(secret.len(), 18);
}

/// **VALUE**: Verifies that serialization is refused.
///
/// **BUG THIS CATCHES**: Would catch a derived Serialize that writes the secret into
/// a serialized config dump.
#[test]
fn given_secret_when_serialized_then_returns_error() {
    let secret = RedactedSecret::new("abc");

    let result = serde_json::to_string(&secret);

    assert!(result.is_err(), "Serialization must be refused");
}

/// **VALUE**: Verifies blank detection used by credential validation.
#[test]
fn given_whitespace_secret_when_checked_then_is_blank() {
    assert!(RedactedSecret::new("   ").is_blank());
    assert!(RedactedSecret::new("").is_blank());
    assert!(!RedactedSecret::new(" x ").is_blank());
}
