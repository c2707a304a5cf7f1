use crate::taxonomy::ErrorKind;
use crate::taxonomy::tables::{ErrorFamily, raw_tables};

use std::collections::HashSet;

/// **VALUE**: Verifies that no two catalog entries share a key and that every
/// key is non-empty.
///
/// **WHY THIS MATTERS**: Callers branch on `error_key`. A duplicated key makes
/// two distinct failures indistinguishable.
///
/// **BUG THIS CATCHES**: Would catch a copy-pasted catalog line that kept the
/// previous entry's key.
#[test]
fn given_catalog_when_scanned_then_keys_unique_and_non_empty() {
    let mut seen = HashSet::new();

    for kind in ErrorKind::ALL {
        assert!(!kind.key().trim().is_empty(), "{kind:?} has an empty key");
        assert!(
            seen.insert(kind.key()),
            "duplicate catalog key {}",
            kind.key()
        );
    }
}

/// **VALUE**: Verifies that every entry carries an error status and a message.
#[test]
fn given_catalog_when_scanned_then_status_and_message_present() {
    for kind in ErrorKind::ALL {
        let status = kind.http_status();
        assert!(
            status.is_client_error() || status.is_server_error(),
            "{kind:?} has non-error status {status}"
        );
        assert!(!kind.default_message().is_empty(), "{kind:?} has no message");
    }
}

/// **VALUE**: Verifies the statuses named for the well-known entries.
#[test]
fn given_known_entries_when_inspected_then_statuses_match() {
    assert_eq!(ErrorKind::EntryNotFound.http_status().as_u16(), 404);
    assert_eq!(ErrorKind::ServiceForbidden.http_status().as_u16(), 403);
    assert_eq!(ErrorKind::GatewayTimeout.http_status().as_u16(), 504);
    assert_eq!(ErrorKind::InvalidBusinessSize.http_status().as_u16(), 400);
    assert_eq!(ErrorKind::InsufficientBalance.http_status().as_u16(), 400);
    assert_eq!(ErrorKind::CardAlreadyActivated.http_status().as_u16(), 409);
}

/// **VALUE**: Verifies that `from_key` is the inverse of `key` for the whole catalog.
#[test]
fn given_every_key_when_looked_up_then_same_kind_returned() {
    for kind in ErrorKind::ALL {
        assert_eq!(ErrorKind::from_key(kind.key()), Some(*kind));
    }
    assert_eq!(ErrorKind::from_key("NOT_A_KEY"), None);
}

/// **VALUE**: Verifies that no table lists the same upstream code twice.
///
/// **BUG THIS CATCHES**: Would catch a later row silently overriding an
/// earlier one when the table is collected into a map.
#[test]
fn given_family_tables_when_scanned_then_no_duplicate_codes() {
    for (family, codes) in raw_tables() {
        let mut seen = HashSet::new();
        for (code, _) in codes {
            assert!(seen.insert(*code), "{} lists {code} twice", family.name());
        }
    }
}

/// **VALUE**: Verifies that family tables take precedence over the generic table.
///
/// **WHY THIS MATTERS**: `INVALID_PASSWORD` on a card endpoint is a card
/// password failure; elsewhere it is unknown.
#[test]
fn given_overloaded_code_when_resolved_per_family_then_family_meaning_wins() {
    assert_eq!(
        ErrorFamily::Card.resolve("INVALID_PASSWORD"),
        Some(ErrorKind::InvalidCardPassword)
    );
    assert_eq!(ErrorFamily::Generic.resolve("INVALID_PASSWORD"), None);
    assert_eq!(
        ErrorFamily::Pix.resolve("ENTRY_ALREADY_EXISTS"),
        Some(ErrorKind::PixKeyAlreadyExists)
    );
    assert_eq!(
        ErrorFamily::Transfer.resolve("SCHEDULING_DUPLICATED"),
        Some(ErrorKind::DuplicateTransfer)
    );
}

/// **VALUE**: Verifies that a family falls back to the generic table.
#[test]
fn given_generic_code_when_resolved_in_family_then_generic_entry_found() {
    assert_eq!(
        ErrorFamily::Card.resolve("HOLDER_ALREADY_HAVE_A_ACCOUNT"),
        Some(ErrorKind::HolderAlreadyHasAccount)
    );
    assert_eq!(
        ErrorFamily::IncomeReport.resolve("ENTRY_NOT_FOUND"),
        Some(ErrorKind::EntryNotFound)
    );
}
