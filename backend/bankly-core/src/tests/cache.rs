use crate::auth::cache::{CachedToken, DEFAULT_TOKEN_TTL, MAX_TOKEN_LIFETIME, TokenCache};

use std::time::{Duration, Instant};

/// **VALUE**: Verifies the bearer string format `"<tokenType> <accessToken>"`.
#[test]
fn given_cached_token_when_bearer_built_then_type_and_value_joined() {
    let token = CachedToken::new("abc123", "Bearer", Instant::now(), Duration::from_secs(60));

    assert_eq!(token.bearer(), "Bearer abc123");
    assert!(token.is_valid());
}

/// **VALUE**: Verifies expiry is measured from receipt time.
///
/// **BUG THIS CATCHES**: Would catch `expires_in` being added to the time the
/// request was sent, or compared with `<=` so a token is served at its expiry instant.
#[test]
fn given_receipt_time_when_checking_validity_then_expiry_relative_to_receipt() {
    let received = Instant::now();
    let token = CachedToken::new("t", "Bearer", received, Duration::from_secs(30));

    assert!(token.is_valid_at(received + Duration::from_secs(29)));
    assert!(!token.is_valid_at(received + Duration::from_secs(30)));
}

/// **VALUE**: Verifies that a zero lifetime token is never valid.
#[test]
fn given_zero_lifetime_when_checked_then_invalid() {
    let token = CachedToken::new("t", "Bearer", Instant::now(), Duration::ZERO);

    assert!(!token.is_valid());
    assert_eq!(token.remaining(), Duration::ZERO);
}

/// **VALUE**: Verifies that an absurd lifetime is capped instead of overflowing.
///
/// **BUG THIS CATCHES**: Would catch `Instant + Duration` panicking when the
/// login server answers with `expires_in` near `u64::MAX`.
#[test]
fn given_huge_lifetime_when_token_built_then_capped_and_valid() {
    let received = Instant::now();

    let token = CachedToken::new("t", "Bearer", received, Duration::from_secs(u64::MAX));

    assert!(token.is_valid());
    assert!(token.expires_at() <= received + MAX_TOKEN_LIFETIME);
}

/// **VALUE**: Verifies that the token value is redacted in Debug output.
#[test]
fn given_cached_token_when_debug_formatted_then_value_hidden() {
    let token = CachedToken::new("very-secret-token", "Bearer", Instant::now(), DEFAULT_TOKEN_TTL);

    assert!(!format!("{token:?}").contains("very-secret-token"));
}

/// **VALUE**: Verifies that expired entries read as absent while valid ones are returned.
#[tokio::test]
async fn given_expired_and_valid_entries_when_read_then_only_valid_returned() {
    // GIVEN: One expired and one valid entry
    let cache = TokenCache::new();
    cache
        .insert("expired", CachedToken::new("old", "Bearer", Instant::now(), Duration::ZERO))
        .await;
    cache
        .insert("valid", CachedToken::new("new", "Bearer", Instant::now(), DEFAULT_TOKEN_TTL))
        .await;

    // WHEN: Reading both
    let expired = cache.get("expired").await;
    let valid = cache.get("valid").await;

    // THEN: Only the valid one is served
    assert!(expired.is_none());
    assert_eq!(valid.unwrap().bearer(), "Bearer new");
}

/// **VALUE**: Verifies that inserting sweeps expired entries.
#[tokio::test]
async fn given_expired_entry_when_new_token_inserted_then_expired_swept() {
    let cache = TokenCache::new();
    cache
        .insert("a", CachedToken::new("old", "Bearer", Instant::now(), Duration::ZERO))
        .await;
    assert_eq!(cache.len().await, 1);

    cache
        .insert("b", CachedToken::new("new", "Bearer", Instant::now(), DEFAULT_TOKEN_TTL))
        .await;

    assert_eq!(cache.len().await, 1);
    assert!(cache.get("b").await.is_some());
}

/// **VALUE**: Verifies that clones share entries and removal is visible to all.
///
/// **WHY THIS MATTERS**: A cache handed to several sessions must act as one store.
#[tokio::test]
async fn given_cloned_cache_when_written_then_visible_through_clone() {
    let cache = TokenCache::new();
    let clone = cache.clone();

    clone
        .insert("k", CachedToken::new("v", "Bearer", Instant::now(), DEFAULT_TOKEN_TTL))
        .await;
    assert!(cache.get("k").await.is_some());

    assert!(cache.remove("k").await.is_some());
    assert!(clone.is_empty().await);
}

/// **VALUE**: Verifies that concurrent readers and writers always see a whole token.
///
/// **BUG THIS CATCHES**: Would catch the value and the type being stored in
/// separate slots that a reader could see half-updated.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_writers_when_reading_then_tokens_never_torn() {
    let cache = TokenCache::new();
    let mut tasks = Vec::new();

    for i in 0..16 {
        let cache = cache.clone();
        tasks.push(tokio::spawn(async move {
            let token = CachedToken::new(format!("token-{i}"), "Bearer", Instant::now(), DEFAULT_TOKEN_TTL);
            cache.insert("shared", token).await;
            for _ in 0..50 {
                let bearer = cache.get("shared").await.unwrap().bearer();
                let n: u32 = bearer.strip_prefix("Bearer token-").unwrap().parse().unwrap();
                assert!(n < 16);
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }
}

/// **VALUE**: Verifies `purge_expired` counts what it removed.
#[tokio::test]
async fn given_mixed_entries_when_purged_then_expired_count_returned() {
    // GIVEN: One long-lived and one short-lived token
    let cache = TokenCache::with_default_ttl(Duration::from_secs(5));
    cache
        .insert("valid", CachedToken::new("v", "Bearer", Instant::now(), Duration::from_secs(60)))
        .await;
    cache
        .insert("stale", CachedToken::new("s", "Bearer", Instant::now(), Duration::from_millis(50)))
        .await;

    // WHEN: The short one has expired
    tokio::time::sleep(Duration::from_millis(100)).await;

    // THEN: Exactly one entry is purged
    assert_eq!(cache.purge_expired().await, 1);
    assert_eq!(cache.len().await, 1);
    assert_eq!(cache.default_ttl(), Duration::from_secs(5));
}
