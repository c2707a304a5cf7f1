//! Token cache shared between concurrent callers.
//!
//! Entries are replaced whole under a write lock and cloned out under a read
//! lock, so a reader never sees a half-written token. Two callers that miss
//! at the same time may both log in; the later write wins.

use common::RedactedSecret;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use tokio::sync::RwLock;

/// Lifetime used when the login response carries no `expires_in`.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(10 * 60);

/// Upper bound on the lifetime taken from a login response.
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A bearer token and the instant it stops being usable.
#[derive(Debug, Clone)]
pub struct CachedToken {
    value: RedactedSecret,
    token_type: String,
    expires_at: Instant,
}

impl CachedToken {
    /// Token that expires `expires_in` after `received_at`, capped at
    /// [`MAX_TOKEN_LIFETIME`].
    pub fn new(
        value: impl Into<RedactedSecret>,
        token_type: impl Into<String>,
        received_at: Instant,
        expires_in: Duration,
    ) -> Self {
        let lifetime = expires_in.min(MAX_TOKEN_LIFETIME);

        Self {
            value: value.into(),
            token_type: token_type.into(),
            expires_at: received_at.checked_add(lifetime).unwrap_or(received_at),
        }
    }

    /// `Authorization` header value: `"<tokenType> <accessToken>"`.
    pub fn bearer(&self) -> String {
        format!("{} {}", self.token_type, self.value.expose())
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    pub fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Instant::now())
    }

    /// Time left before expiry (zero once expired).
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// Process-wide token store, keyed per credential.
///
/// Cheap to clone; clones share the same entries, so one cache can back
/// several sessions that use the same client id.
#[derive(Debug, Clone)]
pub struct TokenCache {
    entries: Arc<RwLock<HashMap<String, CachedToken>>>,
    default_ttl: Duration,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::with_default_ttl(DEFAULT_TOKEN_TTL)
    }

    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Valid token for `key`; expired entries read as absent.
    pub async fn get(&self, key: &str) -> Option<CachedToken> {
        let entries = self.entries.read().await;
        entries.get(key).filter(|token| token.is_valid()).cloned()
    }

    /// Store `token`, sweeping expired entries on the way.
    pub async fn insert(&self, key: impl Into<String>, token: CachedToken) {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, existing| existing.is_valid_at(now));
        if entries.len() < before {
            debug!("Swept {} expired token(s)", before - entries.len());
        }
        entries.insert(key.into(), token);
    }

    pub async fn remove(&self, key: &str) -> Option<CachedToken> {
        self.entries.write().await.remove(key)
    }

    /// Drop every expired entry; returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, token| token.is_valid_at(now));
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}
