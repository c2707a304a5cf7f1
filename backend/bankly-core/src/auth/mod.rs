//! OAuth2 client-credentials token provider.
//!
//! ```text
//! {NoToken} --login--> {Cached, valid until expires_at} --expiry--> {NoToken}
//! ```

pub mod cache;

use crate::config::Session;
use crate::context::RequestContext;
use crate::error::login::LoginError;
use cache::{CachedToken, TokenCache};

use common::{HttpStatusCode, RedactedSecret};

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use url::Url;
use url::form_urlencoded;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const GRANT_TYPE: &str = "client_credentials";
const DEFAULT_TOKEN_TYPE: &str = "Bearer";

// ============================================
// WIRE TYPES
// ============================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(alias = "accessToken")]
    access_token: RedactedSecret,
    #[serde(default, alias = "expiresIn")]
    expires_in: Option<u64>,
    #[serde(default, alias = "tokenType")]
    token_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoginErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

// ============================================
// PROVIDER
// ============================================

/// Exchanges the session's client credentials for a bearer token and keeps it
/// in the session's [`TokenCache`] until it expires.
///
/// Clones share the cache, so concurrent callers reuse one token.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    token_url: Url,
    client_id: String,
    client_secret: RedactedSecret,
    scope: Option<String>,
    http: Client,
    cache: TokenCache,
    cache_key: String,
}

impl TokenProvider {
    pub fn new(session: &Session, http: Client) -> Self {
        let scope = session.scope().map(str::to_string);
        let cache_key = format!(
            "{}#{}#{}",
            session.token_url(),
            session.client_id(),
            scope.as_deref().unwrap_or_default()
        );

        Self {
            token_url: session.token_url().clone(),
            client_id: session.client_id().to_string(),
            client_secret: session.client_secret().clone(),
            scope,
            http,
            cache: session.token_cache().clone(),
            cache_key,
        }
    }

    /// `"<tokenType> <accessToken>"`, from cache when still valid.
    ///
    /// # Errors
    ///
    /// - [`LoginError::Rejected`] when the login endpoint answers 400
    /// - [`LoginError::UnexpectedStatus`] for any other non-200 answer
    /// - [`LoginError::Transport`] when the endpoint cannot be reached
    /// - [`LoginError::Cancelled`] when `ctx` is cancelled first
    pub async fn token(&self, ctx: &RequestContext) -> Result<String, LoginError> {
        if ctx.is_cancelled() {
            return Err(LoginError::cancelled());
        }

        if let Some(cached) = self.cache.get(&self.cache_key).await {
            debug!(
                "Token cache hit for client {} ({}s left)",
                self.client_id,
                cached.remaining().as_secs()
            );
            return Ok(cached.bearer());
        }

        let token = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(LoginError::cancelled()),
            result = self.login() => result?,
        };

        let bearer = token.bearer();
        if token.is_valid() {
            self.cache.insert(self.cache_key.clone(), token).await;
        } else {
            debug!("Token for client {} already expired, not cached", self.client_id);
        }

        Ok(bearer)
    }

    /// Drop the cached token so the next [`token`](Self::token) call logs in again.
    pub async fn invalidate(&self) {
        if self.cache.remove(&self.cache_key).await.is_some() {
            debug!("Token for client {} invalidated", self.client_id);
        }
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    fn form_body(&self) -> String {
        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("grant_type", GRANT_TYPE)
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", self.client_secret.expose());
        if let Some(scope) = &self.scope {
            form.append_pair("scope", scope);
        }
        form.finish()
    }

    async fn login(&self) -> Result<CachedToken, LoginError> {
        debug!("Requesting token from {}", self.token_url);

        let response = self
            .http
            .post(self.token_url.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(ACCEPT, "application/json")
            .body(self.form_body())
            .send()
            .await
            .map_err(LoginError::transport)?;

        let received_at = Instant::now();
        let status = HttpStatusCode(response.status().as_u16());
        let body = response.text().await.map_err(LoginError::transport)?;

        match status {
            HttpStatusCode::OK => {
                let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| {
                    LoginError::invalid_response(format!("token response did not parse: {e}"))
                })?;

                if parsed.access_token.is_blank() {
                    return Err(LoginError::invalid_response("token response has no access_token"));
                }

                let expires_in = parsed
                    .expires_in
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| self.cache.default_ttl());
                let token_type = parsed
                    .token_type
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string());

                info!(
                    "Token acquired for client {} (expires in {}s)",
                    self.client_id,
                    expires_in.as_secs()
                );

                Ok(CachedToken::new(
                    parsed.access_token,
                    token_type,
                    received_at,
                    expires_in,
                ))
            }
            HttpStatusCode::BAD_REQUEST => {
                let parsed: LoginErrorBody = serde_json::from_str(&body).unwrap_or_default();
                let message = parsed
                    .error
                    .or(parsed.error_description)
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(body);
                warn!("Login rejected for client {}: {}", self.client_id, message);
                Err(LoginError::rejected(message))
            }
            other => {
                warn!("Login failed for client {}: HTTP {}", self.client_id, other);
                Err(LoginError::unexpected_status(other.as_u16(), body))
            }
        }
    }
}
