//! The request pipeline: every outbound API call goes through
//! [`BanklyClient::execute`].

pub mod classify;
pub mod request;

pub use classify::{Classification, classify};
pub use request::{OutboundRequest, join_path};

use crate::USER_AGENT;
use crate::auth::TokenProvider;
use crate::config::Session;
use crate::context::RequestContext;
use crate::error::{BanklyError, ConfigError, TransportError};
use crate::taxonomy::{DomainError, ErrorFamily, ErrorHandler, FamilyErrorHandler, ResponseFailure};

use common::HttpStatusCode;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);
const API_VERSION_HEADER_KEY: &str = "api-version";
const CORRELATION_ID_HEADER_KEY: &str = "x-correlation-id";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Pass as `body` to [`BanklyClient::post`] / [`BanklyClient::patch`] for a
/// request without payload.
pub const NO_BODY: Option<&()> = None;

/// Authenticated client for the Bankly API.
///
/// Cloning is cheap: clones share the session, the token cache and the HTTP
/// connection pool. Resource clients usually hold one clone each, configured
/// with their own error handler:
///
/// ```rust,ignore
/// let cards = client.with_family(ErrorFamily::Card);
/// let response = cards.get(&ctx, "cards/document/123", &[], None).await?;
/// ```
#[derive(Clone)]
pub struct BanklyClient {
    session: Arc<Session>,
    http: Client,
    tokens: TokenProvider,
    error_handler: Option<Arc<dyn ErrorHandler>>,
}

impl fmt::Debug for BanklyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BanklyClient")
            .field("api_endpoint", &self.session.api_endpoint().as_str())
            .field("api_version", &self.session.api_version())
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}

impl BanklyClient {
    pub fn new(session: Session) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT_DURATION)
            .user_agent(USER_AGENT)
            .build()?;

        let tokens = TokenProvider::new(&session, http.clone());

        Ok(Self {
            session: Arc::new(session),
            http,
            tokens,
            error_handler: None,
        })
    }

    /// Clone of this client that maps non-uniform failures with `handler`.
    #[must_use]
    pub fn with_error_handler<H>(&self, handler: H) -> Self
    where
        H: ErrorHandler + 'static,
    {
        Self {
            error_handler: Some(Arc::new(handler)),
            ..self.clone()
        }
    }

    /// Clone of this client that maps failures through one error family.
    #[must_use]
    pub fn with_family(&self, family: ErrorFamily) -> Self {
        self.with_error_handler(FamilyErrorHandler::new(family))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token_provider(&self) -> &TokenProvider {
        &self.tokens
    }

    pub async fn get(
        &self,
        ctx: &RequestContext,
        path: &str,
        query: &[(&str, &str)],
        headers: Option<HeaderMap>,
    ) -> Result<Response, BanklyError> {
        self.request(ctx, Method::GET, path, NO_BODY, query, headers)
            .await
    }

    pub async fn post<B>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: Option<&B>,
        headers: Option<HeaderMap>,
    ) -> Result<Response, BanklyError>
    where
        B: Serialize + ?Sized,
    {
        self.request(ctx, Method::POST, path, body, &[], headers)
            .await
    }

    pub async fn patch<B>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: Option<&B>,
        headers: Option<HeaderMap>,
    ) -> Result<Response, BanklyError>
    where
        B: Serialize + ?Sized,
    {
        self.request(ctx, Method::PATCH, path, body, &[], headers)
            .await
    }

    /// Build an [`OutboundRequest`] and [`execute`](Self::execute) it.
    pub async fn request<B>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, &str)],
        headers: Option<HeaderMap>,
    ) -> Result<Response, BanklyError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = OutboundRequest::new(method, path).with_query(query);
        if let Some(body) = body {
            request = request.with_json_body(body)?;
        }
        if let Some(headers) = headers {
            request = request.with_headers(headers);
        }

        self.execute(ctx, request).await
    }

    /// Authenticate, dispatch and classify one request.
    ///
    /// # Errors
    ///
    /// - [`BanklyError::Authentication`] if no token could be obtained
    /// - [`BanklyError::Transport`] if the call did not complete, including cancellation
    /// - [`BanklyError::Domain`] for every status other than 200/201/202/204
    /// - [`BanklyError::Request`] if the URL or a header value is malformed
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        request: OutboundRequest,
    ) -> Result<Response, BanklyError> {
        if ctx.is_cancelled() {
            return Err(TransportError::cancelled().into());
        }

        let url = request.url(self.session.api_endpoint())?;
        let path = request.path().to_string();
        let token = self.tokens.token(ctx).await?;
        let headers = self.build_headers(ctx, &token, &request)?;

        let (method, _, body) = request.into_parts();
        debug!("{} {}", method, url);

        let mut builder = self.http.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(TransportError::cancelled().into()),
            result = builder.send() => result.map_err(TransportError::from)?,
        };

        let status = HttpStatusCode(response.status().as_u16());

        match classify(status) {
            Classification::Success => {
                debug!("{} {} -> {}", method, path, status);
                Ok(response)
            }
            Classification::Failure(kind) => {
                warn!("{} {} -> {} ({})", method, path, status, kind);
                Err(DomainError::from(kind).into())
            }
            Classification::Delegate => {
                let body = tokio::select! {
                    biased;
                    _ = ctx.cancelled() => return Err(TransportError::cancelled().into()),
                    result = response.text() => result.map_err(TransportError::from)?,
                };

                let failure = ResponseFailure {
                    method,
                    path,
                    status,
                    body,
                };
                let error = match &self.error_handler {
                    Some(handler) => handler.handle(&failure),
                    None => DomainError::unexpected_response(failure.status, &failure.body),
                };

                warn!(
                    "{} {} -> {} mapped to {}",
                    failure.method,
                    failure.path,
                    failure.status,
                    error.key()
                );
                Err(error.into())
            }
        }
    }

    /// Default headers first, then the caller's; a caller header replaces
    /// every default value of the same name.
    fn build_headers(
        &self,
        ctx: &RequestContext,
        token: &str,
        request: &OutboundRequest,
    ) -> Result<HeaderMap, BanklyError> {
        let mut headers = HeaderMap::new();

        let mut authorization = HeaderValue::from_str(token)
            .map_err(|e| BanklyError::request(format!("token is not a valid header value: {e}")))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        headers.insert(
            HeaderName::from_static(API_VERSION_HEADER_KEY),
            HeaderValue::from_str(self.session.api_version()).map_err(|e| {
                BanklyError::request(format!("api version is not a valid header value: {e}"))
            })?,
        );

        if request.has_body() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }

        if let Some(id) = ctx.correlation_id() {
            headers.insert(
                HeaderName::from_static(CORRELATION_ID_HEADER_KEY),
                HeaderValue::from_str(&id.to_string()).map_err(|e| {
                    BanklyError::request(format!("correlation id is not a valid header value: {e}"))
                })?,
            );
        }

        for name in request.headers().keys() {
            headers.remove(name);
        }
        for (name, value) in request.headers() {
            headers.append(name.clone(), value.clone());
        }

        Ok(headers)
    }
}

/// Decode a success body. An empty body decodes as JSON `null`, so `()` and
/// `Option<T>` work for 204 responses.
pub async fn decode_json<T>(response: Response) -> Result<T, BanklyError>
where
    T: DeserializeOwned,
{
    let bytes = response.bytes().await.map_err(TransportError::from)?;
    let slice: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };

    serde_json::from_slice(slice)
        .map_err(|e| BanklyError::decode(format!("response body did not decode: {e}")))
}
