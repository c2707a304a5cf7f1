use crate::error::BanklyError;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

/// One outbound API call, built fresh per request and consumed by
/// [`BanklyClient::execute`](super::BanklyClient::execute).
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl OutboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn with_query<K, V>(mut self, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.query.extend(
            pairs
                .iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())),
        );
        self
    }

    /// Merge caller headers; they replace the pipeline defaults of the same name.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in &headers {
            self.headers.append(name.clone(), value.clone());
        }
        self
    }

    /// Add one header from strings.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, BanklyError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| BanklyError::request(format!("invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| BanklyError::request(format!("invalid value for header '{name}': {e}")))?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Serialize `body` as the JSON payload.
    pub fn with_json_body<B>(mut self, body: &B) -> Result<Self, BanklyError>
    where
        B: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| BanklyError::request(format!("body did not serialize: {e}")))?;
        self.body = Some(bytes);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Absolute URL of this request under `base`, query applied.
    pub fn url(&self, base: &Url) -> Result<Url, BanklyError> {
        let mut url = join_path(base, &self.path)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    pub(crate) fn into_parts(self) -> (Method, HeaderMap, Option<Vec<u8>>) {
        (self.method, self.headers, self.body)
    }
}

/// Join `path` under `base` so that exactly one `/` separates them.
///
/// `https://api.example.com/v2` and `https://api.example.com/v2/` joined with
/// `cards/1` or `/cards/1` all give `https://api.example.com/v2/cards/1`.
///
/// # Errors
///
/// [`BanklyError::Request`] if `path` contains a `.` or `..` segment, plain or
/// percent-encoded: the result always stays under `base`.
pub fn join_path(base: &Url, path: &str) -> Result<Url, BanklyError> {
    let path_part = path.split(['?', '#']).next().unwrap_or_default();
    if let Some(segment) = path_part.split(['/', '\\']).find(|s| is_dot_segment(s)) {
        return Err(BanklyError::request(format!(
            "path '{path}' contains dot segment '{segment}'"
        )));
    }

    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }

    // "./" keeps a path segment containing ':' from parsing as a scheme.
    let relative = format!("./{}", path.trim_start_matches('/'));
    Ok(base.join(&relative)?)
}

fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}
