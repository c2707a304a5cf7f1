//! HTTP status codes carried as data on errors.

/// HTTP status code attached to an error.
///
/// Stored directly rather than parsed from error messages, so callers can
/// branch on it without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub const OK: HttpStatusCode = HttpStatusCode(200);
    pub const BAD_REQUEST: HttpStatusCode = HttpStatusCode(400);
    pub const FORBIDDEN: HttpStatusCode = HttpStatusCode(403);
    pub const NOT_FOUND: HttpStatusCode = HttpStatusCode(404);
    pub const CONFLICT: HttpStatusCode = HttpStatusCode(409);
    pub const UNPROCESSABLE_ENTITY: HttpStatusCode = HttpStatusCode(422);
    pub const TOO_MANY_REQUESTS: HttpStatusCode = HttpStatusCode(429);
    pub const INTERNAL_SERVER_ERROR: HttpStatusCode = HttpStatusCode(500);
    pub const SERVICE_UNAVAILABLE: HttpStatusCode = HttpStatusCode(503);
    pub const GATEWAY_TIMEOUT: HttpStatusCode = HttpStatusCode(504);

    /// Raw numeric code.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// 4xx client errors.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx server errors.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
