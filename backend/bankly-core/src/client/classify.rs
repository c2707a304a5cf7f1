use crate::taxonomy::ErrorKind;

use common::HttpStatusCode;

/// How the pipeline treats a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Hand the raw response to the caller.
    Success,
    /// Uniform failure, decided without looking at the body.
    Failure(ErrorKind),
    /// Everything else goes to the resource's error handler.
    Delegate,
}

/// Status-only classification. 404/403/504 are decided here so resource
/// handlers never see them.
pub fn classify(status: HttpStatusCode) -> Classification {
    match status.as_u16() {
        200 | 201 | 202 | 204 => Classification::Success,
        404 => Classification::Failure(ErrorKind::EntryNotFound),
        403 => Classification::Failure(ErrorKind::ServiceForbidden),
        504 => Classification::Failure(ErrorKind::GatewayTimeout),
        _ => Classification::Delegate,
    }
}
