//! Per-resource error handlers plugged into the request pipeline.
//!
//! The pipeline classifies 404/403/504 itself; a handler only sees the
//! remaining non-success responses and turns their body into a
//! [`DomainError`].

use super::domain_error::DomainError;
use super::envelope::{ErrorEnvelope, TransferErrorEnvelope};
use super::mapper::ErrorMapper;
use super::tables::ErrorFamily;

use common::HttpStatusCode;

use reqwest::Method;

/// A non-success response, as seen by an [`ErrorHandler`].
#[derive(Debug, Clone)]
pub struct ResponseFailure {
    pub method: Method,
    pub path: String,
    pub status: HttpStatusCode,
    pub body: String,
}

/// Turns a failed response into a [`DomainError`].
///
/// Implemented for closures, so a resource client can add endpoint context
/// before delegating to the shared mapper:
///
/// ```rust,ignore
/// let client = client.with_error_handler(|failure: &ResponseFailure| {
///     log::warn!("boleto call {} failed", failure.path);
///     FamilyErrorHandler::new(ErrorFamily::Generic).handle(failure)
/// });
/// ```
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, failure: &ResponseFailure) -> DomainError;
}

impl<F> ErrorHandler for F
where
    F: Fn(&ResponseFailure) -> DomainError + Send + Sync,
{
    fn handle(&self, failure: &ResponseFailure) -> DomainError {
        self(failure)
    }
}

/// Parses the generic envelope and maps it within one family.
#[derive(Debug, Clone)]
pub struct FamilyErrorHandler {
    family: ErrorFamily,
    mapper: ErrorMapper,
}

impl FamilyErrorHandler {
    pub fn new(family: ErrorFamily) -> Self {
        Self {
            family,
            mapper: ErrorMapper::shared().clone(),
        }
    }

    pub fn with_mapper(family: ErrorFamily, mapper: ErrorMapper) -> Self {
        Self { family, mapper }
    }

    pub fn family(&self) -> ErrorFamily {
        self.family
    }
}

impl ErrorHandler for FamilyErrorHandler {
    fn handle(&self, failure: &ResponseFailure) -> DomainError {
        ErrorEnvelope::from_slice(failure.body.as_bytes())
            .ok()
            .and_then(|envelope| self.mapper.find_envelope_error(self.family, &envelope))
            .unwrap_or_else(|| DomainError::unexpected_response(failure.status, &failure.body))
    }
}

/// Parses the transfer envelope (`{errors: [{key, value}], code, message}`).
#[derive(Debug, Clone)]
pub struct TransferErrorHandler {
    mapper: ErrorMapper,
}

impl TransferErrorHandler {
    pub fn new() -> Self {
        Self {
            mapper: ErrorMapper::shared().clone(),
        }
    }

    pub fn with_mapper(mapper: ErrorMapper) -> Self {
        Self { mapper }
    }
}

impl Default for TransferErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorHandler for TransferErrorHandler {
    fn handle(&self, failure: &ResponseFailure) -> DomainError {
        match TransferErrorEnvelope::from_slice(failure.body.as_bytes()) {
            Ok(envelope) if !envelope.entries().is_empty() => {
                self.mapper.find_transfer_error(&envelope)
            }
            _ => DomainError::unexpected_response(failure.status, &failure.body),
        }
    }
}
