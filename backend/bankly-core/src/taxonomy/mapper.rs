use super::catalog::ErrorKind;
use super::domain_error::DomainError;
use super::envelope::{ErrorEnvelope, TransferErrorEnvelope};
use super::hints::{CompiledHints, DEFAULT_PARAMETER_HINTS, INVALID_PARAMETER_CODE, ParameterHint};
use super::tables::ErrorFamily;

use std::borrow::Cow;
use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;

static DEFAULT_MAPPER: Lazy<ErrorMapper> = Lazy::new(ErrorMapper::new);

/// Translates upstream error codes into [`DomainError`]s.
///
/// Mapping runs in two stages: overloaded codes are normalized using the
/// accompanying messages, then the result is looked up in the family tables.
/// Lookups never fail; unknown codes become a 409 [`DomainError`] carrying
/// the upstream text.
#[derive(Debug, Clone)]
pub struct ErrorMapper {
    hints: Arc<CompiledHints>,
}

impl ErrorMapper {
    pub fn new() -> Self {
        Self::with_hints(DEFAULT_PARAMETER_HINTS)
    }

    /// Mapper using a custom `INVALID_PARAMETER` hint list.
    pub fn with_hints(hints: &[ParameterHint]) -> Self {
        Self {
            hints: Arc::new(CompiledHints::compile(hints)),
        }
    }

    /// Shared mapper with the default hints.
    pub fn shared() -> &'static ErrorMapper {
        &*DEFAULT_MAPPER
    }

    /// Replace an overloaded upstream code with the precise catalog key the
    /// messages point at. Other codes pass through unchanged.
    pub fn normalize_code<'a, S: AsRef<str>>(&self, code: &'a str, messages: &[S]) -> Cow<'a, str> {
        let code = code.trim();
        if code != INVALID_PARAMETER_CODE || messages.is_empty() {
            return Cow::Borrowed(code);
        }

        self.hints.disambiguate(messages)
    }

    /// Map `code` searching every family table.
    pub fn find_error<S: AsRef<str>>(&self, code: &str, messages: &[S]) -> DomainError {
        let normalized = self.normalize_code(code, messages);
        match ErrorFamily::resolve_any(&normalized) {
            Some(kind) => found(kind, code, &normalized),
            None => DomainError::unmapped(code, messages),
        }
    }

    /// Map `code` for an endpoint of a known family.
    pub fn find_error_in<S: AsRef<str>>(
        &self,
        family: ErrorFamily,
        code: &str,
        messages: &[S],
    ) -> DomainError {
        let normalized = self.normalize_code(code, messages);
        match family.resolve(&normalized) {
            Some(kind) => found(kind, code, &normalized),
            None => DomainError::unmapped(code, messages),
        }
    }

    /// Map a generic envelope; `None` if it names no code at all.
    pub fn find_envelope_error(
        &self,
        family: ErrorFamily,
        envelope: &ErrorEnvelope,
    ) -> Option<DomainError> {
        let entry = envelope.primary()?;
        Some(self.find_error_in(family, &entry.code, &entry.all_messages()))
    }

    /// Map a transfer envelope.
    ///
    /// Pairs are keyed on `key`; the first pair that resolves wins. If none
    /// resolves, the result is the 409 fallback for the first key with every
    /// value as a message. An envelope with neither pairs nor a top-level
    /// code maps to [`UNKNOWN_ERROR_KEY`](super::UNKNOWN_ERROR_KEY).
    pub fn find_transfer_error(&self, envelope: &TransferErrorEnvelope) -> DomainError {
        let entries = envelope.entries();

        for entry in &entries {
            let messages: Vec<&str> = entry.value.as_deref().into_iter().collect();
            let normalized = self.normalize_code(&entry.key, &messages);
            if let Some(kind) = ErrorFamily::Transfer.resolve(&normalized) {
                return found(kind, &entry.key, &normalized);
            }
        }

        let values: Vec<&str> = entries.iter().filter_map(|e| e.value.as_deref()).collect();
        let first_key = entries.first().map(|e| e.key.as_str()).unwrap_or_default();
        DomainError::unmapped(first_key, &values)
    }
}

impl Default for ErrorMapper {
    fn default() -> Self {
        Self::new()
    }
}

fn found(kind: ErrorKind, code: &str, normalized: &str) -> DomainError {
    if code.trim() != normalized {
        debug!("Upstream code {} normalized to {} ({})", code, normalized, kind);
    }
    DomainError::from_kind(kind)
}

/// [`ErrorMapper::find_error`] with the default hints.
pub fn find_error<S: AsRef<str>>(code: &str, messages: &[S]) -> DomainError {
    DEFAULT_MAPPER.find_error(code, messages)
}

/// [`ErrorMapper::find_error_in`] with the default hints.
pub fn find_error_in<S: AsRef<str>>(family: ErrorFamily, code: &str, messages: &[S]) -> DomainError {
    DEFAULT_MAPPER.find_error_in(family, code, messages)
}

/// [`ErrorMapper::find_transfer_error`] with the default hints.
pub fn find_transfer_error(envelope: &TransferErrorEnvelope) -> DomainError {
    DEFAULT_MAPPER.find_transfer_error(envelope)
}
