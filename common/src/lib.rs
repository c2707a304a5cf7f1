//! Shared building blocks for the Bankly SDK.
//!
//! This crate holds the small value types every other crate in the
//! workspace leans on. They carry no HTTP or banking logic.
//!
//! ## Architecture
//!
//! - **common** (this crate): error location tracking, status codes, secrets
//! - **bankly-core**: session, token provider, request pipeline, error taxonomy
//!
//! Keeping these types here lets error enums in any crate share one
//! location format and one status code representation.

pub mod error;
pub mod http_status;
pub mod redacted_secret;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;

#[cfg(test)]
mod tests;
