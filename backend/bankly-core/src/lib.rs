pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod logger;
pub mod taxonomy;

#[cfg(test)]
mod tests;

pub use auth::TokenProvider;
pub use auth::cache::{CachedToken, DEFAULT_TOKEN_TTL, MAX_TOKEN_LIFETIME, TokenCache};
pub use client::{BanklyClient, NO_BODY, OutboundRequest, decode_json};
pub use config::{Environment, Session, SessionConfig};
pub use context::RequestContext;
pub use error::{BanklyError, ConfigError, LoginError, TransportError};
pub use taxonomy::{
    DomainError, ErrorFamily, ErrorHandler, ErrorKind, FamilyErrorHandler, ResponseFailure,
    TransferErrorHandler, find_error, find_error_in, find_transfer_error,
};

pub const SANDBOX_LOGIN_HOSTNAME: &str = "login.sandbox.bankly.com.br";
pub const SANDBOX_API_HOSTNAME: &str = "api.sandbox.bankly.com.br";
pub const PRODUCTION_LOGIN_HOSTNAME: &str = "login.bankly.com.br";
pub const PRODUCTION_API_HOSTNAME: &str = "api.bankly.com.br";

pub const SANDBOX_LOGIN_ENDPOINT: &str =
    const_format::concatcp!("https://", SANDBOX_LOGIN_HOSTNAME, "/");
pub const SANDBOX_API_ENDPOINT: &str =
    const_format::concatcp!("https://", SANDBOX_API_HOSTNAME, "/");
pub const PRODUCTION_LOGIN_ENDPOINT: &str =
    const_format::concatcp!("https://", PRODUCTION_LOGIN_HOSTNAME, "/");
pub const PRODUCTION_API_ENDPOINT: &str =
    const_format::concatcp!("https://", PRODUCTION_API_HOSTNAME, "/");

pub const DEFAULT_API_VERSION: &str = "1.0";

pub const USER_AGENT: &str =
    const_format::concatcp!("bankly-core/", env!("CARGO_PKG_VERSION"));
