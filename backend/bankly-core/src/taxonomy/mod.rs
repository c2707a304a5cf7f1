//! Error taxonomy: the catalog, the lookup tables and the mapping between
//! upstream error vocabulary and [`DomainError`].

pub mod catalog;
pub mod domain_error;
pub mod envelope;
pub mod handler;
pub mod hints;
pub mod mapper;
pub mod tables;

pub use catalog::ErrorKind;
pub use domain_error::{DomainError, UNEXPECTED_RESPONSE_KEY, UNKNOWN_ERROR_KEY};
pub use envelope::{ErrorEntry, ErrorEnvelope, KeyValue, TransferErrorEnvelope};
pub use handler::{ErrorHandler, FamilyErrorHandler, ResponseFailure, TransferErrorHandler};
pub use hints::{DEFAULT_PARAMETER_HINTS, ParameterHint};
pub use mapper::{ErrorMapper, find_error, find_error_in, find_transfer_error};
pub use tables::ErrorFamily;
