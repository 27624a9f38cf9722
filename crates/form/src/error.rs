//! Error types for the form layer
//!
//! Field validation failures are data (entries in an [`ErrorMap`]), not
//! errors. `FormError` covers the few operations that can refuse a request.

use formstore_core::PathParseError;
use formstore_validation::{CheckTicket, ErrorMap};
use thiserror::Error;

/// Errors returned by form operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormError {
    /// Submit attempted while validation reports errors
    #[error("submit blocked by {} field error(s)", .errors.len())]
    SubmitBlocked {
        /// The error map produced by the submit-time validation
        errors: ErrorMap,
    },

    /// Every submit attempt was overtaken by a write to the record
    #[error("submit abandoned after {attempts} attempt(s): record kept changing during validation")]
    SubmitSuperseded {
        /// Validation passes that ran before giving up
        attempts: usize,
    },

    /// A path string failed to parse
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathParseError),

    /// An external check finished after a newer one was started
    #[error("stale check result for {ticket}")]
    StaleCheck {
        /// The ticket whose result was discarded
        ticket: CheckTicket,
    },
}

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;
