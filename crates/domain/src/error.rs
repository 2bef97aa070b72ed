//! Domain error types.

use common::ErrorCode;
use thiserror::Error;

use crate::order::OrderError;

/// Errors that can occur during domain operations.
///
/// Each error classifies itself at the point of detection through
/// [`DomainError::code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// An error occurred in the order entity.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// A field of catalog or customer data failed validation.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

impl DomainError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        DomainError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Error classification for the envelope.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Order(err) => err.code(),
            DomainError::Validation { .. } => ErrorCode::ValidationError,
        }
    }
}

/// Fails with a validation error when `value` is blank.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be blank"));
    }
    Ok(())
}

/// Trims optional free text, dropping it when blank.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
