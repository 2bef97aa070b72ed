//! Closed failure taxonomy.

use serde::{Deserialize, Serialize};

/// Stable machine-readable code describing a failure category.
///
/// Each code maps to exactly one conventional HTTP status so generic
/// transport tooling behaves sensibly, but application code reads the code
/// from the envelope, never the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request is malformed.
    BadRequest,
    /// The request is well-formed but violates a domain rule.
    ValidationError,
    /// The request conflicts with the current state of a resource.
    Conflict,
    /// An unexpected failure occurred.
    InternalError,
    /// The call did not complete within the configured timeout.
    Timeout,
    /// No response was received from the server.
    NetworkError,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [ErrorCode; 9] = [
        ErrorCode::Unauthorized,
        ErrorCode::Forbidden,
        ErrorCode::NotFound,
        ErrorCode::BadRequest,
        ErrorCode::ValidationError,
        ErrorCode::Conflict,
        ErrorCode::InternalError,
        ErrorCode::Timeout,
        ErrorCode::NetworkError,
    ];

    /// Conventional HTTP status for this code.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::BadRequest => 400,
            ErrorCode::Unauthorized => 401,
            ErrorCode::Forbidden => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::Timeout => 408,
            ErrorCode::Conflict => 409,
            ErrorCode::ValidationError => 422,
            ErrorCode::InternalError => 500,
            ErrorCode::NetworkError => 503,
        }
    }

    /// Code for a failure status whose body carried no envelope.
    ///
    /// Only the conventional statuses are recognised; anything else is an
    /// internal error.
    pub fn from_status(status: u16) -> ErrorCode {
        match status {
            400 => ErrorCode::BadRequest,
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            _ => ErrorCode::InternalError,
        }
    }

    /// Fallback message used when a failure carries no message of its own.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "Unauthorized, please log in again",
            ErrorCode::Forbidden => "You do not have permission to perform this action",
            ErrorCode::NotFound => "The requested resource was not found",
            ErrorCode::BadRequest => "Bad request",
            ErrorCode::ValidationError => "The request failed validation",
            ErrorCode::Conflict => "The request conflicts with the current state of the resource",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::Timeout => "The request timed out",
            ErrorCode::NetworkError => "Network error, please check your connection",
        }
    }

    /// Returns true for codes produced by the client without a server response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ErrorCode::Timeout | ErrorCode::NetworkError)
    }

    /// Wire name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::NetworkError => "NETWORK_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
