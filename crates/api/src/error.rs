//! API error type and the boundary that turns it into an envelope.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::{Envelope, ErrorCode, ErrorDetail, Failure};
use domain::DomainError;
use store::StoreError;
use thiserror::Error;

/// Every failure a handler can return.
///
/// Each variant declares its [`ErrorCode`]; [`normalize`] is the only place
/// where one becomes a response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A failure that is already envelope-shaped. Passed through unchanged.
    #[error("{0}")]
    Enveloped(Failure),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Json(#[from] JsonRejection),

    #[error(transparent)]
    Path(#[from] PathRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error(transparent)]
    MultipartRejection(#[from] MultipartRejection),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// Anything that did not classify itself.
    #[error(transparent)]
    Unclassified(Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
    pub fn unclassified(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ApiError::Unclassified(err.into())
    }

    /// Error classification for the envelope.
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Enveloped(failure) => failure.code(),
            ApiError::Domain(err) => err.code(),
            ApiError::Store(err) => err.code(),
            ApiError::BadRequest(_)
            | ApiError::Json(_)
            | ApiError::Path(_)
            | ApiError::Query(_)
            | ApiError::MultipartRejection(_)
            | ApiError::Multipart(_) => ErrorCode::BadRequest,
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::Unauthorized(_) => ErrorCode::Unauthorized,
            ApiError::Unclassified(_) => ErrorCode::InternalError,
        }
    }

    /// Message carried by the failure itself, separate from its `Display`.
    fn structured_message(&self) -> Option<String> {
        match self {
            ApiError::Json(rejection) => Some(rejection.body_text()),
            ApiError::Path(rejection) => Some(rejection.body_text()),
            ApiError::Query(rejection) => Some(rejection.body_text()),
            ApiError::MultipartRejection(rejection) => Some(rejection.body_text()),
            ApiError::Multipart(err) => Some(err.body_text()),
            _ => None,
        }
    }

    /// Structured message, else `Display`, else the code's fallback.
    fn message(&self) -> String {
        [self.structured_message(), Some(self.to_string())]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.code().default_message().to_string())
    }
}

impl From<Failure> for ApiError {
    fn from(failure: Failure) -> Self {
        ApiError::Enveloped(failure)
    }
}

/// Converts a failure into its transport status and envelope.
///
/// An already enveloped failure keeps its message, code, and timestamp.
/// Everything else is stamped now.
pub fn normalize(err: ApiError) -> (StatusCode, Envelope<()>) {
    let code = err.code();
    let envelope = match err {
        ApiError::Enveloped(failure) => failure.into_envelope(),
        other => Envelope::failure(ErrorDetail::new(code, other.message())),
    };

    if code == ErrorCode::InternalError {
        tracing::error!(code = code.as_str(), detail = envelope.message(), "request failed");
    } else {
        tracing::warn!(code = code.as_str(), detail = envelope.message(), "request failed");
    }
    metrics::counter!("api_errors_total", "code" => code.as_str()).increment(1);

    let status =
        StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, envelope)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = normalize(self);
        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use domain::{OrderError, OrderStatus};

    use super::*;

    #[test]
    fn enveloped_failure_passes_through_unchanged() {
        let at = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
        let failure = Failure::with_message(
            "Upstream said no",
            ErrorDetail::at(ErrorCode::Forbidden, "Not yours", at),
        );

        let (status, envelope) = normalize(ApiError::from(failure));

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(envelope.message(), "Upstream said no");
        let detail = envelope.error_detail().unwrap();
        assert_eq!(detail.code(), ErrorCode::Forbidden);
        assert_eq!(detail.message(), "Not yours");
        assert_eq!(detail.timestamp(), at);
    }

    #[test]
    fn domain_failures_keep_their_classification() {
        let err = ApiError::from(DomainError::from(OrderError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        }));
        let (status, envelope) = normalize(err);

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(envelope.code(), Some(ErrorCode::ValidationError));
        assert!(envelope.message().contains("delivered"));
    }

    #[test]
    fn store_failures_map_to_not_found_and_conflict() {
        let (status, _) = normalize(StoreError::not_found("Order", "x").into());
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, envelope) = normalize(StoreError::Conflict("in use".into()).into());
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(envelope.message(), "in use");
    }

    #[test]
    fn blank_message_falls_back_to_code_default() {
        let (status, envelope) = normalize(ApiError::Unauthorized(String::new()));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            envelope.message(),
            ErrorCode::Unauthorized.default_message()
        );
    }

    #[test]
    fn unclassified_failures_are_internal_errors() {
        let io = std::io::Error::other("disk on fire");
        let (status, envelope) = normalize(ApiError::unclassified(io));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.code(), Some(ErrorCode::InternalError));
        assert_eq!(envelope.message(), "disk on fire");
        assert!(!envelope.is_success());
    }
}
