//! Successful responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::Envelope;
use serde::Serialize;

/// A successful envelope together with its transport status.
#[derive(Debug)]
pub struct Reply<T>(pub StatusCode, pub Envelope<T>);

impl<T> Reply<T> {
    /// `200 OK` carrying `data`.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Reply(StatusCode::OK, Envelope::success(data, message))
    }

    /// `201 Created` carrying the new resource.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Reply(StatusCode::CREATED, Envelope::success(data, message))
    }
}

impl Reply<()> {
    /// `200 OK` with no payload.
    pub fn done(message: impl Into<String>) -> Self {
        Reply::ok((), message)
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        let Reply(status, envelope) = self;
        (status, Json(envelope)).into_response()
    }
}
