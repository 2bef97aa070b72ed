//! Issues HTTP calls and resolves every outcome to an [`Envelope`].
//!
//! Transport failures, non-envelope error responses and undecodable bodies
//! are all turned into failure envelopes here, so callers only ever branch
//! on [`Envelope::is_success`] and the error code.

use std::error::Error as _;
use std::sync::Arc;
use std::time::Duration;

use common::{Envelope, ErrorCode};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::query::QueryParams;

/// A file sent as a single multipart field.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

enum Payload {
    Empty,
    Json(Vec<u8>),
    Multipart(Form),
}

/// Sends calls to the configured server.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct RequestExecutor {
    client: Client,
    config: Arc<ClientConfig>,
}

impl RequestExecutor {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&QueryParams>,
    ) -> Envelope<T> {
        self.dispatch(Method::GET, path, params, Ok(Payload::Empty), self.config.timeout())
            .await
    }

    pub async fn post<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        params: Option<&QueryParams>,
    ) -> Envelope<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(Method::POST, path, params, json_payload(body), self.config.timeout())
            .await
    }

    pub async fn put<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        params: Option<&QueryParams>,
    ) -> Envelope<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(Method::PUT, path, params, json_payload(body), self.config.timeout())
            .await
    }

    pub async fn patch<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        params: Option<&QueryParams>,
    ) -> Envelope<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(Method::PATCH, path, params, json_payload(body), self.config.timeout())
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&QueryParams>,
    ) -> Envelope<T> {
        self.dispatch(Method::DELETE, path, params, Ok(Payload::Empty), self.config.timeout())
            .await
    }

    /// Posts `file` as the multipart field `field`, waiting twice the usual
    /// timeout.
    pub async fn upload_file<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file: FileUpload,
        params: Option<&QueryParams>,
    ) -> Envelope<T> {
        let payload = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map(|part| Payload::Multipart(Form::new().part(field.to_string(), part)))
            .map_err(|err| {
                format!("Invalid upload content type '{}': {err}", file.content_type)
            });
        self.dispatch(Method::POST, path, params, payload, self.config.upload_timeout())
            .await
    }

    /// Joins `path` under the base URL and appends the sent query entries.
    ///
    /// # Errors
    ///
    /// Returns an error when `path` does not resolve to a location under the
    /// base URL.
    pub fn build_url(&self, path: &str, params: Option<&QueryParams>) -> Result<Url> {
        let base = self.config.base_url();
        let invalid = |reason: String| ClientError::InvalidPath {
            path: path.to_string(),
            reason,
        };

        let mut url = base
            .join(path.trim_start_matches('/'))
            .map_err(|err| invalid(err.to_string()))?;
        if url.origin() != base.origin() || !url.path().starts_with(base.path()) {
            return Err(invalid("path escapes the base URL".to_string()));
        }

        let pairs = params.map(QueryParams::pairs).unwrap_or_default();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    #[tracing::instrument(name = "api_call", skip_all, fields(method = %method, path = %path))]
    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        payload: std::result::Result<Payload, String>,
        timeout: Duration,
    ) -> Envelope<T> {
        let envelope = match payload {
            Ok(payload) => self.execute(method, path, params, payload, timeout).await,
            Err(message) => Envelope::error(ErrorCode::BadRequest, message),
        };

        match envelope.error_detail() {
            None => tracing::debug!(outcome = "OK", "call succeeded"),
            Some(error) => tracing::warn!(
                outcome = %error.code(),
                detail = error.message(),
                "call failed"
            ),
        }
        envelope
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        payload: Payload,
        timeout: Duration,
    ) -> Envelope<T> {
        let url = match self.build_url(path, params) {
            Ok(url) => url,
            Err(err) => return Envelope::error(ErrorCode::BadRequest, err.to_string()),
        };

        let mut request = self
            .client
            .request(method, url)
            .timeout(timeout)
            .header(ACCEPT, "application/json");
        if let Some(token) = self.config.credentials().and_then(|c| c.bearer_token()) {
            request = request.bearer_auth(token);
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Json(bytes) => request.header(CONTENT_TYPE, "application/json").body(bytes),
            Payload::Multipart(form) => request.multipart(form),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return transport_failure(&err),
        };
        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => return transport_failure(&err),
        };

        if status.is_success() {
            decode_success(&body)
        } else {
            decode_failure(status, &body)
        }
    }
}

fn json_payload<B: Serialize + ?Sized>(body: Option<&B>) -> std::result::Result<Payload, String> {
    match body {
        None => Ok(Payload::Empty),
        Some(body) => serde_json::to_vec(body)
            .map(Payload::Json)
            .map_err(|err| format!("Invalid request body: {err}")),
    }
}

fn transport_failure<T>(err: &reqwest::Error) -> Envelope<T> {
    if err.is_timeout() {
        Envelope::error(ErrorCode::Timeout, ErrorCode::Timeout.default_message())
    } else if err.is_builder() {
        Envelope::error(ErrorCode::BadRequest, format!("Invalid request: {err}"))
    } else {
        Envelope::error(ErrorCode::NetworkError, transport_message(err))
    }
}

/// The error and its sources, outermost first.
fn transport_message(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn decode_success<T: DeserializeOwned>(body: &[u8]) -> Envelope<T> {
    serde_json::from_slice(body).unwrap_or_else(|err| {
        Envelope::error(
            ErrorCode::InternalError,
            format!("Invalid response payload: {err}"),
        )
    })
}

/// Failure bodies that are envelopes pass through; anything else is
/// classified by status alone.
fn decode_failure<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Envelope<T> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        if value.get("success") == Some(&serde_json::Value::Bool(false)) {
            if let Ok(envelope) = serde_json::from_value::<Envelope<T>>(value) {
                return envelope;
            }
        }
    }
    status_failure(status)
}

fn status_failure<T>(status: StatusCode) -> Envelope<T> {
    match status {
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::NOT_FOUND
        | StatusCode::INTERNAL_SERVER_ERROR => {
            let code = ErrorCode::from_status(status.as_u16());
            Envelope::error(code, code.default_message())
        }
        other => Envelope::error(
            ErrorCode::InternalError,
            format!(
                "Error {}: {}",
                other.as_u16(),
                other.canonical_reason().unwrap_or("Unknown")
            ),
        ),
    }
}
