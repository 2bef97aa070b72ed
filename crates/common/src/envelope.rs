//! The universal response wrapper.
//!
//! Wire shape:
//! ```text
//! { "success": bool, "data": T | null, "message": string,
//!   "error": { "code", "message", "timestamp" } | null }
//! ```
//!
//! The outcome is held as a `Result`, so `success == (error == null)` and
//! `success == (data != null || T is void)` hold by construction. Decoding
//! rejects wire values that break either rule.

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::ErrorCode;

/// Error half of a failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    code: ErrorCode,
    message: String,
    #[serde(with = "iso8601_millis")]
    timestamp: DateTime<Utc>,
}

impl ErrorDetail {
    /// Creates an error detail stamped with the current instant.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::at(code, message, Utc::now())
    }

    /// Creates an error detail with an explicit timestamp.
    pub fn at(code: ErrorCode, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            code,
            message: message.into(),
            timestamp,
        }
    }

    /// Creates an error detail carrying the code's fallback message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// An already-formed failure: the envelope message plus its error detail.
///
/// Carrying a `Failure` through code keeps the original message, code and
/// timestamp intact when it is turned back into an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    message: String,
    error: ErrorDetail,
}

impl Failure {
    /// Creates a failure whose envelope message mirrors the error message.
    pub fn new(error: ErrorDetail) -> Self {
        Self {
            message: error.message.clone(),
            error,
        }
    }

    /// Creates a failure with a distinct envelope message.
    pub fn with_message(message: impl Into<String>, error: ErrorDetail) -> Self {
        Self {
            message: message.into(),
            error,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error(&self) -> &ErrorDetail {
        &self.error
    }

    pub fn code(&self) -> ErrorCode {
        self.error.code
    }

    /// Turns the failure into an envelope of any payload type.
    pub fn into_envelope<T>(self) -> Envelope<T> {
        Envelope {
            message: self.message,
            outcome: Err(self.error),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error.code, self.message)
    }
}

impl std::error::Error for Failure {}

/// Outcome of any operation, on either side of the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    message: String,
    outcome: Result<T, ErrorDetail>,
}

impl<T> Envelope<T> {
    /// Creates a successful envelope.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            outcome: Ok(data),
        }
    }

    /// Creates a failed envelope whose message mirrors the error message.
    pub fn failure(error: ErrorDetail) -> Self {
        Failure::new(error).into_envelope()
    }

    /// Creates a failed envelope stamped now with the given code and message.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::failure(ErrorDetail::new(code, message))
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the payload of a successful envelope.
    pub fn data(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    /// Returns the error detail of a failed envelope.
    pub fn error_detail(&self) -> Option<&ErrorDetail> {
        self.outcome.as_ref().err()
    }

    /// Returns the error code of a failed envelope.
    pub fn code(&self) -> Option<ErrorCode> {
        self.error_detail().map(ErrorDetail::code)
    }

    pub fn into_data(self) -> Option<T> {
        self.outcome.ok()
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self.outcome {
            Ok(data) => Ok(data),
            Err(error) => Err(Failure::with_message(self.message, error)),
        }
    }

    /// Maps the payload of a successful envelope, leaving failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            message: self.message,
            outcome: self.outcome.map(f),
        }
    }
}

impl<T> From<Failure> for Envelope<T> {
    fn from(failure: Failure) -> Self {
        failure.into_envelope()
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 4)?;
        match &self.outcome {
            Ok(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.serialize_field("message", &self.message)?;
                state.serialize_field("error", &Option::<&ErrorDetail>::None)?;
            }
            Err(error) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("data", &Option::<&T>::None)?;
                state.serialize_field("message", &self.message)?;
                state.serialize_field("error", &Some(error))?;
            }
        }
        state.end()
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    data: Value,
    message: String,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Envelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::deserialize(deserializer)?;
        match (raw.success, raw.error) {
            (true, Some(_)) => Err(D::Error::custom(
                "successful envelope must not carry an error",
            )),
            (true, None) => {
                let data = serde_json::from_value(raw.data)
                    .map_err(|e| D::Error::custom(format!("invalid envelope data: {e}")))?;
                Ok(Envelope::success(data, raw.message))
            }
            (false, None) => Err(D::Error::custom("failed envelope must carry an error")),
            (false, Some(error)) => {
                if !raw.data.is_null() {
                    return Err(D::Error::custom("failed envelope must not carry data"));
                }
                Ok(Failure::with_message(raw.message, error).into_envelope())
            }
        }
    }
}

mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
