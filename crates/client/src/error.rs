//! Errors raised while constructing a client.
//!
//! Call outcomes are never errors; they are [`common::Envelope`]s.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL '{0}' cannot carry a path")]
    OpaqueBaseUrl(String),

    #[error("invalid timeout '{0}': expected milliseconds greater than zero")]
    InvalidTimeout(String),

    #[error("invalid request path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
