//! HTTP client for the storefront API.
//!
//! Every call resolves to a [`common::Envelope`]: server failures, timeouts,
//! unreachable hosts and malformed responses all arrive as failure
//! envelopes with an [`common::ErrorCode`]. Only building the client can
//! fail with a [`ClientError`].

pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod query;
pub mod services;

pub use config::ClientConfig;
pub use credentials::{CredentialProvider, StaticToken};
pub use error::ClientError;
pub use executor::{FileUpload, RequestExecutor};
pub use query::{QueryParams, QueryValue};
pub use services::{CustomerService, OrderService, ProductService};

/// One executor shared by every service.
#[derive(Clone)]
pub struct StorefrontClient {
    pub orders: OrderService,
    pub products: ProductService,
    pub customers: CustomerService,
}

impl StorefrontClient {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> error::Result<Self> {
        Ok(Self::with_executor(RequestExecutor::new(config)?))
    }

    pub fn with_executor(executor: RequestExecutor) -> Self {
        Self {
            orders: OrderService::new(executor.clone()),
            products: ProductService::new(executor.clone()),
            customers: CustomerService::new(executor),
        }
    }
}
