//! Backing store for the storefront.
//!
//! The store traits describe the collections the server keeps; the
//! in-memory implementation guards each collection with a `tokio` lock.
//! [`OrderService`] holds the rules that span collections.

pub mod error;
pub mod memory;
pub mod query;
pub mod service;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use query::{CustomerQuery, OrderQuery, ProductQuery};
pub use service::OrderService;
pub use store::{CatalogStore, CustomerStore, OrderStore, Storefront};
