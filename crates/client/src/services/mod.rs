//! Typed wrappers over the storefront endpoints.
//!
//! Services only shape calls: they pick the path, attach the body and hand
//! back whatever envelope the executor resolved. Pagination is returned as
//! the server sent it.

mod customers;
mod orders;
mod products;

pub use customers::CustomerService;
pub use orders::OrderService;
pub use products::{IMAGE_FIELD, ProductService};

use crate::query::QueryParams;

/// The caller's parameters with `search` set, sent to a `/search` endpoint.
fn search_params(term: &str, params: Option<&QueryParams>) -> QueryParams {
    params.cloned().unwrap_or_default().merged("search", term)
}
