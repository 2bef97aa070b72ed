//! Route handlers, one module per resource.

pub mod categories;
pub mod customers;
pub mod orders;
pub mod products;
pub mod system;

use common::PageRequest;
use store::{OrderService, Storefront};

/// Shared application state accessible from all handlers.
pub struct AppState<S: Storefront> {
    pub store: S,
    pub orders: OrderService<S>,
}

impl<S: Storefront> AppState<S> {
    pub fn new(store: S) -> Self {
        Self {
            orders: OrderService::new(store.clone()),
            store,
        }
    }
}

/// Builds a page request from the `page` and `pageSize` query parameters.
pub(crate) fn page(page: Option<u32>, page_size: Option<u32>) -> PageRequest {
    PageRequest { page, page_size }
}
