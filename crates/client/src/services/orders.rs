use common::{CustomerId, Envelope, OrderId, Paginated};
use domain::{Order, OrderStatus, PlaceOrder};
use projections::OrderStatistics;
use serde::Serialize;

use crate::executor::RequestExecutor;
use crate::query::QueryParams;

#[derive(Serialize)]
struct StatusChange {
    status: OrderStatus,
}

/// Order endpoints.
#[derive(Clone)]
pub struct OrderService {
    executor: RequestExecutor,
}

impl OrderService {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Lists orders, newest first. Filters: `search`, `status`,
    /// `customerId`, `page`, `pageSize`.
    pub async fn list(&self, params: Option<&QueryParams>) -> Envelope<Paginated<Order>> {
        self.executor.get("orders", params).await
    }

    pub async fn get(&self, id: OrderId) -> Envelope<Order> {
        self.executor.get(&format!("orders/{id}"), None).await
    }

    pub async fn create(&self, request: &PlaceOrder) -> Envelope<Order> {
        self.executor.post("orders", Some(request), None).await
    }

    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Envelope<Order> {
        self.executor
            .patch(
                &format!("orders/{id}/status"),
                Some(&StatusChange { status }),
                None,
            )
            .await
    }

    pub async fn delete(&self, id: OrderId) -> Envelope<()> {
        self.executor.delete(&format!("orders/{id}"), None).await
    }

    /// Matches order numbers and notes.
    pub async fn search(
        &self,
        term: &str,
        params: Option<&QueryParams>,
    ) -> Envelope<Paginated<Order>> {
        let params = super::search_params(term, params);
        self.executor.get("orders/search", Some(&params)).await
    }

    pub async fn by_customer(
        &self,
        customer_id: CustomerId,
        params: Option<&QueryParams>,
    ) -> Envelope<Paginated<Order>> {
        self.executor
            .get(&format!("customers/{customer_id}/orders"), params)
            .await
    }

    /// `recent` caps the recent-orders list; the server applies its own
    /// default and maximum.
    pub async fn statistics(&self, recent: Option<u32>) -> Envelope<OrderStatistics> {
        let params = QueryParams::new().with("recent", recent);
        self.executor.get("orders/statistics", Some(&params)).await
    }
}
