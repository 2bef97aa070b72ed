//! Order endpoints.

use std::sync::Arc;

use axum::extract::State;
use common::{CustomerId, OrderId, Paginated};
use domain::{Order, OrderStatus, PlaceOrder};
use projections::OrderStatistics;
use serde::Deserialize;
use store::{OrderQuery, OrderStore, Storefront};

use super::AppState;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::reply::Reply;

/// Query parameters for listing and searching orders.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderParams {
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub customer_id: Option<CustomerId>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl From<OrderParams> for OrderQuery {
    fn from(params: OrderParams) -> Self {
        OrderQuery {
            search: params.search,
            status: params.status,
            customer_id: params.customer_id,
            page: super::page(params.page, params.page_size),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatisticsParams {
    pub recent: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
}

/// GET /api/orders
#[tracing::instrument(skip(state))]
pub async fn list<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiQuery(params): ApiQuery<OrderParams>,
) -> Result<Reply<Paginated<Order>>, ApiError> {
    let page = state.store.query_orders(params.into()).await?;
    Ok(Reply::ok(page, "Orders retrieved"))
}

/// GET /api/orders/search
#[tracing::instrument(skip(state))]
pub async fn search<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiQuery(params): ApiQuery<OrderParams>,
) -> Result<Reply<Paginated<Order>>, ApiError> {
    let page = state.store.query_orders(params.into()).await?;
    let message = format!("Found {} order(s)", page.total);
    Ok(Reply::ok(page, message))
}

/// GET /api/orders/statistics
#[tracing::instrument(skip(state))]
pub async fn statistics<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiQuery(params): ApiQuery<StatisticsParams>,
) -> Result<Reply<OrderStatistics>, ApiError> {
    let stats = state.orders.statistics(params.recent).await?;
    Ok(Reply::ok(stats, "Statistics computed"))
}

/// POST /api/orders
#[tracing::instrument(skip(state, request))]
pub async fn create<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(request): ApiJson<PlaceOrder>,
) -> Result<Reply<Order>, ApiError> {
    let order = state.orders.place(request).await?;
    let message = format!("Order {} placed", order.order_number());
    Ok(Reply::created(order, message))
}

/// GET /api/orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Reply<Order>, ApiError> {
    let order = state.store.get_order(id).await?;
    Ok(Reply::ok(order, "Order retrieved"))
}

/// PATCH /api/orders/{id}/status
#[tracing::instrument(skip(state))]
pub async fn update_status<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(change): ApiJson<StatusChange>,
) -> Result<Reply<Order>, ApiError> {
    let order = state.orders.update_status(id, change.status).await?;
    let message = format!("Order status is {}", order.status());
    Ok(Reply::ok(order, message))
}

/// DELETE /api/orders/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Reply<()>, ApiError> {
    state.store.delete_order(id).await?;
    Ok(Reply::done("Order deleted"))
}
