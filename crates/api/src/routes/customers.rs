//! Customer and address endpoints.

use std::sync::Arc;

use axum::extract::State;
use chrono::Utc;
use common::{AddressId, CustomerId, Paginated};
use domain::{Address, Customer, CustomerPatch, NewAddress, NewCustomer, Order, OrderStatus};
use serde::Deserialize;
use store::{CustomerQuery, CustomerStore, OrderQuery, OrderStore, Storefront};

use super::AppState;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::reply::Reply;

/// Query parameters for listing and searching customers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerParams {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl From<CustomerParams> for CustomerQuery {
    fn from(params: CustomerParams) -> Self {
        CustomerQuery {
            search: params.search,
            page: super::page(params.page, params.page_size),
        }
    }
}

/// Query parameters for the orders of one customer.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrdersParams {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// GET /api/customers
#[tracing::instrument(skip(state))]
pub async fn list<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiQuery(params): ApiQuery<CustomerParams>,
) -> Result<Reply<Paginated<Customer>>, ApiError> {
    let page = state.store.query_customers(params.into()).await?;
    Ok(Reply::ok(page, "Customers retrieved"))
}

/// GET /api/customers/search
#[tracing::instrument(skip(state))]
pub async fn search<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiQuery(params): ApiQuery<CustomerParams>,
) -> Result<Reply<Paginated<Customer>>, ApiError> {
    let page = state.store.query_customers(params.into()).await?;
    let message = format!("Found {} customer(s)", page.total);
    Ok(Reply::ok(page, message))
}

/// POST /api/customers
#[tracing::instrument(skip(state, new))]
pub async fn create<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(new): ApiJson<NewCustomer>,
) -> Result<Reply<Customer>, ApiError> {
    let customer = Customer::create(new, Utc::now())?;
    let customer = state.store.insert_customer(customer).await?;
    tracing::info!(customer_id = %customer.id, "customer registered");
    Ok(Reply::created(customer, "Customer created"))
}

/// GET /api/customers/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<Reply<Customer>, ApiError> {
    let customer = state.store.get_customer(id).await?;
    Ok(Reply::ok(customer, "Customer retrieved"))
}

/// PATCH /api/customers/{id}
#[tracing::instrument(skip(state, patch))]
pub async fn update<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<CustomerId>,
    ApiJson(patch): ApiJson<CustomerPatch>,
) -> Result<Reply<Customer>, ApiError> {
    let customer = state.store.update_customer(id, patch).await?;
    Ok(Reply::ok(customer, "Customer updated"))
}

/// DELETE /api/customers/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<Reply<()>, ApiError> {
    state.store.delete_customer(id).await?;
    Ok(Reply::done("Customer deleted"))
}

/// GET /api/customers/{id}/addresses
#[tracing::instrument(skip(state))]
pub async fn addresses<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<Reply<Vec<Address>>, ApiError> {
    let addresses = state.store.list_addresses(id).await?;
    Ok(Reply::ok(addresses, "Addresses retrieved"))
}

/// POST /api/customers/{id}/addresses
#[tracing::instrument(skip(state, new))]
pub async fn add_address<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<CustomerId>,
    ApiJson(new): ApiJson<NewAddress>,
) -> Result<Reply<Address>, ApiError> {
    let address = Address::create(id, new, Utc::now())?;
    let address = state.store.insert_address(address).await?;
    Ok(Reply::created(address, "Address added"))
}

/// DELETE /api/customers/{id}/addresses/{addressId}
#[tracing::instrument(skip(state))]
pub async fn delete_address<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath((id, address_id)): ApiPath<(CustomerId, AddressId)>,
) -> Result<Reply<()>, ApiError> {
    state.store.delete_address(id, address_id).await?;
    Ok(Reply::done("Address deleted"))
}

/// GET /api/customers/{id}/orders
#[tracing::instrument(skip(state))]
pub async fn orders<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<CustomerId>,
    ApiQuery(params): ApiQuery<CustomerOrdersParams>,
) -> Result<Reply<Paginated<Order>>, ApiError> {
    state.store.get_customer(id).await?;

    let mut query = OrderQuery::for_customer(id).page(super::page(params.page, params.page_size));
    query.status = params.status;

    let page = state.store.query_orders(query).await?;
    Ok(Reply::ok(page, "Orders retrieved"))
}
