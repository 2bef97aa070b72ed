//! Category endpoints.

use std::sync::Arc;

use axum::extract::State;
use chrono::Utc;
use common::{CategoryId, Paginated};
use domain::{Category, NewCategory, Product};
use serde::Deserialize;
use store::{CatalogStore, ProductQuery, Storefront};

use super::AppState;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::reply::Reply;

/// Query parameters for the products of one category.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProductsParams {
    pub active: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// GET /api/categories
#[tracing::instrument(skip(state))]
pub async fn list<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Reply<Vec<Category>>, ApiError> {
    let categories = state.store.list_categories().await?;
    Ok(Reply::ok(categories, "Categories retrieved"))
}

/// POST /api/categories
#[tracing::instrument(skip(state, new))]
pub async fn create<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(new): ApiJson<NewCategory>,
) -> Result<Reply<Category>, ApiError> {
    let category = Category::create(new, Utc::now())?;
    let category = state.store.insert_category(category).await?;
    tracing::info!(category_id = %category.id, name = %category.name, "category created");
    Ok(Reply::created(category, "Category created"))
}

/// GET /api/categories/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<CategoryId>,
) -> Result<Reply<Category>, ApiError> {
    let category = state.store.get_category(id).await?;
    Ok(Reply::ok(category, "Category retrieved"))
}

/// DELETE /api/categories/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<CategoryId>,
) -> Result<Reply<()>, ApiError> {
    state.store.delete_category(id).await?;
    Ok(Reply::done("Category deleted"))
}

/// GET /api/categories/{id}/products
#[tracing::instrument(skip(state))]
pub async fn products<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<CategoryId>,
    ApiQuery(params): ApiQuery<CategoryProductsParams>,
) -> Result<Reply<Paginated<Product>>, ApiError> {
    state.store.get_category(id).await?;

    let mut query = ProductQuery::new()
        .category(id)
        .page(super::page(params.page, params.page_size));
    query.active = params.active;

    let page = state.store.query_products(query).await?;
    Ok(Reply::ok(page, "Products retrieved"))
}
