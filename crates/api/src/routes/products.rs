//! Product endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartRejection};
use chrono::Utc;
use common::{CategoryId, Paginated, ProductId};
use domain::{DomainError, NewProduct, Product, ProductPatch};
use serde::Deserialize;
use store::{CatalogStore, ProductQuery, Storefront};

use super::AppState;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::reply::Reply;

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "file";

/// Query parameters for listing and searching products.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductParams {
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub active: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl From<ProductParams> for ProductQuery {
    fn from(params: ProductParams) -> Self {
        ProductQuery {
            search: params.search,
            category_id: params.category_id,
            active: params.active,
            page: super::page(params.page, params.page_size),
        }
    }
}

/// GET /api/products
#[tracing::instrument(skip(state))]
pub async fn list<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiQuery(params): ApiQuery<ProductParams>,
) -> Result<Reply<Paginated<Product>>, ApiError> {
    let page = state.store.query_products(params.into()).await?;
    Ok(Reply::ok(page, "Products retrieved"))
}

/// GET /api/products/search
#[tracing::instrument(skip(state))]
pub async fn search<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiQuery(params): ApiQuery<ProductParams>,
) -> Result<Reply<Paginated<Product>>, ApiError> {
    let page = state.store.query_products(params.into()).await?;
    let message = format!("Found {} product(s)", page.total);
    Ok(Reply::ok(page, message))
}

/// POST /api/products
#[tracing::instrument(skip(state, new))]
pub async fn create<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(new): ApiJson<NewProduct>,
) -> Result<Reply<Product>, ApiError> {
    let product = Product::create(new, Utc::now())?;
    let product = state.store.insert_product(product).await?;
    tracing::info!(product_id = %product.id, sku = %product.sku, "product created");
    Ok(Reply::created(product, "Product created"))
}

/// GET /api/products/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Reply<Product>, ApiError> {
    let product = state.store.get_product(id).await?;
    Ok(Reply::ok(product, "Product retrieved"))
}

/// PATCH /api/products/{id}
#[tracing::instrument(skip(state, patch))]
pub async fn update<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Reply<Product>, ApiError> {
    let product = state.store.update_product(id, patch).await?;
    Ok(Reply::ok(product, "Product updated"))
}

/// DELETE /api/products/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Reply<()>, ApiError> {
    state.store.delete_product(id).await?;
    Ok(Reply::done("Product deleted"))
}

/// POST /api/products/{id}/image
///
/// Accepts one image in the `file` field and records where it is served
/// from. The bytes themselves are not kept.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_image<S: Storefront>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<ProductId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Reply<Product>, ApiError> {
    let mut multipart = multipart?;
    state.store.get_product(id).await?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(DomainError::validation(
                "file",
                format!("expected an image, got '{content_type}'"),
            )
            .into());
        }
        let file_name = sanitize_file_name(field.file_name().unwrap_or("image"));
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }

        let url = format!("/uploads/products/{id}/{file_name}");
        let product = state.store.set_product_image(id, url).await?;
        tracing::info!(product_id = %id, size = bytes.len(), %content_type, "product image stored");
        return Ok(Reply::ok(product, "Image uploaded"));
    }

    Err(ApiError::BadRequest(format!(
        "Missing multipart field '{IMAGE_FIELD}'"
    )))
}

/// Keeps only characters that are safe in a URL path segment.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_reduced_to_safe_segments() {
        assert_eq!(sanitize_file_name("photo.png"), "photo.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\pics\\my cat.jpg"), "my_cat.jpg");
        assert_eq!(sanitize_file_name(".."), "image");
    }
}
