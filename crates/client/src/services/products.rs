use common::{CategoryId, Envelope, Paginated, ProductId};
use domain::{NewProduct, Product, ProductPatch};

use crate::executor::{FileUpload, RequestExecutor};
use crate::query::QueryParams;

/// Multipart field the server reads product images from.
pub const IMAGE_FIELD: &str = "file";

/// Product endpoints.
#[derive(Clone)]
pub struct ProductService {
    executor: RequestExecutor,
}

impl ProductService {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Filters: `search`, `categoryId`, `active`, `page`, `pageSize`.
    pub async fn list(&self, params: Option<&QueryParams>) -> Envelope<Paginated<Product>> {
        self.executor.get("products", params).await
    }

    pub async fn get(&self, id: ProductId) -> Envelope<Product> {
        self.executor.get(&format!("products/{id}"), None).await
    }

    pub async fn create(&self, product: &NewProduct) -> Envelope<Product> {
        self.executor.post("products", Some(product), None).await
    }

    pub async fn update(&self, id: ProductId, patch: &ProductPatch) -> Envelope<Product> {
        self.executor
            .patch(&format!("products/{id}"), Some(patch), None)
            .await
    }

    pub async fn delete(&self, id: ProductId) -> Envelope<()> {
        self.executor.delete(&format!("products/{id}"), None).await
    }

    pub async fn search(
        &self,
        term: &str,
        params: Option<&QueryParams>,
    ) -> Envelope<Paginated<Product>> {
        let params = super::search_params(term, params);
        self.executor.get("products/search", Some(&params)).await
    }

    pub async fn by_category(
        &self,
        category_id: CategoryId,
        params: Option<&QueryParams>,
    ) -> Envelope<Paginated<Product>> {
        self.executor
            .get(&format!("categories/{category_id}/products"), params)
            .await
    }

    pub async fn upload_image(&self, id: ProductId, image: FileUpload) -> Envelope<Product> {
        self.executor
            .upload_file(&format!("products/{id}/image"), IMAGE_FIELD, image, None)
            .await
    }
}
