use async_trait::async_trait;
use common::{AddressId, CategoryId, CustomerId, OrderId, Paginated, ProductId};
use domain::{
    Address, Category, Customer, CustomerPatch, Order, OrderStatus, Product, ProductPatch,
};

use crate::{CustomerQuery, OrderQuery, ProductQuery, Result};

/// Categories and products.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Stores a new category. Fails with `Duplicate` if the name is taken,
    /// compared case-insensitively.
    async fn insert_category(&self, category: Category) -> Result<Category>;

    async fn get_category(&self, id: CategoryId) -> Result<Category>;

    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Removes a category. Fails with `Conflict` while products reference it.
    async fn delete_category(&self, id: CategoryId) -> Result<()>;

    /// Stores a new product. The SKU must be unique and the category, if
    /// any, must exist.
    async fn insert_product(&self, product: Product) -> Result<Product>;

    async fn get_product(&self, id: ProductId) -> Result<Product>;

    /// Matching products ordered by name, then id.
    async fn query_products(&self, query: ProductQuery) -> Result<Paginated<Product>>;

    /// Applies a partial update atomically.
    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product>;

    /// Records the stored location of the product image.
    async fn set_product_image(&self, id: ProductId, url: String) -> Result<Product>;

    async fn delete_product(&self, id: ProductId) -> Result<()>;
}

/// Customers and their addresses.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Stores a new customer. Fails with `Duplicate` if the email is taken.
    async fn insert_customer(&self, customer: Customer) -> Result<Customer>;

    async fn get_customer(&self, id: CustomerId) -> Result<Customer>;

    /// Matching customers ordered by last name, first name, then id.
    async fn query_customers(&self, query: CustomerQuery) -> Result<Paginated<Customer>>;

    async fn update_customer(&self, id: CustomerId, patch: CustomerPatch) -> Result<Customer>;

    /// Removes a customer with their addresses. Fails with `Conflict` while
    /// the customer has orders.
    async fn delete_customer(&self, id: CustomerId) -> Result<()>;

    /// Adds an address to an existing customer. A new default address
    /// replaces the previous default; the first address is always default.
    async fn insert_address(&self, address: Address) -> Result<Address>;

    /// Addresses of a customer, default first.
    async fn list_addresses(&self, customer_id: CustomerId) -> Result<Vec<Address>>;

    /// Removes an address. Fails with `Conflict` while an order uses it.
    async fn delete_address(&self, customer_id: CustomerId, address_id: AddressId) -> Result<()>;
}

/// The order set.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Stores a placed order.
    ///
    /// The customer, both addresses and every product are checked again in
    /// the same critical section as the insert: the customer must exist, the
    /// addresses must belong to it and the products must exist and be active.
    async fn insert_order(&self, order: Order) -> Result<Order>;

    async fn get_order(&self, id: OrderId) -> Result<Order>;

    /// Matching orders, most recent first.
    async fn query_orders(&self, query: OrderQuery) -> Result<Paginated<Order>>;

    /// Point-in-time copy of every order.
    async fn all_orders(&self) -> Result<Vec<Order>>;

    /// Moves an order to `status` as one read-modify-write.
    ///
    /// Returns the updated order with the status it left, or `None` when it
    /// was already in `status`.
    async fn transition_order(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(Order, Option<OrderStatus>)>;

    /// Removes an order. Only pending or cancelled orders may be removed.
    async fn delete_order(&self, id: OrderId) -> Result<()>;
}

/// Everything the storefront keeps.
pub trait Storefront: CatalogStore + CustomerStore + OrderStore + Clone + 'static {}

impl<T: CatalogStore + CustomerStore + OrderStore + Clone + 'static> Storefront for T {}
