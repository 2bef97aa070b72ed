use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{AddressId, CategoryId, CustomerId, OrderId, Paginated, ProductId};
use domain::{
    Address, Category, Customer, CustomerPatch, Order, OrderStatus, Product, ProductPatch,
};
use tokio::sync::RwLock;

use crate::{
    CatalogStore, CustomerQuery, CustomerStore, OrderQuery, OrderStore, ProductQuery, Result,
    StoreError,
};

/// In-memory backing store.
///
/// Each collection sits behind its own lock. Operations that touch more than
/// one collection acquire the locks in field order.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    categories: Arc<RwLock<HashMap<CategoryId, Category>>>,
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
    customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
    addresses: Arc<RwLock<HashMap<AddressId, Address>>>,
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn insert_category(&self, category: Category) -> Result<Category> {
        let mut categories = self.categories.write().await;
        if categories
            .values()
            .any(|c| c.name.eq_ignore_ascii_case(&category.name))
        {
            return Err(StoreError::Duplicate {
                entity: "Category",
                field: "name",
                value: category.name,
            });
        }
        categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: CategoryId) -> Result<Category> {
        self.categories
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Category", id))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories: Vec<_> = self.categories.read().await.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<()> {
        let mut categories = self.categories.write().await;
        let products = self.products.read().await;

        let category = categories
            .get(&id)
            .ok_or_else(|| StoreError::not_found("Category", id))?;
        let in_use = products
            .values()
            .filter(|p| p.category_id == Some(id))
            .count();
        if in_use > 0 {
            return Err(StoreError::Conflict(format!(
                "Category '{}' still has {in_use} product(s)",
                category.name
            )));
        }

        categories.remove(&id);
        Ok(())
    }

    async fn insert_product(&self, product: Product) -> Result<Product> {
        let categories = self.categories.read().await;
        let mut products = self.products.write().await;

        if let Some(category_id) = product.category_id
            && !categories.contains_key(&category_id)
        {
            return Err(StoreError::not_found("Category", category_id));
        }
        if products.values().any(|p| p.sku == product.sku) {
            return Err(StoreError::Duplicate {
                entity: "Product",
                field: "sku",
                value: product.sku,
            });
        }

        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Product", id))
    }

    async fn query_products(&self, query: ProductQuery) -> Result<Paginated<Product>> {
        let products = self.products.read().await;
        let mut matching: Vec<_> = products
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(Paginated::paginate(matching, query.page))
    }

    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product> {
        let categories = self.categories.read().await;
        let mut products = self.products.write().await;

        if let Some(category_id) = patch.category_id
            && !categories.contains_key(&category_id)
        {
            return Err(StoreError::not_found("Category", category_id));
        }

        let product = products
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;
        product.apply(patch, Utc::now())?;
        Ok(product.clone())
    }

    async fn set_product_image(&self, id: ProductId, url: String) -> Result<Product> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;
        product.set_image(url, Utc::now());
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.products
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("Product", id))
    }
}

#[async_trait]
impl CustomerStore for InMemoryStore {
    async fn insert_customer(&self, customer: Customer) -> Result<Customer> {
        let mut customers = self.customers.write().await;
        if customers.values().any(|c| c.email == customer.email) {
            return Err(StoreError::Duplicate {
                entity: "Customer",
                field: "email",
                value: customer.email,
            });
        }
        customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Customer> {
        self.customers
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Customer", id))
    }

    async fn query_customers(&self, query: CustomerQuery) -> Result<Paginated<Customer>> {
        let customers = self.customers.read().await;
        let mut matching: Vec<_> = customers
            .values()
            .filter(|c| query.matches(c))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
                .then(a.id.cmp(&b.id))
        });
        Ok(Paginated::paginate(matching, query.page))
    }

    async fn update_customer(&self, id: CustomerId, patch: CustomerPatch) -> Result<Customer> {
        let mut customers = self.customers.write().await;

        let mut updated = customers
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Customer", id))?;
        updated.apply(patch, Utc::now())?;

        if customers
            .values()
            .any(|c| c.id != id && c.email == updated.email)
        {
            return Err(StoreError::Duplicate {
                entity: "Customer",
                field: "email",
                value: updated.email,
            });
        }

        customers.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<()> {
        let mut customers = self.customers.write().await;
        let mut addresses = self.addresses.write().await;
        let orders = self.orders.read().await;

        if !customers.contains_key(&id) {
            return Err(StoreError::not_found("Customer", id));
        }
        let placed = orders.values().filter(|o| o.customer_id() == id).count();
        if placed > 0 {
            return Err(StoreError::Conflict(format!(
                "Customer {id} has {placed} order(s) and cannot be deleted"
            )));
        }

        addresses.retain(|_, a| a.customer_id != id);
        customers.remove(&id);
        Ok(())
    }

    async fn insert_address(&self, mut address: Address) -> Result<Address> {
        let customers = self.customers.read().await;
        let mut addresses = self.addresses.write().await;

        if !customers.contains_key(&address.customer_id) {
            return Err(StoreError::not_found("Customer", address.customer_id));
        }

        let owned = addresses
            .values_mut()
            .filter(|a| a.customer_id == address.customer_id);
        let mut has_any = false;
        for existing in owned {
            has_any = true;
            if address.is_default {
                existing.is_default = false;
            }
        }
        if !has_any {
            address.is_default = true;
        }

        addresses.insert(address.id, address.clone());
        Ok(address)
    }

    async fn list_addresses(&self, customer_id: CustomerId) -> Result<Vec<Address>> {
        if !self.customers.read().await.contains_key(&customer_id) {
            return Err(StoreError::not_found("Customer", customer_id));
        }

        let mut owned: Vec<_> = self
            .addresses
            .read()
            .await
            .values()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(owned)
    }

    async fn delete_address(&self, customer_id: CustomerId, address_id: AddressId) -> Result<()> {
        let mut addresses = self.addresses.write().await;
        let orders = self.orders.read().await;

        let removed = match addresses.get(&address_id) {
            Some(address) if address.customer_id == customer_id => address.clone(),
            _ => return Err(StoreError::not_found("Address", address_id)),
        };
        if orders.values().any(|o| o.uses_address(address_id)) {
            return Err(StoreError::Conflict(format!(
                "Address {address_id} is used by an order"
            )));
        }
        addresses.remove(&address_id);

        if removed.is_default
            && let Some(next) = addresses
                .values_mut()
                .filter(|a| a.customer_id == customer_id)
                .min_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
        {
            next.is_default = true;
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert_order(&self, order: Order) -> Result<Order> {
        let products = self.products.read().await;
        let customers = self.customers.read().await;
        let addresses = self.addresses.read().await;
        let mut orders = self.orders.write().await;

        let customer_id = order.customer_id();
        if !customers.contains_key(&customer_id) {
            return Err(StoreError::not_found("Customer", customer_id));
        }
        if let Some(pair) = order.addresses() {
            for (field, id) in [
                ("shippingAddressId", pair.shipping),
                ("billingAddressId", pair.billing),
            ] {
                if !addresses
                    .get(&id)
                    .is_some_and(|a| a.customer_id == customer_id)
                {
                    return Err(StoreError::foreign_address(field, id));
                }
            }
        }
        for item in order.items() {
            let product = products
                .get(&item.product_id)
                .ok_or_else(|| StoreError::not_found("Product", item.product_id))?;
            if !product.active {
                return Err(StoreError::unavailable_product(&product.sku));
            }
        }

        if orders.contains_key(&order.id()) {
            return Err(StoreError::Conflict(format!(
                "Order {} already exists",
                order.id()
            )));
        }
        orders.insert(order.id(), order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: OrderId) -> Result<Order> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Order", id))
    }

    async fn query_orders(&self, query: OrderQuery) -> Result<Paginated<Order>> {
        let orders = self.orders.read().await;
        let mut matching: Vec<_> = orders
            .values()
            .filter(|o| query.matches(o))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.order_date()
                .cmp(&a.order_date())
                .then(a.id().cmp(&b.id()))
        });
        Ok(Paginated::paginate(matching, query.page))
    }

    async fn all_orders(&self) -> Result<Vec<Order>> {
        Ok(self.orders.read().await.values().cloned().collect())
    }

    async fn transition_order(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(Order, Option<OrderStatus>)> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Order", id))?;

        let from = order.status();
        let changed = order.transition_to(status, Utc::now())?;
        Ok((order.clone(), changed.then_some(from)))
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get(&id)
            .ok_or_else(|| StoreError::not_found("Order", id))?;
        if !order.is_removable() {
            return Err(StoreError::Conflict(format!(
                "Order {} is {} and cannot be deleted",
                order.order_number(),
                order.status()
            )));
        }
        orders.remove(&id);
        Ok(())
    }
}
