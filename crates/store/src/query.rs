use common::{CategoryId, CustomerId, PageRequest};
use domain::{Customer, Order, OrderStatus, Product};

/// Filter and page for listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Case-insensitive match on SKU, name, or description.
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub active: Option<bool>,
    pub page: PageRequest,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(needle) = non_blank(&self.search)
            && !product.matches_search(needle)
        {
            return false;
        }
        if let Some(category_id) = self.category_id
            && product.category_id != Some(category_id)
        {
            return false;
        }
        if let Some(active) = self.active
            && product.active != active
        {
            return false;
        }
        true
    }
}

/// Filter and page for listing customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerQuery {
    pub search: Option<String>,
    pub page: PageRequest,
}

impl CustomerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        non_blank(&self.search).is_none_or(|needle| customer.matches_search(needle))
    }
}

/// Filter and page for listing orders.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    /// Case-insensitive match on order number or notes.
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub customer_id: Option<CustomerId>,
    pub page: PageRequest,
}

impl OrderQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_customer(customer_id: CustomerId) -> Self {
        Self {
            customer_id: Some(customer_id),
            ..Default::default()
        }
    }

    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    pub fn matches(&self, order: &Order) -> bool {
        if let Some(needle) = non_blank(&self.search)
            && !order.matches_search(needle)
        {
            return false;
        }
        if let Some(status) = self.status
            && order.status() != status
        {
            return false;
        }
        if let Some(customer_id) = self.customer_id
            && order.customer_id() != customer_id
        {
            return false;
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
