//! Catalog reference data: categories and products.

use chrono::{DateTime, Utc};
use common::{CategoryId, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, optional_text, require_text};
use crate::order::Money;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Category {
    pub fn create(new: NewCategory, now: DateTime<Utc>) -> Result<Self, DomainError> {
        require_text("name", &new.name)?;
        Ok(Self {
            id: CategoryId::new(),
            name: new.name.trim().to_string(),
            description: optional_text(new.description),
            created_at: now,
            updated_at: now,
        })
    }
}

/// A product offered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock: u32,
    pub category_id: Option<CategoryId>,
    pub active: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial update of a product; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Product {
    pub fn create(new: NewProduct, now: DateTime<Utc>) -> Result<Self, DomainError> {
        require_text("sku", &new.sku)?;
        require_text("name", &new.name)?;
        ensure_price(new.price)?;

        Ok(Self {
            id: ProductId::new(),
            sku: new.sku.trim().to_uppercase(),
            name: new.name.trim().to_string(),
            description: optional_text(new.description),
            price: new.price,
            stock: new.stock,
            category_id: new.category_id,
            active: new.active,
            image_url: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update. Nothing changes if validation fails.
    pub fn apply(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        if let Some(price) = patch.price {
            ensure_price(price)?;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = optional_text(Some(description));
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = Some(category_id);
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Records where the product image was stored.
    pub fn set_image(&mut self, url: impl Into<String>, now: DateTime<Utc>) {
        self.image_url = Some(url.into());
        self.updated_at = now;
    }

    /// Case-insensitive match on SKU, name, or description.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.sku.to_lowercase().contains(&needle)
            || self.name.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

fn ensure_price(price: Money) -> Result<(), DomainError> {
    if price.is_negative() {
        return Err(DomainError::validation("price", "must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn new_product() -> NewProduct {
        NewProduct {
            sku: " sku-001 ".to_string(),
            name: "Widget".to_string(),
            description: Some("  ".to_string()),
            price: Money::from_cents(1999),
            stock: 4,
            category_id: None,
            active: true,
        }
    }

    #[test]
    fn create_normalizes_fields() {
        let product = Product::create(new_product(), now()).unwrap();
        assert_eq!(product.sku, "SKU-001");
        assert!(product.description.is_none());
        assert_eq!(product.created_at, now());
    }

    #[test]
    fn create_rejects_negative_price() {
        let result = Product::create(
            NewProduct {
                price: Money::from_cents(-1),
                ..new_product()
            },
            now(),
        );
        assert!(matches!(
            result,
            Err(DomainError::Validation { field: "price", .. })
        ));
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let mut product = Product::create(new_product(), now()).unwrap();
        let before = product.clone();
        let result = product.apply(
            ProductPatch {
                stock: Some(99),
                name: Some(" ".to_string()),
                ..ProductPatch::default()
            },
            now(),
        );
        assert!(result.is_err());
        assert_eq!(product, before);
    }

    #[test]
    fn apply_updates_given_fields_only() {
        let mut product = Product::create(new_product(), now()).unwrap();
        product
            .apply(
                ProductPatch {
                    price: Some(Money::from_cents(2500)),
                    active: Some(false),
                    ..ProductPatch::default()
                },
                now(),
            )
            .unwrap();
        assert_eq!(product.price.cents(), 2500);
        assert!(!product.active);
        assert_eq!(product.name, "Widget");
    }

    #[test]
    fn new_product_defaults_to_active() {
        let new: NewProduct =
            serde_json::from_value(serde_json::json!({ "sku": "A", "name": "B", "price": 100 }))
                .unwrap();
        assert!(new.active);
        assert_eq!(new.stock, 0);
    }

    #[test]
    fn search_matches_sku_and_name() {
        let product = Product::create(new_product(), now()).unwrap();
        assert!(product.matches_search("sku-0"));
        assert!(product.matches_search("widg"));
        assert!(!product.matches_search("gadget"));
    }

    #[test]
    fn category_requires_name() {
        let result = Category::create(
            NewCategory {
                name: "".to_string(),
                description: None,
            },
            now(),
        );
        assert!(result.is_err());
    }
}
