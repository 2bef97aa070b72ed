use common::{AddressId, ErrorCode};
use domain::{DomainError, OrderError};
use thiserror::Error;

/// Errors that can occur when interacting with the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with the given id exists.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A unique field already holds the given value.
    #[error("{entity} with {field} '{value}' already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// The record is still referenced or in a state that forbids the change.
    #[error("{0}")]
    Conflict(String),

    /// The change was rejected by a domain rule.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// An order address that is missing or owned by another customer.
    pub fn foreign_address(field: &'static str, id: AddressId) -> Self {
        DomainError::validation(field, format!("address {id} does not belong to the customer"))
            .into()
    }

    /// An order line naming a product that is not for sale.
    pub fn unavailable_product(sku: &str) -> Self {
        DomainError::validation("items", format!("product {sku} is not available")).into()
    }

    /// Error classification for the envelope.
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::NotFound { .. } => ErrorCode::NotFound,
            StoreError::Duplicate { .. } | StoreError::Conflict(_) => ErrorCode::Conflict,
            StoreError::Domain(err) => err.code(),
        }
    }
}

impl From<OrderError> for StoreError {
    fn from(err: OrderError) -> Self {
        StoreError::Domain(err.into())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use domain::OrderStatus;

    use super::*;

    #[test]
    fn codes_follow_the_failure_kind() {
        assert_eq!(
            StoreError::not_found("Order", "abc").code(),
            ErrorCode::NotFound
        );
        assert_eq!(
            StoreError::Conflict("in use".into()).code(),
            ErrorCode::Conflict
        );
        let transition = StoreError::from(OrderError::InvalidTransition {
            from: OrderStatus::Shipped,
            to: OrderStatus::Pending,
        });
        assert_eq!(transition.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn messages_name_the_record() {
        let err = StoreError::Duplicate {
            entity: "Product",
            field: "sku",
            value: "SKU-1".into(),
        };
        assert_eq!(err.to_string(), "Product with sku 'SKU-1' already exists");
        assert_eq!(
            StoreError::not_found("Customer", "42").to_string(),
            "Customer not found: 42"
        );
    }
}
