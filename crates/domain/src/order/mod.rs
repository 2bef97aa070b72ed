//! Order entity, its status lifecycle, and related types.

mod entity;
mod placement;
mod status;
mod value_objects;

pub use entity::{Charges, NewOrder, Order, OrderAddresses};
pub use placement::{OrderLine, PlaceOrder};
pub use status::OrderStatus;
pub use value_objects::{Money, OrderItem};

use common::{ErrorCode, ProductId};
use thiserror::Error;

/// Errors that can occur during order operations.
///
/// Every variant is a rule violation and classifies as
/// [`ErrorCode::ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The requested status change is not in the legal transition set.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Order has no items.
    #[error("Order has no items")]
    NoItems,

    /// Invalid quantity.
    #[error("Invalid quantity {quantity} for product {product_id} (must be greater than 0)")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },

    /// A monetary field is below zero.
    #[error("{field} must not be negative (got {amount})")]
    NegativeAmount { field: &'static str, amount: Money },

    /// The discount is larger than everything it could be taken from.
    #[error("Discount {discount} exceeds order amount {gross}")]
    DiscountExceedsTotal { discount: Money, gross: Money },

    /// Exactly one of the shipping and billing addresses was given.
    #[error("Shipping and billing addresses must be given together")]
    IncompleteAddresses,

    /// An amount does not fit in the money range.
    #[error("Order {field} is too large")]
    AmountOverflow { field: &'static str },

    /// A stored total does not match the amounts it is derived from.
    #[error("Order {field} does not match its components")]
    TotalsMismatch { field: &'static str },
}

impl OrderError {
    /// Error classification for the envelope.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::ValidationError
    }
}
