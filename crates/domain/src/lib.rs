//! Domain layer for the storefront.
//!
//! This crate provides:
//! - the Order entity with its status state machine and money invariants
//! - catalog reference data (categories, products)
//! - customer reference data (customers, addresses)
//! - classified domain errors

pub mod catalog;
pub mod customer;
pub mod error;
pub mod order;

pub use catalog::{Category, NewCategory, NewProduct, Product, ProductPatch};
pub use customer::{Address, Customer, CustomerPatch, NewAddress, NewCustomer};
pub use error::DomainError;
pub use order::{
    Charges, Money, NewOrder, Order, OrderAddresses, OrderError, OrderItem, OrderLine,
    OrderStatus, PlaceOrder,
};
