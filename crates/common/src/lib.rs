//! Wire contract shared by the storefront server and its client.
//!
//! Every request outcome, on either side of the wire, is an [`Envelope`].
//! Failures carry an [`ErrorDetail`] whose [`ErrorCode`] is drawn from a
//! closed taxonomy; list endpoints wrap their items in [`Paginated`].

pub mod envelope;
pub mod error_code;
pub mod pagination;
pub mod types;

pub use envelope::{Envelope, ErrorDetail, Failure};
pub use error_code::ErrorCode;
pub use pagination::{PageRequest, Paginated};
pub use types::{AddressId, CategoryId, CustomerId, OrderId, ProductId};
