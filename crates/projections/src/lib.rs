//! Read-side reporting for the storefront.
//!
//! Everything here is recomputed on demand from the current order set and
//! owns no state of its own.

pub mod statistics;

pub use statistics::{DEFAULT_RECENT_ORDERS, MAX_RECENT_ORDERS, OrderStatistics, recent_limit};
