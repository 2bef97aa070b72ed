//! Order statistics snapshot.

use std::collections::BTreeMap;

use domain::{Money, Order, OrderStatus};
use serde::{Deserialize, Serialize};

/// Recent orders included when the caller does not ask for a count.
pub const DEFAULT_RECENT_ORDERS: usize = 5;

/// Upper bound on the recent orders a caller may ask for.
pub const MAX_RECENT_ORDERS: usize = 50;

/// Resolves a requested recent-orders count against the default and cap.
pub fn recent_limit(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_RECENT_ORDERS)
        .min(MAX_RECENT_ORDERS)
}

/// Reporting metrics derived from the order set.
///
/// Cancelled orders count toward `total_orders` and `orders_by_status` but
/// not toward revenue. Revenue is summed in 128 bits and clamped to the
/// money range; the average is taken from the unclamped sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatistics {
    pub total_orders: u64,
    pub total_revenue: Money,
    pub average_order_value: Money,
    /// Every status is present, zero when no order has it.
    pub orders_by_status: BTreeMap<OrderStatus, u64>,
    /// Most recent first by order date; ties broken by ascending id.
    pub recent_orders: Vec<Order>,
}

impl OrderStatistics {
    /// Computes the statistics in a single pass over `orders`.
    pub fn compute<'a>(orders: impl IntoIterator<Item = &'a Order>, recent: usize) -> Self {
        let mut orders_by_status: BTreeMap<OrderStatus, u64> =
            OrderStatus::ALL.iter().map(|status| (*status, 0)).collect();
        let mut total_orders = 0u64;
        let mut revenue_orders = 0u64;
        let mut revenue_cents = 0i128;
        let mut seen: Vec<&Order> = Vec::new();

        for order in orders {
            total_orders += 1;
            *orders_by_status.entry(order.status()).or_default() += 1;
            if order.counts_toward_revenue() {
                revenue_orders += 1;
                revenue_cents += i128::from(order.total_amount().cents());
            }
            seen.push(order);
        }

        seen.sort_by(|a, b| {
            b.order_date()
                .cmp(&a.order_date())
                .then_with(|| a.id().cmp(&b.id()))
        });
        seen.truncate(recent);

        Self {
            total_orders,
            total_revenue: Money::saturating_from_cents(revenue_cents),
            average_order_value: Money::rounded_mean(revenue_cents, revenue_orders),
            orders_by_status,
            recent_orders: seen.into_iter().cloned().collect(),
        }
    }

    /// Count of orders in `status`.
    pub fn count(&self, status: OrderStatus) -> u64 {
        self.orders_by_status.get(&status).copied().unwrap_or(0)
    }
}

impl Default for OrderStatistics {
    fn default() -> Self {
        Self::compute(std::iter::empty(), 0)
    }
}
