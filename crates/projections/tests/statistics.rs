//! Integration tests: order sets → statistics snapshot.

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::{CustomerId, OrderId, ProductId};
use domain::{Money, NewOrder, Order, OrderItem, OrderStatus};
use projections::OrderStatistics;
use uuid::Uuid;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap()
}

/// An order totalling `cents`, placed at `placed_at` and moved to `status`.
fn order(id: OrderId, cents: i64, status: OrderStatus, placed_at: DateTime<Utc>) -> Order {
    let item = OrderItem::new(ProductId::new(), "Thing", 1, Money::from_cents(cents)).unwrap();
    let mut order =
        Order::place(id, NewOrder::new(CustomerId::new(), vec![item]), placed_at).unwrap();

    let path: &[OrderStatus] = match status {
        OrderStatus::Pending => &[],
        OrderStatus::Cancelled => &[OrderStatus::Cancelled],
        OrderStatus::Confirmed => &[OrderStatus::Confirmed],
        OrderStatus::Processing => &[OrderStatus::Confirmed, OrderStatus::Processing],
        OrderStatus::Shipped => &[
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
        ],
        OrderStatus::Delivered => &[
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ],
        OrderStatus::Refunded => &[
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Refunded,
        ],
    };
    for next in path {
        order.transition_to(*next, placed_at).unwrap();
    }
    order
}

fn id(n: u128) -> OrderId {
    OrderId::from_uuid(Uuid::from_u128(n))
}

#[test]
fn cancelled_orders_are_counted_but_earn_no_revenue() {
    let orders = vec![
        order(id(1), 100, OrderStatus::Pending, base_time()),
        order(id(2), 50, OrderStatus::Cancelled, base_time()),
        order(id(3), 200, OrderStatus::Delivered, base_time()),
    ];

    let stats = OrderStatistics::compute(&orders, 5);

    assert_eq!(stats.total_orders, 3);
    assert_eq!(stats.total_revenue, Money::from_cents(300));
    assert_eq!(stats.average_order_value, Money::from_cents(150));
    assert_eq!(stats.count(OrderStatus::Pending), 1);
    assert_eq!(stats.count(OrderStatus::Cancelled), 1);
    assert_eq!(stats.count(OrderStatus::Delivered), 1);
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Refunded,
    ] {
        assert_eq!(stats.count(status), 0, "{status}");
    }
    assert_eq!(stats.orders_by_status.len(), 7);
}

#[test]
fn only_cancelled_orders_means_zero_average_without_dividing_by_zero() {
    let orders = vec![
        order(id(1), 900, OrderStatus::Cancelled, base_time()),
        order(id(2), 100, OrderStatus::Cancelled, base_time()),
    ];

    let stats = OrderStatistics::compute(&orders, 5);

    assert_eq!(stats.total_orders, 2);
    assert_eq!(stats.total_revenue, Money::zero());
    assert_eq!(stats.average_order_value, Money::zero());
}

#[test]
fn average_rounds_to_the_nearest_cent() {
    let orders = vec![
        order(id(1), 100, OrderStatus::Pending, base_time()),
        order(id(2), 100, OrderStatus::Pending, base_time()),
        order(id(3), 101, OrderStatus::Pending, base_time()),
    ];

    let stats = OrderStatistics::compute(&orders, 5);

    // 301 / 3 = 100.33
    assert_eq!(stats.average_order_value, Money::from_cents(100));
}

#[test]
fn revenue_beyond_the_money_range_is_clamped_and_averaged_exactly() {
    let orders = vec![
        order(id(1), i64::MAX, OrderStatus::Delivered, base_time()),
        order(id(2), i64::MAX, OrderStatus::Confirmed, base_time()),
        order(id(3), i64::MAX - 1, OrderStatus::Pending, base_time()),
    ];

    let stats = OrderStatistics::compute(&orders, 5);

    assert_eq!(stats.total_revenue, Money::from_cents(i64::MAX));
    // (3 * MAX - 1) / 3 rounds to MAX
    assert_eq!(stats.average_order_value, Money::from_cents(i64::MAX));
}

#[test]
fn recent_orders_are_newest_first_with_id_tie_break() {
    let t = base_time();
    let orders = vec![
        order(id(7), 10, OrderStatus::Pending, t),
        order(id(3), 10, OrderStatus::Pending, t + Duration::hours(2)),
        order(id(9), 10, OrderStatus::Pending, t + Duration::hours(1)),
        order(id(2), 10, OrderStatus::Pending, t),
        order(id(5), 10, OrderStatus::Pending, t + Duration::hours(2)),
    ];

    let stats = OrderStatistics::compute(&orders, 10);

    let ids: Vec<OrderId> = stats.recent_orders.iter().map(Order::id).collect();
    assert_eq!(ids, vec![id(3), id(5), id(9), id(2), id(7)]);
}

#[test]
fn recent_orders_are_truncated_to_the_limit() {
    let orders: Vec<Order> = (0..8)
        .map(|n| {
            order(
                id(n),
                10,
                OrderStatus::Pending,
                base_time() + Duration::minutes(n as i64),
            )
        })
        .collect();

    let stats = OrderStatistics::compute(&orders, 3);

    assert_eq!(stats.total_orders, 8);
    let ids: Vec<OrderId> = stats.recent_orders.iter().map(Order::id).collect();
    assert_eq!(ids, vec![id(7), id(6), id(5)]);
}

#[test]
fn refunded_orders_still_count_as_revenue() {
    let orders = vec![
        order(id(1), 400, OrderStatus::Refunded, base_time()),
        order(id(2), 600, OrderStatus::Shipped, base_time()),
    ];

    let stats = OrderStatistics::compute(&orders, 5);

    assert_eq!(stats.total_revenue, Money::from_cents(1000));
    assert_eq!(stats.average_order_value, Money::from_cents(500));
}

#[test]
fn snapshot_round_trips_through_json() {
    let orders = vec![
        order(id(1), 250, OrderStatus::Confirmed, base_time()),
        order(id(2), 750, OrderStatus::Processing, base_time()),
    ];
    let stats = OrderStatistics::compute(&orders, 5);

    let json = serde_json::to_string(&stats).unwrap();
    let decoded: OrderStatistics = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, stats);
}
