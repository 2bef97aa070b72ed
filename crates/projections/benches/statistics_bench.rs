use chrono::{Duration, Utc};
use common::{CustomerId, OrderId, ProductId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Money, NewOrder, Order, OrderItem, OrderStatus};
use projections::OrderStatistics;

/// Builds `n` orders spread over time, every fifth one cancelled.
fn make_orders(n: usize) -> Vec<Order> {
    let start = Utc::now();
    (0..n)
        .map(|i| {
            let item = OrderItem::new(
                ProductId::new(),
                "Widget",
                (i % 4) as u32 + 1,
                Money::from_cents(1999),
            )
            .unwrap();
            let mut order = Order::place(
                OrderId::new(),
                NewOrder::new(CustomerId::new(), vec![item]),
                start + Duration::seconds(i as i64),
            )
            .unwrap();
            if i % 5 == 0 {
                order.transition_to(OrderStatus::Cancelled, start).unwrap();
            }
            order
        })
        .collect()
}

fn bench_statistics_1000_orders(c: &mut Criterion) {
    let orders = make_orders(1_000);

    c.bench_function("statistics/compute_1000_orders", |b| {
        b.iter(|| OrderStatistics::compute(&orders, 5));
    });
}

fn bench_statistics_10000_orders(c: &mut Criterion) {
    let orders = make_orders(10_000);

    c.bench_function("statistics/compute_10000_orders", |b| {
        b.iter(|| OrderStatistics::compute(&orders, 5));
    });
}

criterion_group!(
    benches,
    bench_statistics_1000_orders,
    bench_statistics_10000_orders
);
criterion_main!(benches);
