//! Order placement and lifecycle rules spanning several collections.

use chrono::Utc;
use common::OrderId;
use domain::{NewOrder, Order, OrderAddresses, OrderItem, OrderStatus, PlaceOrder};
use projections::{OrderStatistics, recent_limit};

use crate::{CatalogStore, CustomerStore, OrderStore, Result, StoreError};

/// Service for placing orders and moving them through their lifecycle.
#[derive(Clone)]
pub struct OrderService<S> {
    store: S,
}

impl<S> OrderService<S>
where
    S: CatalogStore + CustomerStore + OrderStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Places a new pending order.
    ///
    /// The customer and every product must exist, products must be active,
    /// and both addresses, when given, must belong to the customer. Items are
    /// priced from the catalog here; [`OrderStore::insert_order`] checks the
    /// references again atomically with the insert.
    #[tracing::instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    pub async fn place(&self, request: PlaceOrder) -> Result<Order> {
        let customer = self.store.get_customer(request.customer_id).await?;

        let addresses =
            OrderAddresses::from_pair(request.shipping_address_id, request.billing_address_id)?;

        let mut items = Vec::with_capacity(request.items.len());
        for line in request.items {
            let product = self.store.get_product(line.product_id).await?;
            if !product.active {
                return Err(StoreError::unavailable_product(&product.sku));
            }
            items.push(OrderItem::new(
                product.id,
                product.name,
                line.quantity,
                product.price,
            )?);
        }

        let order = Order::place(
            OrderId::new(),
            NewOrder {
                customer_id: customer.id,
                addresses,
                items,
                charges: request.charges,
                notes: request.notes,
            },
            Utc::now(),
        )?;
        let order = self.store.insert_order(order).await?;

        metrics::counter!("orders_placed_total").increment(1);
        tracing::info!(
            order_id = %order.id(),
            order_number = order.order_number(),
            total = %order.total_amount(),
            "order placed"
        );
        Ok(order)
    }

    /// Moves an order to `status`. Re-entering the current status is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        let (order, from) = self.store.transition_order(id, status).await?;

        if let Some(from) = from {
            metrics::counter!(
                "order_transitions_total",
                "from" => from.as_str(),
                "to" => status.as_str()
            )
            .increment(1);
            tracing::info!(order_id = %id, %from, to = %status, "order status changed");
        }
        Ok(order)
    }

    /// Point-in-time statistics over every order.
    #[tracing::instrument(skip(self))]
    pub async fn statistics(&self, recent: Option<usize>) -> Result<OrderStatistics> {
        let orders = self.store.all_orders().await?;
        Ok(OrderStatistics::compute(&orders, recent_limit(recent)))
    }
}
