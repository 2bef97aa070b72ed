//! Order entity.

use chrono::{DateTime, Utc};
use common::{AddressId, CustomerId, OrderId};
use serde::{Deserialize, Serialize};

use super::{Money, OrderError, OrderItem, OrderStatus};

/// Shipping and billing addresses of an order, held by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderAddresses {
    pub shipping: AddressId,
    pub billing: AddressId,
}

impl OrderAddresses {
    /// Builds the address pair from two optional ids: both or neither.
    pub fn from_pair(
        shipping: Option<AddressId>,
        billing: Option<AddressId>,
    ) -> Result<Option<Self>, OrderError> {
        match (shipping, billing) {
            (Some(shipping), Some(billing)) => Ok(Some(Self { shipping, billing })),
            (None, None) => Ok(None),
            _ => Err(OrderError::IncompleteAddresses),
        }
    }
}

/// Amounts added to or taken from the item subtotal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charges {
    #[serde(default)]
    pub tax_amount: Money,
    #[serde(default)]
    pub shipping_amount: Money,
    #[serde(default)]
    pub discount_amount: Money,
}

/// Input for placing an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub addresses: Option<OrderAddresses>,
    pub items: Vec<OrderItem>,
    pub charges: Charges,
    pub notes: Option<String>,
}

impl NewOrder {
    /// An order for `customer_id` with the given items and no extras.
    pub fn new(customer_id: CustomerId, items: Vec<OrderItem>) -> Self {
        Self {
            customer_id,
            addresses: None,
            items,
            charges: Charges::default(),
            notes: None,
        }
    }
}

/// An order placed by a customer.
///
/// Money invariants, checked at placement and by [`Order::verify_totals`]:
/// every amount is non-negative, each item total is quantity times unit
/// price, `subtotal` is the sum of item totals, and
/// `total = subtotal + tax + shipping - discount`.
///
/// The status only changes through [`Order::transition_to`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    order_number: String,
    customer_id: CustomerId,
    shipping_address_id: Option<AddressId>,
    billing_address_id: Option<AddressId>,
    items: Vec<OrderItem>,
    status: OrderStatus,
    subtotal: Money,
    tax_amount: Money,
    shipping_amount: Money,
    discount_amount: Money,
    total_amount: Money,
    notes: Option<String>,
    order_date: DateTime<Utc>,
    shipped_date: Option<DateTime<Utc>>,
    delivered_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

// Placement
impl Order {
    /// Places a new pending order.
    ///
    /// Item totals are recomputed from quantity and unit price; whatever
    /// totals the caller supplied are ignored.
    pub fn place(id: OrderId, new: NewOrder, now: DateTime<Utc>) -> Result<Self, OrderError> {
        let NewOrder {
            customer_id,
            addresses,
            items,
            charges,
            notes,
        } = new;

        if items.is_empty() {
            return Err(OrderError::NoItems);
        }

        for item in &items {
            if item.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    product_id: item.product_id,
                    quantity: item.quantity,
                });
            }
            ensure_non_negative("unitPrice", item.unit_price)?;
        }

        ensure_non_negative("taxAmount", charges.tax_amount)?;
        ensure_non_negative("shippingAmount", charges.shipping_amount)?;
        ensure_non_negative("discountAmount", charges.discount_amount)?;

        let items = items
            .into_iter()
            .map(|item| {
                OrderItem::new(item.product_id, item.product_name, item.quantity, item.unit_price)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let subtotal = checked_sum(items.iter().map(|item| item.total_price))
            .ok_or(OrderError::AmountOverflow { field: "subtotal" })?;
        let gross = checked_sum([subtotal, charges.tax_amount, charges.shipping_amount])
            .ok_or(OrderError::AmountOverflow {
                field: "totalAmount",
            })?;
        if charges.discount_amount > gross {
            return Err(OrderError::DiscountExceedsTotal {
                discount: charges.discount_amount,
                gross,
            });
        }

        Ok(Self {
            id,
            order_number: order_number(id, now),
            customer_id,
            shipping_address_id: addresses.map(|a| a.shipping),
            billing_address_id: addresses.map(|a| a.billing),
            items,
            status: OrderStatus::Pending,
            subtotal,
            tax_amount: charges.tax_amount,
            shipping_amount: charges.shipping_amount,
            discount_amount: charges.discount_amount,
            total_amount: gross - charges.discount_amount,
            notes: notes.filter(|n| !n.trim().is_empty()),
            order_date: now,
            shipped_date: None,
            delivered_date: None,
            created_at: now,
            updated_at: now,
        })
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn addresses(&self) -> Option<OrderAddresses> {
        OrderAddresses::from_pair(self.shipping_address_id, self.billing_address_id)
            .ok()
            .flatten()
    }

    /// Returns true if the order references the given address.
    pub fn uses_address(&self, address_id: AddressId) -> bool {
        self.shipping_address_id == Some(address_id) || self.billing_address_id == Some(address_id)
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax_amount(&self) -> Money {
        self.tax_amount
    }

    pub fn shipping_amount(&self) -> Money {
        self.shipping_amount
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn shipped_date(&self) -> Option<DateTime<Utc>> {
        self.shipped_date
    }

    pub fn delivered_date(&self) -> Option<DateTime<Utc>> {
        self.delivered_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Returns true if the order is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns true if the order's total counts as revenue.
    pub fn counts_toward_revenue(&self) -> bool {
        self.status != OrderStatus::Cancelled
    }

    /// Returns true if the order may be removed from the store.
    pub fn is_removable(&self) -> bool {
        matches!(self.status, OrderStatus::Pending | OrderStatus::Cancelled)
    }

    /// Case-insensitive match on order number or notes.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.order_number.to_lowercase().contains(&needle)
            || self
                .notes
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
    }

    /// Re-checks every money invariant against the stored amounts.
    pub fn verify_totals(&self) -> Result<(), OrderError> {
        for (field, amount) in [
            ("subtotal", self.subtotal),
            ("taxAmount", self.tax_amount),
            ("shippingAmount", self.shipping_amount),
            ("discountAmount", self.discount_amount),
            ("totalAmount", self.total_amount),
        ] {
            ensure_non_negative(field, amount)?;
        }

        if !self.items.iter().all(OrderItem::is_priced_consistently) {
            return Err(OrderError::TotalsMismatch { field: "totalPrice" });
        }

        let subtotal = checked_sum(self.items.iter().map(|item| item.total_price));
        if subtotal != Some(self.subtotal) {
            return Err(OrderError::TotalsMismatch { field: "subtotal" });
        }

        let total = checked_sum([self.subtotal, self.tax_amount, self.shipping_amount])
            .map(|gross| gross - self.discount_amount);
        if total != Some(self.total_amount) {
            return Err(OrderError::TotalsMismatch {
                field: "totalAmount",
            });
        }

        Ok(())
    }
}

// Lifecycle
impl Order {
    /// Moves the order to `next`.
    ///
    /// Returns `Ok(false)` without touching anything when the order is
    /// already in `next`. Entering `shipped` or `delivered` stamps the
    /// matching date the first time only.
    pub fn transition_to(
        &mut self,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, OrderError> {
        if self.status == next {
            return Ok(false);
        }

        if !self.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        if next == OrderStatus::Confirmed && self.items.is_empty() {
            return Err(OrderError::NoItems);
        }

        match next {
            OrderStatus::Shipped => {
                self.shipped_date.get_or_insert(now);
            }
            OrderStatus::Delivered => {
                self.delivered_date.get_or_insert(now);
            }
            _ => {}
        }

        self.status = next;
        self.updated_at = now;
        Ok(true)
    }
}

fn checked_sum(amounts: impl IntoIterator<Item = Money>) -> Option<Money> {
    amounts
        .into_iter()
        .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
}

fn ensure_non_negative(field: &'static str, amount: Money) -> Result<(), OrderError> {
    if amount.is_negative() {
        return Err(OrderError::NegativeAmount { field, amount });
    }
    Ok(())
}

/// `ORD-YYYYMMDD-XXXXXXXX`, the suffix taken from the order id.
fn order_number(id: OrderId, now: DateTime<Utc>) -> String {
    let suffix: String = id
        .as_uuid()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();
    format!("ORD-{}-{}", now.format("%Y%m%d"), suffix.to_uppercase())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use common::ProductId;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 9, 0, 0).unwrap()
    }

    fn widget(quantity: u32, cents: i64) -> OrderItem {
        OrderItem::new(ProductId::new(), "Widget", quantity, Money::from_cents(cents)).unwrap()
    }

    fn place(new: NewOrder) -> Result<Order, OrderError> {
        Order::place(OrderId::new(), new, now())
    }

    fn place_order() -> Order {
        place(NewOrder {
            charges: Charges {
                tax_amount: Money::from_cents(200),
                shipping_amount: Money::from_cents(499),
                discount_amount: Money::from_cents(100),
            },
            notes: Some("leave at the door".to_string()),
            ..NewOrder::new(CustomerId::new(), vec![widget(2, 1000), widget(1, 550)])
        })
        .unwrap()
    }

    #[test]
    fn test_place_order_computes_totals() {
        let order = place_order();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.subtotal().cents(), 2550);
        assert_eq!(order.total_amount().cents(), 2550 + 200 + 499 - 100);
        assert_eq!(order.total_quantity(), 3);
        assert_eq!(order.order_date(), now());
        assert!(order.verify_totals().is_ok());
    }

    #[test]
    fn test_order_number_format() {
        let order = place_order();
        let number = order.order_number();
        assert!(number.starts_with("ORD-20240517-"));
        assert_eq!(number.len(), "ORD-20240517-".len() + 8);
    }

    #[test]
    fn test_place_without_items_fails() {
        let result = place(NewOrder::new(CustomerId::new(), vec![]));
        assert_eq!(result.unwrap_err(), OrderError::NoItems);
    }

    #[test]
    fn test_place_zero_quantity_fails() {
        let result = place(NewOrder::new(CustomerId::new(), vec![widget(0, 100)]));
        assert!(matches!(result, Err(OrderError::InvalidQuantity { .. })));
    }

    #[test]
    fn test_place_negative_charge_fails() {
        let result = place(NewOrder {
            charges: Charges {
                tax_amount: Money::from_cents(-1),
                ..Charges::default()
            },
            ..NewOrder::new(CustomerId::new(), vec![widget(1, 100)])
        });
        assert!(matches!(
            result,
            Err(OrderError::NegativeAmount {
                field: "taxAmount",
                ..
            })
        ));
    }

    #[test]
    fn test_place_discount_larger_than_order_fails() {
        let result = place(NewOrder {
            charges: Charges {
                discount_amount: Money::from_cents(101),
                ..Charges::default()
            },
            ..NewOrder::new(CustomerId::new(), vec![widget(1, 100)])
        });
        assert!(matches!(result, Err(OrderError::DiscountExceedsTotal { .. })));
    }

    #[test]
    fn test_place_recomputes_item_totals() {
        let mut item = widget(3, 100);
        item.total_price = Money::from_cents(1);
        let order = place(NewOrder::new(CustomerId::new(), vec![item])).unwrap();
        assert_eq!(order.items()[0].total_price.cents(), 300);
        assert_eq!(order.total_amount().cents(), 300);
    }

    #[test]
    fn test_place_item_total_overflow_fails() {
        let mut item = widget(1, i64::MAX / 2 + 1);
        item.quantity = 2;
        let err = place(NewOrder::new(CustomerId::new(), vec![item])).unwrap_err();
        assert_eq!(err, OrderError::AmountOverflow { field: "totalPrice" });
        assert_eq!(err.code(), common::ErrorCode::ValidationError);
    }

    #[test]
    fn test_place_subtotal_overflow_fails() {
        let half = i64::MAX / 2 + 1;
        let result = place(NewOrder::new(
            CustomerId::new(),
            vec![widget(1, half), widget(1, half)],
        ));
        assert_eq!(result.unwrap_err(), OrderError::AmountOverflow { field: "subtotal" });
    }

    #[test]
    fn test_place_charges_overflow_fails() {
        let result = place(NewOrder {
            charges: Charges {
                shipping_amount: Money::from_cents(1),
                ..Charges::default()
            },
            ..NewOrder::new(CustomerId::new(), vec![widget(1, i64::MAX)])
        });
        assert_eq!(
            result.unwrap_err(),
            OrderError::AmountOverflow {
                field: "totalAmount"
            }
        );
    }

    #[test]
    fn test_addresses_must_come_in_pairs() {
        let a = AddressId::new();
        let b = AddressId::new();
        assert!(OrderAddresses::from_pair(None, None).unwrap().is_none());
        assert!(OrderAddresses::from_pair(Some(a), Some(b)).unwrap().is_some());
        assert_eq!(
            OrderAddresses::from_pair(Some(a), None).unwrap_err(),
            OrderError::IncompleteAddresses
        );
    }

    #[test]
    fn test_happy_path_lifecycle_stamps_dates() {
        let mut order = place_order();
        let shipped_at = now() + Duration::days(1);
        let delivered_at = now() + Duration::days(3);

        assert!(order.transition_to(OrderStatus::Confirmed, now()).unwrap());
        assert!(order.transition_to(OrderStatus::Processing, now()).unwrap());
        assert!(order.transition_to(OrderStatus::Shipped, shipped_at).unwrap());
        assert_eq!(order.shipped_date(), Some(shipped_at));
        assert!(order.delivered_date().is_none());

        assert!(order.transition_to(OrderStatus::Delivered, delivered_at).unwrap());
        assert_eq!(order.delivered_date(), Some(delivered_at));
        assert_eq!(order.updated_at(), delivered_at);
    }

    #[test]
    fn test_reentering_status_is_a_noop() {
        let mut order = place_order();
        order.transition_to(OrderStatus::Confirmed, now()).unwrap();
        order.transition_to(OrderStatus::Processing, now()).unwrap();

        let first = now() + Duration::hours(1);
        let second = now() + Duration::hours(2);
        assert!(order.transition_to(OrderStatus::Shipped, first).unwrap());
        assert!(!order.transition_to(OrderStatus::Shipped, second).unwrap());
        assert_eq!(order.shipped_date(), Some(first));
        assert_eq!(order.updated_at(), first);
    }

    #[test]
    fn test_illegal_transition_reports_pair() {
        let mut order = place_order();
        let err = order
            .transition_to(OrderStatus::Shipped, now())
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Shipped,
            }
        );
        assert_eq!(err.code(), common::ErrorCode::ValidationError);
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.shipped_date().is_none());
    }

    #[test]
    fn test_cancelled_order_is_immutable() {
        let mut order = place_order();
        order.transition_to(OrderStatus::Cancelled, now()).unwrap();
        assert!(order.is_terminal());
        assert!(!order.counts_toward_revenue());

        for next in OrderStatus::ALL {
            if next != OrderStatus::Cancelled {
                assert!(order.transition_to(next, now()).is_err());
            }
        }
    }

    #[test]
    fn test_refund_only_after_delivery() {
        let mut order = place_order();
        assert!(order.transition_to(OrderStatus::Refunded, now()).is_err());

        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Refunded,
        ] {
            order.transition_to(status, now()).unwrap();
        }
        assert_eq!(order.status(), OrderStatus::Refunded);
        assert!(order.delivered_date().is_some());
    }

    #[test]
    fn test_removable_statuses() {
        let mut order = place_order();
        assert!(order.is_removable());
        order.transition_to(OrderStatus::Confirmed, now()).unwrap();
        assert!(!order.is_removable());
        order.transition_to(OrderStatus::Cancelled, now()).unwrap();
        assert!(order.is_removable());
    }

    #[test]
    fn test_search_matches_number_and_notes() {
        let order = place_order();
        assert!(order.matches_search("ord-2024"));
        assert!(order.matches_search("DOOR"));
        assert!(!order.matches_search("porch"));
    }

    #[test]
    fn test_wire_shape() {
        let order = place_order();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["subtotal"], 2550);
        assert_eq!(json["totalAmount"], 3149);
        assert!(json["shippedDate"].is_null());
        assert!(json["shippingAddressId"].is_null());

        let decoded: Order = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, order);
    }

    #[test]
    fn test_verify_totals_detects_mismatch() {
        let order = place_order();
        let mut json = serde_json::to_value(&order).unwrap();
        json["totalAmount"] = serde_json::json!(1);
        let tampered: Order = serde_json::from_value(json).unwrap();
        assert_eq!(
            tampered.verify_totals().unwrap_err(),
            OrderError::TotalsMismatch {
                field: "totalAmount"
            }
        );
    }
}
