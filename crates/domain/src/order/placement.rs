//! Wire request for placing an order.

use common::{AddressId, CustomerId, ProductId};
use serde::{Deserialize, Serialize};

use super::Charges;

/// One requested line of a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Request to place an order.
///
/// Only product ids and quantities are sent; names and prices are taken
/// from the catalog when the order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub customer_id: CustomerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address_id: Option<AddressId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address_id: Option<AddressId>,
    pub items: Vec<OrderLine>,
    #[serde(flatten)]
    pub charges: Charges,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PlaceOrder {
    /// A request with no addresses, charges, or notes.
    pub fn new(customer_id: CustomerId, items: Vec<OrderLine>) -> Self {
        Self {
            customer_id,
            shipping_address_id: None,
            billing_address_id: None,
            items,
            charges: Charges::default(),
            notes: None,
        }
    }

    /// Ships to and bills the same address.
    pub fn deliver_to(mut self, address_id: AddressId) -> Self {
        self.shipping_address_id = Some(address_id);
        self.billing_address_id = Some(address_id);
        self
    }
}
