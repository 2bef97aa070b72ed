//! Value objects for the order domain.

use common::ProductId;
use serde::{Deserialize, Serialize};

use super::OrderError;

/// Money amount in minor units (cents) to avoid floating point issues.
///
/// Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        (self.cents.unsigned_abs() % 100) as i64
    }

    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Multiplies by a quantity, or `None` on overflow.
    pub fn checked_mul(&self, quantity: u32) -> Option<Money> {
        self.cents
            .checked_mul(i64::from(quantity))
            .map(Money::from_cents)
    }

    /// Adds two amounts, or `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.cents.checked_add(other.cents).map(Money::from_cents)
    }

    /// Clamps a wide cent amount into range.
    pub fn saturating_from_cents(cents: i128) -> Money {
        let clamped = cents.clamp(i128::from(i64::MIN), i128::from(i64::MAX));
        Money::from_cents(i64::try_from(clamped).unwrap_or_default())
    }

    /// Mean of a wide cent total over `count`, rounding half away from zero
    /// to the nearest cent. A zero count is treated as one.
    pub fn rounded_mean(total_cents: i128, count: u64) -> Money {
        let divisor = i128::from(count.max(1));
        let half = divisor / 2;
        let rounded = if total_cents >= 0 {
            (total_cents + half) / divisor
        } else {
            (total_cents - half) / divisor
        };
        Money::saturating_from_cents(rounded)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

// The operators saturate; code that must reject overflow uses the
// `checked_*` methods.
impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_sub(rhs.cents),
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents = self.cents.saturating_add(rhs.cents);
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// A line of an order, priced at placement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,

    /// Product name captured when the order was placed.
    pub product_name: String,

    pub quantity: u32,

    pub unit_price: Money,

    /// Always `quantity * unit_price`.
    pub total_price: Money,
}

impl OrderItem {
    /// Creates a new order item, computing its total price.
    ///
    /// Fails with [`OrderError::AmountOverflow`] when the total does not fit.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Result<Self, OrderError> {
        let total_price = unit_price
            .checked_mul(quantity)
            .ok_or(OrderError::AmountOverflow {
                field: "totalPrice",
            })?;
        Ok(Self {
            product_id,
            product_name: product_name.into(),
            quantity,
            unit_price,
            total_price,
        })
    }

    /// Returns true if the stored total matches quantity times unit price.
    pub fn is_priced_consistently(&self) -> bool {
        self.unit_price.checked_mul(self.quantity) == Some(self.total_price)
    }
}
