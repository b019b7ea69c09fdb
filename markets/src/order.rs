use crate::{Side, Symbol};
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque, venue/run-unique order identifier, assigned exactly once at admission.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display("{_0}")]
pub struct OrderId(String);

impl OrderId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle state of an [`Order`]. See `OrderStatus` in the core data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Created, not yet admitted to a venue.
    Pending,
    /// Acknowledged by the venue; resting with zero fills.
    Active,
    /// `0 < filled_quantity < |quantity|`.
    PartiallyFilled,
    /// `filled_quantity == |quantity|`. Terminal.
    Filled,
    /// Terminal; `filled_quantity` may be anywhere in `0..|quantity|`.
    Canceled,
    /// Terminal; submission was rejected or a side-effect failed.
    Failed,
}

impl OrderStatus {
    /// Terminal states can never transition further.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Filled | Self::Canceled | Self::Failed)
    }
}

/// The action a strategy requests for a symbol on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

/// A mutable trade order, unique by `id` once admitted.
///
/// `quantity` is signed: positive is a buy, negative is a sell. `filled_quantity`
/// is the cumulative, monotonically nondecreasing count of units executed so far,
/// always `<= quantity.unsigned_abs()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<OrderId>,
    pub symbol: Symbol,
    pub quantity: i64,
    pub limit_price: Decimal,
    pub status: OrderStatus,
    pub filled_quantity: u64,
}

impl Order {
    /// Construct a new order in [`OrderStatus::Pending`] with zero fills.
    ///
    /// # Panics
    /// Panics if `quantity` is zero or `limit_price` is not positive.
    pub fn new(symbol: Symbol, quantity: i64, limit_price: Decimal) -> Self {
        assert_ne!(quantity, 0, "order quantity must be nonzero");
        assert!(limit_price > Decimal::ZERO, "limit_price must be positive");
        Self {
            id: None,
            symbol,
            quantity,
            limit_price,
            status: OrderStatus::Pending,
            filled_quantity: 0,
        }
    }

    pub fn side(&self) -> Side {
        Side::from_signed_quantity(self.quantity)
    }

    pub fn unsigned_quantity(&self) -> u64 {
        self.quantity.unsigned_abs()
    }

    /// `|quantity| - filled_quantity`.
    pub fn remaining_quantity(&self) -> u64 {
        self.unsigned_quantity().saturating_sub(self.filled_quantity)
    }

    /// Notional value of the full order: `|quantity| * limit_price`.
    pub fn notional(&self) -> Decimal {
        Decimal::from(self.unsigned_quantity()) * self.limit_price
    }

    /// Signed notional: `quantity * limit_price`. Positive for buys, negative for sells.
    pub fn signed_notional(&self) -> Decimal {
        Decimal::from(self.quantity) * self.limit_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn remaining_quantity_tracks_fills() {
        let mut order = Order::new(Symbol::new("AAPL"), 10, dec!(100));
        assert_eq!(order.remaining_quantity(), 10);
        order.filled_quantity = 4;
        assert_eq!(order.remaining_quantity(), 6);
        order.filled_quantity = 10;
        assert_eq!(order.remaining_quantity(), 0);
    }

    #[test]
    fn sell_side_and_notional_use_absolute_quantity() {
        let order = Order::new(Symbol::new("AAPL"), -5, dec!(100));
        assert_eq!(order.side(), Side::Sell);
        assert_eq!(order.notional(), dec!(500));
        assert_eq!(order.signed_notional(), dec!(-500));
    }

    #[test]
    #[should_panic]
    fn zero_quantity_panics() {
        Order::new(Symbol::new("AAPL"), 0, dec!(100));
    }
}
