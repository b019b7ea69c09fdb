use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Operation side, derived from the sign of an order's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The [`Side`] implied by a signed quantity. Positive is a buy, negative a sell.
    ///
    /// # Panics
    /// Panics if `quantity` is zero — a zero-quantity order has no side.
    pub fn from_signed_quantity(quantity: i64) -> Self {
        match quantity.cmp(&0) {
            std::cmp::Ordering::Greater => Side::Buy,
            std::cmp::Ordering::Less => Side::Sell,
            std::cmp::Ordering::Equal => panic!("quantity is zero, Side is undefined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_signed_quantity_buy_and_sell() {
        assert_eq!(Side::from_signed_quantity(10), Side::Buy);
        assert_eq!(Side::from_signed_quantity(-10), Side::Sell);
    }

    #[test]
    #[should_panic]
    fn from_signed_quantity_zero_panics() {
        Side::from_signed_quantity(0);
    }
}
