use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradecore_markets::Symbol;

/// An open position as tracked by [`crate::tracker::PerformanceTracker`],
/// distinct from [`tradecore_portfolio::Holding`] in that it also carries the
/// last seen mark price for unrealized P&L.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: Symbol,
    pub quantity: i64,
    pub avg_entry_price: Decimal,
    pub current_price: Decimal,
}

impl Position {
    pub fn new(symbol: Symbol, quantity: i64, avg_entry_price: Decimal) -> Self {
        Self {
            symbol,
            quantity,
            current_price: avg_entry_price,
            avg_entry_price,
        }
    }

    /// `(current_price - avg_entry_price) * quantity`, sign-correct for shorts
    /// since `quantity` is itself signed.
    pub fn unrealized_pnl(&self) -> Decimal {
        (self.current_price - self.avg_entry_price) * Decimal::from(self.quantity)
    }

    pub fn unrealized_pnl_pct(&self) -> Decimal {
        if self.avg_entry_price.is_zero() {
            return Decimal::ZERO;
        }
        (self.current_price - self.avg_entry_price) / self.avg_entry_price * Decimal::from(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn unrealized_pnl_long() {
        let mut pos = Position::new(Symbol::new("AAPL"), 10, dec!(100));
        pos.current_price = dec!(110);
        assert_eq!(pos.unrealized_pnl(), dec!(100));
    }

    #[test]
    fn unrealized_pnl_short() {
        let mut pos = Position::new(Symbol::new("AAPL"), -10, dec!(100));
        pos.current_price = dec!(90);
        assert_eq!(pos.unrealized_pnl(), dec!(100));
    }
}
