use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradecore_markets::{Action, Symbol};

/// A strategy's desired action for one symbol in response to a tick: the
/// symbol, a signed order quantity (positive buy, negative sell, zero for a
/// `Hold`), a limit price, and the [`Action`] it corresponds to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: Symbol,
    pub quantity: i64,
    pub limit_price: Decimal,
    pub action: Action,
}

impl Signal {
    pub fn new(symbol: Symbol, quantity: i64, limit_price: Decimal, action: Action) -> Self {
        Self {
            symbol,
            quantity,
            limit_price,
            action,
        }
    }
}
