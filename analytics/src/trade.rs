use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradecore_markets::{Order, OrderId, Side, Symbol};

/// A single executed trade, recorded from a filled (or partially filled) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub timestamp: DateTime<Utc>,
    pub symbol: Symbol,
    /// Signed quantity of this execution: positive for buy, negative for sell.
    pub quantity: i64,
    pub price: Decimal,
    pub side: Side,
    pub order_id: Option<OrderId>,
}

impl Trade {
    /// Builds a [`Trade`] from a filled order and the signed quantity actually
    /// executed in this event (a delta, not necessarily the order's full size).
    pub fn from_fill(order: &Order, delta_quantity: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            symbol: order.symbol.clone(),
            quantity: delta_quantity,
            price: order.limit_price,
            side: Side::from_signed_quantity(delta_quantity),
            order_id: order.id.clone(),
        }
    }
}
