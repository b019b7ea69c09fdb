use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradecore_markets::{OrderId, OrderStatus, Symbol};

/// A single open position as reported by a live brokerage.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BrokerPosition {
    pub symbol: Symbol,
    pub quantity: i64,
    pub avg_price: Decimal,
}

/// A single open order as reported by a live brokerage.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BrokerOrder {
    pub id: OrderId,
    pub symbol: Symbol,
    pub quantity: i64,
    pub limit_price: Decimal,
    pub status: OrderStatus,
    pub filled_quantity: u64,
}

/// A snapshot of brokerage account state, used by [`crate::live::LiveBrokerage`]
/// to reconcile the in-process portfolio at startup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AccountState {
    pub cash: Decimal,
    pub buying_power: Decimal,
    pub portfolio_value: Decimal,
    pub positions: Vec<BrokerPosition>,
    pub open_orders: Vec<BrokerOrder>,
}
