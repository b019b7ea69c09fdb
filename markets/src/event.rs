use crate::Symbol;
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single tick of the market-data stream: one symbol observed at one price
/// at one instant. The unit the engine's event loop consumes and reacts to.
#[derive(Debug, Clone, PartialEq, Constructor, Serialize, Deserialize)]
pub struct MarketDataEvent {
    pub timestamp: DateTime<Utc>,
    pub symbol: Symbol,
    pub price: Decimal,
}
