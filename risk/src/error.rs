use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradecore_markets::Symbol;

/// Reasons an order fails [`crate::OrderManager::validate`]. The `Display`
/// text is what a caller surfaces as the rejection reason.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Error)]
pub enum RiskError {
    #[error("Insufficient cash")]
    InsufficientCash,

    #[error("Insufficient holdings")]
    InsufficientHoldings,

    #[error("Rate limit exceeded ({limit} orders/min)")]
    RateLimitExceeded { limit: usize },

    #[error("Order value {value} exceeds limit {limit}")]
    OrderValueExceeded { value: Decimal, limit: Decimal },

    #[error("Position limit exceeded for {symbol} (max {limit})")]
    PositionLimitExceeded {
        symbol: Symbol,
        limit: Decimal,
    },
}
