use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradecore_markets::{OrderStatus, Symbol};

/// Errors raised while applying fills or mutating a [`crate::Portfolio`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Error)]
pub enum PortfolioError {
    #[error("insufficient cash: required {required}, available {available}")]
    InsufficientCash {
        required: Decimal,
        available: Decimal,
    },

    #[error("insufficient holdings for {symbol}: held {held}, requested {requested}")]
    InsufficientHoldings {
        symbol: Symbol,
        held: i64,
        requested: i64,
    },

    #[error("order is not fillable in status {0}")]
    NotFillable(OrderStatus),
}
