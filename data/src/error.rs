use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradecore_markets::{OrderId, Symbol};

/// Errors raised by [`crate::book::OrderBook`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Error)]
pub enum DataError {
    #[error("order {0} not found in book")]
    UnknownOrder(OrderId),

    #[error("book for {0} does not exist")]
    UnknownSymbol(Symbol),
}
