use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single symbol's position: signed quantity plus its weighted-average
/// entry price. Absent (never present with `quantity == 0`) once flattened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub quantity: i64,
    pub avg_price: Decimal,
}

impl Holding {
    pub fn new(quantity: i64, avg_price: Decimal) -> Self {
        Self {
            quantity,
            avg_price,
        }
    }
}
