use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tradecore_markets::{Order, OrderId, OrderStatus};

use crate::error::MatchingError;

/// Simulates venue order outcomes with two configured probabilities.
///
/// For each submitted order a single draw `u in [0, 1)` decides the outcome:
/// `u < cancel_rate` cancels it, the next `partial_fill_rate` slice partially
/// fills it at `floor(|quantity| / 3)` (at least 1, or a full fill if
/// `|quantity| < 3`), and everything else fills it completely. A preset draw
/// can be injected for deterministic tests.
#[derive(Debug)]
pub struct MatchingEngine {
    cancel_rate: f64,
    partial_fill_rate: f64,
    rng: StdRng,
    preset_draw: Option<f64>,
    next_ordinal: u64,
}

impl MatchingEngine {
    pub fn new(cancel_rate: f64, partial_fill_rate: f64) -> Result<Self, MatchingError> {
        Self::from_seed(cancel_rate, partial_fill_rate, rand::random())
    }

    pub fn from_seed(
        cancel_rate: f64,
        partial_fill_rate: f64,
        seed: u64,
    ) -> Result<Self, MatchingError> {
        if !(0.0..=1.0).contains(&cancel_rate)
            || !(0.0..=1.0).contains(&partial_fill_rate)
            || cancel_rate + partial_fill_rate > 1.0
        {
            return Err(MatchingError::InvalidRates);
        }

        Ok(Self {
            cancel_rate,
            partial_fill_rate,
            rng: StdRng::seed_from_u64(seed),
            preset_draw: None,
            next_ordinal: 0,
        })
    }

    /// Fixes the next draw for deterministic tests; cleared after one use.
    pub fn set_preset_draw(&mut self, value: f64) {
        self.preset_draw = Some(value);
    }

    fn next_draw(&mut self) -> f64 {
        match self.preset_draw.take() {
            Some(value) => value,
            None => self.rng.random::<f64>(),
        }
    }

    fn fresh_order_id(&mut self) -> OrderId {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        OrderId::new(format!("order_{ordinal}_X"))
    }

    /// Assigns an id if unset, draws an outcome, and returns the updated order.
    pub fn process_order(&mut self, mut order: Order) -> Order {
        if order.id.is_none() {
            order.id = Some(self.fresh_order_id());
        }

        let draw = self.next_draw();
        let quantity = order.unsigned_quantity();

        if self.cancel_rate > 0.0 && draw < self.cancel_rate {
            order.status = OrderStatus::Canceled;
            order.filled_quantity = 0;
        } else if self.partial_fill_rate > 0.0 && draw < self.cancel_rate + self.partial_fill_rate {
            if quantity < 3 {
                order.status = OrderStatus::Filled;
                order.filled_quantity = quantity;
            } else {
                order.status = OrderStatus::PartiallyFilled;
                order.filled_quantity = (quantity / 3).max(1);
            }
        } else {
            order.status = OrderStatus::Filled;
            order.filled_quantity = quantity;
        }

        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tradecore_markets::Symbol;

    fn order(quantity: i64) -> Order {
        Order::new(Symbol::new("AAPL"), quantity, dec!(150))
    }

    #[test]
    fn zero_rates_always_fully_fill() {
        let mut engine = MatchingEngine::from_seed(0.0, 0.0, 1).unwrap();
        let filled = engine.process_order(order(10));
        assert_eq!(filled.status, OrderStatus::Filled);
        assert_eq!(filled.filled_quantity, 10);
        assert!(filled.id.is_some());
    }

    #[test]
    fn preset_draw_forces_partial_fill() {
        let mut engine = MatchingEngine::from_seed(0.0, 1.0, 1).unwrap();
        engine.set_preset_draw(0.5);
        let result = engine.process_order(order(9));
        assert_eq!(result.status, OrderStatus::PartiallyFilled);
        assert_eq!(result.filled_quantity, 3);
    }

    #[test]
    fn partial_fill_below_three_becomes_full_fill() {
        let mut engine = MatchingEngine::from_seed(0.0, 1.0, 1).unwrap();
        engine.set_preset_draw(0.5);
        let result = engine.process_order(order(2));
        assert_eq!(result.status, OrderStatus::Filled);
        assert_eq!(result.filled_quantity, 2);
    }

    #[test]
    fn preset_draw_forces_cancel() {
        let mut engine = MatchingEngine::from_seed(0.5, 0.0, 1).unwrap();
        engine.set_preset_draw(0.1);
        let result = engine.process_order(order(10));
        assert_eq!(result.status, OrderStatus::Canceled);
        assert_eq!(result.filled_quantity, 0);
    }

    #[test]
    fn invalid_rates_are_rejected() {
        assert!(MatchingEngine::from_seed(0.6, 0.6, 1).is_err());
        assert!(MatchingEngine::from_seed(-0.1, 0.0, 1).is_err());
    }
}
