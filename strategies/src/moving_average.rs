use std::collections::VecDeque;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use tradecore_markets::{Action, MarketDataEvent, Symbol};
use tradecore_trader::{Signal, Strategy};

/// Moving-average crossover: target a flat position while the short moving
/// average is below the long one, and a `quantity`-sized long position once
/// it rises above.
///
/// The crossover is evaluated against history *before* the current tick is
/// folded in, so a signal's limit price is always the tick that triggered it
/// and never looks ahead into its own average.
#[derive(Debug, Clone)]
pub struct MovingAverageCrossover {
    short_window: usize,
    long_window: usize,
    quantity: i64,
    history: IndexMap<Symbol, VecDeque<Decimal>>,
    desired_position: IndexMap<Symbol, i64>,
}

impl Default for MovingAverageCrossover {
    fn default() -> Self {
        Self::new(3, 5, 10)
    }
}

impl MovingAverageCrossover {
    /// # Panics
    /// Panics if `short_window >= long_window`, `short_window == 0`, or `quantity <= 0`.
    pub fn new(short_window: usize, long_window: usize, quantity: i64) -> Self {
        assert!(short_window > 0, "short_window must be positive");
        assert!(short_window < long_window, "short_window must be shorter than long_window");
        assert!(quantity > 0, "quantity must be positive");
        Self {
            short_window,
            long_window,
            quantity,
            history: IndexMap::new(),
            desired_position: IndexMap::new(),
        }
    }

    fn average(window: impl Iterator<Item = Decimal> + ExactSizeIterator) -> Decimal {
        let len = window.len();
        window.sum::<Decimal>() / Decimal::from(len as i64)
    }
}

impl Strategy for MovingAverageCrossover {
    fn generate_signals(&mut self, tick: &MarketDataEvent) -> Vec<Signal> {
        let history = self.history.entry(tick.symbol.clone()).or_default();
        let mut signals = Vec::new();

        if history.len() >= self.long_window {
            let long_avg = Self::average(history.iter().copied());
            let short_avg = Self::average(history.iter().rev().take(self.short_window).copied());

            let current = self.desired_position.get(&tick.symbol).copied().unwrap_or(0);
            let target = if short_avg > long_avg {
                self.quantity
            } else if short_avg < long_avg {
                -self.quantity
            } else {
                current
            };

            let delta = target - current;
            if delta != 0 {
                let action = if delta > 0 { Action::Buy } else { Action::Sell };
                signals.push(Signal::new(tick.symbol.clone(), delta, tick.price, action));
                self.desired_position.insert(tick.symbol.clone(), target);
            }
        }

        let history = self.history.get_mut(&tick.symbol).expect("just inserted above");
        history.push_back(tick.price);
        if history.len() > self.long_window {
            history.pop_front();
        }

        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn tick(price: Decimal) -> MarketDataEvent {
        MarketDataEvent::new(Utc::now(), Symbol::new("AAPL"), price)
    }

    #[test]
    fn crossover_buys_exactly_once_on_scenario_a_prices() {
        let mut strategy = MovingAverageCrossover::new(3, 5, 10);
        let prices = [
            dec!(100),
            dec!(101),
            dec!(102),
            dec!(106),
            dec!(108),
            dec!(110),
        ];

        let mut all_signals = Vec::new();
        for price in prices {
            all_signals.extend(strategy.generate_signals(&tick(price)));
        }

        assert_eq!(all_signals.len(), 1);
        let signal = &all_signals[0];
        assert_eq!(signal.quantity, 10);
        assert_eq!(signal.limit_price, dec!(110));
        assert_eq!(signal.action, Action::Buy);
    }

    #[test]
    fn insufficient_history_produces_no_signal() {
        let mut strategy = MovingAverageCrossover::new(3, 5, 10);
        let signals = strategy.generate_signals(&tick(dec!(100)));
        assert!(signals.is_empty());
    }

    #[test]
    fn same_tick_sequence_yields_same_signal_sequence() {
        let prices = [dec!(100), dec!(101), dec!(102), dec!(106), dec!(108), dec!(110)];

        let run = |strategy: &mut MovingAverageCrossover| {
            prices
                .iter()
                .flat_map(|p| strategy.generate_signals(&tick(*p)))
                .collect::<Vec<_>>()
        };

        let mut a = MovingAverageCrossover::new(3, 5, 10);
        let mut b = MovingAverageCrossover::new(3, 5, 10);
        assert_eq!(run(&mut a), run(&mut b));
    }
}
