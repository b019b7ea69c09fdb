use tradecore_markets::MarketDataEvent;

use crate::signal::Signal;

/// A trading strategy: a pure function from one market-data tick to zero or
/// more [`Signal`]s.
///
/// Implementations hold their own rolling price history per symbol (bounded
/// to whatever window they need) and never reach back into a `Portfolio` or
/// `Gateway` — all state relevant to a decision must already live on `self`.
/// Given the same sequence of ticks, a strategy must produce the same
/// sequence of signals.
pub trait Strategy {
    fn generate_signals(&mut self, tick: &MarketDataEvent) -> Vec<Signal>;
}
