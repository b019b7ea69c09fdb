use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use tradecore_markets::{Order, OrderId, OrderStatus, Symbol};
use tradecore_portfolio::Portfolio;

use crate::error::RiskError;

const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// A resting order under management: the last snapshot handed to
/// [`OrderManager::record_order`] plus the last cumulative fill seen.
#[derive(Debug, Clone)]
struct ActiveOrder {
    order: Order,
    last_known_filled: u64,
}

/// Validates orders against capital, rate, and exposure limits before
/// submission, and tracks committed notional and cumulative fills for
/// orders once admitted.
///
/// Validation uses *committed* notional — open but unfilled orders count
/// against the exposure cap — so a burst of individually-valid orders
/// cannot collectively breach it.
#[derive(Debug)]
pub struct OrderManager {
    max_orders_per_minute: usize,
    max_order_value: Option<Decimal>,
    max_position_size: Option<Decimal>,
    order_timestamps: VecDeque<DateTime<Utc>>,
    position_value: IndexMap<Symbol, Decimal>,
    active_orders: IndexMap<OrderId, ActiveOrder>,
}

impl OrderManager {
    pub fn new(max_orders_per_minute: usize) -> Self {
        Self {
            max_orders_per_minute,
            max_order_value: None,
            max_position_size: None,
            order_timestamps: VecDeque::new(),
            position_value: IndexMap::new(),
            active_orders: IndexMap::new(),
        }
    }

    pub fn with_max_order_value(mut self, limit: Decimal) -> Self {
        self.max_order_value = Some(limit);
        self
    }

    pub fn with_max_position_size(mut self, limit: Decimal) -> Self {
        self.max_position_size = Some(limit);
        self
    }

    fn prune_timestamps(&mut self, now: DateTime<Utc>) {
        while let Some(front) = self.order_timestamps.front() {
            if now.signed_duration_since(*front).to_std().unwrap_or(Duration::ZERO) > RATE_LIMIT_WINDOW {
                self.order_timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Runs, in order: solvency, rate limit, per-order notional cap,
    /// exposure cap. Returns the first failing check.
    pub fn validate(
        &mut self,
        order: &Order,
        portfolio: &Portfolio,
        now: DateTime<Utc>,
    ) -> Result<(), RiskError> {
        if !portfolio.can_execute(order) {
            return Err(if order.quantity > 0 {
                RiskError::InsufficientCash
            } else {
                RiskError::InsufficientHoldings
            });
        }

        self.prune_timestamps(now);
        if self.order_timestamps.len() >= self.max_orders_per_minute {
            return Err(RiskError::RateLimitExceeded {
                limit: self.max_orders_per_minute,
            });
        }

        if let Some(limit) = self.max_order_value {
            let value = order.notional();
            if value > limit {
                return Err(RiskError::OrderValueExceeded { value, limit });
            }
        }

        if let Some(limit) = self.max_position_size {
            let current = self
                .position_value
                .get(&order.symbol)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let projected = (current + order.signed_notional()).abs();
            if projected > limit {
                return Err(RiskError::PositionLimitExceeded {
                    symbol: order.symbol.clone(),
                    limit,
                });
            }
        }

        Ok(())
    }

    /// Records a just-submitted order: pushes the rate-limit timestamp,
    /// starts tracking it for fills, and — only on this first admission —
    /// commits its notional against the symbol's exposure.
    pub fn record_order(&mut self, order: Order, now: DateTime<Utc>) {
        self.order_timestamps.push_back(now);

        if matches!(order.status, OrderStatus::Active | OrderStatus::Pending) {
            *self
                .position_value
                .entry(order.symbol.clone())
                .or_insert(Decimal::ZERO) += order.signed_notional();
        }

        let id = order
            .id
            .clone()
            .expect("order must be assigned an id before being recorded");
        self.active_orders.insert(
            id,
            ActiveOrder {
                last_known_filled: order.filled_quantity,
                order,
            },
        );
    }

    /// Applies a new cumulative fill. Returns `(new_delta, remaining)`, or
    /// `None` if `id` is not tracked. A reported fill lower than previously
    /// known (a reordering race) clamps the delta to zero.
    pub fn update_fill(&mut self, id: &OrderId, new_cumulative_filled: u64) -> Option<(u64, u64)> {
        let active = self.active_orders.get_mut(id)?;

        let new_delta = new_cumulative_filled.saturating_sub(active.last_known_filled);
        if new_cumulative_filled < active.last_known_filled {
            tracing::warn!(
                order_id = %id,
                previous = active.last_known_filled,
                reported = new_cumulative_filled,
                "fill report went backwards; clamping delta to zero"
            );
        }

        active.order.filled_quantity = new_cumulative_filled;
        let remaining = active.order.remaining_quantity();

        if remaining == 0 {
            active.order.status = OrderStatus::Filled;
            self.active_orders.shift_remove(id);
        } else {
            active.order.status = OrderStatus::PartiallyFilled;
            active.last_known_filled = new_cumulative_filled;
        }

        Some((new_delta, remaining))
    }

    /// Unconditionally drops `id` from tracking.
    pub fn remove(&mut self, id: &OrderId) {
        self.active_orders.shift_remove(id);
    }

    /// Current orders-per-minute rate as of `now`, without mutating the
    /// tracked window.
    pub fn get_order_rate(&self, now: DateTime<Utc>) -> usize {
        self.order_timestamps
            .iter()
            .filter(|ts| {
                now.signed_duration_since(**ts)
                    .to_std()
                    .map(|d| d <= RATE_LIMIT_WINDOW)
                    .unwrap_or(false)
            })
            .count()
    }

    pub fn get_position_value(&self, symbol: &Symbol) -> Decimal {
        self.position_value
            .get(symbol)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn get_all_positions(&self) -> &IndexMap<Symbol, Decimal> {
        &self.position_value
    }

    pub fn reset_positions(&mut self) {
        self.position_value.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tradecore_markets::Symbol;

    fn order(symbol: &str, quantity: i64, price: Decimal) -> Order {
        let mut o = Order::new(Symbol::new(symbol), quantity, price);
        o.id = Some(OrderId::new(format!("{symbol}-{quantity}-{price}")));
        o.status = OrderStatus::Active;
        o
    }

    #[test]
    fn rejects_insufficient_cash() {
        let mut manager = OrderManager::new(60);
        let portfolio = Portfolio::new(dec!(100));
        let err = manager
            .validate(&order("AAPL", 10, dec!(100)), &portfolio, Utc::now())
            .unwrap_err();
        assert_eq!(err, RiskError::InsufficientCash);
    }

    #[test]
    fn rate_limit_rejects_fourth_order_within_window() {
        let mut manager = OrderManager::new(3);
        let portfolio = Portfolio::new(dec!(1_000_000));
        let now = Utc::now();

        for i in 0..3 {
            let o = order("AAPL", 1, dec!(10));
            manager.validate(&o, &portfolio, now).unwrap();
            manager.record_order(o, now + chrono::Duration::milliseconds(i));
        }

        let err = manager
            .validate(&order("AAPL", 1, dec!(10)), &portfolio, now)
            .unwrap_err();
        assert_eq!(err, RiskError::RateLimitExceeded { limit: 3 });
    }

    #[test]
    fn order_value_cap_rejects_large_orders() {
        let mut manager = OrderManager::new(60).with_max_order_value(dec!(500));
        let portfolio = Portfolio::new(dec!(1_000_000));
        let err = manager
            .validate(&order("AAPL", 10, dec!(100)), &portfolio, Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            RiskError::OrderValueExceeded {
                value: dec!(1000),
                limit: dec!(500)
            }
        );
    }

    #[test]
    fn update_fill_computes_delta_and_terminal_transition() {
        let mut manager = OrderManager::new(60);
        let now = Utc::now();
        let o = order("AAPL", 100, dec!(100));
        let id = o.id.clone().unwrap();
        manager.record_order(o, now);

        let (delta, remaining) = manager.update_fill(&id, 30).unwrap();
        assert_eq!((delta, remaining), (30, 70));

        let (delta, remaining) = manager.update_fill(&id, 80).unwrap();
        assert_eq!((delta, remaining), (50, 20));

        let (delta, remaining) = manager.update_fill(&id, 100).unwrap();
        assert_eq!((delta, remaining), (20, 0));
        assert!(manager.update_fill(&id, 100).is_none());
    }

    #[test]
    fn backwards_fill_report_clamps_to_zero_delta() {
        let mut manager = OrderManager::new(60);
        let now = Utc::now();
        let o = order("AAPL", 100, dec!(100));
        let id = o.id.clone().unwrap();
        manager.record_order(o, now);

        manager.update_fill(&id, 50).unwrap();
        let (delta, remaining) = manager.update_fill(&id, 40).unwrap();
        assert_eq!(delta, 0);
        assert_eq!(remaining, 60);
    }

    #[test]
    fn position_value_only_commits_on_first_admission() {
        let mut manager = OrderManager::new(60);
        let now = Utc::now();
        let o = order("AAPL", 10, dec!(100));
        manager.record_order(o, now);
        assert_eq!(manager.get_position_value(&Symbol::new("AAPL")), dec!(1000));
    }
}
