use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::{Decimal, MathematicalOps};
use tradecore_markets::{Order, Symbol};
use tradecore_portfolio::Portfolio;

use crate::interval::{BucketKey, RecordingInterval};
use crate::metric::drawdown::DrawdownTracker;
use crate::metric::profit_factor::ProfitFactor;
use crate::metric::sharpe::SharpeRatio;
use crate::metric::win_rate::WinRate;
use crate::metrics::PerformanceMetrics;
use crate::position::Position;
use crate::trade::Trade;

/// One point on the equity curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquitySample {
    pub timestamp: DateTime<Utc>,
    pub value: Decimal,
}

/// Trade journal, realized/unrealized P&L tracking, equity curve sampling,
/// and performance-metric calculation for a single backtest or live run.
///
/// Mirrors [`Portfolio`] but keeps a separate, reporting-oriented view: where
/// `Portfolio` answers "what do I own right now", this answers "how has the
/// strategy performed over time".
#[derive(Debug, Clone)]
pub struct PerformanceTracker {
    initial_capital: Decimal,
    current_capital: Decimal,
    trades: Vec<Trade>,
    equity_curve: Vec<EquitySample>,
    positions: IndexMap<Symbol, Position>,
    closed_pnls: Vec<Decimal>,
    current_prices: IndexMap<Symbol, Decimal>,
    recording_interval: RecordingInterval,
    last_bucket: Option<BucketKey>,
    sample_ordinal: u64,
}

impl PerformanceTracker {
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            current_capital: initial_capital,
            trades: Vec::new(),
            equity_curve: Vec::new(),
            positions: IndexMap::new(),
            closed_pnls: Vec::new(),
            current_prices: IndexMap::new(),
            recording_interval: RecordingInterval::Tick,
            last_bucket: None,
            sample_ordinal: 0,
        }
    }

    pub fn with_recording_interval(mut self, interval: RecordingInterval) -> Self {
        self.recording_interval = interval;
        self
    }

    /// Records an executed trade: `delta_quantity` is the signed size of
    /// *this* execution, not the order's total size (a partial fill is
    /// recorded once per delta as it arrives).
    pub fn record_trade(&mut self, order: &Order, delta_quantity: i64, timestamp: DateTime<Utc>) {
        if delta_quantity == 0 {
            return;
        }
        let trade = Trade::from_fill(order, delta_quantity, timestamp);
        tracing::debug!(symbol = %trade.symbol, delta_quantity, price = %trade.price, "trade recorded");
        self.update_position(&trade);
        self.trades.push(trade);
    }

    fn update_position(&mut self, trade: &Trade) {
        let symbol = trade.symbol.clone();

        let Some(pos) = self.positions.get_mut(&symbol) else {
            self.positions
                .insert(symbol, Position::new(trade.symbol.clone(), trade.quantity, trade.price));
            return;
        };

        let old_quantity = pos.quantity;
        let new_quantity = old_quantity + trade.quantity;

        if new_quantity == 0 {
            let pnl = if old_quantity > 0 {
                (trade.price - pos.avg_entry_price) * Decimal::from(old_quantity.abs())
            } else {
                (pos.avg_entry_price - trade.price) * Decimal::from(old_quantity.abs())
            };
            self.closed_pnls.push(pnl);
            self.positions.shift_remove(&symbol);
            return;
        }

        let same_direction = (old_quantity > 0 && trade.quantity > 0) || (old_quantity < 0 && trade.quantity < 0);
        if same_direction {
            let total_cost = pos.avg_entry_price * Decimal::from(old_quantity.abs())
                + trade.price * Decimal::from(trade.quantity.abs());
            pos.avg_entry_price = total_cost / Decimal::from(new_quantity.abs());
        }
        pos.quantity = new_quantity;
        pos.current_price = trade.price;
    }

    /// Updates the last-seen mark for `symbol`, used both for open-position
    /// unrealized P&L and as a fallback mark in [`Portfolio::value`].
    pub fn update_mark(&mut self, symbol: &Symbol, price: Decimal) {
        self.current_prices.insert(symbol.clone(), price);
        if let Some(pos) = self.positions.get_mut(symbol) {
            pos.current_price = price;
        }
    }

    /// Appends an [`EquitySample`] if `timestamp` falls in a new bucket under
    /// the configured [`RecordingInterval`]; otherwise a no-op.
    pub fn record_portfolio_value(&mut self, portfolio: &Portfolio, timestamp: DateTime<Utc>) {
        let bucket = self.recording_interval.bucket_key(timestamp, self.sample_ordinal);
        if self.last_bucket == Some(bucket) {
            return;
        }
        self.last_bucket = Some(bucket);
        self.sample_ordinal += 1;

        let value = portfolio.value(&self.current_prices);
        self.equity_curve.push(EquitySample { timestamp, value });
        self.current_capital = value;
    }

    pub fn calculate_metrics(&self) -> PerformanceMetrics {
        if self.trades.is_empty() {
            return PerformanceMetrics {
                initial_capital: self.initial_capital,
                final_capital: self.current_capital,
                ..Default::default()
            };
        }

        let winning_trades = self.closed_pnls.iter().filter(|pnl| **pnl > Decimal::ZERO).count();
        let losing_trades = self.closed_pnls.iter().filter(|pnl| **pnl < Decimal::ZERO).count();
        let closed_trades = self.closed_pnls.len();

        let closed_pnl_sum: Decimal = self.closed_pnls.iter().sum();
        let unrealized_pnl: Decimal = self.positions.values().map(Position::unrealized_pnl).sum();
        let total_pnl = closed_pnl_sum + unrealized_pnl;

        let total_return = self.current_capital - self.initial_capital;
        let total_return_pct = if self.initial_capital > Decimal::ZERO {
            total_return / self.initial_capital * Decimal::from(100)
        } else {
            Decimal::ZERO
        };

        let win_rate = WinRate::calculate(Decimal::from(winning_trades as i64), Decimal::from(closed_trades as i64))
            .map(|w| w.value * Decimal::from(100))
            .unwrap_or(Decimal::ZERO);

        let wins: Vec<Decimal> = self.closed_pnls.iter().copied().filter(|pnl| *pnl > Decimal::ZERO).collect();
        let losses: Vec<Decimal> = self.closed_pnls.iter().copied().filter(|pnl| *pnl < Decimal::ZERO).collect();

        let avg_win = if wins.is_empty() {
            Decimal::ZERO
        } else {
            wins.iter().sum::<Decimal>() / Decimal::from(wins.len() as i64)
        };
        let avg_loss = if losses.is_empty() {
            Decimal::ZERO
        } else {
            (losses.iter().sum::<Decimal>() / Decimal::from(losses.len() as i64)).abs()
        };

        let gross_profit: Decimal = wins.iter().sum();
        let gross_loss: Decimal = losses.iter().map(|l| l.abs()).sum();
        let profit_factor = ProfitFactor::calculate(gross_profit, gross_loss).value;

        let sharpe_ratio = self.calculate_sharpe_ratio().value;
        let (max_drawdown, max_drawdown_pct) = self.calculate_drawdown();

        PerformanceMetrics {
            total_trades: self.trades.len(),
            winning_trades,
            losing_trades,
            total_pnl,
            total_return,
            total_return_pct,
            sharpe_ratio,
            max_drawdown,
            max_drawdown_pct,
            win_rate,
            avg_win,
            avg_loss,
            profit_factor,
            initial_capital: self.initial_capital,
            final_capital: self.current_capital,
        }
    }

    fn calculate_sharpe_ratio(&self) -> SharpeRatio {
        if self.equity_curve.len() < 2 {
            return SharpeRatio::default();
        }

        let returns: Vec<Decimal> = self
            .equity_curve
            .windows(2)
            .filter_map(|pair| {
                let prev = pair[0].value;
                let curr = pair[1].value;
                (prev > Decimal::ZERO).then(|| (curr - prev) / prev)
            })
            .collect();

        if returns.is_empty() {
            return SharpeRatio::default();
        }

        let n = Decimal::from(returns.len() as i64);
        let mean = returns.iter().sum::<Decimal>() / n;
        let variance = returns.iter().map(|r| (*r - mean) * (*r - mean)).sum::<Decimal>() / n;
        let std_dev = variance.sqrt().unwrap_or(Decimal::ZERO);

        SharpeRatio::calculate(Decimal::ZERO, mean, std_dev)
    }

    fn calculate_drawdown(&self) -> (Decimal, Decimal) {
        let mut tracker = DrawdownTracker::new(self.initial_capital);
        for sample in &self.equity_curve {
            tracker.observe(sample.value);
        }
        let result = tracker.result();
        (result.value, result.value_pct)
    }

    pub fn get_equity_curve_data(&self) -> &[EquitySample] {
        &self.equity_curve
    }

    pub fn get_trade_history(&self) -> &[Trade] {
        &self.trades
    }

    pub fn get_open_positions(&self) -> &IndexMap<Symbol, Position> {
        &self.positions
    }

    pub fn reset(&mut self) {
        self.trades.clear();
        self.equity_curve.clear();
        self.positions.clear();
        self.closed_pnls.clear();
        self.current_prices.clear();
        self.last_bucket = None;
        self.sample_ordinal = 0;
        self.current_capital = self.initial_capital;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tradecore_markets::{Order, OrderStatus};

    fn filled(symbol: &str, quantity: i64, price: Decimal) -> Order {
        let mut o = Order::new(Symbol::new(symbol), quantity, price);
        o.status = OrderStatus::Filled;
        o.filled_quantity = quantity.unsigned_abs();
        o
    }

    #[test]
    fn round_trip_realizes_pnl_and_closes_position() {
        let mut tracker = PerformanceTracker::new(dec!(10_000));
        let now = Utc::now();

        tracker.record_trade(&filled("AAPL", 10, dec!(100)), 10, now);
        assert_eq!(tracker.get_open_positions().len(), 1);

        tracker.record_trade(&filled("AAPL", -10, dec!(110)), -10, now);
        assert!(tracker.get_open_positions().is_empty());

        let metrics = tracker.calculate_metrics();
        assert_eq!(metrics.total_trades, 2);
        assert_eq!(metrics.winning_trades, 1);
        assert_eq!(metrics.total_pnl, dec!(100));
    }

    #[test]
    fn unrealized_pnl_folds_into_total_pnl() {
        let mut tracker = PerformanceTracker::new(dec!(10_000));
        let now = Utc::now();
        tracker.record_trade(&filled("AAPL", 10, dec!(100)), 10, now);
        tracker.update_mark(&Symbol::new("AAPL"), dec!(120));

        let metrics = tracker.calculate_metrics();
        assert_eq!(metrics.total_pnl, dec!(200));
    }

    #[test]
    fn drawdown_matches_expected_scenario() {
        let mut tracker = PerformanceTracker::new(dec!(100_000)).with_recording_interval(RecordingInterval::Tick);
        let portfolio_marks = [dec!(100_000), dec!(110_000), dec!(95_000), dec!(105_000)];
        let now = Utc::now();
        for (i, v) in portfolio_marks.iter().enumerate() {
            let portfolio = Portfolio::new(*v);
            tracker.record_portfolio_value(&portfolio, now + chrono::Duration::seconds(i as i64));
        }

        let (max_drawdown, max_drawdown_pct) = tracker.calculate_drawdown();
        assert_eq!(max_drawdown, dec!(15_000));
        assert!((max_drawdown_pct - dec!(13.636363636363636363636363636)).abs() < dec!(0.001));
    }

    #[test]
    fn no_trades_returns_default_metrics_with_capital_fields() {
        let tracker = PerformanceTracker::new(dec!(5_000));
        let metrics = tracker.calculate_metrics();
        assert_eq!(metrics.total_trades, 0);
        assert_eq!(metrics.initial_capital, dec!(5_000));
        assert_eq!(metrics.final_capital, dec!(5_000));
    }
}
