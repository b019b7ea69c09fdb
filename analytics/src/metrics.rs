use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of strategy performance, as returned by
/// [`crate::tracker::PerformanceTracker::calculate_metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Closed P&L plus unrealized P&L on still-open positions.
    pub total_pnl: Decimal,
    pub total_return: Decimal,
    pub total_return_pct: Decimal,
    pub sharpe_ratio: Decimal,
    pub max_drawdown: Decimal,
    pub max_drawdown_pct: Decimal,
    /// Percentage (0-100) of closed trades that were profitable.
    pub win_rate: Decimal,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    pub profit_factor: Decimal,
    pub initial_capital: Decimal,
    pub final_capital: Decimal,
}
