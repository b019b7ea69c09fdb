//! Individual performance metrics, each a small value type with a
//! `calculate` constructor. [`crate::tracker::PerformanceTracker`] composes
//! these into a [`crate::metrics::PerformanceMetrics`] snapshot.

/// Maximum peak-to-trough decline over an equity curve.
pub mod drawdown;

/// Gross profit over gross loss across closed trades.
pub mod profit_factor;

/// Mean per-period return over its standard deviation.
pub mod sharpe;

/// Fraction of closed trades that were profitable.
pub mod win_rate;
