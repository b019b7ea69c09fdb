#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments)]

//! # Analytics - Trade Journal and Performance Metrics
//!
//! [`PerformanceTracker`] records every fill, tracks realized and unrealized
//! P&L per symbol, samples the equity curve at a configurable
//! [`RecordingInterval`], and folds it all into a [`PerformanceMetrics`]
//! snapshot (Sharpe ratio, max drawdown, win rate, profit factor, ...).

/// Individual metric value types (Sharpe, win rate, profit factor, drawdown).
pub mod metric;

/// [`PerformanceMetrics`], the computed snapshot returned by [`tracker::PerformanceTracker::calculate_metrics`].
pub mod metrics;

/// [`interval::RecordingInterval`], the equity-curve sampling granularity.
pub mod interval;

/// Internal open-position tracking with unrealized P&L.
pub mod position;

/// [`trade::Trade`], a single executed fill.
pub mod trade;

/// [`tracker::PerformanceTracker`], the tracker itself.
pub mod tracker;

pub use interval::RecordingInterval;
pub use metrics::PerformanceMetrics;
pub use position::Position;
pub use trade::Trade;
pub use tracker::{EquitySample, PerformanceTracker};
