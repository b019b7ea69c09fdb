//! Central error type for the trading engine, aggregating the error enum
//! each downstream crate exposes at its root.

use thiserror::Error;
use tradecore_execution::{GatewayError, MatchingError};
use tradecore_portfolio::PortfolioError;
use tradecore_risk::RiskError;

/// Aggregates every downstream crate error behind a single type, the way a
/// caller outside the workspace sees the engine fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("matching engine error: {0}")]
    Matching(#[from] MatchingError),

    #[error("risk check failed: {0}")]
    Risk(#[from] RiskError),

    #[error("portfolio error: {0}")]
    Portfolio(#[from] PortfolioError),

    #[error("configuration error: {reason}")]
    Config { reason: String },
}
