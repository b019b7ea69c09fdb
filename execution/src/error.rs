use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`crate::gateway::Gateway`] implementations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Error)]
pub enum GatewayError {
    #[error("gateway is not connected")]
    NotConnected,

    #[error("execution failed: {reason}")]
    ExecutionFailed { reason: String },

    #[error("data source error: {reason}")]
    DataSourceError { reason: String },
}

/// Errors raised by [`crate::matching::MatchingEngine`] configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Error)]
pub enum MatchingError {
    #[error("cancel_rate and partial_fill_rate must each be in [0, 1] and sum to at most 1")]
    InvalidRates,
}
