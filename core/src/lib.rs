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

//! # Core - Trading Engine Orchestrator
//!
//! Wires a [`tradecore_execution::Gateway`], a [`tradecore_trader::Strategy`],
//! and the risk/portfolio/analytics layers into the single-threaded event
//! loop defined by [`engine::TradingEngine`]. Also owns the JSON
//! [`config::Config`] format for a trading run and standardized logging
//! setup.

/// JSON configuration: gateway mode, strategy selection, and risk limits.
pub mod config;

/// Aggregated error type for a trading run.
pub mod error;

/// [`engine::TradingEngine`], the market-data/order-update orchestrator.
pub mod engine;

/// Tracing-based logging initializers.
pub mod logging;

/// Graceful shutdown primitives.
pub mod shutdown;

pub use config::Config;
pub use engine::TradingEngine;
pub use error::EngineError;
