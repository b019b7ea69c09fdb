//! JSON configuration for a trading run: which gateway to use, which
//! strategy to run, and the risk limits [`tradecore_risk::OrderManager`]
//! enforces. Brokerage credentials are deliberately absent here — they come
//! from environment variables at the live adapter, never from this file.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradecore_markets::Symbol;
use tradecore_risk::OrderManager;
use tradecore_strategies::MovingAverageCrossover;
use tradecore_trader::Strategy;

use crate::error::EngineError;

fn default_initial_capital() -> Decimal {
    Decimal::from(100_000)
}

fn default_max_orders_per_minute() -> usize {
    60
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    Simulation,
    Live,
}

/// Where market data comes from and which symbols to watch.
///
/// `csv_path`/`data_dir` are simulation-mode inputs; parsing them into
/// `MarketDataEvent`s is left to the caller that wires up a
/// `SimulationGateway` (see the crate's external-interfaces notes) — this
/// struct only carries the location.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GatewayConfig {
    pub mode: GatewayMode,
    #[serde(default)]
    pub csv_path: Option<PathBuf>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
}

/// Opaque strategy selector: `type` picks the kind, everything else is a
/// strategy-specific parameter.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StrategyConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl StrategyConfig {
    fn usize_param(&self, key: &str, default: usize) -> usize {
        self.params
            .get(key)
            .and_then(serde_json::Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(default)
    }

    fn i64_param(&self, key: &str, default: i64) -> i64 {
        self.params
            .get(key)
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(default)
    }

    /// Instantiates the strategy named by `type`.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] for an unrecognized `type`.
    pub fn build(&self) -> Result<Box<dyn Strategy>, EngineError> {
        match self.kind.as_str() {
            "moving_average" => {
                let short_window = self.usize_param("short_window", 3);
                let long_window = self.usize_param("long_window", 5);
                let quantity = self.i64_param("quantity", 10);
                Ok(Box::new(MovingAverageCrossover::new(short_window, long_window, quantity)))
            }
            other => Err(EngineError::Config {
                reason: format!("unrecognized strategy type: {other}"),
            }),
        }
    }
}

/// Top-level configuration for a trading run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub strategy: StrategyConfig,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: Decimal,
    #[serde(default = "default_max_orders_per_minute")]
    pub max_orders_per_minute: usize,
    #[serde(default)]
    pub max_position_size: Option<Decimal>,
    #[serde(default)]
    pub max_order_value: Option<Decimal>,
}

impl Config {
    /// Parses a [`Config`] from a JSON string.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] on malformed JSON or a cross-field
    /// invariant violation (e.g. `gateway.mode == "simulation"` with neither
    /// `csv_path` nor `data_dir` set).
    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(raw).map_err(|error| EngineError::Config {
            reason: error.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.gateway.mode == GatewayMode::Simulation
            && self.gateway.csv_path.is_none()
            && self.gateway.data_dir.is_none()
        {
            return Err(EngineError::Config {
                reason: "gateway.mode is \"simulation\" but neither csv_path nor data_dir is set".to_string(),
            });
        }
        Ok(())
    }

    /// Builds the [`OrderManager`] this configuration describes.
    pub fn build_order_manager(&self) -> OrderManager {
        let mut manager = OrderManager::new(self.max_orders_per_minute);
        if let Some(limit) = self.max_order_value {
            manager = manager.with_max_order_value(limit);
        }
        if let Some(limit) = self.max_position_size {
            manager = manager.with_max_position_size(limit);
        }
        manager
    }
}
