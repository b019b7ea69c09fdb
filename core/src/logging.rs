//! Standardized logging setup, `RUST_LOG`-driven, human-readable or JSON.
//!
//! ```rust,ignore
//! use tradecore_core::logging::init_logging;
//!
//! fn main() {
//!     init_logging();
//!     tracing::info!("trading engine started");
//! }
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes human-readable logging, defaulting to INFO when `RUST_LOG` is unset.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer())
        .init()
}

/// Initializes JSON logging for aggregators / observability pipelines.
pub fn init_json_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
        .init()
}
