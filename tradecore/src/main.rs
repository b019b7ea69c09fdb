use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use tradecore_analytics::PerformanceTracker;
use tradecore_core::config::GatewayMode;
use tradecore_core::{Config, TradingEngine};
use tradecore_execution::{Gateway, InMemoryAuditSink, SimulationGateway};
use tradecore_markets::{MarketDataEvent, Symbol};
use tradecore_portfolio::Portfolio;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Runs a trading strategy against a simulated or live gateway.
#[derive(Parser, Debug)]
#[command(name = "tradecore", about = "Event-driven trading engine")]
struct Args {
    /// Path to the JSON run configuration.
    #[arg(long)]
    config: PathBuf,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn init_logging(level: LogLevel) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::filter::EnvFilter::new(level.as_filter()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Reads `timestamp,symbol,price` rows from a CSV file. A header row (any
/// line whose price field fails to parse as a `Decimal`) is skipped.
/// Parsing the broader CSV ecosystem (quoting, multiple schemas) is left to
/// whatever collaborator produces these files; this engine only needs the
/// three columns it consumes.
fn load_simulation_ticks(path: &PathBuf) -> Result<Vec<MarketDataEvent>, String> {
    let contents = fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    let mut ticks = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split(',');
        let (Some(ts), Some(symbol), Some(price)) = (fields.next(), fields.next(), fields.next()) else {
            continue;
        };
        let (Ok(timestamp), Ok(price)) = (
            chrono::DateTime::parse_from_rfc3339(ts).map(|dt| dt.with_timezone(&chrono::Utc)),
            Decimal::from_str(price),
        ) else {
            continue;
        };
        ticks.push(MarketDataEvent::new(timestamp, Symbol::new(symbol), price));
    }
    Ok(ticks)
}

fn run(args: Args) -> Result<(), String> {
    let raw = fs::read_to_string(&args.config).map_err(|e| format!("reading {}: {e}", args.config.display()))?;
    let config = Config::from_json(&raw).map_err(|e| e.to_string())?;

    let strategy = config.strategy.build().map_err(|e| e.to_string())?;
    let order_manager = config.build_order_manager();
    let portfolio = Portfolio::new(config.initial_capital);
    let tracker = PerformanceTracker::new(config.initial_capital);

    let gateway: Rc<dyn Gateway> = match config.gateway.mode {
        GatewayMode::Simulation => {
            let path = config
                .gateway
                .csv_path
                .clone()
                .ok_or_else(|| "gateway.csv_path is required in simulation mode".to_string())?;
            let ticks = load_simulation_ticks(&path)?;
            tracing::info!(ticks = ticks.len(), path = %path.display(), "loaded simulation ticks");
            let gateway = SimulationGateway::new(ticks);
            gateway.set_audit_sink(Box::new(InMemoryAuditSink::new()));
            Rc::new(gateway)
        }
        GatewayMode::Live => {
            return Err(
                "live mode requires a LiveBrokerage adapter linked by the caller; none is bundled here"
                    .to_string(),
            )
        }
    };

    let engine = TradingEngine::new(gateway, strategy, order_manager, portfolio, tracker);
    engine.run().map_err(|e| e.to_string())?;

    let metrics = engine.metrics();
    tracing::info!(
        final_capital = %metrics.final_capital,
        total_pnl = %metrics.total_pnl,
        total_trades = metrics.total_trades,
        max_drawdown = %metrics.max_drawdown,
        "run complete"
    );

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_level);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "run failed");
            ExitCode::FAILURE
        }
    }
}
