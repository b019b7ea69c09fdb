use std::fmt;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tradecore_markets::{OrderId, OrderStatus, Symbol};

use crate::error::GatewayError;

/// The four order lifecycle events an audit sink records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    Sent,
    Modified,
    Cancelled,
    Filled,
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sent => "SENT",
            Self::Modified => "MODIFIED",
            Self::Cancelled => "CANCELLED",
            Self::Filled => "FILLED",
        };
        write!(f, "{s}")
    }
}

/// One append-only audit row: `(wallclock, event, symbol, qty, price, id, status, note)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRow {
    pub wallclock: DateTime<Utc>,
    pub event: AuditEventKind,
    pub symbol: Symbol,
    pub quantity: i64,
    pub price: Decimal,
    pub order_id: Option<OrderId>,
    pub status: OrderStatus,
    pub note: String,
}

/// Append-only record of order lifecycle events. Implementations must never
/// drop or reorder rows; `run()` depends on audit completeness for post-hoc
/// reconciliation.
pub trait AuditSink: fmt::Debug + Send {
    fn record(&mut self, row: AuditRow) -> Result<(), GatewayError>;
}

/// In-memory [`AuditSink`], primarily for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    rows: Vec<AuditRow>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[AuditRow] {
        &self.rows
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, row: AuditRow) -> Result<(), GatewayError> {
        self.rows.push(row);
        Ok(())
    }
}

/// `std::fs`-backed [`AuditSink`]: a single CSV file, header written once,
/// flushed after every row.
#[derive(Debug)]
pub struct CsvAuditSink {
    path: PathBuf,
}

impl CsvAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, GatewayError> {
        let path = path.into();
        let needs_header = !path.exists() || std::fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GatewayError::ExecutionFailed {
                reason: e.to_string(),
            })?;
        }

        if needs_header {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| GatewayError::ExecutionFailed {
                    reason: e.to_string(),
                })?;
            writeln!(file, "timestamp,event,symbol,quantity,price,order_id,status,notes").map_err(
                |e| GatewayError::ExecutionFailed {
                    reason: e.to_string(),
                },
            )?;
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for CsvAuditSink {
    fn record(&mut self, row: AuditRow) -> Result<(), GatewayError> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| GatewayError::ExecutionFailed {
                reason: e.to_string(),
            })?;

        writeln!(
            file,
            "{},{},{},{},{},{},{},{}",
            row.wallclock.to_rfc3339(),
            row.event,
            row.symbol,
            row.quantity,
            row.price,
            row.order_id.map(|id| id.to_string()).unwrap_or_default(),
            row.status,
            row.note,
        )
        .map_err(|e| GatewayError::ExecutionFailed {
            reason: e.to_string(),
        })?;
        file.flush().map_err(|e| GatewayError::ExecutionFailed {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn in_memory_sink_records_rows_in_order() {
        let mut sink = InMemoryAuditSink::new();
        sink.record(AuditRow {
            wallclock: Utc::now(),
            event: AuditEventKind::Sent,
            symbol: Symbol::new("AAPL"),
            quantity: 10,
            price: dec!(100),
            order_id: None,
            status: OrderStatus::Pending,
            note: String::new(),
        })
        .unwrap();
        sink.record(AuditRow {
            wallclock: Utc::now(),
            event: AuditEventKind::Filled,
            symbol: Symbol::new("AAPL"),
            quantity: 10,
            price: dec!(100),
            order_id: Some(OrderId::new("1")),
            status: OrderStatus::Filled,
            note: String::new(),
        })
        .unwrap();

        assert_eq!(sink.rows().len(), 2);
        assert_eq!(sink.rows()[0].event, AuditEventKind::Sent);
        assert_eq!(sink.rows()[1].event, AuditEventKind::Filled);
    }
}
