use tradecore_markets::{MarketDataEvent, Order};

use crate::audit::AuditSink;
use crate::error::GatewayError;

pub type MarketDataCallback = Box<dyn FnMut(&MarketDataEvent)>;
pub type OrderUpdateCallback = Box<dyn FnMut(&Order)>;

/// Publishes market data and routes order submissions, publishing order
/// updates back. Implementations drive a single-threaded event loop: all
/// callbacks run synchronously on the thread that calls [`Gateway::run`].
///
/// Methods take `&self`: implementations hold their mutable state behind
/// interior mutability (`RefCell`/`Cell`/atomics) so that a callback invoked
/// from inside [`Gateway::run`] can call back into [`Gateway::submit_order`]
/// on the same instance without a borrow conflict — the orchestrator that
/// drives the loop and the callback it registered share one `Gateway`, not
/// two halves of it.
pub trait Gateway {
    /// Registers a callback invoked for every [`MarketDataEvent`], in stream order.
    fn subscribe_market_data(&self, callback: MarketDataCallback);

    /// Registers a callback invoked for every order status transition.
    fn subscribe_order_updates(&self, callback: OrderUpdateCallback);

    /// Admits `order` for execution. Assigns `order.id` if unset.
    ///
    /// # Errors
    /// Returns [`GatewayError::NotConnected`] if called outside `[connect, disconnect)`.
    fn submit_order(&self, order: Order) -> Result<(), GatewayError>;

    fn connect(&self) -> Result<(), GatewayError>;

    fn disconnect(&self) -> Result<(), GatewayError>;

    /// Blocking event loop draining the data source until exhausted or
    /// cooperatively signalled to stop via `disconnect`.
    fn run(&self) -> Result<(), GatewayError>;

    /// Installs an audit sink recording SENT/MODIFIED/CANCELLED/FILLED rows.
    fn set_audit_sink(&self, sink: Box<dyn AuditSink>);
}
