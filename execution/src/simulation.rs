use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tradecore_markets::{MarketDataEvent, Order, OrderStatus, Symbol};

use crate::audit::{AuditEventKind, AuditRow, AuditSink};
use crate::error::GatewayError;
use crate::gateway::{Gateway, MarketDataCallback, OrderUpdateCallback};
use crate::matching::MatchingEngine;

/// Backtest gateway driven by a preloaded, time-ordered sequence of
/// [`MarketDataEvent`]s. Orders are either routed through an optional
/// [`MatchingEngine`] or filled immediately at the order's limit price.
///
/// All mutable state lives behind `RefCell`/`Cell`/atomics so `submit_order`
/// can be called reentrant from inside a market-data callback fired by `run`.
pub struct SimulationGateway {
    data: RefCell<VecDeque<MarketDataEvent>>,
    matching_engine: RefCell<Option<MatchingEngine>>,
    connected: Arc<AtomicBool>,
    market_data_callbacks: RefCell<Vec<MarketDataCallback>>,
    order_update_callbacks: RefCell<Vec<OrderUpdateCallback>>,
    audit_sink: RefCell<Option<Box<dyn AuditSink>>>,
    last_tick: RefCell<HashMap<Symbol, (chrono::DateTime<Utc>, Decimal)>>,
    next_ordinal: RefCell<u64>,
}

impl std::fmt::Debug for SimulationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationGateway")
            .field("remaining_ticks", &self.data.borrow().len())
            .field("connected", &self.connected.load(Ordering::Relaxed))
            .field("has_matching_engine", &self.matching_engine.borrow().is_some())
            .finish()
    }
}

impl SimulationGateway {
    pub fn new(data: impl IntoIterator<Item = MarketDataEvent>) -> Self {
        Self {
            data: RefCell::new(data.into_iter().collect()),
            matching_engine: RefCell::new(None),
            connected: Arc::new(AtomicBool::new(false)),
            market_data_callbacks: RefCell::new(Vec::new()),
            order_update_callbacks: RefCell::new(Vec::new()),
            audit_sink: RefCell::new(None),
            last_tick: RefCell::new(HashMap::new()),
            next_ordinal: RefCell::new(0),
        }
    }

    pub fn with_matching_engine(self, engine: MatchingEngine) -> Self {
        *self.matching_engine.borrow_mut() = Some(engine);
        self
    }

    /// Returns a clone of the cooperative shutdown flag; setting it `false`
    /// from another thread causes [`Gateway::run`] to return at the next tick.
    pub fn connected_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.connected)
    }

    fn audit(&self, row: AuditRow) {
        if let Some(sink) = self.audit_sink.borrow_mut().as_mut() {
            if let Err(error) = sink.record(row) {
                tracing::warn!(%error, "failed to write audit row");
            }
        }
    }

    fn publish_order_update(&self, order: &Order) {
        for callback in self.order_update_callbacks.borrow_mut().iter_mut() {
            callback(order);
        }
    }
}

impl Gateway for SimulationGateway {
    fn subscribe_market_data(&self, callback: MarketDataCallback) {
        self.market_data_callbacks.borrow_mut().push(callback);
    }

    fn subscribe_order_updates(&self, callback: OrderUpdateCallback) {
        self.order_update_callbacks.borrow_mut().push(callback);
    }

    fn submit_order(&self, mut order: Order) -> Result<(), GatewayError> {
        if !self.connected.load(Ordering::Relaxed) {
            return Err(GatewayError::NotConnected);
        }

        if order.id.is_none() {
            let mut ordinal = self.next_ordinal.borrow_mut();
            order.id = Some(tradecore_markets::OrderId::new(format!("sim_{}", *ordinal)));
            *ordinal += 1;
        }

        self.audit(AuditRow {
            wallclock: Utc::now(),
            event: AuditEventKind::Sent,
            symbol: order.symbol.clone(),
            quantity: order.quantity,
            price: order.limit_price,
            order_id: order.id.clone(),
            status: order.status,
            note: String::new(),
        });

        let settled = match self.matching_engine.borrow_mut().as_mut() {
            Some(engine) => engine.process_order(order),
            None => {
                order.filled_quantity = order.unsigned_quantity();
                order.status = OrderStatus::Filled;
                order
            }
        };

        match settled.status {
            OrderStatus::Filled => self.audit(AuditRow {
                wallclock: Utc::now(),
                event: AuditEventKind::Filled,
                symbol: settled.symbol.clone(),
                quantity: settled.quantity,
                price: settled.limit_price,
                order_id: settled.id.clone(),
                status: settled.status,
                note: String::new(),
            }),
            OrderStatus::Canceled | OrderStatus::Failed => self.audit(AuditRow {
                wallclock: Utc::now(),
                event: AuditEventKind::Cancelled,
                symbol: settled.symbol.clone(),
                quantity: settled.quantity,
                price: settled.limit_price,
                order_id: settled.id.clone(),
                status: settled.status,
                note: String::new(),
            }),
            _ => {}
        }

        self.publish_order_update(&settled);
        Ok(())
    }

    fn connect(&self) -> Result<(), GatewayError> {
        self.connected.store(true, Ordering::Relaxed);
        tracing::info!(remaining_ticks = self.data.borrow().len(), "simulation gateway connected");
        Ok(())
    }

    fn disconnect(&self) -> Result<(), GatewayError> {
        self.connected.store(false, Ordering::Relaxed);
        tracing::info!("simulation gateway disconnected");
        Ok(())
    }

    fn run(&self) -> Result<(), GatewayError> {
        if !self.connected.load(Ordering::Relaxed) {
            return Err(GatewayError::NotConnected);
        }

        while self.connected.load(Ordering::Relaxed) {
            let Some(tick) = self.data.borrow_mut().pop_front() else {
                break;
            };

            {
                let last_tick = self.last_tick.borrow();
                if let Some((last_ts, last_price)) = last_tick.get(&tick.symbol) {
                    if *last_ts == tick.timestamp && *last_price == tick.price {
                        continue;
                    }
                }
            }
            self.last_tick
                .borrow_mut()
                .insert(tick.symbol.clone(), (tick.timestamp, tick.price));

            for callback in self.market_data_callbacks.borrow_mut().iter_mut() {
                callback(&tick);
            }
        }

        Ok(())
    }

    fn set_audit_sink(&self, sink: Box<dyn AuditSink>) {
        *self.audit_sink.borrow_mut() = Some(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tradecore_markets::Order;

    fn tick(symbol: &str, price: Decimal) -> MarketDataEvent {
        MarketDataEvent::new(Utc::now(), Symbol::new(symbol), price)
    }

    #[test]
    fn run_streams_every_tick_to_subscribers() {
        let gateway = SimulationGateway::new(vec![tick("AAPL", dec!(100)), tick("AAPL", dec!(101))]);
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        gateway.subscribe_market_data(Box::new(move |event| {
            seen_clone.lock().unwrap().push(event.price);
        }));

        gateway.connect().unwrap();
        gateway.run().unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![dec!(100), dec!(101)]);
    }

    #[test]
    fn submit_order_without_matching_engine_fills_immediately() {
        let gateway = SimulationGateway::new(Vec::new());
        gateway.connect().unwrap();

        let updates = Arc::new(std::sync::Mutex::new(Vec::new()));
        let updates_clone = Arc::clone(&updates);
        gateway.subscribe_order_updates(Box::new(move |order| {
            updates_clone.lock().unwrap().push(order.status);
        }));

        gateway
            .submit_order(Order::new(Symbol::new("AAPL"), 10, dec!(150)))
            .unwrap();

        assert_eq!(*updates.lock().unwrap(), vec![OrderStatus::Filled]);
    }

    #[test]
    fn submit_order_requires_connection() {
        let gateway = SimulationGateway::new(Vec::new());
        let err = gateway
            .submit_order(Order::new(Symbol::new("AAPL"), 10, dec!(150)))
            .unwrap_err();
        assert_eq!(err, GatewayError::NotConnected);
    }

    #[test]
    fn duplicate_consecutive_ticks_are_suppressed() {
        let ts = Utc::now();
        let gateway = SimulationGateway::new(vec![
            MarketDataEvent::new(ts, Symbol::new("AAPL"), dec!(100)),
            MarketDataEvent::new(ts, Symbol::new("AAPL"), dec!(100)),
            MarketDataEvent::new(ts, Symbol::new("AAPL"), dec!(101)),
        ]);
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        gateway.subscribe_market_data(Box::new(move |event| {
            seen_clone.lock().unwrap().push(event.price);
        }));

        gateway.connect().unwrap();
        gateway.run().unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![dec!(100), dec!(101)]);
    }

    #[test]
    fn submit_order_reentrant_from_market_data_callback() {
        let gateway = Arc::new(SimulationGateway::new(vec![tick("AAPL", dec!(100))]));
        let inner = Arc::clone(&gateway);
        gateway.subscribe_market_data(Box::new(move |event| {
            let order = Order::new(event.symbol.clone(), 1, event.price);
            inner.submit_order(order).unwrap();
        }));

        let updates = Arc::new(std::sync::Mutex::new(Vec::new()));
        let updates_clone = Arc::clone(&updates);
        gateway.subscribe_order_updates(Box::new(move |order| {
            updates_clone.lock().unwrap().push(order.status);
        }));

        gateway.connect().unwrap();
        gateway.run().unwrap();

        assert_eq!(*updates.lock().unwrap(), vec![OrderStatus::Filled]);
    }
}
