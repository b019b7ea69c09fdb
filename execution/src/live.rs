use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tradecore_markets::{MarketDataEvent, Order, OrderId, OrderStatus, Symbol};

use crate::account::AccountState;
use crate::audit::{AuditEventKind, AuditRow, AuditSink};
use crate::error::GatewayError;
use crate::gateway::{Gateway, MarketDataCallback, OrderUpdateCallback};

/// The contract a real brokerage adapter (e.g. Alpaca) must satisfy. Venue
/// specific order-status values are translated to [`OrderStatus`] by the
/// implementor; [`LiveGateway`] never sees raw venue status strings.
///
/// Kept `&mut self`: the only caller is [`LiveGateway`], which holds its
/// broker behind a `RefCell` and never exposes it further.
pub trait LiveBrokerage {
    fn connect(&mut self) -> Result<(), GatewayError>;

    fn account_state(&self) -> Result<AccountState, GatewayError>;

    /// Submits a limit order, returning the venue-assigned id.
    fn submit_limit_order(
        &mut self,
        symbol: &Symbol,
        quantity: i64,
        limit_price: Decimal,
    ) -> Result<OrderId, GatewayError>;

    /// Current cumulative status and filled quantity for a previously submitted order.
    fn order_status(&self, id: &OrderId) -> Result<(OrderStatus, u64), GatewayError>;

    /// Latest trade price for `symbol`.
    fn latest_trade(&self, symbol: &Symbol) -> Result<Decimal, GatewayError>;

    fn disconnect(&mut self) -> Result<(), GatewayError>;
}

struct TrackedOrder {
    symbol: Symbol,
    quantity: i64,
    limit_price: Decimal,
    last_known_status: OrderStatus,
    last_known_filled: u64,
}

/// [`Gateway`] wrapping a [`LiveBrokerage`], polling latest-trade prices and
/// open-order status on each loop iteration.
///
/// Production systems would replace polling with a broker push stream; this
/// mirrors the source adapter's simplified polling implementation.
///
/// All mutable state lives behind `RefCell`/atomics so `submit_order` can be
/// called reentrant from inside a market-data callback fired by `run`.
pub struct LiveGateway<B> {
    broker: RefCell<B>,
    symbols: Vec<Symbol>,
    poll_interval: Duration,
    connected: Arc<AtomicBool>,
    market_data_callbacks: RefCell<Vec<MarketDataCallback>>,
    order_update_callbacks: RefCell<Vec<OrderUpdateCallback>>,
    audit_sink: RefCell<Option<Box<dyn AuditSink>>>,
    last_tick: RefCell<HashMap<Symbol, (chrono::DateTime<Utc>, Decimal)>>,
    open_orders: RefCell<HashMap<OrderId, TrackedOrder>>,
}

impl<B> std::fmt::Debug for LiveGateway<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveGateway")
            .field("symbols", &self.symbols)
            .field("connected", &self.connected.load(Ordering::Relaxed))
            .field("open_orders", &self.open_orders.borrow().len())
            .finish()
    }
}

impl<B: LiveBrokerage> LiveGateway<B> {
    pub fn new(broker: B, symbols: Vec<Symbol>, poll_interval: Duration) -> Self {
        Self {
            broker: RefCell::new(broker),
            symbols,
            poll_interval,
            connected: Arc::new(AtomicBool::new(false)),
            market_data_callbacks: RefCell::new(Vec::new()),
            order_update_callbacks: RefCell::new(Vec::new()),
            audit_sink: RefCell::new(None),
            last_tick: RefCell::new(HashMap::new()),
            open_orders: RefCell::new(HashMap::new()),
        }
    }

    pub fn connected_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.connected)
    }

    pub fn account_state(&self) -> Result<AccountState, GatewayError> {
        self.broker.borrow().account_state()
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

    fn poll_market_data(&self) {
        for symbol in self.symbols.clone() {
            let price = match self.broker.borrow().latest_trade(&symbol) {
                Ok(price) => price,
                Err(error) => {
                    tracing::warn!(%symbol, %error, "failed to fetch latest trade");
                    continue;
                }
            };
            let now = Utc::now();
            {
                let last_tick = self.last_tick.borrow();
                if let Some((_, last_price)) = last_tick.get(&symbol) {
                    if *last_price == price {
                        continue;
                    }
                }
            }
            self.last_tick.borrow_mut().insert(symbol.clone(), (now, price));

            let tick = MarketDataEvent::new(now, symbol, price);
            for callback in self.market_data_callbacks.borrow_mut().iter_mut() {
                callback(&tick);
            }
        }
    }

    fn poll_order_updates(&self) {
        let ids: Vec<OrderId> = self.open_orders.borrow().keys().cloned().collect();
        for id in ids {
            let (status, filled) = match self.broker.borrow().order_status(&id) {
                Ok(state) => state,
                Err(error) => {
                    tracing::warn!(order_id = %id, %error, "failed to fetch order status");
                    continue;
                }
            };

            let changed = {
                let open_orders = self.open_orders.borrow();
                let tracked = open_orders.get(&id).expect("id came from open_orders keys");
                tracked.last_known_status != status || tracked.last_known_filled != filled
            };
            if !changed {
                continue;
            }

            let order = {
                let mut open_orders = self.open_orders.borrow_mut();
                let tracked = open_orders.get_mut(&id).expect("id came from open_orders keys");
                tracked.last_known_status = status;
                tracked.last_known_filled = filled;
                Order {
                    id: Some(id.clone()),
                    symbol: tracked.symbol.clone(),
                    quantity: tracked.quantity,
                    limit_price: tracked.limit_price,
                    status,
                    filled_quantity: filled,
                }
            };

            if status.is_terminal() {
                self.open_orders.borrow_mut().remove(&id);
                let event = if status == OrderStatus::Filled {
                    AuditEventKind::Filled
                } else {
                    AuditEventKind::Cancelled
                };
                self.audit(AuditRow {
                    wallclock: Utc::now(),
                    event,
                    symbol: order.symbol.clone(),
                    quantity: order.quantity,
                    price: order.limit_price,
                    order_id: order.id.clone(),
                    status: order.status,
                    note: String::new(),
                });
            }

            self.publish_order_update(&order);
        }
    }
}

impl<B: LiveBrokerage> Gateway for LiveGateway<B> {
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

        let submission = self
            .broker
            .borrow_mut()
            .submit_limit_order(&order.symbol, order.quantity, order.limit_price);

        match submission {
            Ok(id) => {
                order.id = Some(id.clone());
                order.status = OrderStatus::Pending;
                self.open_orders.borrow_mut().insert(
                    id,
                    TrackedOrder {
                        symbol: order.symbol.clone(),
                        quantity: order.quantity,
                        limit_price: order.limit_price,
                        last_known_status: OrderStatus::Pending,
                        last_known_filled: 0,
                    },
                );
                self.publish_order_update(&order);
                Ok(())
            }
            Err(error) => {
                order.status = OrderStatus::Failed;
                self.audit(AuditRow {
                    wallclock: Utc::now(),
                    event: AuditEventKind::Cancelled,
                    symbol: order.symbol.clone(),
                    quantity: order.quantity,
                    price: order.limit_price,
                    order_id: order.id.clone(),
                    status: order.status,
                    note: error.to_string(),
                });
                self.publish_order_update(&order);
                Ok(())
            }
        }
    }

    fn connect(&self) -> Result<(), GatewayError> {
        self.broker.borrow_mut().connect()?;
        self.connected.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn disconnect(&self) -> Result<(), GatewayError> {
        self.connected.store(false, Ordering::Relaxed);
        self.broker.borrow_mut().disconnect()
    }

    fn run(&self) -> Result<(), GatewayError> {
        if !self.connected.load(Ordering::Relaxed) {
            return Err(GatewayError::NotConnected);
        }

        while self.connected.load(Ordering::Relaxed) {
            self.poll_market_data();
            self.poll_order_updates();
            if !self.poll_interval.is_zero() {
                std::thread::sleep(self.poll_interval);
            } else {
                break;
            }
        }

        Ok(())
    }

    fn set_audit_sink(&self, sink: Box<dyn AuditSink>) {
        *self.audit_sink.borrow_mut() = Some(sink);
    }
}

/// In-process [`LiveBrokerage`] test double: no network calls, deterministic
/// fills driven by the test, matching the teacher's `MockExchange` pattern.
#[derive(Debug, Default)]
pub struct MockLiveGateway {
    cash: Decimal,
    positions: HashMap<Symbol, (i64, Decimal)>,
    latest_trades: HashMap<Symbol, Decimal>,
    orders: HashMap<OrderId, (OrderStatus, u64)>,
    next_ordinal: u64,
}

impl MockLiveGateway {
    pub fn new(initial_cash: Decimal) -> Self {
        Self {
            cash: initial_cash,
            ..Default::default()
        }
    }

    pub fn set_latest_trade(&mut self, symbol: Symbol, price: Decimal) {
        self.latest_trades.insert(symbol, price);
    }

    /// Test hook: force a tracked order's reported status and cumulative fill.
    pub fn set_order_state(&mut self, id: &OrderId, status: OrderStatus, filled: u64) {
        self.orders.insert(id.clone(), (status, filled));
    }
}

impl LiveBrokerage for MockLiveGateway {
    fn connect(&mut self) -> Result<(), GatewayError> {
        Ok(())
    }

    fn account_state(&self) -> Result<AccountState, GatewayError> {
        Ok(AccountState {
            cash: self.cash,
            buying_power: self.cash,
            portfolio_value: self.cash,
            positions: self
                .positions
                .iter()
                .map(|(symbol, (quantity, avg_price))| crate::account::BrokerPosition {
                    symbol: symbol.clone(),
                    quantity: *quantity,
                    avg_price: *avg_price,
                })
                .collect(),
            open_orders: Vec::new(),
        })
    }

    fn submit_limit_order(
        &mut self,
        _symbol: &Symbol,
        _quantity: i64,
        _limit_price: Decimal,
    ) -> Result<OrderId, GatewayError> {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        let id = OrderId::new(format!("mock-{ordinal}"));
        self.orders.insert(id.clone(), (OrderStatus::Active, 0));
        Ok(id)
    }

    fn order_status(&self, id: &OrderId) -> Result<(OrderStatus, u64), GatewayError> {
        self.orders
            .get(id)
            .copied()
            .ok_or_else(|| GatewayError::ExecutionFailed {
                reason: format!("unknown order {id}"),
            })
    }

    fn latest_trade(&self, symbol: &Symbol) -> Result<Decimal, GatewayError> {
        self.latest_trades
            .get(symbol)
            .copied()
            .ok_or_else(|| GatewayError::ExecutionFailed {
                reason: format!("no latest trade for {symbol}"),
            })
    }

    fn disconnect(&mut self) -> Result<(), GatewayError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn submit_order_tracks_and_reports_fill() {
        let mut broker = MockLiveGateway::new(dec!(10_000));
        broker.set_latest_trade(Symbol::new("AAPL"), dec!(100));
        let gateway = LiveGateway::new(broker, vec![Symbol::new("AAPL")], Duration::ZERO);

        let updates = Arc::new(std::sync::Mutex::new(Vec::new()));
        let updates_clone = Arc::clone(&updates);
        gateway.subscribe_order_updates(Box::new(move |order| {
            updates_clone.lock().unwrap().push(order.status);
        }));

        gateway.connect().unwrap();
        gateway
            .submit_order(Order::new(Symbol::new("AAPL"), 10, dec!(100)))
            .unwrap();

        assert_eq!(*updates.lock().unwrap(), vec![OrderStatus::Pending]);
        assert_eq!(gateway.open_orders.borrow().len(), 1);
    }

    #[test]
    fn run_polls_market_data_once_when_interval_is_zero() {
        let mut broker = MockLiveGateway::new(dec!(10_000));
        broker.set_latest_trade(Symbol::new("AAPL"), dec!(100));
        let gateway = LiveGateway::new(broker, vec![Symbol::new("AAPL")], Duration::ZERO);

        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        gateway.subscribe_market_data(Box::new(move |event| {
            seen_clone.lock().unwrap().push(event.price);
        }));

        gateway.connect().unwrap();
        gateway.run().unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![dec!(100)]);
    }

    #[test]
    fn submit_order_reentrant_from_order_update_callback() {
        let mut broker = MockLiveGateway::new(dec!(10_000));
        broker.set_latest_trade(Symbol::new("AAPL"), dec!(100));
        let gateway = Arc::new(LiveGateway::new(broker, vec![Symbol::new("AAPL")], Duration::ZERO));

        let seen_pending = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let seen_pending_clone = Arc::clone(&seen_pending);
        let inner = Arc::clone(&gateway);
        gateway.subscribe_order_updates(Box::new(move |order| {
            if order.status == OrderStatus::Pending && !seen_pending_clone.swap(true, Ordering::Relaxed) {
                let order = Order::new(order.symbol.clone(), 1, order.limit_price);
                inner.submit_order(order).unwrap();
            }
        }));

        gateway.connect().unwrap();
        gateway
            .submit_order(Order::new(Symbol::new("AAPL"), 10, dec!(100)))
            .unwrap();

        assert_eq!(gateway.open_orders.borrow().len(), 2);
    }
}
