//! Orchestrator tying a [`Gateway`], a [`Strategy`], and the risk/portfolio/
//! analytics layers into a single-threaded event loop.
//!
//! [`TradingEngine`] never owns the gateway exclusively: it shares it (`Rc`)
//! with the callback closures it registers, so a callback invoked from
//! inside [`Gateway::run`] can call back into [`Gateway::submit_order`] on
//! the same instance. Its own state (strategy, risk, portfolio, analytics)
//! lives behind a second, internal `Rc<RefCell<..>>` for the same reason:
//! both the market-data callback and the order-update callback need to
//! mutate it from inside one synchronous call stack.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use tradecore_analytics::{PerformanceMetrics, PerformanceTracker};
use tradecore_execution::Gateway;
use tradecore_markets::{Action, MarketDataEvent, Order, OrderId, OrderStatus, Side};
use tradecore_portfolio::Portfolio;
use tradecore_risk::OrderManager;
use tradecore_trader::Strategy;

use crate::error::EngineError;

struct EngineState {
    strategy: Box<dyn Strategy>,
    order_manager: OrderManager,
    portfolio: Portfolio,
    tracker: PerformanceTracker,
    /// Order ids seen at least once, so a first sighting is recognized
    /// regardless of what status it arrives with.
    known_orders: HashSet<OrderId>,
}

/// Single-threaded trading loop: on each tick, mark positions, sample
/// equity, ask the strategy for signals, validate and submit them; on each
/// order update, advance the fill state machine and apply deltas to the
/// portfolio and trade journal.
pub struct TradingEngine {
    gateway: Rc<dyn Gateway>,
    state: Rc<RefCell<EngineState>>,
}

impl TradingEngine {
    pub fn new(
        gateway: Rc<dyn Gateway>,
        strategy: Box<dyn Strategy>,
        order_manager: OrderManager,
        portfolio: Portfolio,
        tracker: PerformanceTracker,
    ) -> Self {
        Self {
            gateway,
            state: Rc::new(RefCell::new(EngineState {
                strategy,
                order_manager,
                portfolio,
                tracker,
                known_orders: HashSet::new(),
            })),
        }
    }

    /// Connects the gateway and drains its event loop, subscribing this
    /// engine's callbacks first. Returns once the gateway's `run` returns
    /// (stream exhausted, or `disconnect` called from another thread).
    pub fn run(&self) -> Result<(), EngineError> {
        let md_gateway = Rc::clone(&self.gateway);
        let md_state = Rc::clone(&self.state);
        self.gateway.subscribe_market_data(Box::new(move |tick| {
            on_market_data(&md_gateway, &md_state, tick);
        }));

        let ou_state = Rc::clone(&self.state);
        self.gateway.subscribe_order_updates(Box::new(move |order| {
            on_order_update(&ou_state, order);
        }));

        self.gateway.connect()?;
        self.gateway.run()?;
        Ok(())
    }

    pub fn portfolio_snapshot(&self) -> Portfolio {
        self.state.borrow().portfolio.clone()
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        self.state.borrow().tracker.calculate_metrics()
    }
}

fn on_market_data(gateway: &Rc<dyn Gateway>, state: &Rc<RefCell<EngineState>>, tick: &MarketDataEvent) {
    let signals = {
        let mut s = state.borrow_mut();
        s.tracker.update_mark(&tick.symbol, tick.price);
        let portfolio = s.portfolio.clone();
        s.tracker.record_portfolio_value(&portfolio, tick.timestamp);
        s.strategy.generate_signals(tick)
    };

    for signal in signals {
        if signal.action == Action::Hold || signal.quantity == 0 {
            continue;
        }
        let order = Order::new(signal.symbol.clone(), signal.quantity, signal.limit_price);

        let validation = {
            let mut s = state.borrow_mut();
            let portfolio = s.portfolio.clone();
            s.order_manager.validate(&order, &portfolio, tick.timestamp)
        };

        match validation {
            Ok(()) => {
                if let Err(error) = gateway.submit_order(order) {
                    tracing::warn!(%error, symbol = %signal.symbol, "gateway rejected order submission");
                }
            }
            Err(error) => {
                tracing::warn!(symbol = %signal.symbol, %error, "order failed risk validation, dropping");
            }
        }
    }
}

fn on_order_update(state: &Rc<RefCell<EngineState>>, order: &Order) {
    let Some(id) = order.id.clone() else {
        tracing::warn!("order update received with no id, dropping");
        return;
    };
    let now = Utc::now();
    let mut s = state.borrow_mut();

    if s.known_orders.insert(id.clone()) {
        // First sighting: register as freshly admitted with zero fills,
        // regardless of the status this particular update carries, so the
        // delta computed below (if any) is never clobbered by a registration
        // that already "knew about" this fill.
        let mut registration = order.clone();
        registration.status = OrderStatus::Active;
        registration.filled_quantity = 0;
        s.order_manager.record_order(registration, now);
    }

    match order.status {
        OrderStatus::Pending => {}
        OrderStatus::Active | OrderStatus::PartiallyFilled | OrderStatus::Filled => {
            apply_fill_delta(&mut s, order, &id, now);
            if order.status == OrderStatus::Filled {
                s.known_orders.remove(&id);
            }
        }
        OrderStatus::Canceled | OrderStatus::Failed => {
            s.order_manager.remove(&id);
            s.known_orders.remove(&id);
        }
    }
}

fn apply_fill_delta(state: &mut EngineState, order: &Order, id: &OrderId, now: DateTime<Utc>) {
    let Some((new_delta, _remaining)) = state.order_manager.update_fill(id, order.filled_quantity) else {
        tracing::warn!(order_id = %id, "fill update for an order the risk layer is not tracking");
        return;
    };

    if new_delta == 0 {
        return;
    }

    let signed_delta = match order.side() {
        Side::Buy => new_delta as i64,
        Side::Sell => -(new_delta as i64),
    };

    let mut delta_order = order.clone();
    delta_order.quantity = signed_delta;
    delta_order.status = OrderStatus::Filled;

    if let Err(error) = Portfolio::reject_unless_fillable(&delta_order) {
        tracing::warn!(%error, order_id = %id, "fill delta not fillable, skipping portfolio update");
        return;
    }

    match state.portfolio.apply_fill(&delta_order) {
        Ok(()) => state.tracker.record_trade(order, signed_delta, now),
        Err(error) => {
            tracing::warn!(%error, order_id = %id, "failed to apply fill to portfolio, skipping");
        }
    }
}
