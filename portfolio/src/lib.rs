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

//! # Portfolio - Cash and Holdings Accounting
//!
//! A [`Portfolio`] tracks cash and per-symbol [`Holding`]s, applying filled
//! orders and exposing mark-to-market valuation. It never calls out to a
//! gateway or a risk layer; it is pure bookkeeping.

pub mod error;
pub mod holding;

pub use error::PortfolioError;
pub use holding::Holding;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use tradecore_markets::{Order, OrderStatus, Symbol};

/// Cash and holdings accounting for a single trading run.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    cash: Decimal,
    holdings: IndexMap<Symbol, Holding>,
}

impl Portfolio {
    pub fn new(initial_cash: Decimal) -> Self {
        Self {
            cash: initial_cash,
            holdings: IndexMap::new(),
        }
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn get_holding(&self, symbol: &Symbol) -> Option<&Holding> {
        self.holdings.get(symbol)
    }

    /// Read-only snapshot of every open holding, for reporting collaborators.
    pub fn get_all_holdings(&self) -> &IndexMap<Symbol, Holding> {
        &self.holdings
    }

    /// Pure check mirroring [`Portfolio::apply_fill`] without mutation.
    ///
    /// Buys require `cash >= price * quantity`; sells require the current
    /// holding's quantity to cover `|quantity|`.
    pub fn can_execute(&self, order: &Order) -> bool {
        if order.quantity > 0 {
            self.cash >= order.notional()
        } else {
            let held = self
                .holdings
                .get(&order.symbol)
                .map(|h| h.quantity)
                .unwrap_or(0);
            held >= order.unsigned_quantity() as i64
        }
    }

    /// Applies a filled order's signed quantity at its limit price.
    ///
    /// # Preconditions
    /// `fill_order.status == Filled` is the caller's responsibility to
    /// arrange (the delta already applied by the order manager); this method
    /// only enforces the cash and holding invariants.
    pub fn apply_fill(&mut self, fill_order: &Order) -> Result<(), PortfolioError> {
        let cost = fill_order.limit_price * Decimal::from(fill_order.quantity);
        let new_cash = self.cash - cost;
        if new_cash < Decimal::ZERO {
            tracing::warn!(
                symbol = %fill_order.symbol,
                required = %cost,
                available = %self.cash,
                "fill rejected: insufficient cash"
            );
            return Err(PortfolioError::InsufficientCash {
                required: cost,
                available: self.cash,
            });
        }

        self.add_holding(
            fill_order.symbol.clone(),
            fill_order.quantity,
            fill_order.limit_price,
        )?;
        self.cash = new_cash;
        Ok(())
    }

    /// Adds a signed quantity at `price` to the holding for `symbol`,
    /// updating `avg_price` by weighted average when the addition is in the
    /// same direction as the existing position. Reductions never change
    /// `avg_price`. A holding that nets to zero is removed.
    fn add_holding(
        &mut self,
        symbol: Symbol,
        quantity: i64,
        price: Decimal,
    ) -> Result<(), PortfolioError> {
        let holding = self
            .holdings
            .entry(symbol.clone())
            .or_insert_with(|| Holding::new(0, Decimal::ZERO));

        let old_qty = holding.quantity;
        let new_qty = old_qty + quantity;

        if old_qty > 0 && new_qty < 0 || old_qty < 0 && new_qty > 0 {
            return Err(PortfolioError::InsufficientHoldings {
                symbol,
                held: old_qty,
                requested: quantity,
            });
        }

        if new_qty == 0 {
            self.holdings.shift_remove(&symbol);
            return Ok(());
        }

        let same_direction = old_qty == 0 || (old_qty > 0) == (quantity > 0);
        if same_direction {
            let total_cost =
                holding.avg_price * Decimal::from(old_qty.abs()) + price * Decimal::from(quantity.abs());
            holding.avg_price = total_cost / Decimal::from(new_qty.abs());
        }
        holding.quantity = new_qty;

        Ok(())
    }

    /// Total value: cash plus the sum of `quantity * mark` across holdings,
    /// falling back to a holding's own `avg_price` where no mark is present.
    pub fn value(&self, marks: &IndexMap<Symbol, Decimal>) -> Decimal {
        let holdings_value: Decimal = self
            .holdings
            .iter()
            .map(|(symbol, holding)| {
                let mark = marks.get(symbol).copied().unwrap_or(holding.avg_price);
                Decimal::from(holding.quantity) * mark
            })
            .sum();
        self.cash + holdings_value
    }

    /// Overwrites cash and holdings atomically, used by a live adapter at startup.
    pub fn sync_state(&mut self, cash: Decimal, positions: IndexMap<Symbol, Holding>) {
        self.cash = cash;
        self.holdings = positions;
    }

    /// Rejects fills for orders that are not actually `Filled`/`PartiallyFilled`
    /// deltas; callers pass only the delta quantity already applied.
    pub fn reject_unless_fillable(order: &Order) -> Result<(), PortfolioError> {
        match order.status {
            OrderStatus::Filled | OrderStatus::PartiallyFilled => Ok(()),
            other => Err(PortfolioError::NotFillable(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tradecore_markets::OrderStatus;

    fn filled_order(symbol: &str, quantity: i64, price: Decimal) -> Order {
        let mut order = Order::new(Symbol::new(symbol), quantity, price);
        order.status = OrderStatus::Filled;
        order.filled_quantity = quantity.unsigned_abs();
        order
    }

    #[test]
    fn buy_then_sell_same_quantity_empties_holding() {
        let mut portfolio = Portfolio::new(dec!(10_000));
        portfolio
            .apply_fill(&filled_order("AAPL", 10, dec!(100)))
            .unwrap();
        assert_eq!(portfolio.cash(), dec!(9_000));
        assert_eq!(portfolio.get_holding(&Symbol::new("AAPL")).unwrap().quantity, 10);

        portfolio
            .apply_fill(&filled_order("AAPL", -10, dec!(110)))
            .unwrap();
        assert_eq!(portfolio.cash(), dec!(10_100));
        assert!(portfolio.get_holding(&Symbol::new("AAPL")).is_none());
    }

    #[test]
    fn weighted_average_price_on_same_direction_adds() {
        let mut portfolio = Portfolio::new(dec!(100_000));
        portfolio
            .apply_fill(&filled_order("AAPL", 10, dec!(100)))
            .unwrap();
        portfolio
            .apply_fill(&filled_order("AAPL", 10, dec!(200)))
            .unwrap();
        let holding = portfolio.get_holding(&Symbol::new("AAPL")).unwrap();
        assert_eq!(holding.quantity, 20);
        assert_eq!(holding.avg_price, dec!(150));
    }

    #[test]
    fn reduction_does_not_change_avg_price() {
        let mut portfolio = Portfolio::new(dec!(100_000));
        portfolio
            .apply_fill(&filled_order("AAPL", 10, dec!(100)))
            .unwrap();
        portfolio
            .apply_fill(&filled_order("AAPL", -4, dec!(500)))
            .unwrap();
        let holding = portfolio.get_holding(&Symbol::new("AAPL")).unwrap();
        assert_eq!(holding.quantity, 6);
        assert_eq!(holding.avg_price, dec!(100));
    }

    #[test]
    fn selling_more_than_held_is_rejected() {
        let mut portfolio = Portfolio::new(dec!(100_000));
        portfolio
            .apply_fill(&filled_order("AAPL", 5, dec!(100)))
            .unwrap();
        let err = portfolio
            .apply_fill(&filled_order("AAPL", -10, dec!(100)))
            .unwrap_err();
        assert!(matches!(err, PortfolioError::InsufficientHoldings { .. }));
    }

    #[test]
    fn buying_beyond_cash_is_rejected() {
        let mut portfolio = Portfolio::new(dec!(100));
        let err = portfolio
            .apply_fill(&filled_order("AAPL", 10, dec!(100)))
            .unwrap_err();
        assert!(matches!(err, PortfolioError::InsufficientCash { .. }));
    }

    #[test]
    fn value_falls_back_to_avg_price_without_a_mark() {
        let mut portfolio = Portfolio::new(dec!(10_000));
        portfolio
            .apply_fill(&filled_order("AAPL", 10, dec!(100)))
            .unwrap();
        let marks = IndexMap::new();
        assert_eq!(portfolio.value(&marks), dec!(10_000));
    }
}
