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

//! # Markets - Core Data Model
//!
//! The leaf crate of the tradecore workspace: symbols, sides, orders, order
//! status, and the market-data tick. Every other crate in the workspace
//! depends on this one; this crate depends on nothing in the workspace.

use derive_more::Display;

/// Defines the [`Side`] of an order (Buy or Sell).
pub mod side;

/// Defines [`Symbol`], the opaque instrument identifier used throughout the engine.
pub mod symbol;

/// Defines [`Order`], [`OrderStatus`], and [`Action`].
pub mod order;

/// Defines [`MarketDataEvent`], a single tick of the market-data stream.
pub mod event;

pub use event::MarketDataEvent;
pub use order::{Action, Order, OrderId, OrderStatus};
pub use side::Side;
pub use symbol::Symbol;

/// Monotonically increasing sequence used to order admissions into an
/// [`tradecore_data::book::OrderBook`] or matching engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Display)]
#[display("{_0}")]
pub struct Sequence(pub u64);

impl Sequence {
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns the current value and advances the counter by one.
    pub fn fetch_add(&mut self) -> Sequence {
        let current = *self;
        self.0 += 1;
        current
    }
}
