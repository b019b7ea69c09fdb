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

//! # Data - Price-Time Priority Order Book
//!
//! One [`book::OrderBook`] per symbol. Cancellation and modification are
//! lazy: a heap entry is only discarded when it would otherwise surface at
//! the top, rather than being spliced out of the middle of the heap.

pub mod book;
pub mod error;

pub use book::{Depth, OrderBook};
pub use error::DataError;
