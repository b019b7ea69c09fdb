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

//! # Risk - Order Validation and Exposure Tracking
//!
//! [`OrderManager`] is the gate every order passes through before
//! `Gateway::submit_order`: capital sufficiency, submission rate, per-order
//! notional, and per-symbol committed exposure.

pub mod error;
pub mod order_manager;

pub use error::RiskError;
pub use order_manager::OrderManager;
