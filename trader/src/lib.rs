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

//! # Trader - Strategy Contract
//!
//! Core abstractions for trading strategies: the [`Strategy`] trait and its
//! [`Signal`] output type. Concrete implementations live in the `strategies`
//! crate.

pub mod signal;
pub mod strategy;

pub use signal::Signal;
pub use strategy::Strategy;
