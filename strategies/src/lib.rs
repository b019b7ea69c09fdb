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

//! # Strategies - Concrete Strategy implementations
//!
//! Each concrete strategy is gated behind its own feature flag so a minimal
//! build can exclude it; [`MovingAverageCrossover`] ships on by default as
//! the worked example other indicator-driven strategies would follow.

#[cfg(feature = "moving_average")]
pub mod moving_average;

#[cfg(feature = "moving_average")]
pub use moving_average::MovingAverageCrossover;
