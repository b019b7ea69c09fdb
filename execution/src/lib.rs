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

//! # Execution - Gateway, Matching Engine, and Live Brokerage Contract
//!
//! Three collaborators live here:
//! - [`gateway::Gateway`]: the subscription/submission contract every venue
//!   adapter implements.
//! - [`matching::MatchingEngine`]: probabilistic simulated fills behind
//!   [`simulation::SimulationGateway`].
//! - [`live::LiveBrokerage`]: the abstracted contract a real brokerage
//!   adapter must satisfy, wrapped by [`live::LiveGateway`].

pub mod account;
pub mod audit;
pub mod error;
pub mod gateway;
pub mod live;
pub mod matching;
pub mod simulation;

pub use account::{AccountState, BrokerOrder, BrokerPosition};
pub use audit::{AuditEventKind, AuditRow, AuditSink, CsvAuditSink, InMemoryAuditSink};
pub use error::{GatewayError, MatchingError};
pub use gateway::{Gateway, MarketDataCallback, OrderUpdateCallback};
pub use live::{LiveBrokerage, LiveGateway, MockLiveGateway};
pub use matching::MatchingEngine;
pub use simulation::SimulationGateway;
