//! Graceful shutdown of engine components.
//!
//! The engine's event loop is single-threaded and synchronous (see
//! [`crate::engine`]), so there is no async shutdown variant here: every
//! component shuts down immediately on the calling thread.

use serde::{Deserialize, Serialize};

/// A component that can release its resources synchronously.
pub trait SyncShutdown {
    type Result;

    fn shutdown(&mut self) -> Self::Result;
}

/// Marker signalling a graceful shutdown was requested.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize)]
pub struct Shutdown;
