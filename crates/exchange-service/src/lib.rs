//! exchange-service
//!
//! Async front for the exchange ledger engine: a single tokio task owns
//! all ledger state and processes every operation serially, callers use
//! a cloneable handle, and committed events fan out to subscribers in
//! commit order.

pub mod config;
pub mod service;
pub mod types;

// internal module, not re-exported
mod engine_task;

pub use config::Config;
pub use service::{ExchangeHandle, ExchangeService, ServiceError};
pub use types::SubscriberId;
