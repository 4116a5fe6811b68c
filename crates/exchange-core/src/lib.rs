//! exchange-core
//!
//! Pure custodial exchange ledger:
//! - asset / account identifiers and raw integer amounts
//! - per-user, per-asset balance ledger
//! - central order book with all-or-nothing fills and a taker fee
//! - one typed event per committed operation

pub mod asset;
pub mod error;
pub mod events;
pub mod exchange;
pub mod order;
pub mod token;

pub use asset::{units, AccountId, Amount, AssetId};
pub use error::ExchangeError;
pub use events::{
    CancelEvent,
    DepositEvent,
    ExchangeEvent,
    OrderEvent,
    TradeEvent,
    WithdrawEvent,
};
pub use exchange::Exchange;
pub use order::{Order, OrderId, OrderStatus};
pub use token::{InMemoryTokenLedger, TokenError, TokenLedger};
