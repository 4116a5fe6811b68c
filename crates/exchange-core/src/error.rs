//! Error taxonomy for ledger operations.
//!
//! Every operation either commits fully and emits exactly one event, or
//! fails with one of these and mutates nothing. There is no partial
//! success and no internal retry; callers decide whether to resubmit.

use crate::asset::{AccountId, Amount, AssetId};
use crate::order::OrderId;
use crate::token::TokenError;

/// Failure classes surfaced by [`Exchange`](crate::exchange::Exchange)
/// operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    /// No order has ever been assigned this id.
    #[error("order {id} does not exist")]
    NotFound { id: OrderId },

    /// Only the order's creator may cancel it.
    #[error("{caller} is not the creator of order {id}")]
    Unauthorized { id: OrderId, caller: AccountId },

    /// The order has already been filled or cancelled; terminal states
    /// admit no further transitions.
    #[error("order {id} is already filled or cancelled")]
    AlreadyFinal { id: OrderId },

    /// A debit would take a balance below zero.
    #[error("{account} holds {available} of {asset}, needed {needed}")]
    InsufficientFunds {
        asset: AssetId,
        account: AccountId,
        needed: Amount,
        available: Amount,
    },

    /// The native sentinel was routed through the token deposit or
    /// withdraw path.
    #[error("the native asset cannot be moved through the token path")]
    InvalidAsset,

    /// Checked arithmetic failed; the operation is rejected rather than
    /// allowed to wrap.
    #[error("arithmetic overflow in balance or fee computation")]
    Overflow,

    /// The external token ledger refused a custody transfer during a
    /// deposit or withdrawal.
    #[error("external token transfer failed: {0}")]
    ExternalTransferFailed(#[from] TokenError),
}
