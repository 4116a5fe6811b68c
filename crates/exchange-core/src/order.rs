//! Order records kept by the exchange.
//!
//! Orders are append-only: once created they are never removed, only
//! marked filled or cancelled, so historical ids stay queryable.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::asset::{AccountId, Amount, AssetId};

/// Identifier of an order, assigned sequentially from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of an order.
///
/// `Open` orders may be filled or cancelled; `Filled` and `Cancelled`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Open,
    Filled,
    Cancelled,
}

impl OrderStatus {
    /// Returns `true` once no further transition is possible.
    pub fn is_final(self) -> bool {
        !matches!(self, OrderStatus::Open)
    }
}

/// A resting order on the exchange.
///
/// The creator wants to receive `amount_wanted` of `asset_wanted` in
/// exchange for `amount_offered` of `asset_offered`. Nothing is
/// reserved at creation time; the offered balance is only debited when
/// the order fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub creator: AccountId,

    pub asset_wanted: AssetId,
    pub amount_wanted: Amount,
    pub asset_offered: AssetId,
    pub amount_offered: Amount,

    /// Unix timestamp (seconds) at creation. Creation order is what
    /// matters; the wall-clock value is for display.
    pub timestamp: u64,

    pub status: OrderStatus,
}

impl Order {
    /// Current unix timestamp in seconds.
    pub fn current_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
