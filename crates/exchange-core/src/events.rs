//! Events emitted by the exchange.
//!
//! Every committed operation produces exactly one of these; failed
//! operations produce none. Subscribers replay the stream to
//! reconstruct balances, the order book, and trade history, so
//! delivery order must match commit order.

use crate::asset::{AccountId, Amount, AssetId};
use crate::order::OrderId;

/// Funds credited to a user's exchange balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositEvent {
    pub asset: AssetId,
    pub user: AccountId,
    pub amount: Amount,
    /// The user's balance in `asset` after the deposit.
    pub balance: Amount,
}

/// Funds debited from a user's exchange balance and returned to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawEvent {
    pub asset: AssetId,
    pub user: AccountId,
    pub amount: Amount,
    /// The user's balance in `asset` after the withdrawal.
    pub balance: Amount,
}

/// A new order was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEvent {
    pub id: OrderId,
    pub user: AccountId,
    pub asset_wanted: AssetId,
    pub amount_wanted: Amount,
    pub asset_offered: AssetId,
    pub amount_offered: Amount,
    pub timestamp: u64,
}

/// An order was filled.
///
/// `creator` is the maker whose order this was; `taker` is the account
/// that filled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeEvent {
    pub id: OrderId,
    pub creator: AccountId,
    pub asset_wanted: AssetId,
    pub amount_wanted: Amount,
    pub asset_offered: AssetId,
    pub amount_offered: Amount,
    pub taker: AccountId,
    pub timestamp: u64,
}

/// An open order was cancelled by its creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelEvent {
    pub id: OrderId,
    pub user: AccountId,
    pub asset_wanted: AssetId,
    pub amount_wanted: Amount,
    pub asset_offered: AssetId,
    pub amount_offered: Amount,
    pub timestamp: u64,
}

/// Any committed exchange event, for carrying a mixed stream through
/// one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeEvent {
    Deposit(DepositEvent),
    Withdraw(WithdrawEvent),
    Order(OrderEvent),
    Trade(TradeEvent),
    Cancel(CancelEvent),
}

impl From<DepositEvent> for ExchangeEvent {
    fn from(event: DepositEvent) -> Self {
        ExchangeEvent::Deposit(event)
    }
}

impl From<WithdrawEvent> for ExchangeEvent {
    fn from(event: WithdrawEvent) -> Self {
        ExchangeEvent::Withdraw(event)
    }
}

impl From<OrderEvent> for ExchangeEvent {
    fn from(event: OrderEvent) -> Self {
        ExchangeEvent::Order(event)
    }
}

impl From<TradeEvent> for ExchangeEvent {
    fn from(event: TradeEvent) -> Self {
        ExchangeEvent::Trade(event)
    }
}

impl From<CancelEvent> for ExchangeEvent {
    fn from(event: CancelEvent) -> Self {
        ExchangeEvent::Cancel(event)
    }
}
