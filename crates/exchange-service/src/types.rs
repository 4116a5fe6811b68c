//! Shared types for the exchange service.
//!
//! This module defines:
//! - `SubscriberId`: a lightweight handle for event subscribers
//! - `ExchangeRequest`: commands flowing into the engine task
//! - channel aliases between handles, the engine task, and subscribers

use exchange_core::{
    AccountId, Amount, AssetId, CancelEvent, DepositEvent, ExchangeError, ExchangeEvent, Order,
    OrderEvent, OrderId, TokenError, TradeEvent, WithdrawEvent,
};
use tokio::sync::{mpsc, oneshot};

/// Identifier for an event subscriber.
///
/// Opaque; unique for the lifetime of the engine task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Committed events flowing from the engine task to one subscriber.
///
/// Unbounded FIFO: nothing is dropped, nothing is reordered.
pub type EventTx = mpsc::UnboundedSender<ExchangeEvent>;
pub type EventRx = mpsc::UnboundedReceiver<ExchangeEvent>;

/// A command into the engine task, carrying its reply channel.
///
/// Mutations reply with the committed event or the rejection; reads
/// reply with a snapshot taken under the same serialization as every
/// mutation.
#[derive(Debug)]
pub enum ExchangeRequest {
    DepositNative {
        caller: AccountId,
        amount: Amount,
        reply: oneshot::Sender<Result<DepositEvent, ExchangeError>>,
    },
    DepositToken {
        caller: AccountId,
        asset: AssetId,
        amount: Amount,
        reply: oneshot::Sender<Result<DepositEvent, ExchangeError>>,
    },
    WithdrawNative {
        caller: AccountId,
        amount: Amount,
        reply: oneshot::Sender<Result<WithdrawEvent, ExchangeError>>,
    },
    WithdrawToken {
        caller: AccountId,
        asset: AssetId,
        amount: Amount,
        reply: oneshot::Sender<Result<WithdrawEvent, ExchangeError>>,
    },
    MakeOrder {
        caller: AccountId,
        asset_wanted: AssetId,
        amount_wanted: Amount,
        asset_offered: AssetId,
        amount_offered: Amount,
        reply: oneshot::Sender<Result<OrderEvent, ExchangeError>>,
    },
    FillOrder {
        taker: AccountId,
        id: OrderId,
        reply: oneshot::Sender<Result<TradeEvent, ExchangeError>>,
    },
    CancelOrder {
        caller: AccountId,
        id: OrderId,
        reply: oneshot::Sender<Result<CancelEvent, ExchangeError>>,
    },

    BalanceOf {
        asset: AssetId,
        user: AccountId,
        reply: oneshot::Sender<Amount>,
    },
    OrderCount {
        reply: oneshot::Sender<u64>,
    },
    GetOrder {
        id: OrderId,
        reply: oneshot::Sender<Option<Order>>,
    },
    OrderFilled {
        id: OrderId,
        reply: oneshot::Sender<bool>,
    },
    OrderCancelled {
        id: OrderId,
        reply: oneshot::Sender<bool>,
    },
    OpenOrders {
        reply: oneshot::Sender<Vec<Order>>,
    },

    // Token-ledger administration for demos and tests; the custody
    // ledger lives with the engine task so these serialize with
    // everything else.
    Mint {
        asset: AssetId,
        account: AccountId,
        amount: Amount,
        reply: oneshot::Sender<Result<(), TokenError>>,
    },
    Approve {
        asset: AssetId,
        owner: AccountId,
        amount: Amount,
        reply: oneshot::Sender<()>,
    },
    TokenBalanceOf {
        asset: AssetId,
        account: AccountId,
        reply: oneshot::Sender<Amount>,
    },

    Subscribe {
        reply: oneshot::Sender<(SubscriberId, EventRx)>,
    },
    Unsubscribe {
        id: SubscriberId,
    },
}

/// Channel from handles into the engine task.
pub type RequestTx = mpsc::UnboundedSender<ExchangeRequest>;
pub type RequestRx = mpsc::UnboundedReceiver<ExchangeRequest>;
