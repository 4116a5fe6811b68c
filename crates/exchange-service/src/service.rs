//! Service spawn and the caller-facing handle.
//!
//! [`ExchangeService::spawn`] starts the engine task;
//! [`ExchangeHandle`] is the cloneable front callers use. One async
//! method per engine operation, each completing when the engine has
//! committed (or rejected) it.

use exchange_core::{
    AccountId, Amount, AssetId, CancelEvent, DepositEvent, ExchangeError, Order, OrderEvent,
    OrderId, TokenError, TradeEvent, WithdrawEvent,
};
use tokio::sync::{mpsc, oneshot};

use crate::config::Config;
use crate::engine_task;
use crate::types::{EventRx, ExchangeRequest, RequestTx, SubscriberId};

/// Errors surfaced by [`ExchangeHandle`] methods.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The engine rejected the operation; nothing was mutated.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// The token custody ledger rejected an administrative operation.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The engine task is no longer running.
    #[error("exchange engine task is no longer running")]
    Disconnected,
}

/// Spawns the single engine task that owns all ledger state.
pub struct ExchangeService;

impl ExchangeService {
    /// Start the engine with the given configuration and return a
    /// handle to it. The task runs until the last handle is dropped.
    pub fn spawn(config: Config) -> ExchangeHandle {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        tokio::spawn(engine_task::run_engine_loop(request_rx, config));
        ExchangeHandle {
            requests: request_tx,
        }
    }
}

/// Cloneable handle to the engine task.
#[derive(Debug, Clone)]
pub struct ExchangeHandle {
    requests: RequestTx,
}

impl ExchangeHandle {
    /// Send one request and await its reply.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ExchangeRequest,
    ) -> Result<T, ServiceError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.requests
            .send(build(reply_tx))
            .map_err(|_| ServiceError::Disconnected)?;
        reply_rx.await.map_err(|_| ServiceError::Disconnected)
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Credit native value to the caller's exchange balance.
    pub async fn deposit_native(
        &self,
        caller: AccountId,
        amount: Amount,
    ) -> Result<DepositEvent, ServiceError> {
        let result = self
            .request(|reply| ExchangeRequest::DepositNative {
                caller,
                amount,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Deposit a non-native token out of the caller's approved holding.
    pub async fn deposit_token(
        &self,
        caller: AccountId,
        asset: AssetId,
        amount: Amount,
    ) -> Result<DepositEvent, ServiceError> {
        let result = self
            .request(|reply| ExchangeRequest::DepositToken {
                caller,
                asset,
                amount,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Withdraw native value back to the caller.
    pub async fn withdraw_native(
        &self,
        caller: AccountId,
        amount: Amount,
    ) -> Result<WithdrawEvent, ServiceError> {
        let result = self
            .request(|reply| ExchangeRequest::WithdrawNative {
                caller,
                amount,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Withdraw a non-native token back to the caller's holding.
    pub async fn withdraw_token(
        &self,
        caller: AccountId,
        asset: AssetId,
        amount: Amount,
    ) -> Result<WithdrawEvent, ServiceError> {
        let result = self
            .request(|reply| ExchangeRequest::WithdrawToken {
                caller,
                asset,
                amount,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Place an order. Returns the event carrying the assigned id.
    pub async fn make_order(
        &self,
        caller: AccountId,
        asset_wanted: AssetId,
        amount_wanted: Amount,
        asset_offered: AssetId,
        amount_offered: Amount,
    ) -> Result<OrderEvent, ServiceError> {
        let result = self
            .request(|reply| ExchangeRequest::MakeOrder {
                caller,
                asset_wanted,
                amount_wanted,
                asset_offered,
                amount_offered,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Fill an open order in full.
    pub async fn fill_order(
        &self,
        taker: AccountId,
        id: OrderId,
    ) -> Result<TradeEvent, ServiceError> {
        let result = self
            .request(|reply| ExchangeRequest::FillOrder { taker, id, reply })
            .await?;
        Ok(result?)
    }

    /// Cancel an open order.
    pub async fn cancel_order(
        &self,
        caller: AccountId,
        id: OrderId,
    ) -> Result<CancelEvent, ServiceError> {
        let result = self
            .request(|reply| ExchangeRequest::CancelOrder { caller, id, reply })
            .await?;
        Ok(result?)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Exchange balance of `user` in `asset`.
    pub async fn balance_of(&self, asset: AssetId, user: AccountId) -> Result<Amount, ServiceError> {
        self.request(|reply| ExchangeRequest::BalanceOf { asset, user, reply })
            .await
    }

    /// Number of orders ever created.
    pub async fn order_count(&self) -> Result<u64, ServiceError> {
        self.request(|reply| ExchangeRequest::OrderCount { reply })
            .await
    }

    /// Look up an order by id.
    pub async fn order(&self, id: OrderId) -> Result<Option<Order>, ServiceError> {
        self.request(|reply| ExchangeRequest::GetOrder { id, reply })
            .await
    }

    /// Whether `id` names a filled order.
    pub async fn order_filled(&self, id: OrderId) -> Result<bool, ServiceError> {
        self.request(|reply| ExchangeRequest::OrderFilled { id, reply })
            .await
    }

    /// Whether `id` names a cancelled order.
    pub async fn order_cancelled(&self, id: OrderId) -> Result<bool, ServiceError> {
        self.request(|reply| ExchangeRequest::OrderCancelled { id, reply })
            .await
    }

    /// Snapshot of all still-open orders, in creation order.
    pub async fn open_orders(&self) -> Result<Vec<Order>, ServiceError> {
        self.request(|reply| ExchangeRequest::OpenOrders { reply })
            .await
    }

    // -------------------------------------------------------------------------
    // Token custody administration (demos and tests)
    // -------------------------------------------------------------------------

    /// Issue token units to an external holding.
    pub async fn mint(
        &self,
        asset: AssetId,
        account: AccountId,
        amount: Amount,
    ) -> Result<(), ServiceError> {
        let result = self
            .request(|reply| ExchangeRequest::Mint {
                asset,
                account,
                amount,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Approve the exchange to pull from `owner`'s holding.
    pub async fn approve(
        &self,
        asset: AssetId,
        owner: AccountId,
        amount: Amount,
    ) -> Result<(), ServiceError> {
        self.request(|reply| ExchangeRequest::Approve {
            asset,
            owner,
            amount,
            reply,
        })
        .await
    }

    /// External (non-custodial) token holding of `account`.
    pub async fn token_balance_of(
        &self,
        asset: AssetId,
        account: AccountId,
    ) -> Result<Amount, ServiceError> {
        self.request(|reply| ExchangeRequest::TokenBalanceOf {
            asset,
            account,
            reply,
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Event subscription
    // -------------------------------------------------------------------------

    /// Register a subscriber. Events committed after registration are
    /// delivered in commit order with no gaps.
    pub async fn subscribe(&self) -> Result<(SubscriberId, EventRx), ServiceError> {
        self.request(|reply| ExchangeRequest::Subscribe { reply })
            .await
    }

    /// Deregister a subscriber; its channel closes once drained.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let _ = self.requests.send(ExchangeRequest::Unsubscribe { id });
    }
}
