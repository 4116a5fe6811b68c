//! Central engine loop.
//!
//! This task owns the [`Exchange`] and its token custody ledger and
//! processes every `ExchangeRequest` serially, which is what makes each
//! operation atomic with respect to all others. For every committed
//! mutation it publishes the event to all subscribers before replying,
//! so subscriber streams follow commit order exactly; rejections are
//! replied to the caller only and publish nothing.

use std::collections::HashMap;

use exchange_core::{Exchange, ExchangeError, ExchangeEvent, InMemoryTokenLedger};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::config::Config;
use crate::types::{EventTx, ExchangeRequest, RequestRx, SubscriberId};

/// Run the engine processing loop until every handle is dropped.
pub(crate) async fn run_engine_loop(mut requests: RequestRx, config: Config) {
    let mut exchange = Exchange::new(config.fee_account, config.fee_percent);
    let mut tokens = InMemoryTokenLedger::new();

    let mut subscribers: HashMap<SubscriberId, EventTx> = HashMap::new();
    let mut next_subscriber: u64 = 1;

    info!(
        fee_account = %config.fee_account,
        fee_percent = config.fee_percent,
        "exchange engine started"
    );

    while let Some(request) = requests.recv().await {
        match request {
            ExchangeRequest::DepositNative {
                caller,
                amount,
                reply,
            } => {
                let result = exchange.deposit_native(caller, amount);
                finish(&mut subscribers, reply, result);
            }
            ExchangeRequest::DepositToken {
                caller,
                asset,
                amount,
                reply,
            } => {
                let result = exchange.deposit_token(&mut tokens, caller, asset, amount);
                finish(&mut subscribers, reply, result);
            }
            ExchangeRequest::WithdrawNative {
                caller,
                amount,
                reply,
            } => {
                let result = exchange.withdraw_native(caller, amount);
                finish(&mut subscribers, reply, result);
            }
            ExchangeRequest::WithdrawToken {
                caller,
                asset,
                amount,
                reply,
            } => {
                let result = exchange.withdraw_token(&mut tokens, caller, asset, amount);
                finish(&mut subscribers, reply, result);
            }
            ExchangeRequest::MakeOrder {
                caller,
                asset_wanted,
                amount_wanted,
                asset_offered,
                amount_offered,
                reply,
            } => {
                let result = exchange.make_order(
                    caller,
                    asset_wanted,
                    amount_wanted,
                    asset_offered,
                    amount_offered,
                );
                finish(&mut subscribers, reply, result);
            }
            ExchangeRequest::FillOrder { taker, id, reply } => {
                let result = exchange.fill_order(taker, id);
                finish(&mut subscribers, reply, result);
            }
            ExchangeRequest::CancelOrder { caller, id, reply } => {
                let result = exchange.cancel_order(caller, id);
                finish(&mut subscribers, reply, result);
            }

            ExchangeRequest::BalanceOf { asset, user, reply } => {
                let _ = reply.send(exchange.balance_of(asset, user));
            }
            ExchangeRequest::OrderCount { reply } => {
                let _ = reply.send(exchange.order_count());
            }
            ExchangeRequest::GetOrder { id, reply } => {
                let _ = reply.send(exchange.order(id).cloned());
            }
            ExchangeRequest::OrderFilled { id, reply } => {
                let _ = reply.send(exchange.order_filled(id));
            }
            ExchangeRequest::OrderCancelled { id, reply } => {
                let _ = reply.send(exchange.order_cancelled(id));
            }
            ExchangeRequest::OpenOrders { reply } => {
                let _ = reply.send(exchange.open_orders().cloned().collect());
            }

            ExchangeRequest::Mint {
                asset,
                account,
                amount,
                reply,
            } => {
                let _ = reply.send(tokens.mint(asset, account, amount));
            }
            ExchangeRequest::Approve {
                asset,
                owner,
                amount,
                reply,
            } => {
                tokens.approve(asset, owner, amount);
                let _ = reply.send(());
            }
            ExchangeRequest::TokenBalanceOf {
                asset,
                account,
                reply,
            } => {
                let _ = reply.send(tokens.balance_of(asset, account));
            }

            ExchangeRequest::Subscribe { reply } => {
                let id = SubscriberId(next_subscriber);
                next_subscriber += 1;

                let (event_tx, event_rx) = mpsc::unbounded_channel();
                subscribers.insert(id, event_tx);
                debug!(subscriber = id.0, "subscriber registered");
                let _ = reply.send((id, event_rx));
            }
            ExchangeRequest::Unsubscribe { id } => {
                subscribers.remove(&id);
                debug!(subscriber = id.0, "subscriber removed");
            }
        }
    }

    info!("exchange engine loop shutting down (request channel closed)");
}

/// Publish a committed event to every subscriber, then reply to the
/// caller. Failed operations publish nothing.
fn finish<E>(
    subscribers: &mut HashMap<SubscriberId, EventTx>,
    reply: oneshot::Sender<Result<E, ExchangeError>>,
    result: Result<E, ExchangeError>,
) where
    E: Clone + Into<ExchangeEvent> + std::fmt::Debug,
{
    match &result {
        Ok(event) => {
            info!(?event, "operation committed");
            publish(subscribers, event.clone().into());
        }
        Err(error) => {
            debug!(%error, "operation rejected");
        }
    }
    let _ = reply.send(result);
}

/// Fan one event out to all live subscribers, pruning any that have
/// gone away.
fn publish(subscribers: &mut HashMap<SubscriberId, EventTx>, event: ExchangeEvent) {
    subscribers.retain(|_, tx| tx.send(event.clone()).is_ok());
}
