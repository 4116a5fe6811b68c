//! A small end-to-end session against the exchange service:
//! two accounts fund their balances, one places an order, the other
//! fills it, and a subscriber prints the event stream as it commits.
//!
//! Run with:
//! ```text
//! RUST_LOG=info cargo run -p exchange-service --example trading_day
//! ```

use exchange_core::{units, AccountId, AssetId, OrderId};
use exchange_service::{Config, ExchangeService};
use tracing_subscriber::EnvFilter;

const ALICE: AccountId = AccountId(1);
const BOB: AccountId = AccountId(2);
const TOKEN: AssetId = AssetId(7);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let handle = ExchangeService::spawn(config);

    let (_subscriber, mut events) = handle.subscribe().await?;
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("event: {event:?}");
        }
    });

    // Fund both sides: Alice brings native value, Bob brings tokens he
    // has approved the exchange to pull.
    handle.mint(TOKEN, BOB, units(100)).await?;
    handle.approve(TOKEN, BOB, units(2)).await?;
    handle.deposit_native(ALICE, units(1)).await?;
    handle.deposit_token(BOB, TOKEN, units(2)).await?;

    // Alice offers her native unit for one token; Bob takes the trade.
    let placed = handle
        .make_order(ALICE, TOKEN, units(1), AssetId::NATIVE, units(1))
        .await?;
    handle.fill_order(BOB, placed.id).await?;

    // A second order that never trades.
    let abandoned = handle
        .make_order(ALICE, TOKEN, units(3), AssetId::NATIVE, units(1))
        .await?;
    handle.cancel_order(ALICE, abandoned.id).await?;

    println!(
        "alice: {} token units, {} native units",
        handle.balance_of(TOKEN, ALICE).await?,
        handle.balance_of(AssetId::NATIVE, ALICE).await?,
    );
    println!(
        "bob:   {} token units, {} native units",
        handle.balance_of(TOKEN, BOB).await?,
        handle.balance_of(AssetId::NATIVE, BOB).await?,
    );
    println!("orders ever created: {}", handle.order_count().await?);
    println!(
        "order #1 filled: {}, order #2 cancelled: {}",
        handle.order_filled(OrderId(1)).await?,
        handle.order_cancelled(OrderId(2)).await?,
    );

    drop(handle);
    printer.await?;
    Ok(())
}
