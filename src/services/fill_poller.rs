use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use metrics::{counter, gauge, histogram};
use tokio::time::sleep;

use crate::hyperliquid::{ApiFill, ApiLedgerUpdate, HyperliquidClient};
use crate::models::{TradeRecord, TransferRecord};
use crate::store::TradeStore;

/// New records stored for one address in one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub new_trades: usize,
    pub new_transfers: usize,
}

/// Keep every tracked address's fills and transfers up to date.
///
/// Flow:
/// 1. Load tracked addresses from the store
/// 2. Fetch `userFills` and ledger updates for all of them concurrently
/// 3. Save whatever the store has not seen yet
/// 4. Sleep `interval_secs` and repeat
pub async fn run_fill_poller<S>(client: HyperliquidClient, store: Arc<S>, interval_secs: u64)
where
    S: TradeStore + ?Sized,
{
    tracing::info!(interval_secs = interval_secs, "Fill poller started");

    loop {
        let started = Instant::now();
        let outcome = poll_once(&client, store.as_ref()).await;
        histogram!("poll_cycle_seconds").record(started.elapsed().as_secs_f64());

        if outcome.new_trades > 0 || outcome.new_transfers > 0 {
            tracing::info!(
                new_trades = outcome.new_trades,
                new_transfers = outcome.new_transfers,
                "Fill poller cycle complete"
            );
        }

        sleep(Duration::from_secs(interval_secs)).await;
    }
}

/// One polling cycle over all tracked addresses. Failures are logged per
/// address and never abort the cycle.
pub async fn poll_once<S>(client: &HyperliquidClient, store: &S) -> SyncOutcome
where
    S: TradeStore + ?Sized,
{
    let addresses = match store.tracked_addresses().await {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(error = %e, "Fill poller: failed to load tracked addresses");
            counter!("poll_errors_total").increment(1);
            return SyncOutcome::default();
        }
    };
    gauge!("tracked_addresses").set(addresses.len() as f64);

    let results = join_all(
        addresses
            .iter()
            .map(|address| sync_address(client, store, address)),
    )
    .await;

    let mut total = SyncOutcome::default();
    for (address, result) in addresses.iter().zip(results) {
        match result {
            Ok(outcome) => {
                total.new_trades += outcome.new_trades;
                total.new_transfers += outcome.new_transfers;
            }
            Err(e) => {
                counter!("poll_errors_total").increment(1);
                tracing::warn!(address = %address, error = %e, "Fill poller: sync failed");
            }
        }
    }

    total
}

/// Fetch and store new fills and transfers for one address.
pub async fn sync_address<S>(
    client: &HyperliquidClient,
    store: &S,
    address: &str,
) -> anyhow::Result<SyncOutcome>
where
    S: TradeStore + ?Sized,
{
    let fills = client.user_fills(address).await?;
    let trades = normalize_fills(address, &fills);
    let new_trades = store.save_trades(address, &trades).await?;

    // Count before the ledger fetch: stored fills are never seen as new again.
    counter!("fills_stored_total").increment(new_trades as u64);
    if new_trades > 0 {
        tracing::info!(
            address = %address,
            new_trades = new_trades,
            "Stored {} new trades",
            new_trades
        );
    }

    let updates = client.ledger_updates(address).await?;
    let transfers = normalize_ledger_updates(address, &updates);
    let new_transfers = store.save_transfers(address, &transfers).await?;
    counter!("transfers_stored_total").increment(new_transfers as u64);

    Ok(SyncOutcome {
        new_trades,
        new_transfers,
    })
}

/// Convert API fills, skipping the ones that cannot be normalized.
pub fn normalize_fills(address: &str, fills: &[ApiFill]) -> Vec<TradeRecord> {
    fills
        .iter()
        .filter_map(|fill| match fill.to_trade_record(address) {
            Ok(trade) => Some(trade),
            Err(reason) => {
                tracing::warn!(address = %address, tid = ?fill.tid, reason = %reason, "Skipping fill");
                None
            }
        })
        .collect()
}

pub fn normalize_ledger_updates(address: &str, updates: &[ApiLedgerUpdate]) -> Vec<TransferRecord> {
    updates
        .iter()
        .filter_map(|update| match update.to_transfer_record(address) {
            Ok(transfer) => Some(transfer),
            Err(reason) => {
                tracing::warn!(address = %address, reason = %reason, "Skipping ledger update");
                None
            }
        })
        .collect()
}
