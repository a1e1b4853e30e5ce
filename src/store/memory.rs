use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TradeStore;
use crate::models::{HistoryRecord, TradeRecord, TransferRecord};

#[derive(Debug, Default)]
struct Inner {
    addresses: BTreeSet<String>,
    /// address -> records in arrival order
    records: HashMap<String, Vec<HistoryRecord>>,
    /// (address, dedup key)
    seen: HashSet<(String, String)>,
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn insert(&self, address: &str, records: Vec<HistoryRecord>) -> usize {
        let mut inner = self.inner.write().await;
        let mut new_count = 0;

        for record in records {
            let key = (address.to_string(), record.dedup_key());
            if !inner.seen.insert(key) {
                continue;
            }
            inner
                .records
                .entry(address.to_string())
                .or_default()
                .push(record);
            new_count += 1;
        }

        new_count
    }

    async fn history(&self, address: &str) -> Vec<HistoryRecord> {
        let inner = self.inner.read().await;
        let mut records = inner.records.get(address).cloned().unwrap_or_default();
        records.sort_by_key(|r| r.replay_key());
        records
    }
}

#[async_trait]
impl TradeStore for MemoryStore {
    async fn tracked_addresses(&self) -> anyhow::Result<BTreeSet<String>> {
        Ok(self.inner.read().await.addresses.clone())
    }

    async fn track_address(&self, address: &str) -> anyhow::Result<bool> {
        Ok(self.inner.write().await.addresses.insert(address.to_string()))
    }

    async fn trades_by_address(&self, address: &str) -> anyhow::Result<Vec<TradeRecord>> {
        Ok(self
            .history(address)
            .await
            .into_iter()
            .filter_map(|r| match r {
                HistoryRecord::Trade(t) => Some(t),
                HistoryRecord::Transfer(_) => None,
            })
            .collect())
    }

    async fn transfers_by_address(&self, address: &str) -> anyhow::Result<Vec<TransferRecord>> {
        Ok(self
            .history(address)
            .await
            .into_iter()
            .filter_map(|r| match r {
                HistoryRecord::Transfer(t) => Some(t),
                HistoryRecord::Trade(_) => None,
            })
            .collect())
    }

    async fn save_trades(&self, address: &str, trades: &[TradeRecord]) -> anyhow::Result<usize> {
        let records = trades.iter().cloned().map(HistoryRecord::Trade).collect();
        Ok(self.insert(address, records).await)
    }

    async fn save_transfers(
        &self,
        address: &str,
        transfers: &[TransferRecord],
    ) -> anyhow::Result<usize> {
        let records = transfers.iter().cloned().map(HistoryRecord::Transfer).collect();
        Ok(self.insert(address, records).await)
    }
}
