use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;

use super::TradeStore;
use crate::db::{address_repo, record_repo};
use crate::models::{HistoryRecord, TradeRecord, TransferRecord};

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a batch in one transaction: either every new record lands or none do.
    async fn insert_all(
        &self,
        address: &str,
        records: impl Iterator<Item = HistoryRecord> + Send,
    ) -> anyhow::Result<usize> {
        let mut tx = self.pool.begin().await?;

        let mut new_count = 0;
        for record in records {
            if record_repo::insert_record(&mut *tx, address, &record).await? {
                new_count += 1;
            }
        }

        tx.commit().await?;
        Ok(new_count)
    }
}

#[async_trait]
impl TradeStore for PgStore {
    async fn tracked_addresses(&self) -> anyhow::Result<BTreeSet<String>> {
        Ok(address_repo::get_addresses(&self.pool)
            .await?
            .into_iter()
            .collect())
    }

    async fn track_address(&self, address: &str) -> anyhow::Result<bool> {
        address_repo::insert_address(&self.pool, address).await
    }

    async fn trades_by_address(&self, address: &str) -> anyhow::Result<Vec<TradeRecord>> {
        let records = record_repo::get_records(&self.pool, address, "trade").await?;
        Ok(records
            .into_iter()
            .filter_map(|r| match r {
                HistoryRecord::Trade(t) => Some(t),
                HistoryRecord::Transfer(_) => None,
            })
            .collect())
    }

    async fn transfers_by_address(&self, address: &str) -> anyhow::Result<Vec<TransferRecord>> {
        let records = record_repo::get_records(&self.pool, address, "transfer").await?;
        Ok(records
            .into_iter()
            .filter_map(|r| match r {
                HistoryRecord::Transfer(t) => Some(t),
                HistoryRecord::Trade(_) => None,
            })
            .collect())
    }

    async fn save_trades(&self, address: &str, trades: &[TradeRecord]) -> anyhow::Result<usize> {
        self.insert_all(address, trades.iter().cloned().map(HistoryRecord::Trade))
            .await
    }

    async fn save_transfers(
        &self,
        address: &str,
        transfers: &[TransferRecord],
    ) -> anyhow::Result<usize> {
        self.insert_all(address, transfers.iter().cloned().map(HistoryRecord::Transfer))
            .await
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
