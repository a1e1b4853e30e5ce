pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::models::{TradeRecord, TransferRecord};

/// Where tracked addresses and their raw history live.
///
/// Reads return records in chronological order. Addresses are expected to be
/// normalized by the caller.
#[async_trait]
pub trait TradeStore: Send + Sync {
    async fn tracked_addresses(&self) -> anyhow::Result<BTreeSet<String>>;

    /// Returns `true` if the address was not tracked before.
    async fn track_address(&self, address: &str) -> anyhow::Result<bool>;

    async fn trades_by_address(&self, address: &str) -> anyhow::Result<Vec<TradeRecord>>;

    async fn transfers_by_address(&self, address: &str) -> anyhow::Result<Vec<TransferRecord>>;

    /// Insert-or-ignore by dedup key. Returns the number of new records.
    async fn save_trades(&self, address: &str, trades: &[TradeRecord]) -> anyhow::Result<usize>;

    async fn save_transfers(
        &self,
        address: &str,
        transfers: &[TransferRecord],
    ) -> anyhow::Result<usize>;

    /// Connectivity check for the health endpoint.
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
