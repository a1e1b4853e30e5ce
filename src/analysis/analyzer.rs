use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use metrics::counter;

use super::pnl::calculate_pnl_by_coin;
use super::winrate::calculate_winrate;
use crate::errors::AnalysisError;
use crate::models::{
    normalize_address, HistoryReport, HistorySummary, PnlRecord, TradeRecord, TradesByAddress,
    WinRateSummary,
};
use crate::store::TradeStore;

/// Loads an address's history from the injected store and runs the
/// calculators over it. Holds no state of its own between calls.
pub struct TradeAnalyzer<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for TradeAnalyzer<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: TradeStore + ?Sized> TradeAnalyzer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn get_all_tracked_addresses(&self) -> Result<BTreeSet<String>, AnalysisError> {
        Ok(self.store.tracked_addresses().await?)
    }

    /// Chronological trades. An untracked address simply has none.
    pub async fn get_trades_by_address(
        &self,
        address: &str,
    ) -> Result<Vec<TradeRecord>, AnalysisError> {
        let address = normalize_address(address);
        Ok(self.store.trades_by_address(&address).await?)
    }

    pub async fn calculate_pnl(
        &self,
        address: &str,
    ) -> Result<BTreeMap<String, PnlRecord>, AnalysisError> {
        let trades = self.get_trades_by_address(address).await?;
        calculate_pnl_by_coin(&trades)
    }

    pub async fn calculate_winrate(&self, address: &str) -> Result<WinRateSummary, AnalysisError> {
        let trades = self.get_trades_by_address(address).await?;
        calculate_winrate(&trades)
    }

    pub async fn build_trades_by_address(
        &self,
        address: &str,
    ) -> Result<TradesByAddress, AnalysisError> {
        let address = normalize_address(address);
        let trades = self.store.trades_by_address(&address).await?;

        Ok(TradesByAddress {
            address,
            count: trades.len(),
            trades,
        })
    }

    /// Raw trades and transfers plus their counts. The history is run through
    /// both calculators first, so an invalid record fails the whole report.
    pub async fn build_history_report(&self, address: &str) -> Result<HistoryReport, AnalysisError> {
        let address = normalize_address(address);
        let trades = self.store.trades_by_address(&address).await?;
        let transfers = self.store.transfers_by_address(&address).await?;

        let pnl = calculate_pnl_by_coin(&trades)?;
        let winrate = calculate_winrate(&trades)?;

        tracing::debug!(
            address = %address,
            trades = trades.len(),
            transfers = transfers.len(),
            coins = pnl.len(),
            closing_trades = winrate.total_trades,
            win_rate = %winrate.overall_win_rate,
            "History report built"
        );
        counter!("reports_built_total").increment(1);

        Ok(HistoryReport {
            address,
            summary: HistorySummary {
                total_trades: trades.len(),
                total_transfers: transfers.len(),
            },
            transfers,
            trades,
        })
    }
}
