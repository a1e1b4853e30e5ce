use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;

/// One executed buy or sell for a tracked address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub address: String,
    pub coin: String,
    pub side: Side,
    pub amount: Decimal,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tid: Option<i64>,
    #[serde(default)]
    pub hash: Option<String>,
}

impl TradeRecord {
    /// Key used to ignore fills that were already stored.
    pub fn dedup_key(&self) -> String {
        match self.tid {
            Some(tid) => format!("tid:{tid}"),
            None => format!(
                "fill:{}:{}:{}",
                self.hash.as_deref().unwrap_or("-"),
                self.coin,
                self.timestamp.timestamp_millis()
            ),
        }
    }

    /// Replay order: time, then exchange trade id. Fills in the same
    /// millisecond without a `tid` sort after those with one.
    pub fn replay_key(&self) -> (DateTime<Utc>, i64) {
        (self.timestamp, self.tid.unwrap_or(i64::MAX))
    }
}

/// Deposit, withdrawal or other ledger movement. Never part of PnL math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub address: String,
    /// Ledger update type as reported, e.g. `deposit` or `withdraw`.
    #[serde(rename = "type")]
    pub transfer_type: String,
    pub asset: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub hash: Option<String>,
}

impl TransferRecord {
    pub fn dedup_key(&self) -> String {
        match &self.hash {
            Some(hash) => format!("tx:{hash}:{}", self.transfer_type),
            None => format!(
                "ledger:{}:{}:{}",
                self.transfer_type,
                self.timestamp.timestamp_millis(),
                self.amount
            ),
        }
    }
}

/// A stored history row, tagged by `kind` so trades and transfers never mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HistoryRecord {
    Trade(TradeRecord),
    Transfer(TransferRecord),
}

impl HistoryRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            HistoryRecord::Trade(_) => "trade",
            HistoryRecord::Transfer(_) => "transfer",
        }
    }

    pub fn dedup_key(&self) -> String {
        match self {
            HistoryRecord::Trade(t) => t.dedup_key(),
            HistoryRecord::Transfer(t) => t.dedup_key(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            HistoryRecord::Trade(t) => t.timestamp,
            HistoryRecord::Transfer(t) => t.timestamp,
        }
    }

    pub fn replay_key(&self) -> (DateTime<Utc>, i64) {
        match self {
            HistoryRecord::Trade(t) => t.replay_key(),
            HistoryRecord::Transfer(t) => (t.timestamp, i64::MAX),
        }
    }
}
