use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use super::{TradeRecord, TransferRecord};

/// Realized profit/loss and open position for one coin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlRecord {
    pub coin: String,
    pub realized_pnl: Decimal,
    pub closed_trade_count: u32,
    /// Every trade record seen for the coin, opening or closing.
    pub trade_count: u32,
    /// Signed: positive is long, negative is short.
    pub open_quantity: Decimal,
    pub average_cost: Decimal,
}

/// One trade that reduced an open position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingEvent {
    pub coin: String,
    pub timestamp: DateTime<Utc>,
    pub matched_quantity: Decimal,
    pub realized_pnl: Decimal,
}

impl ClosingEvent {
    /// Break-even closes are not wins.
    pub fn is_win(&self) -> bool {
        self.realized_pnl > Decimal::ZERO
    }
}

/// Win/loss statistics over all closing events of one address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinRateSummary {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub overall_win_rate: Decimal,
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    #[serde(serialize_with = "serialize_percentages")]
    pub win_rates_by_coin: BTreeMap<String, Decimal>,
}

impl WinRateSummary {
    pub fn empty() -> Self {
        Self {
            overall_win_rate: Decimal::ZERO,
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rates_by_coin: BTreeMap::new(),
        }
    }
}

fn serialize_percentages<S>(map: &BTreeMap<String, Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(
        map.iter()
            .map(|(coin, pct)| (coin, pct.to_f64().unwrap_or_default())),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    /// Raw trade records, not closing events.
    pub total_trades: usize,
    pub total_transfers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryReport {
    pub address: String,
    pub summary: HistorySummary,
    pub transfers: Vec<TransferRecord>,
    pub trades: Vec<TradeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradesByAddress {
    pub address: String,
    pub count: usize,
    pub trades: Vec<TradeRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_win_rate_serializes_as_numbers() {
        let mut by_coin = BTreeMap::new();
        by_coin.insert("BTC".to_string(), dec!(100.0));
        by_coin.insert("ETH".to_string(), dec!(50.0));

        let summary = WinRateSummary {
            overall_win_rate: dec!(66.7),
            total_trades: 3,
            winning_trades: 2,
            losing_trades: 1,
            win_rates_by_coin: by_coin,
        };

        let json = serde_json::to_value(&summary).unwrap();
        let overall = json["overall_win_rate"].as_f64().unwrap();
        assert!((overall - 66.7).abs() < 1e-9);
        assert_eq!(json["win_rates_by_coin"]["BTC"], 100.0);
        assert_eq!(json["win_rates_by_coin"]["ETH"], 50.0);
        assert_eq!(json["total_trades"], 3);
    }

    #[test]
    fn test_empty_summary_is_structurally_complete() {
        let json = serde_json::to_value(WinRateSummary::empty()).unwrap();
        assert_eq!(json["overall_win_rate"], 0.0);
        assert_eq!(json["winning_trades"], 0);
        assert!(json["win_rates_by_coin"].as_object().unwrap().is_empty());
    }
}
