use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Side, TradeRecord, TransferRecord};

// ---------------------------------------------------------------------------
// Fill (info API: userFills)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFill {
    pub coin: Option<String>,
    pub px: Option<String>,
    pub sz: Option<String>,
    pub side: Option<String>,
    pub time: Option<i64>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub tid: Option<i64>,
    #[serde(default)]
    pub oid: Option<i64>,
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub closed_pnl: Option<String>,
    #[serde(default)]
    pub fee: Option<String>,
}

impl ApiFill {
    /// Normalize a fill for `address`. Fails on a missing field, an unknown
    /// side code or an unparsable number.
    pub fn to_trade_record(&self, address: &str) -> Result<TradeRecord, String> {
        let coin = self
            .coin
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or("fill without coin")?;
        let side_code = self.side.as_deref().ok_or("fill without side")?;
        let side = Side::from_api_str(side_code)
            .ok_or_else(|| format!("unrecognized side {side_code:?}"))?;

        Ok(TradeRecord {
            address: address.to_string(),
            coin: coin.to_string(),
            side,
            amount: parse_decimal(self.sz.as_deref(), "sz")?,
            price: parse_decimal(self.px.as_deref(), "px")?,
            timestamp: parse_millis(self.time)?,
            tid: self.tid,
            hash: self.hash.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Ledger update (info API: userNonFundingLedgerUpdates)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiLedgerDelta {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub usdc: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiLedgerUpdate {
    pub time: Option<i64>,
    #[serde(default)]
    pub hash: Option<String>,
    pub delta: ApiLedgerDelta,
}

impl ApiLedgerUpdate {
    /// USDC movements report `usdc`; token transfers report `token` + `amount`.
    /// Updates with no amount at all are kept with a zero amount.
    pub fn to_transfer_record(&self, address: &str) -> Result<TransferRecord, String> {
        let raw_amount = self.delta.usdc.as_deref().or(self.delta.amount.as_deref());
        let amount = match raw_amount {
            Some(_) => parse_decimal(raw_amount, "amount")?,
            None => Decimal::ZERO,
        };

        Ok(TransferRecord {
            address: address.to_string(),
            transfer_type: self.delta.kind.clone(),
            asset: self.delta.token.clone().unwrap_or_else(|| "USDC".into()),
            amount,
            timestamp: parse_millis(self.time)?,
            hash: self.hash.clone(),
        })
    }
}

fn parse_decimal(raw: Option<&str>, field: &str) -> Result<Decimal, String> {
    let raw = raw.ok_or_else(|| format!("missing {field}"))?;
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| format!("bad {field} {raw:?}: {e}"))
}

fn parse_millis(time: Option<i64>) -> Result<DateTime<Utc>, String> {
    let ms = time.ok_or("missing time")?;
    DateTime::from_timestamp_millis(ms).ok_or_else(|| format!("time out of range: {ms}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_fill_to_trade_record() {
        let fill: ApiFill = serde_json::from_value(json!({
            "coin": "AVAX",
            "px": "18.435",
            "sz": "93.53",
            "side": "B",
            "time": 1681222254710i64,
            "startPosition": "26.86",
            "dir": "Open Long",
            "closedPnl": "0.0",
            "hash": "0xa166e3fa63c25663024b03f2e0da011a00307e4017e9e5c2d9d8",
            "oid": 90542681,
            "crossed": false,
            "fee": "0.01",
            "tid": 118906512037719i64
        }))
        .unwrap();

        let trade = fill.to_trade_record("0xabc").unwrap();
        assert_eq!(trade.coin, "AVAX");
        assert_eq!(trade.side, Side::Buy);
        assert_eq!(trade.amount, dec!(93.53));
        assert_eq!(trade.price, dec!(18.435));
        assert_eq!(trade.timestamp.timestamp_millis(), 1681222254710);
        assert_eq!(trade.tid, Some(118906512037719));
    }

    #[test]
    fn test_fill_with_unknown_side_is_rejected() {
        let fill: ApiFill = serde_json::from_value(json!({
            "coin": "BTC", "px": "1", "sz": "1", "side": "Z", "time": 1
        }))
        .unwrap();
        assert!(fill.to_trade_record("0xabc").is_err());
    }

    #[test]
    fn test_ledger_update_to_transfer() {
        let update: ApiLedgerUpdate = serde_json::from_value(json!({
            "time": 1681222254710i64,
            "hash": "0xdeposit",
            "delta": { "type": "deposit", "usdc": "2703997.45" }
        }))
        .unwrap();

        let transfer = update.to_transfer_record("0xabc").unwrap();
        assert_eq!(transfer.transfer_type, "deposit");
        assert_eq!(transfer.asset, "USDC");
        assert_eq!(transfer.amount, dec!(2703997.45));
    }

    #[test]
    fn test_ledger_update_without_amount() {
        let update: ApiLedgerUpdate = serde_json::from_value(json!({
            "time": 1,
            "delta": { "type": "accountClassTransfer" }
        }))
        .unwrap();

        let transfer = update.to_transfer_record("0xabc").unwrap();
        assert_eq!(transfer.amount, Decimal::ZERO);
    }
}
