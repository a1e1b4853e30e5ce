pub mod report;
pub mod trade;

pub use report::{
    ClosingEvent, HistoryReport, HistorySummary, PnlRecord, TradesByAddress, WinRateSummary,
};
pub use trade::{HistoryRecord, TradeRecord, TransferRecord};

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Hyperliquid reports fills as `B` (bid, buy) or `A` (ask, sell).
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "B" | "BUY" => Some(Side::Buy),
            "A" | "SELL" => Some(Side::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Addresses compare case-insensitively; everything is keyed on the lowercase form.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// `0x` followed by 40 characters, as accepted by the track endpoint.
pub fn is_valid_address(address: &str) -> bool {
    let address = address.trim();
    address.len() == 42 && address.starts_with("0x")
}
