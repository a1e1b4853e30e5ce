use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;

use super::types::{ApiFill, ApiLedgerUpdate};

pub const DEFAULT_INFO_URL: &str = "https://api.hyperliquid.xyz/info";

#[derive(Debug, Error)]
pub enum HyperliquidError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Read-only client for the Hyperliquid info endpoint.
#[derive(Debug, Clone)]
pub struct HyperliquidClient {
    http: Client,
    info_url: String,
}

impl HyperliquidClient {
    pub fn new(http: Client, info_url: impl Into<String>) -> Self {
        Self {
            http,
            info_url: info_url.into(),
        }
    }

    /// All fills for an address, as returned by `userFills`.
    pub async fn user_fills(&self, address: &str) -> Result<Vec<ApiFill>, HyperliquidError> {
        self.post_info(json!({ "type": "userFills", "user": address }))
            .await
    }

    /// Deposits, withdrawals and transfers (`userNonFundingLedgerUpdates`).
    pub async fn ledger_updates(
        &self,
        address: &str,
    ) -> Result<Vec<ApiLedgerUpdate>, HyperliquidError> {
        self.post_info(json!({ "type": "userNonFundingLedgerUpdates", "user": address }))
            .await
    }

    async fn post_info<T: DeserializeOwned>(&self, body: Value) -> Result<Vec<T>, HyperliquidError> {
        let resp = self
            .http
            .post(&self.info_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let value: Value = resp.json().await?;
        parse_list(value)
    }
}

/// The info endpoint answers with a JSON array; anything else is an error payload.
fn parse_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, HyperliquidError> {
    match value {
        Value::Array(_) => serde_json::from_value(value)
            .map_err(|e| HyperliquidError::Unexpected(e.to_string())),
        other => Err(HyperliquidError::Unexpected(other.to_string())),
    }
}
