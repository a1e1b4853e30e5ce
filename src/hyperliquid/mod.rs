pub mod client;
pub mod types;

pub use client::{HyperliquidClient, HyperliquidError};
pub use types::{ApiFill, ApiLedgerDelta, ApiLedgerUpdate};
