use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use hltracker::models::{Side, TradeRecord, TransferRecord};
use hltracker::store::{MemoryStore, TradeStore};

pub const ADDRESS: &str = "0x00000000000000000000000000000000000000aa";

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
}

/// Build a trade record for testing.
#[allow(dead_code)]
pub fn trade(coin: &str, side: Side, amount: Decimal, price: Decimal, secs: i64) -> TradeRecord {
    TradeRecord {
        address: ADDRESS.into(),
        coin: coin.into(),
        side,
        amount,
        price,
        timestamp: at(secs),
        tid: Some(secs),
        hash: Some(format!("0xfill{secs}")),
    }
}

/// Build a trade record with an explicit exchange trade id, for fills that
/// share a timestamp.
#[allow(dead_code)]
pub fn fill(coin: &str, side: Side, amount: Decimal, price: Decimal, secs: i64, tid: i64) -> TradeRecord {
    TradeRecord {
        tid: Some(tid),
        hash: Some(format!("0xfill{tid}")),
        ..trade(coin, side, amount, price, secs)
    }
}

/// Build a deposit record for testing.
#[allow(dead_code)]
pub fn deposit(amount: Decimal, secs: i64) -> TransferRecord {
    TransferRecord {
        address: ADDRESS.into(),
        transfer_type: "deposit".into(),
        asset: "USDC".into(),
        amount,
        timestamp: at(secs),
        hash: Some(format!("0xdep{secs}")),
    }
}

/// Memory store with `ADDRESS` tracked and the given history saved.
#[allow(dead_code)]
pub async fn seeded_store(trades: &[TradeRecord], transfers: &[TransferRecord]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .track_address(ADDRESS)
        .await
        .expect("Failed to track address");
    store
        .save_trades(ADDRESS, trades)
        .await
        .expect("Failed to seed trades");
    store
        .save_transfers(ADDRESS, transfers)
        .await
        .expect("Failed to seed transfers");
    store
}

/// Connect to the test database and run all migrations. Returns `None` when
/// `TEST_DATABASE_URL` is unset so the Postgres tests can be skipped locally.
#[allow(dead_code)]
pub async fn setup_test_db() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set; skipping Postgres test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// Remove everything stored for one address, for test isolation.
#[allow(dead_code)]
pub async fn clear_address(pool: &PgPool, address: &str) {
    sqlx::query("DELETE FROM history_records WHERE address = $1")
        .bind(address)
        .execute(pool)
        .await
        .ok();
    sqlx::query("DELETE FROM tracked_addresses WHERE address = $1")
        .bind(address)
        .execute(pool)
        .await
        .ok();
}
