use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::models::HistoryRecord;

/// Insert a fill or transfer unless its dedup key is already stored.
/// Returns `true` if a row was written. Runs on a pool or inside a transaction.
pub async fn insert_record<'e, E>(
    executor: E,
    address: &str,
    record: &HistoryRecord,
) -> anyhow::Result<bool>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO history_records (address, kind, record_key, recorded_at, payload)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (address, record_key) DO NOTHING
        "#,
    )
    .bind(address)
    .bind(record.kind())
    .bind(record.dedup_key())
    .bind(record.timestamp())
    .bind(Json(record))
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Records of one kind for an address, oldest first. Fills in the same
/// millisecond come back in `tid` order; anything else keeps insertion order.
pub async fn get_records(
    pool: &PgPool,
    address: &str,
    kind: &str,
) -> anyhow::Result<Vec<HistoryRecord>> {
    let rows: Vec<(Json<HistoryRecord>,)> = sqlx::query_as(
        r#"
        SELECT payload FROM history_records
        WHERE address = $1 AND kind = $2
        ORDER BY recorded_at ASC, (payload->>'tid')::BIGINT ASC NULLS LAST, id ASC
        "#,
    )
    .bind(address)
    .bind(kind)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(Json(record),)| record).collect())
}
