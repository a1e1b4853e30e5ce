use sqlx::PgPool;

/// Start tracking an address. Returns `true` if it was not tracked before.
pub async fn insert_address(pool: &PgPool, address: &str) -> anyhow::Result<bool> {
    let result = sqlx::query(
        "INSERT INTO tracked_addresses (address) VALUES ($1) ON CONFLICT (address) DO NOTHING",
    )
    .bind(address)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// All tracked addresses, alphabetically.
pub async fn get_addresses(pool: &PgPool) -> anyhow::Result<Vec<String>> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT address FROM tracked_addresses ORDER BY address")
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(|r| r.0).collect())
}
