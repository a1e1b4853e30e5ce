use axum::extract::{Path, State};
use axum::Json;

use crate::errors::AppError;
use crate::models::TradesByAddress;
use crate::AppState;

/// Stored trades for an address, newest first.
pub async fn by_address(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<TradesByAddress>, AppError> {
    let mut report = state.analyzer.build_trades_by_address(&address).await?;
    report.trades.reverse();
    Ok(Json(report))
}
