use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analysis::total_realized_pnl;
use crate::errors::AppError;
use crate::models::{normalize_address, HistoryReport, PnlRecord, WinRateSummary};
use crate::AppState;

#[derive(Serialize)]
pub struct PnlReport {
    pub address: String,
    pub total_realized_pnl: Decimal,
    pub coins: BTreeMap<String, PnlRecord>,
}

pub async fn history(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<HistoryReport>, AppError> {
    Ok(Json(state.analyzer.build_history_report(&address).await?))
}

pub async fn pnl(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<PnlReport>, AppError> {
    let coins = state.analyzer.calculate_pnl(&address).await?;

    Ok(Json(PnlReport {
        address: normalize_address(&address),
        total_realized_pnl: total_realized_pnl(&coins)?,
        coins,
    }))
}

pub async fn winrate(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<WinRateSummary>, AppError> {
    Ok(Json(state.analyzer.calculate_winrate(&address).await?))
}
