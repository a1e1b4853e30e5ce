use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{is_valid_address, normalize_address};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    pub address: String,
}

#[derive(Serialize)]
pub struct TrackResponse {
    pub message: String,
    pub status: &'static str,
    /// `false` when the address was already tracked.
    pub newly_tracked: bool,
}

#[derive(Serialize)]
pub struct AddressList {
    pub count: usize,
    pub addresses: Vec<String>,
}

pub async fn track(
    State(state): State<AppState>,
    Json(req): Json<TrackRequest>,
) -> Result<Json<TrackResponse>, AppError> {
    if !is_valid_address(&req.address) {
        return Err(AppError::BadRequest(format!(
            "invalid address format: {}",
            req.address
        )));
    }

    let address = normalize_address(&req.address);
    let newly_tracked = state.analyzer.store().track_address(&address).await?;

    tracing::info!(address = %address, newly_tracked, "Tracking address");

    Ok(Json(TrackResponse {
        message: format!("Tracking address: {address}"),
        status: "success",
        newly_tracked,
    }))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<AddressList>, AppError> {
    let addresses: Vec<String> = state
        .analyzer
        .get_all_tracked_addresses()
        .await?
        .into_iter()
        .collect();

    Ok(Json(AddressList {
        count: addresses.len(),
        addresses,
    }))
}
