use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Failures of the trade analysis core.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A record breaks the trade invariants. The whole history is rejected.
    #[error("invalid trade record at index {index}: {reason}")]
    InvalidTradeRecord { index: usize, reason: String },

    /// An aggregate over valid records no longer fits in a `Decimal`.
    #[error("arithmetic overflow computing {0}")]
    Overflow(String),

    /// Store failures are passed through untouched.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::InvalidTradeRecord { .. } | AnalysisError::Overflow(_) => {
                AppError::Unprocessable(e.to_string())
            }
            AnalysisError::Store(inner) => AppError::Internal(inner),
        }
    }
}
