use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::PipelineSnapshot;
use crate::services::prediction_service::{
    days_out_of_range, validate_request, PredictionOutcome, MIN_DAYS,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(run_prediction))
        .route("/latest", get(get_latest))
        .route("/acknowledge", post(acknowledge))
}

/// Raw request body. Fields stay untyped so that a wrong type or a missing
/// field is answered by the validation gate instead of the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct PredictionRequest {
    #[serde(default)]
    pub ticker: Option<Value>,
    #[serde(default)]
    pub days: Option<Value>,
}

impl PredictionRequest {
    pub fn ticker(&self) -> &str {
        self.ticker.as_ref().and_then(Value::as_str).unwrap_or_default()
    }

    /// `None` unless `days` is a JSON integer.
    pub fn days(&self) -> Option<i64> {
        self.days.as_ref().and_then(Value::as_i64)
    }
}

pub async fn run_prediction(
    State(state): State<AppState>,
    body: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("POST /api/predictions - unreadable body: {}", rejection.body_text());
            return Err(state.orchestrator.reject_input(AppError::Validation(
                "Invalid prediction request".to_string(),
            )));
        }
    };

    let ticker = req.ticker();
    let Some(days) = req.days() else {
        warn!("POST /api/predictions - {:?} with non-integer days {:?}", ticker, req.days);
        // A blank ticker is still reported before the horizon.
        let err = validate_request(ticker, MIN_DAYS).err().unwrap_or_else(days_out_of_range);
        return Err(state.orchestrator.reject_input(err));
    };
    info!("POST /api/predictions - {} for {} days", ticker, days);

    match state.orchestrator.run_prediction(ticker, days).await? {
        PredictionOutcome::Published(snapshot) => Ok(Json(snapshot).into_response()),
        PredictionOutcome::Superseded { sequence } => Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "error": "Superseded by a newer prediction request",
                "sequence": sequence,
            })),
        )
            .into_response()),
    }
}

pub async fn get_latest(State(state): State<AppState>) -> Json<Arc<PipelineSnapshot>> {
    Json(state.orchestrator.snapshot())
}

pub async fn acknowledge(State(state): State<AppState>) -> Json<Arc<PipelineSnapshot>> {
    Json(state.orchestrator.acknowledge())
}
