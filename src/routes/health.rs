use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::debug;

use crate::models::RequestStatus;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    /// Lifecycle state of the published snapshot.
    pub pipeline: RequestStatus,
    /// Sequence token of the most recent prediction request.
    pub sequence: u64,
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let snapshot = state.orchestrator.snapshot();
    debug!("GET /health - pipeline {:?} at #{}", snapshot.status, snapshot.sequence);
    Json(HealthReport {
        status: "ok",
        pipeline: snapshot.status,
        sequence: state.orchestrator.current_sequence(),
    })
}
